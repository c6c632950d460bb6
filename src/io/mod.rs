//! Collaborators at the edge of a tiling run: where the extent comes from and
//! where the hexagons go.

pub mod arrow;
pub mod csv;
pub mod extent;
pub mod geojson;
pub mod parquet;
pub mod sink;

pub use self::arrow::HexagonFeaturesToArrow;
pub use self::csv::CsvFeatureWriter;
pub use self::extent::{CoordinateSource, FileExtentProvider};
pub use self::geojson::GeoJsonFeatureWriter;
pub use self::parquet::{GeoParquetFeatureWriter, HexagonFeaturesToGeoParquet, write_geoparquet};
pub use self::sink::{FileOutputSink, OutputFormat};

use crate::coord::SpatialReference;
use crate::core::Extent;
use crate::error::HexcoverError;
use crate::feature::HexagonFeature;
use std::path::Path;

/// Raw corners as reported by a dataset: `(x_min, y_min, x_max, y_max)`,
/// possibly reversed.
pub type RawExtent = (f64, f64, f64, f64);

/// Looks up the bounding rectangle and spatial reference of an input dataset.
pub trait ExtentProvider {
    fn extent(&self, dataset: &Path) -> Result<RawExtent, HexcoverError>;

    fn spatial_reference(&self, dataset: &Path) -> Result<SpatialReference, HexcoverError>;
}

/// A fixed extent serves every dataset, with no spatial reference.
impl ExtentProvider for Extent {
    fn extent(&self, _dataset: &Path) -> Result<RawExtent, HexcoverError> {
        Ok((self.x_min(), self.y_min(), self.x_max(), self.y_max()))
    }

    fn spatial_reference(&self, _dataset: &Path) -> Result<SpatialReference, HexcoverError> {
        Ok(SpatialReference::unknown())
    }
}

/// Creates and removes output datasets.
pub trait OutputSink {
    /// Fails if a container named `name` could never be created in `workspace`.
    ///
    /// Runs before anything is deleted, so a doomed run leaves existing data alone.
    fn check_target(&self, _workspace: &Path, _name: &str) -> Result<(), HexcoverError> {
        Ok(())
    }

    fn delete_if_exists(&mut self, path: &Path) -> Result<(), HexcoverError>;

    /// Creates an empty polygon dataset `name` inside `workspace` and opens a
    /// writer on it.
    fn create_polygon_container(
        &mut self,
        workspace: &Path,
        name: &str,
        spatial_reference: &SpatialReference,
    ) -> Result<Box<dyn FeatureWriter>, HexcoverError>;
}

/// Insert cursor over an open polygon dataset.
pub trait FeatureWriter {
    fn append_feature(&mut self, feature: &HexagonFeature) -> Result<(), HexcoverError>;

    /// Flushes and closes the dataset, returning the number of rows written.
    fn finish(&mut self) -> Result<u64, HexcoverError>;

    /// Releases the handle and discards what was written. Must not fail.
    fn abort(&mut self) {}
}

impl FeatureWriter for Vec<HexagonFeature> {
    fn append_feature(&mut self, feature: &HexagonFeature) -> Result<(), HexcoverError> {
        self.push(feature.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, HexcoverError> {
        Ok(self.len() as u64)
    }

    fn abort(&mut self) {
        self.clear();
    }
}
