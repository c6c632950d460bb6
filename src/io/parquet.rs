use super::FeatureWriter;
use super::arrow::HexagonFeaturesToArrow;
use crate::coord::SpatialReference;
use crate::error::HexcoverError;
use crate::feature::HexagonFeature;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn parquet_err(e: impl std::fmt::Display) -> HexcoverError {
    HexcoverError::ParquetError(e.to_string())
}

/// Writes a single RecordBatch with a geometry column as a WKB-encoded GeoParquet file.
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), HexcoverError> {
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder =
        GeoParquetRecordBatchEncoder::try_new(&schema, &options).map_err(parquet_err)?;

    let file = File::create(path).map_err(|e| HexcoverError::IoError(e.to_string()))?;
    let mut writer =
        ArrowWriter::try_new(file, encoder.target_schema(), None).map_err(parquet_err)?;

    let encoded_batch = encoder.encode_record_batch(batch).map_err(parquet_err)?;
    writer.write(&encoded_batch).map_err(parquet_err)?;

    let kv_metadata = encoder.into_keyvalue().map_err(parquet_err)?;
    writer.append_key_value_metadata(kv_metadata);
    writer.finish().map_err(parquet_err)?;

    Ok(())
}

pub trait HexagonFeaturesToGeoParquet: HexagonFeaturesToArrow {
    fn to_geoparquet(
        &self,
        path: impl AsRef<Path>,
        spatial_reference: &SpatialReference,
    ) -> Result<(), HexcoverError>;
}

impl HexagonFeaturesToGeoParquet for [HexagonFeature] {
    fn to_geoparquet(
        &self,
        path: impl AsRef<Path>,
        spatial_reference: &SpatialReference,
    ) -> Result<(), HexcoverError> {
        let batch = self.to_record_batch(spatial_reference)?;
        write_geoparquet(&batch, path)
    }
}

impl HexagonFeaturesToGeoParquet for Vec<HexagonFeature> {
    fn to_geoparquet(
        &self,
        path: impl AsRef<Path>,
        spatial_reference: &SpatialReference,
    ) -> Result<(), HexcoverError> {
        self.as_slice().to_geoparquet(path, spatial_reference)
    }
}

/// Collects hexagons and writes them as one GeoParquet row group on `finish`.
///
/// Parquet has no append, so rows are held in memory in emission order until
/// the dataset is closed.
#[derive(Debug)]
pub struct GeoParquetFeatureWriter {
    path: PathBuf,
    spatial_reference: SpatialReference,
    features: Vec<HexagonFeature>,
    open: bool,
}

impl GeoParquetFeatureWriter {
    pub fn create(
        path: impl AsRef<Path>,
        spatial_reference: &SpatialReference,
    ) -> Result<Self, HexcoverError> {
        let path = path.as_ref().to_path_buf();
        // The container exists from here on; rows land in it on finish.
        File::create(&path).map_err(|e| HexcoverError::IoError(e.to_string()))?;

        Ok(Self {
            path,
            spatial_reference: spatial_reference.clone(),
            features: Vec::new(),
            open: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureWriter for GeoParquetFeatureWriter {
    fn append_feature(&mut self, feature: &HexagonFeature) -> Result<(), HexcoverError> {
        if !self.open {
            return Err(HexcoverError::ParquetError("writer is closed".to_string()));
        }
        self.features.push(feature.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, HexcoverError> {
        if self.open {
            debug!(rows = self.features.len(), path = %self.path.display(), "encoding geoparquet");
            self.features
                .to_geoparquet(&self.path, &self.spatial_reference)?;
            self.open = false;
        }
        Ok(self.features.len() as u64)
    }

    fn abort(&mut self) {
        if self.open {
            self.open = false;
            self.features.clear();
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "could not remove partial output");
            }
        }
    }
}
