use crate::coord::SpatialReference;
use crate::core::{GEOMETRY_FIELD, ID_FIELD};
use crate::error::HexcoverError;
use crate::feature::HexagonFeature;
use arrow_array::{RecordBatch, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::PolygonArray;
use geoarrow_array::builder::PolygonBuilder;
use geoarrow_schema::{Crs, Dimension, Metadata, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn crs_metadata(spatial_reference: &SpatialReference) -> Arc<Metadata> {
    let crs = match spatial_reference.as_str() {
        Some(code) => Crs::from_authority_code(code.to_string()),
        None => Crs::default(),
    };
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`HexagonFeature`]s to Arrow arrays.
///
/// Implemented for `[HexagonFeature]` and `Vec<HexagonFeature>`. Row order is
/// the feature order.
pub trait HexagonFeaturesToArrow {
    /// Converts the hexagons to an Arrow PolygonArray tagged with `spatial_reference`.
    fn to_arrow_polygons(&self, spatial_reference: &SpatialReference) -> PolygonArray;
    /// Converts the hexagons to a RecordBatch with `ID` and `geometry` columns.
    fn to_record_batch(
        &self,
        spatial_reference: &SpatialReference,
    ) -> Result<RecordBatch, HexcoverError>;
}

impl HexagonFeaturesToArrow for [HexagonFeature] {
    fn to_arrow_polygons(&self, spatial_reference: &SpatialReference) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, crs_metadata(spatial_reference));
        let polygons: Vec<_> = self
            .par_iter()
            .map(|f: &HexagonFeature| f.to_polygon())
            .collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(
        &self,
        spatial_reference: &SpatialReference,
    ) -> Result<RecordBatch, HexcoverError> {
        let polygon_array = self.to_arrow_polygons(spatial_reference);
        let ids: UInt64Array = self.iter().map(|f| Some(f.id)).collect();

        let geometry_field = polygon_array
            .extension_type()
            .to_field(GEOMETRY_FIELD, false);
        let schema = Schema::new(vec![
            Field::new(ID_FIELD, DataType::UInt64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(ids), Arc::new(polygon_array.into_arrow())],
        )
        .map_err(|e| HexcoverError::ParquetError(e.to_string()))
    }
}

impl HexagonFeaturesToArrow for Vec<HexagonFeature> {
    fn to_arrow_polygons(&self, spatial_reference: &SpatialReference) -> PolygonArray {
        self.as_slice().to_arrow_polygons(spatial_reference)
    }

    fn to_record_batch(
        &self,
        spatial_reference: &SpatialReference,
    ) -> Result<RecordBatch, HexcoverError> {
        self.as_slice().to_record_batch(spatial_reference)
    }
}
