use crate::core::{EdgePolicy, Extent, GridWalker, HexagonDims, SizingRequest, resolve_dims};
use crate::error::HexcoverError;
use crate::feature::{FeatureEmitter, HexagonFeature};
use geo::Contains;
use geo_types::{Point, Polygon, Rect};

/// A complete tiling held in memory.
#[derive(Debug, Clone)]
pub struct HexGrid {
    features: Vec<HexagonFeature>,
    extent: Extent,
    dims: HexagonDims,
}

impl HexGrid {
    pub fn builder() -> HexGridBuilder {
        HexGridBuilder::new()
    }

    pub fn from_extent(extent: Extent, sizing: &SizingRequest) -> Result<Self, HexcoverError> {
        Self::with_policy(extent, sizing, EdgePolicy::default())
    }

    pub fn from_rect(rect: &Rect<f64>, sizing: &SizingRequest) -> Result<Self, HexcoverError> {
        Self::from_extent(Extent::from_rect(rect), sizing)
    }

    fn with_policy(
        extent: Extent,
        sizing: &SizingRequest,
        policy: EdgePolicy,
    ) -> Result<Self, HexcoverError> {
        let dims = resolve_dims(sizing, &extent)?;
        let mut features = Vec::new();
        FeatureEmitter::new(dims).emit_all(GridWalker::new(extent, dims, policy), &mut features)?;

        Ok(Self {
            features,
            extent,
            dims,
        })
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn dims(&self) -> &HexagonDims {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[HexagonFeature] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &HexagonFeature> {
        self.features.iter()
    }

    /// Looks a hexagon up by its identifier.
    pub fn get_feature(&self, id: u64) -> Option<&HexagonFeature> {
        // Identifiers are dense and start at 1.
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.features.get(index)
    }

    /// First hexagon in scan order whose interior contains `point`.
    pub fn get_feature_at(&self, point: &Point<f64>) -> Option<&HexagonFeature> {
        self.features.iter().find(|f| f.polygon.contains(point))
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.features.iter().map(|f| f.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&HexagonFeature>
    where
        F: Fn(&HexagonFeature) -> bool,
    {
        self.features.iter().filter(|f| predicate(f)).collect()
    }

    pub fn into_features(self) -> Vec<HexagonFeature> {
        self.features
    }
}

#[derive(Debug, Default)]
pub struct HexGridBuilder {
    extent: Option<Extent>,
    sizing: SizingRequest,
    edge_policy: EdgePolicy,
}

impl HexGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extent(mut self, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        self.extent = Some(Extent::from_corners(x_min, y_min, x_max, y_max));
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.extent = Some(Extent::from_rect(rect));
        self
    }

    pub fn sizing(mut self, sizing: SizingRequest) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.sizing = self.sizing.width(width);
        self
    }

    pub fn total_count(mut self, count: u64) -> Self {
        self.sizing = self.sizing.total_count(count);
        self
    }

    pub fn column_count(mut self, count: u64) -> Self {
        self.sizing = self.sizing.column_count(count);
        self
    }

    pub fn row_count(mut self, count: u64) -> Self {
        self.sizing = self.sizing.row_count(count);
        self
    }

    pub fn edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn build(self) -> Result<HexGrid, HexcoverError> {
        let extent = self.extent.ok_or_else(|| {
            HexcoverError::InvalidSizingRequest("extent must be set".to_string())
        })?;
        if !extent.is_finite() {
            return Err(HexcoverError::InvalidDataset(
                "extent is not finite".to_string(),
            ));
        }
        HexGrid::with_policy(extent, &self.sizing, self.edge_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    fn square() -> Extent {
        Extent::from_corners(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_hex_grid_from_extent() -> Result<(), HexcoverError> {
        let grid = HexGrid::from_extent(square(), &SizingRequest::from_width(10.0))?;
        assert!(!grid.is_empty());
        assert!((grid.dims().width - 10.0).abs() < 0.001);

        let ids: Vec<u64> = grid.iter().map(|f| f.id).collect();
        let expected: Vec<u64> = (1..=grid.len() as u64).collect();
        assert_eq!(ids, expected);
        Ok(())
    }

    #[test]
    fn test_hex_grid_from_rect() -> Result<(), HexcoverError> {
        let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 100.0, y: 100.0 });
        let grid = HexGrid::from_rect(&rect, &SizingRequest::from_column_count(10))?;
        assert_eq!(grid.extent(), &square());
        assert!((grid.dims().width - 15.0).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_hex_grid_builder() -> Result<(), HexcoverError> {
        let grid = HexGrid::builder()
            .extent(0.0, 0.0, 100.0, 100.0)
            .width(10.0)
            .edge_policy(EdgePolicy::Centers)
            .build()?;

        let first = grid.get_feature(1).map(|f| f.reference);
        assert_eq!(first, Some(point! { x: 0.0, y: 100.0 }));
        Ok(())
    }

    #[test]
    fn test_builder_requires_extent() {
        let result = HexGrid::builder().width(10.0).build();
        assert!(matches!(result, Err(HexcoverError::InvalidSizingRequest(_))));
    }

    #[test]
    fn test_builder_propagates_sizing_errors() {
        let result = HexGrid::builder().extent(0.0, 0.0, 100.0, 100.0).build();
        assert!(matches!(result, Err(HexcoverError::InvalidSizingRequest(_))));

        let result = HexGrid::builder()
            .extent(0.0, 0.0, 100.0, 100.0)
            .width(200.0)
            .build();
        assert!(matches!(result, Err(HexcoverError::HexagonTooLarge { .. })));
    }

    #[test]
    fn test_get_feature() -> Result<(), HexcoverError> {
        let grid = HexGrid::from_extent(square(), &SizingRequest::from_width(10.0))?;
        assert!(grid.get_feature(0).is_none());
        assert!(grid.get_feature(grid.len() as u64 + 1).is_none());

        let last = grid.get_feature(grid.len() as u64).map(|f| f.id);
        assert_eq!(last, Some(grid.len() as u64));
        Ok(())
    }

    #[test]
    fn test_get_feature_at() -> Result<(), HexcoverError> {
        let grid = HexGrid::from_extent(square(), &SizingRequest::from_width(10.0))?;
        let pt = point! { x: 50.0, y: 50.0 };

        let feature = grid.get_feature_at(&pt);
        assert!(feature.is_some());
        if let Some(feature) = feature {
            assert!(feature.polygon.contains(&pt));
        }
        Ok(())
    }

    #[test]
    fn test_filter_features() -> Result<(), HexcoverError> {
        let grid = HexGrid::from_extent(square(), &SizingRequest::from_width(10.0))?;
        let right = grid.filter(|f| f.reference.x() > 50.0);
        assert!(!right.is_empty());
        assert!(right.len() < grid.len());
        Ok(())
    }

    #[test]
    fn test_to_polygons() -> Result<(), HexcoverError> {
        let grid = HexGrid::from_extent(square(), &SizingRequest::from_width(10.0))?;
        let polygons = grid.to_polygons();
        assert_eq!(polygons.len(), grid.len());
        assert_eq!(grid.clone().into_features().len(), grid.len());
        Ok(())
    }
}
