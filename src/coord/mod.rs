use geo_types::{Coord, Point};
use serde::Serialize;

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and
/// `geo_types::Coord<f64>`, so extent corners can be given as any of them.
pub trait Coordinate {
    /// Returns the x-coordinate.
    fn x(&self) -> f64;
    /// Returns the y-coordinate.
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for Coord<f64> {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

/// Spatial reference of a dataset, carried from input to output untouched.
///
/// The value is never interpreted. `None` means the input did not declare one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpatialReference(Option<String>);

impl SpatialReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(Some(reference.into()))
    }

    pub fn unknown() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }
}

impl std::fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(reference) => write!(f, "{}", reference),
            None => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (100.0, 200.0);
        assert_eq!(tuple.x(), 100.0);
        assert_eq!(tuple.y(), 200.0);
    }

    #[test]
    fn test_coordinate_trait_point_and_coord() {
        let point = Point::new(100.0, 200.0);
        let c = coord! { x: 100.0, y: 200.0 };
        assert_eq!(Coordinate::x(&point), Coordinate::x(&c));
        assert_eq!(Coordinate::y(&point), Coordinate::y(&c));
    }

    #[test]
    fn test_spatial_reference_passthrough() {
        let srs = SpatialReference::new("EPSG:27700");
        assert_eq!(srs.as_str(), Some("EPSG:27700"));
        assert!(srs.is_known());
        assert!(!SpatialReference::unknown().is_known());
        assert_eq!(SpatialReference::default().to_string(), "<unknown>");
    }
}
