use crate::core::dimensions::HexagonDims;
use geo_types::{Coord, LineString, Point, Polygon};

/// Closed ring of a flat-top hexagon built around the reference point `(x, y)`.
///
/// Vertices run clockwise from the left end of the top edge, and the first
/// vertex is repeated at the end to close the ring.
pub fn hexagon_ring(x: f64, y: f64, dims: &HexagonDims) -> [Coord<f64>; 7] {
    let HexagonDims {
        face,
        gap,
        half_height,
        ..
    } = *dims;

    let top_left = Coord {
        x,
        y: y + half_height,
    };

    [
        top_left,
        Coord {
            x: x + face,
            y: y + half_height,
        },
        Coord {
            x: x + face + gap,
            y,
        },
        Coord {
            x: x + face,
            y: y - half_height,
        },
        Coord {
            x,
            y: y - half_height,
        },
        Coord { x: x - gap, y },
        top_left,
    ]
}

pub fn create_hexagon(x: f64, y: f64, dims: &HexagonDims) -> Polygon<f64> {
    Polygon::new(LineString::from(hexagon_ring(x, y, dims).to_vec()), vec![])
}

pub fn create_hexagon_from_point(reference: &Point<f64>, dims: &HexagonDims) -> Polygon<f64> {
    create_hexagon(reference.x(), reference.y(), dims)
}
