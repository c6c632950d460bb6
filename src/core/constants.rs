/// Marker for an unset sizing argument on the command line.
pub const UNSET_MARKER: &str = "#";

/// Horizontal pitch of a hexagon column, in face lengths.
pub const FACES_PER_COLUMN: f64 = 1.5;

/// Least number of ulps, at the extent's magnitude, the smallest hexagon step must span.
pub const MIN_STEP_ULPS: f64 = 64.0;

/// Name of the identifier field written to every output format.
pub const ID_FIELD: &str = "ID";

/// Name of the geometry field in CSV and GeoParquet output.
pub const GEOMETRY_FIELD: &str = "geometry";

/// sin(60°), the ratio of half-height to face length.
pub fn sin_60() -> f64 {
    (std::f64::consts::PI / 3.0).sin()
}
