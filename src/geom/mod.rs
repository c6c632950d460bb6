mod format;
mod parse;

pub use format::{polygon_to_geojson, polygon_to_wkt};
pub use parse::parse_geometry;
