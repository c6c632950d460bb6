pub mod hex_grid;
pub mod tiling;

pub use hex_grid::{HexGrid, HexGridBuilder};
pub use tiling::{TilingConfig, TilingSummary, generate_hexagons, output_location, parse_sizing_value};
