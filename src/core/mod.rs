pub mod constants;
pub mod dimensions;
pub mod extent;
pub mod geometry;
pub mod grid;

pub use constants::{GEOMETRY_FIELD, ID_FIELD, UNSET_MARKER};
pub use dimensions::{HexagonDims, SizingMode, SizingRequest, resolve_dims, resolve_width};
pub use extent::Extent;
pub use geometry::{create_hexagon, create_hexagon_from_point, hexagon_ring};
pub use grid::{ColumnParity, EdgePolicy, GridWalker};
