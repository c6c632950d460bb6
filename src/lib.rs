//! # hexcover-rs
//!
//! Covers the bounding rectangle of a dataset with a tiling of flat-top
//! hexagons and writes them out as a polygon dataset.
//!
//! There are two main entry points.
//!
//! ### 1. `generate_hexagons` - Dataset to Dataset
//!
//! Reads the extent of an input dataset, sizes the hexagons from one of width,
//! total count, column count or row count, and streams the tiling to CSV,
//! GeoJSON or GeoParquet:
//!
//! ```no_run
//! use hexcover::{
//!     EdgePolicy, FileExtentProvider, FileOutputSink, SizingRequest, TilingConfig,
//!     generate_hexagons,
//! };
//!
//! # fn main() -> Result<(), hexcover::HexcoverError> {
//! let config = TilingConfig::new(
//!     "parcels.geojson",
//!     "hexagons.parquet",
//!     SizingRequest::from_total_count(1000),
//! )
//! .edge_policy(EdgePolicy::Cover);
//!
//! let provider = FileExtentProvider::new().geometry_column("geometry");
//! let summary = generate_hexagons(&config, &provider, &mut FileOutputSink::new())?;
//! println!("Finished! {} hexagons created", summary.count);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `HexGrid` - Tiling in Memory
//!
//! ```
//! use hexcover::HexGrid;
//! use geo_types::point;
//!
//! # fn main() -> Result<(), hexcover::HexcoverError> {
//! let grid = HexGrid::builder()
//!     .extent(0.0, 0.0, 100.0, 100.0)
//!     .width(10.0)
//!     .build()?;
//!
//! let pt = point! { x: 42.0, y: 17.0 };
//! if let Some(feature) = grid.get_feature_at(&pt) {
//!     println!("{}", feature.id);
//! }
//! # Ok(())
//! # }
//! ```
//!

pub mod api;
pub mod coord;
pub mod core;
pub mod error;
pub mod feature;
pub mod geom;
pub mod io;

pub use crate::core::{
    ColumnParity, EdgePolicy, Extent, GridWalker, HexagonDims, SizingMode, SizingRequest,
    UNSET_MARKER, create_hexagon, create_hexagon_from_point, hexagon_ring, resolve_dims,
    resolve_width,
};
pub use api::{
    HexGrid, HexGridBuilder, TilingConfig, TilingSummary, generate_hexagons, output_location,
    parse_sizing_value,
};
pub use coord::{Coordinate, SpatialReference};
pub use error::{ErrorKind, HexcoverError};
pub use feature::{FeatureEmitter, HexagonFeature};
pub use io::{
    CoordinateSource, CsvFeatureWriter, ExtentProvider, FeatureWriter, FileExtentProvider,
    FileOutputSink, GeoJsonFeatureWriter, GeoParquetFeatureWriter, HexagonFeaturesToArrow,
    HexagonFeaturesToGeoParquet, OutputFormat, OutputSink, RawExtent, write_geoparquet,
};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;
