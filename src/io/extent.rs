use super::{ExtentProvider, RawExtent};
use crate::coord::SpatialReference;
use crate::error::HexcoverError;
use crate::geom::parse_geometry;
use geo::BoundingRect;
use geo_types::{Geometry, Rect, coord};
use geojson::{GeoJson, JsonObject};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Specifies how to find locations in the rows of a CSV dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate X and Y coordinate columns (e.g., Easting/Northing or Lon/Lat)
    CoordinateColumns { x_column: String, y_column: String },
}

impl Default for CoordinateSource {
    fn default() -> Self {
        CoordinateSource::GeometryColumn("geometry".to_string())
    }
}

enum SourceIndices {
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    GeoJson,
    Csv,
}

impl DatasetFormat {
    fn from_path(path: &Path) -> Result<Self, HexcoverError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("geojson") | Some("json") => Ok(DatasetFormat::GeoJson),
            Some("csv") => Ok(DatasetFormat::Csv),
            _ => Err(HexcoverError::InvalidDataset(format!(
                "unsupported input dataset '{}', expected .geojson, .json or .csv",
                path.display()
            ))),
        }
    }
}

/// Reads the extent of GeoJSON and CSV datasets from disk.
///
/// # Example
/// ```no_run
/// use hexcover::{ExtentProvider, FileExtentProvider, SpatialReference};
/// use std::path::Path;
///
/// # fn main() -> Result<(), hexcover::HexcoverError> {
/// let provider = FileExtentProvider::new()
///     .coordinate_columns("Easting", "Northing")
///     .spatial_reference(SpatialReference::new("EPSG:27700"));
///
/// let (x_min, y_min, x_max, y_max) = provider.extent(Path::new("bus_stops.csv"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileExtentProvider {
    source: CoordinateSource,
    spatial_reference: Option<SpatialReference>,
}

impl FileExtentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read CSV locations from a WKT or GeoJSON column.
    pub fn geometry_column(mut self, column: impl Into<String>) -> Self {
        self.source = CoordinateSource::GeometryColumn(column.into());
        self
    }

    /// Read CSV locations from separate X/Y columns.
    pub fn coordinate_columns(mut self, x_column: impl Into<String>, y_column: impl Into<String>) -> Self {
        self.source = CoordinateSource::CoordinateColumns {
            x_column: x_column.into(),
            y_column: y_column.into(),
        };
        self
    }

    /// Spatial reference reported for every dataset, whatever the file says.
    pub fn spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.spatial_reference = Some(spatial_reference);
        self
    }

    pub fn source(&self) -> &CoordinateSource {
        &self.source
    }
}

impl ExtentProvider for FileExtentProvider {
    fn extent(&self, dataset: &Path) -> Result<RawExtent, HexcoverError> {
        let rect = match DatasetFormat::from_path(dataset)? {
            DatasetFormat::GeoJson => geojson_bounds(&read_geojson(dataset)?)?,
            DatasetFormat::Csv => csv_bounds(dataset, &self.source)?,
        };

        let rect = rect.ok_or_else(|| {
            HexcoverError::InvalidDataset(format!(
                "'{}' contains no geometries",
                dataset.display()
            ))
        })?;

        let raw = (rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        if ![raw.0, raw.1, raw.2, raw.3].iter().all(|v| v.is_finite()) {
            return Err(HexcoverError::InvalidDataset(format!(
                "'{}' has a non-finite extent",
                dataset.display()
            )));
        }

        debug!(dataset = %dataset.display(), ?raw, "read dataset extent");
        Ok(raw)
    }

    fn spatial_reference(&self, dataset: &Path) -> Result<SpatialReference, HexcoverError> {
        if let Some(srs) = &self.spatial_reference {
            return Ok(srs.clone());
        }

        match DatasetFormat::from_path(dataset)? {
            DatasetFormat::GeoJson => Ok(named_crs(&read_geojson(dataset)?)),
            DatasetFormat::Csv => Ok(SpatialReference::unknown()),
        }
    }
}

fn read_geojson(path: &Path) -> Result<GeoJson, HexcoverError> {
    let text = std::fs::read_to_string(path).map_err(|e| HexcoverError::IoError(e.to_string()))?;
    text.parse()
        .map_err(|e: geojson::Error| HexcoverError::GeometryParseError(e.to_string()))
}

fn expand(acc: Option<Rect<f64>>, rect: Rect<f64>) -> Option<Rect<f64>> {
    Some(match acc {
        None => rect,
        Some(acc) => Rect::new(
            coord! {
                x: acc.min().x.min(rect.min().x),
                y: acc.min().y.min(rect.min().y),
            },
            coord! {
                x: acc.max().x.max(rect.max().x),
                y: acc.max().y.max(rect.max().y),
            },
        ),
    })
}

fn geometry_bounds(
    acc: Option<Rect<f64>>,
    geometry: geojson::Geometry,
) -> Result<Option<Rect<f64>>, HexcoverError> {
    let geom = Geometry::<f64>::try_from(geometry)
        .map_err(|e| HexcoverError::GeometryParseError(e.to_string()))?;
    Ok(match geom.bounding_rect() {
        Some(rect) => expand(acc, rect),
        None => acc,
    })
}

fn geojson_bounds(geojson: &GeoJson) -> Result<Option<Rect<f64>>, HexcoverError> {
    match geojson.clone() {
        GeoJson::Geometry(geometry) => geometry_bounds(None, geometry),
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => geometry_bounds(None, geometry),
            None => Ok(None),
        },
        GeoJson::FeatureCollection(collection) => {
            let mut acc = None;
            for feature in collection.features {
                if let Some(geometry) = feature.geometry {
                    acc = geometry_bounds(acc, geometry)?;
                }
            }
            Ok(acc)
        }
    }
}

/// Reads the pre-RFC 7946 `"crs": {"type": "name", "properties": {"name": ...}}` member.
fn named_crs(geojson: &GeoJson) -> SpatialReference {
    let members: Option<&JsonObject> = match geojson {
        GeoJson::FeatureCollection(collection) => collection.foreign_members.as_ref(),
        GeoJson::Feature(feature) => feature.foreign_members.as_ref(),
        GeoJson::Geometry(geometry) => geometry.foreign_members.as_ref(),
    };

    members
        .and_then(|m| m.get("crs"))
        .and_then(|crs| crs.get("properties"))
        .and_then(|props| props.get("name"))
        .and_then(|name| name.as_str())
        .map(SpatialReference::new)
        .unwrap_or_default()
}

fn column_index(headers: &csv::StringRecord, column: &str, what: &str) -> Result<usize, HexcoverError> {
    if column.is_empty() {
        return Err(HexcoverError::CsvError(format!(
            "{} column name cannot be empty",
            what
        )));
    }
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| HexcoverError::CsvError(format!("{} column '{}' not found", what, column)))
}

fn parse_number(record: &csv::StringRecord, idx: usize, what: &str) -> Result<Option<f64>, HexcoverError> {
    let value = record
        .get(idx)
        .ok_or_else(|| HexcoverError::CsvError(format!("Missing {} column at index {}", what, idx)))?
        .trim();

    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse()
        .map(Some)
        .map_err(|_| HexcoverError::CsvError(format!("Invalid {} coordinate: '{}'", what, value)))
}

fn csv_bounds(path: &Path, source: &CoordinateSource) -> Result<Option<Rect<f64>>, HexcoverError> {
    let file = File::open(path).map_err(|e| HexcoverError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| HexcoverError::CsvError(e.to_string()))?
        .clone();

    let indices = match source {
        CoordinateSource::GeometryColumn(col) => {
            SourceIndices::Geometry(column_index(&headers, col, "Geometry")?)
        }
        CoordinateSource::CoordinateColumns { x_column, y_column } => SourceIndices::Coordinates {
            x_idx: column_index(&headers, x_column, "X")?,
            y_idx: column_index(&headers, y_column, "Y")?,
        },
    };

    let mut acc = None;
    let mut rows = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| HexcoverError::CsvError(e.to_string()))?;
        rows += 1;

        let rect = match &indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    HexcoverError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                // Rows without a shape do not contribute to the extent.
                if geom_str.trim().is_empty() {
                    continue;
                }
                parse_geometry(geom_str)?.bounding_rect()
            }
            SourceIndices::Coordinates { x_idx, y_idx } => {
                match (parse_number(&record, *x_idx, "X")?, parse_number(&record, *y_idx, "Y")?) {
                    (Some(x), Some(y)) => Some(Rect::new(coord! { x: x, y: y }, coord! { x: x, y: y })),
                    _ => continue,
                }
            }
        };

        if let Some(rect) = rect {
            acc = expand(acc, rect);
        }
    }

    debug!(rows, "scanned csv dataset");
    Ok(acc)
}
