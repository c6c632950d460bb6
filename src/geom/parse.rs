use crate::error::HexcoverError;
use geo_types::Geometry;
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

fn parse_err(e: impl std::fmt::Display) -> HexcoverError {
    HexcoverError::GeometryParseError(e.to_string())
}

/// Parses one geometry cell of a CSV dataset.
///
/// A cell starting with `{` is read as GeoJSON (a geometry or a single
/// feature); anything else is read as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, HexcoverError> {
    let cell = s.trim();
    match cell.chars().next() {
        Some('{') => parse_geojson(cell),
        _ => parse_wkt(cell),
    }
}

fn parse_geojson(s: &str) -> Result<Geometry<f64>, HexcoverError> {
    let geometry = match s.parse::<GeoJson>().map_err(parse_err)? {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature
            .geometry
            .ok_or_else(|| parse_err("feature has no geometry"))?,
        GeoJson::FeatureCollection(_) => {
            return Err(parse_err(
                "a cell holds one geometry, not a FeatureCollection",
            ));
        }
    };
    Geometry::try_from(geometry).map_err(parse_err)
}

fn parse_wkt(s: &str) -> Result<Geometry<f64>, HexcoverError> {
    let wkt = Wkt::<f64>::from_str(s).map_err(parse_err)?;
    Geometry::try_from(wkt).map_err(|_| parse_err(format!("'{}' is not a supported WKT geometry", s)))
}
