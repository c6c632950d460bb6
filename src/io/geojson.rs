use super::FeatureWriter;
use crate::coord::SpatialReference;
use crate::core::ID_FIELD;
use crate::error::HexcoverError;
use crate::feature::HexagonFeature;
use crate::geom::polygon_to_geojson;
use geojson::{Feature, JsonObject};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Streams hexagons into a GeoJSON `FeatureCollection`.
///
/// A known spatial reference is written as the legacy named `crs` member.
#[derive(Debug)]
pub struct GeoJsonFeatureWriter {
    path: PathBuf,
    out: Option<BufWriter<File>>,
    written: u64,
    done: bool,
}

fn io_err(e: impl std::fmt::Display) -> HexcoverError {
    HexcoverError::IoError(e.to_string())
}

impl GeoJsonFeatureWriter {
    pub fn create(
        path: impl AsRef<Path>,
        spatial_reference: &SpatialReference,
    ) -> Result<Self, HexcoverError> {
        let path = path.as_ref().to_path_buf();
        let mut out = BufWriter::new(File::create(&path).map_err(io_err)?);

        out.write_all(br#"{"type":"FeatureCollection","#).map_err(io_err)?;
        if let Some(name) = spatial_reference.as_str() {
            let crs = json!({ "type": "name", "properties": { "name": name } });
            write!(out, r#""crs":{},"#, crs).map_err(io_err)?;
        }
        out.write_all(br#""features":["#).map_err(io_err)?;

        Ok(Self {
            path,
            out: Some(out),
            written: 0,
            done: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureWriter for GeoJsonFeatureWriter {
    fn append_feature(&mut self, feature: &HexagonFeature) -> Result<(), HexcoverError> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| HexcoverError::IoError("writer is closed".to_string()))?;

        let mut properties = JsonObject::new();
        properties.insert(ID_FIELD.to_string(), json!(feature.id));

        let record = Feature {
            bbox: None,
            geometry: Some(polygon_to_geojson(&feature.polygon)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };

        if self.written > 0 {
            out.write_all(b",").map_err(io_err)?;
        }
        serde_json::to_writer(&mut *out, &record).map_err(io_err)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, HexcoverError> {
        if let Some(mut out) = self.out.take() {
            out.write_all(b"]}").map_err(io_err)?;
            out.flush().map_err(io_err)?;
            self.done = true;
        }
        Ok(self.written)
    }

    fn abort(&mut self) {
        self.out = None;
        if !self.done {
            self.done = true;
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "could not remove partial output");
            }
        }
    }
}
