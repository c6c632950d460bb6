use super::FeatureWriter;
use crate::core::{GEOMETRY_FIELD, ID_FIELD};
use crate::error::HexcoverError;
use crate::feature::HexagonFeature;
use crate::geom::polygon_to_wkt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Streams hexagons to a CSV file as `ID,geometry` rows with WKT polygons.
pub struct CsvFeatureWriter {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    written: u64,
    done: bool,
}

impl CsvFeatureWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, HexcoverError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| HexcoverError::IoError(e.to_string()))?;
        let mut writer = csv::Writer::from_writer(file);

        writer
            .write_record([ID_FIELD, GEOMETRY_FIELD])
            .map_err(|e| HexcoverError::CsvError(e.to_string()))?;

        Ok(Self {
            path,
            writer: Some(writer),
            written: 0,
            done: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureWriter for CsvFeatureWriter {
    fn append_feature(&mut self, feature: &HexagonFeature) -> Result<(), HexcoverError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| HexcoverError::CsvError("writer is closed".to_string()))?;

        writer
            .write_record([feature.id.to_string(), polygon_to_wkt(&feature.polygon)])
            .map_err(|e| HexcoverError::CsvError(e.to_string()))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, HexcoverError> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| HexcoverError::CsvError(e.to_string()))?;
            self.done = true;
        }
        Ok(self.written)
    }

    fn abort(&mut self) {
        self.writer = None;
        if !self.done {
            self.done = true;
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "could not remove partial output");
            }
        }
    }
}
