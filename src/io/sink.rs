use super::csv::CsvFeatureWriter;
use super::geojson::GeoJsonFeatureWriter;
use super::parquet::GeoParquetFeatureWriter;
use super::{FeatureWriter, OutputSink};
use crate::coord::SpatialReference;
use crate::error::HexcoverError;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// On-disk format of the hexagon dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    /// `ID,geometry` rows with WKT polygons
    Csv,
    /// A GeoJSON FeatureCollection
    GeoJson,
    /// WKB-encoded GeoParquet
    GeoParquet,
}

impl OutputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, HexcoverError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(OutputFormat::Csv),
            Some("geojson") | Some("json") => Ok(OutputFormat::GeoJson),
            Some("parquet") | Some("geoparquet") => Ok(OutputFormat::GeoParquet),
            _ => Err(HexcoverError::OutputCollaboratorFailure(format!(
                "cannot tell output format of '{}', expected .csv, .geojson or .parquet",
                path.display()
            ))),
        }
    }
}

/// Writes hexagon datasets as files, choosing the format from the name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOutputSink;

impl FileOutputSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for FileOutputSink {
    fn check_target(&self, workspace: &Path, name: &str) -> Result<(), HexcoverError> {
        if !workspace.as_os_str().is_empty() && !workspace.is_dir() {
            return Err(HexcoverError::OutputCollaboratorFailure(format!(
                "workspace '{}' does not exist",
                workspace.display()
            )));
        }
        OutputFormat::from_path(&workspace.join(name))?;
        Ok(())
    }

    fn delete_if_exists(&mut self, path: &Path) -> Result<(), HexcoverError> {
        if path.is_dir() {
            return Err(HexcoverError::OutputCollaboratorFailure(format!(
                "'{}' is a directory",
                path.display()
            )));
        }
        if path.exists() {
            info!("Overwriting {}...", path.display());
            std::fs::remove_file(path).map_err(|e| HexcoverError::IoError(e.to_string()))?;
        }
        Ok(())
    }

    fn create_polygon_container(
        &mut self,
        workspace: &Path,
        name: &str,
        spatial_reference: &SpatialReference,
    ) -> Result<Box<dyn FeatureWriter>, HexcoverError> {
        self.check_target(workspace, name)?;

        let path = workspace.join(name);
        let format = OutputFormat::from_path(&path)?;
        info!(
            srs = %spatial_reference,
            ?format,
            "Creating {} to contain hexagon features...",
            path.display()
        );

        Ok(match format {
            OutputFormat::Csv => Box::new(CsvFeatureWriter::create(&path)?),
            OutputFormat::GeoJson => Box::new(GeoJsonFeatureWriter::create(&path, spatial_reference)?),
            OutputFormat::GeoParquet => {
                Box::new(GeoParquetFeatureWriter::create(&path, spatial_reference)?)
            }
        })
    }
}
