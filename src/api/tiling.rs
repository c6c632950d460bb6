use crate::coord::SpatialReference;
use crate::core::{
    EdgePolicy, Extent, GridWalker, HexagonDims, SizingMode, SizingRequest, UNSET_MARKER,
    resolve_dims,
};
use crate::error::HexcoverError;
use crate::feature::FeatureEmitter;
use crate::io::{ExtentProvider, FeatureWriter, OutputSink};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Reads one sizing argument as typed on the command line.
///
/// `#` means the argument is unset. Anything else must parse as `T`; an empty
/// string is rejected rather than treated as unset.
///
/// # Example
/// ```
/// use hexcover::parse_sizing_value;
///
/// # fn main() -> Result<(), hexcover::HexcoverError> {
/// assert_eq!(parse_sizing_value::<u64>("#")?, None);
/// assert_eq!(parse_sizing_value::<u64>("500")?, Some(500));
/// assert!(parse_sizing_value::<u64>("").is_err());
/// # Ok(())
/// # }
/// ```
pub fn parse_sizing_value<T>(value: &str) -> Result<Option<T>, HexcoverError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = value.trim();
    if value == UNSET_MARKER {
        return Ok(None);
    }
    if value.is_empty() {
        return Err(HexcoverError::InvalidSizingRequest(format!(
            "empty value, use '{}' to leave an argument unset",
            UNSET_MARKER
        )));
    }
    value.parse::<T>().map(Some).map_err(|e| {
        HexcoverError::InvalidSizingRequest(format!("'{}' is not a valid value: {}", value, e))
    })
}

/// Everything one tiling run needs to know.
///
/// # Example
/// ```
/// use hexcover::{EdgePolicy, SizingRequest, TilingConfig};
///
/// let config = TilingConfig::new("parcels.geojson", "out/hexagons.parquet", SizingRequest::from_total_count(500))
///     .edge_policy(EdgePolicy::Centers);
/// ```
#[derive(Debug, Clone)]
pub struct TilingConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sizing: SizingRequest,
    pub edge_policy: EdgePolicy,
}

impl TilingConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, sizing: SizingRequest) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            sizing,
            edge_policy: EdgePolicy::default(),
        }
    }

    pub fn edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TilingSummary {
    pub count: u64,
    pub output: PathBuf,
    pub extent: Extent,
    pub dims: HexagonDims,
    pub sizing: Option<SizingMode>,
    pub spatial_reference: SpatialReference,
}

/// Splits the output path into the workspace it lives in and its name.
///
/// A bare file name lands next to the input dataset.
pub fn output_location(input: &Path, output: &Path) -> Result<(PathBuf, String), HexcoverError> {
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            HexcoverError::OutputCollaboratorFailure(format!(
                "output path '{}' has no file name",
                output.display()
            ))
        })?
        .to_string();

    let workspace = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    Ok((workspace, name))
}

/// Holds the open writer for the length of a run.
///
/// Dropping the guard without committing aborts the writer, which releases
/// the handle and removes the partial dataset.
struct WriteGuard {
    writer: Option<Box<dyn FeatureWriter>>,
}

impl WriteGuard {
    fn new(writer: Box<dyn FeatureWriter>) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    fn writer(&mut self) -> Result<&mut (dyn FeatureWriter + 'static), HexcoverError> {
        match self.writer.as_mut() {
            Some(writer) => Ok(writer.as_mut()),
            None => Err(HexcoverError::OutputCollaboratorFailure(
                "writer already closed".to_string(),
            )),
        }
    }

    fn commit(mut self) -> Result<u64, HexcoverError> {
        let count = self.writer()?.finish()?;
        self.writer = None;
        Ok(count)
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            warn!("tiling aborted, discarding partial output");
            writer.abort();
        }
    }
}

/// Covers the extent of `config.input` with hexagons and writes them to `config.output`.
///
/// Sizing is resolved before anything is touched on the output side, so a bad
/// request leaves an existing output dataset in place.
///
/// # Example
/// ```no_run
/// use hexcover::{FileExtentProvider, FileOutputSink, SizingRequest, TilingConfig, generate_hexagons};
///
/// # fn main() -> Result<(), hexcover::HexcoverError> {
/// let config = TilingConfig::new("parcels.geojson", "hexagons.csv", SizingRequest::from_width(250.0));
/// let summary = generate_hexagons(&config, &FileExtentProvider::new(), &mut FileOutputSink::new())?;
/// println!("{} hexagons", summary.count);
/// # Ok(())
/// # }
/// ```
pub fn generate_hexagons(
    config: &TilingConfig,
    provider: &dyn ExtentProvider,
    sink: &mut dyn OutputSink,
) -> Result<TilingSummary, HexcoverError> {
    let (x_min, y_min, x_max, y_max) = provider.extent(&config.input)?;
    let extent = Extent::from_corners(x_min, y_min, x_max, y_max);
    if !extent.is_finite() {
        return Err(HexcoverError::OutputCollaboratorFailure(format!(
            "extent of '{}' is not finite",
            config.input.display()
        )));
    }
    info!("Width: {}, Height: {}", extent.width(), extent.height());

    let dims = resolve_dims(&config.sizing, &extent)?;
    let spatial_reference = provider.spatial_reference(&config.input)?;
    let (workspace, name) = output_location(&config.input, &config.output)?;
    let output = workspace.join(&name);

    sink.check_target(&workspace, &name)?;
    sink.delete_if_exists(&output)?;
    let mut guard = WriteGuard::new(sink.create_polygon_container(
        &workspace,
        &name,
        &spatial_reference,
    )?);

    let mut emitter = FeatureEmitter::new(dims);
    let walker = GridWalker::new(extent, dims, config.edge_policy);
    emitter.emit_all(walker, guard.writer()?)?;

    let written = guard.commit()?;
    if written != emitter.emitted() {
        warn!(
            written,
            emitted = emitter.emitted(),
            "output reports a different row count than was emitted"
        );
    }
    info!("Finished! {} hexagons created", written);

    Ok(TilingSummary {
        count: written,
        output,
        extent,
        dims,
        sizing: config.sizing.mode(),
        spatial_reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::HexagonFeature;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Delete(PathBuf),
        Create(PathBuf, String, SpatialReference),
        Append(u64),
        Finish,
        Abort,
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct RecordingWriter {
        log: Log,
        fail_at: Option<u64>,
    }

    impl FeatureWriter for RecordingWriter {
        fn append_feature(&mut self, feature: &HexagonFeature) -> Result<(), HexcoverError> {
            if self.fail_at == Some(feature.id) {
                return Err(HexcoverError::IoError("disk full".to_string()));
            }
            self.log.borrow_mut().push(Call::Append(feature.id));
            Ok(())
        }

        fn finish(&mut self) -> Result<u64, HexcoverError> {
            let mut log = self.log.borrow_mut();
            log.push(Call::Finish);
            Ok(log.iter().filter(|c| matches!(c, Call::Append(_))).count() as u64)
        }

        fn abort(&mut self) {
            self.log.borrow_mut().push(Call::Abort);
        }
    }

    struct RecordingSink {
        log: Log,
        fail_at: Option<u64>,
        fail_create: bool,
        reject_target: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                log: Rc::new(RefCell::new(Vec::new())),
                fail_at: None,
                fail_create: false,
                reject_target: false,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.log.borrow().clone()
        }
    }

    impl OutputSink for RecordingSink {
        fn check_target(&self, _workspace: &Path, name: &str) -> Result<(), HexcoverError> {
            if self.reject_target {
                return Err(HexcoverError::OutputCollaboratorFailure(format!(
                    "cannot write '{}'",
                    name
                )));
            }
            Ok(())
        }

        fn delete_if_exists(&mut self, path: &Path) -> Result<(), HexcoverError> {
            self.log.borrow_mut().push(Call::Delete(path.to_path_buf()));
            Ok(())
        }

        fn create_polygon_container(
            &mut self,
            workspace: &Path,
            name: &str,
            spatial_reference: &SpatialReference,
        ) -> Result<Box<dyn FeatureWriter>, HexcoverError> {
            if self.fail_create {
                return Err(HexcoverError::OutputCollaboratorFailure("read-only".to_string()));
            }
            self.log.borrow_mut().push(Call::Create(
                workspace.to_path_buf(),
                name.to_string(),
                spatial_reference.clone(),
            ));
            Ok(Box::new(RecordingWriter {
                log: Rc::clone(&self.log),
                fail_at: self.fail_at,
            }))
        }
    }

    struct FixedProvider {
        raw: (f64, f64, f64, f64),
    }

    impl ExtentProvider for FixedProvider {
        fn extent(&self, _dataset: &Path) -> Result<(f64, f64, f64, f64), HexcoverError> {
            Ok(self.raw)
        }

        fn spatial_reference(&self, _dataset: &Path) -> Result<SpatialReference, HexcoverError> {
            Ok(SpatialReference::new("EPSG:27700"))
        }
    }

    fn square() -> FixedProvider {
        FixedProvider {
            raw: (0.0, 0.0, 100.0, 100.0),
        }
    }

    #[test]
    fn test_call_sequence() -> Result<(), HexcoverError> {
        let config = TilingConfig::new("data/parcels.geojson", "out/hex.csv", SizingRequest::from_width(10.0));
        let mut sink = RecordingSink::new();
        let summary = generate_hexagons(&config, &square(), &mut sink)?;

        let calls = sink.calls();
        assert_eq!(calls[0], Call::Delete(PathBuf::from("out/hex.csv")));
        assert_eq!(
            calls[1],
            Call::Create(
                PathBuf::from("out"),
                "hex.csv".to_string(),
                SpatialReference::new("EPSG:27700")
            )
        );
        assert_eq!(calls.last(), Some(&Call::Finish));

        let ids: Vec<u64> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Append(id) => Some(*id),
                _ => None,
            })
            .collect();
        let expected: Vec<u64> = (1..=summary.count).collect();
        assert_eq!(ids, expected);
        assert!(!calls.contains(&Call::Abort));
        Ok(())
    }

    #[test]
    fn test_reversed_extent_is_normalized() -> Result<(), HexcoverError> {
        let config = TilingConfig::new("in.geojson", "out.csv", SizingRequest::from_width(10.0));
        let provider = FixedProvider {
            raw: (100.0, 100.0, 0.0, 0.0),
        };
        let summary = generate_hexagons(&config, &provider, &mut RecordingSink::new())?;
        assert_eq!(summary.extent, Extent::from_corners(0.0, 0.0, 100.0, 100.0));
        Ok(())
    }

    #[test]
    fn test_sizing_failure_touches_nothing() {
        let config = TilingConfig::new("in.geojson", "out.csv", SizingRequest::new());
        let mut sink = RecordingSink::new();
        let result = generate_hexagons(&config, &square(), &mut sink);

        assert!(matches!(result, Err(HexcoverError::InvalidSizingRequest(_))));
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_too_large_touches_nothing() {
        let config = TilingConfig::new("in.geojson", "out.csv", SizingRequest::from_width(200.0));
        let mut sink = RecordingSink::new();
        let result = generate_hexagons(&config, &square(), &mut sink);

        assert!(matches!(result, Err(HexcoverError::HexagonTooLarge { .. })));
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_append_failure_aborts_writer() {
        let config = TilingConfig::new("in.geojson", "out.csv", SizingRequest::from_width(10.0));
        let mut sink = RecordingSink::new();
        sink.fail_at = Some(4);
        let result = generate_hexagons(&config, &square(), &mut sink);

        assert!(matches!(result, Err(HexcoverError::IoError(_))));
        let calls = sink.calls();
        assert_eq!(calls.last(), Some(&Call::Abort));
        assert!(calls.contains(&Call::Append(3)));
        assert!(!calls.contains(&Call::Append(4)));
        assert!(!calls.contains(&Call::Finish));
    }

    #[test]
    fn test_create_failure_has_nothing_to_release() {
        let config = TilingConfig::new("in.geojson", "out.csv", SizingRequest::from_width(10.0));
        let mut sink = RecordingSink::new();
        sink.fail_create = true;
        let result = generate_hexagons(&config, &square(), &mut sink);

        assert!(matches!(
            result,
            Err(HexcoverError::OutputCollaboratorFailure(_))
        ));
        assert!(!sink.calls().contains(&Call::Abort));
    }

    #[test]
    fn test_rejected_target_deletes_nothing() {
        let config = TilingConfig::new("in.geojson", "out.shp", SizingRequest::from_width(10.0));
        let mut sink = RecordingSink::new();
        sink.reject_target = true;
        let result = generate_hexagons(&config, &square(), &mut sink);

        assert!(matches!(
            result,
            Err(HexcoverError::OutputCollaboratorFailure(_))
        ));
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_non_finite_extent_is_rejected() {
        let config = TilingConfig::new("in.geojson", "out.csv", SizingRequest::from_width(10.0));
        let provider = FixedProvider {
            raw: (0.0, 0.0, f64::INFINITY, 100.0),
        };
        let result = generate_hexagons(&config, &provider, &mut RecordingSink::new());
        assert!(matches!(
            result,
            Err(HexcoverError::OutputCollaboratorFailure(_))
        ));
    }

    #[test]
    fn test_parse_sizing_value() -> Result<(), HexcoverError> {
        assert_eq!(parse_sizing_value::<f64>("#")?, None);
        assert_eq!(parse_sizing_value::<f64>(" # ")?, None);
        assert_eq!(parse_sizing_value::<f64>("12.5")?, Some(12.5));
        assert_eq!(parse_sizing_value::<u64>("40")?, Some(40));
        assert!(parse_sizing_value::<u64>("").is_err());
        assert!(parse_sizing_value::<u64>("-3").is_err());
        assert!(parse_sizing_value::<u64>("ten").is_err());
        Ok(())
    }

    #[test]
    fn test_output_location() -> Result<(), HexcoverError> {
        let (ws, name) = output_location(Path::new("data/in.csv"), Path::new("out/hex.csv"))?;
        assert_eq!(ws, PathBuf::from("out"));
        assert_eq!(name, "hex.csv");

        let (ws, name) = output_location(Path::new("data/in.csv"), Path::new("hex.csv"))?;
        assert_eq!(ws, PathBuf::from("data"));
        assert_eq!(name, "hex.csv");

        assert!(output_location(Path::new("in.csv"), Path::new("/")).is_err());
        Ok(())
    }
}
