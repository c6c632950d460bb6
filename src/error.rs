/// The three failure kinds a tiling run can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No sizing mode could be resolved, or the resolved width is unusable.
    InvalidSizingRequest,
    /// The hexagon is wider than the extent on either axis.
    HexagonTooLarge,
    /// Reading the input dataset or writing the output dataset failed.
    OutputCollaboratorFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidSizingRequest => write!(f, "invalid sizing request"),
            ErrorKind::HexagonTooLarge => write!(f, "hexagon too large"),
            ErrorKind::OutputCollaboratorFailure => write!(f, "output collaborator failure"),
        }
    }
}

/// Error type for hexcover operations.
#[derive(Debug, PartialEq)]
pub enum HexcoverError {
    /// The hexagon width cannot be determined from the sizing request.
    InvalidSizingRequest(String),
    /// The explicit width does not fit inside the extent.
    HexagonTooLarge {
        width: f64,
        extent_width: f64,
        extent_height: f64,
    },
    /// A collaborator failed in a way not covered by a more specific variant.
    OutputCollaboratorFailure(String),
    /// The input dataset has no usable geometry.
    InvalidDataset(String),
    /// File I/O error.
    IoError(String),
    /// CSV parsing or writing error.
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
    /// Arrow or Parquet encoding error.
    ParquetError(String),
}

impl HexcoverError {
    /// Collapses the variant into the kind reported to the user.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HexcoverError::InvalidSizingRequest(_) => ErrorKind::InvalidSizingRequest,
            HexcoverError::HexagonTooLarge { .. } => ErrorKind::HexagonTooLarge,
            HexcoverError::OutputCollaboratorFailure(_)
            | HexcoverError::InvalidDataset(_)
            | HexcoverError::IoError(_)
            | HexcoverError::CsvError(_)
            | HexcoverError::GeometryParseError(_)
            | HexcoverError::ParquetError(_) => ErrorKind::OutputCollaboratorFailure,
        }
    }
}

impl std::fmt::Display for HexcoverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HexcoverError::InvalidSizingRequest(msg) => {
                write!(f, "Invalid sizing request: {}", msg)
            }
            HexcoverError::HexagonTooLarge {
                width,
                extent_width,
                extent_height,
            } => write!(
                f,
                "Hexagon too large: width {} exceeds extent {} x {}",
                width, extent_width, extent_height
            ),
            HexcoverError::OutputCollaboratorFailure(msg) => {
                write!(f, "Output collaborator failure: {}", msg)
            }
            HexcoverError::InvalidDataset(msg) => write!(f, "Invalid dataset: {}", msg),
            HexcoverError::IoError(msg) => write!(f, "IO error: {}", msg),
            HexcoverError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            HexcoverError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
            HexcoverError::ParquetError(msg) => write!(f, "Parquet error: {}", msg),
        }
    }
}

impl std::error::Error for HexcoverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_variants_share_a_kind() {
        let errors = [
            HexcoverError::IoError("disk full".into()),
            HexcoverError::CsvError("bad row".into()),
            HexcoverError::GeometryParseError("bad wkt".into()),
            HexcoverError::ParquetError("bad schema".into()),
            HexcoverError::InvalidDataset("empty".into()),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::OutputCollaboratorFailure);
        }
    }

    #[test]
    fn test_display_names_the_failure() {
        let err = HexcoverError::HexagonTooLarge {
            width: 200.0,
            extent_width: 100.0,
            extent_height: 100.0,
        };
        assert_eq!(err.kind(), ErrorKind::HexagonTooLarge);
        assert!(err.to_string().starts_with("Hexagon too large"));
    }
}
