use crate::core::constants::{FACES_PER_COLUMN, MIN_STEP_ULPS, sin_60};
use crate::core::extent::Extent;
use crate::error::HexcoverError;
use serde::Serialize;
use tracing::info;

/// Measurements of a flat-top hexagon, all derived from its width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexagonDims {
    /// Corner-to-corner width.
    pub width: f64,
    /// Length of one edge.
    pub face: f64,
    /// Horizontal run of a slanted edge, half the face.
    pub gap: f64,
    /// Distance from the middle row to the top or bottom edge.
    pub half_height: f64,
    /// Flat-to-flat height.
    pub height: f64,
}

impl HexagonDims {
    pub fn from_width(width: f64) -> Result<Self, HexcoverError> {
        if !(width > 0.0) || !width.is_finite() {
            return Err(HexcoverError::InvalidSizingRequest(format!(
                "hexagon width must be positive and finite, got {}",
                width
            )));
        }

        let face = width / 2.0;
        let gap = face / 2.0;
        let half_height = face * sin_60();

        Ok(Self {
            width,
            face,
            gap,
            half_height,
            height: half_height * 2.0,
        })
    }

    /// Dimensions of the regular hexagon with the given area.
    pub fn from_area(area: f64) -> Result<Self, HexcoverError> {
        if !(area > 0.0) {
            return Err(HexcoverError::InvalidSizingRequest(format!(
                "hexagon area must be positive, got {}",
                area
            )));
        }

        let sqrt3 = 3.0_f64.sqrt();
        let face = ((2.0 * area) / (3.0 * sqrt3)).sqrt();
        Self::from_width(face * 2.0)
    }

    /// Horizontal distance between neighbouring columns.
    pub fn column_pitch(&self) -> f64 {
        self.face + self.gap
    }

    pub fn area(&self) -> f64 {
        (3.0 * 3.0_f64.sqrt() / 2.0) * self.face * self.face
    }
}

/// How the hexagon width is chosen.
///
/// Each field is either set or unset. When several are set, `width` wins,
/// then `total_count`, then `column_count`, then `row_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SizingRequest {
    pub width: Option<f64>,
    pub total_count: Option<u64>,
    pub column_count: Option<u64>,
    pub row_count: Option<u64>,
}

/// The sizing field that a request resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SizingMode {
    Width(f64),
    TotalCount(u64),
    ColumnCount(u64),
    RowCount(u64),
}

impl SizingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_width(width: f64) -> Self {
        Self::new().width(width)
    }

    pub fn from_total_count(count: u64) -> Self {
        Self::new().total_count(count)
    }

    pub fn from_column_count(count: u64) -> Self {
        Self::new().column_count(count)
    }

    pub fn from_row_count(count: u64) -> Self {
        Self::new().row_count(count)
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn total_count(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }

    pub fn column_count(mut self, count: u64) -> Self {
        self.column_count = Some(count);
        self
    }

    pub fn row_count(mut self, count: u64) -> Self {
        self.row_count = Some(count);
        self
    }

    /// The field that takes effect, or `None` when nothing is set.
    pub fn mode(&self) -> Option<SizingMode> {
        if let Some(width) = self.width {
            return Some(SizingMode::Width(width));
        }
        if let Some(n) = self.total_count {
            return Some(SizingMode::TotalCount(n));
        }
        if let Some(cx) = self.column_count {
            return Some(SizingMode::ColumnCount(cx));
        }
        self.row_count.map(SizingMode::RowCount)
    }
}

/// Resolves the hexagon width for `request` over `extent`.
///
/// # Example
/// ```
/// use hexcover::{Extent, SizingRequest, resolve_width};
///
/// # fn main() -> Result<(), hexcover::HexcoverError> {
/// let extent = Extent::from_corners(0.0, 0.0, 100.0, 50.0);
/// let width = resolve_width(&SizingRequest::from_row_count(5), &extent)?;
/// assert!((width - 11.547).abs() < 0.001);
/// # Ok(())
/// # }
/// ```
pub fn resolve_width(request: &SizingRequest, extent: &Extent) -> Result<f64, HexcoverError> {
    let mode = request.mode().ok_or_else(|| {
        HexcoverError::InvalidSizingRequest("hexagon width cannot be determined".to_string())
    })?;

    if !extent.has_area() {
        return Err(HexcoverError::InvalidSizingRequest(format!(
            "extent {} x {} has no area to tile",
            extent.width(),
            extent.height()
        )));
    }

    let width = match mode {
        SizingMode::Width(width) => {
            info!("Creating hexagons of width {}", width);
            // Both axes are checked even though a column only needs one of them.
            if width > extent.width() || width > extent.height() {
                return Err(HexcoverError::HexagonTooLarge {
                    width,
                    extent_width: extent.width(),
                    extent_height: extent.height(),
                });
            }
            width
        }
        SizingMode::TotalCount(n) => {
            info!("Breaking area into {} hexagons", n);
            let n = non_zero(n, "total count")?;
            let hex_area = extent.area() / n;
            HexagonDims::from_area(hex_area)?.width
        }
        SizingMode::ColumnCount(cx) => {
            info!("Breaking area into {} hexagons along X axis", cx);
            let cx = non_zero(cx, "column count")?;
            (extent.width() / cx) * FACES_PER_COLUMN
        }
        SizingMode::RowCount(cy) => {
            info!("Breaking area into {} hexagons along Y axis", cy);
            let cy = non_zero(cy, "row count")?;
            let hex_height = extent.height() / cy;
            (hex_height / 2.0) / sin_60() * 2.0
        }
    };

    if !(width > 0.0) || !width.is_finite() {
        return Err(HexcoverError::InvalidSizingRequest(format!(
            "resolved hexagon width {} is not positive",
            width
        )));
    }

    Ok(width)
}

/// Resolves the width and derives the full set of dimensions from it.
///
/// Hexagons whose smallest step is lost in the rounding of the extent's
/// coordinates are rejected, since the grid could not advance past them.
pub fn resolve_dims(request: &SizingRequest, extent: &Extent) -> Result<HexagonDims, HexcoverError> {
    let dims = HexagonDims::from_width(resolve_width(request, extent)?)?;

    let magnitude = extent.magnitude() + dims.width;
    if dims.gap <= magnitude * f64::EPSILON * MIN_STEP_ULPS {
        return Err(HexcoverError::InvalidSizingRequest(format!(
            "hexagon width {} is too small to step across coordinates near {}",
            dims.width, magnitude
        )));
    }

    Ok(dims)
}

fn non_zero(count: u64, what: &str) -> Result<f64, HexcoverError> {
    if count == 0 {
        return Err(HexcoverError::InvalidSizingRequest(format!(
            "{} must be greater than zero",
            what
        )));
    }
    Ok(count as f64)
}
