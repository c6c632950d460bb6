use crate::core::dimensions::HexagonDims;
use crate::core::extent::Extent;
use geo_types::Point;
use serde::Serialize;

/// Vertical placement of a hexagon column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnParity {
    /// Column starts on the top edge of the extent.
    Even,
    /// Column starts half a hexagon lower so it interlocks with its neighbours.
    Offset,
}

impl ColumnParity {
    pub fn toggle(self) -> Self {
        match self {
            ColumnParity::Even => ColumnParity::Offset,
            ColumnParity::Offset => ColumnParity::Even,
        }
    }

    fn start_y(self, extent: &Extent, dims: &HexagonDims) -> f64 {
        match self {
            ColumnParity::Even => extent.y_max(),
            ColumnParity::Offset => extent.y_max() - dims.half_height,
        }
    }
}

/// When the walk stops at the right and bottom edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EdgePolicy {
    /// Only reference points inside the extent are visited. Matches the
    /// loop bounds of the classic hexagon tessellation script.
    Centers,
    /// Every hexagon overlapping the extent is visited, so the union covers it.
    #[default]
    Cover,
}

impl std::str::FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "centers" => Ok(EdgePolicy::Centers),
            "cover" => Ok(EdgePolicy::Cover),
            other => Err(format!(
                "unknown edge policy '{}', expected 'centers' or 'cover'",
                other
            )),
        }
    }
}

/// Smallest f64 strictly greater than `v`.
fn next_up(v: f64) -> f64 {
    if v.is_nan() || v == f64::INFINITY {
        return v;
    }
    if v == 0.0 {
        return f64::from_bits(1);
    }
    let bits = v.to_bits();
    if v > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Raises `y` by whole ulps until the top edge built from it reaches `edge`.
///
/// Ring edges are rebuilt as `y + half_height`, which can round to just below
/// the edge the walker aimed for.
fn raise_to_edge(mut y: f64, half_height: f64, edge: f64) -> f64 {
    let mut steps = 0;
    while y + half_height < edge && steps < 64 {
        y = next_up(y);
        steps += 1;
    }
    y
}

/// Walks hexagon reference points column by column.
///
/// Columns run left to right starting at `x_min`; within a column points run
/// top to bottom. Emission order is the identifier order, so it never changes.
///
/// Under [`EdgePolicy::Cover`] consecutive rings of a column are kept edge to
/// edge in floating point as well, and the first offset ring reaches `y_max`,
/// so the extent's corners always land inside or on some ring.
///
/// # Example
/// ```
/// use hexcover::{EdgePolicy, Extent, GridWalker, HexagonDims};
///
/// # fn main() -> Result<(), hexcover::HexcoverError> {
/// let extent = Extent::from_corners(0.0, 0.0, 100.0, 100.0);
/// let dims = HexagonDims::from_width(10.0)?;
/// let mut walker = GridWalker::new(extent, dims, EdgePolicy::Centers);
/// let first = walker.next().unwrap();
/// assert_eq!((first.x(), first.y()), (0.0, 100.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GridWalker {
    extent: Extent,
    dims: HexagonDims,
    policy: EdgePolicy,
    x_cur: f64,
    y_cur: f64,
    parity: ColumnParity,
    /// Bottom edge of the last ring in the current column.
    floor: Option<f64>,
    slack: f64,
    done: bool,
}

impl GridWalker {
    pub fn new(extent: Extent, dims: HexagonDims, policy: EdgePolicy) -> Self {
        let mut walker = Self {
            extent,
            dims,
            policy,
            x_cur: extent.x_min(),
            y_cur: extent.y_max(),
            parity: ColumnParity::Even,
            floor: None,
            slack: 4.0 * f64::EPSILON * extent.magnitude(),
            done: false,
        };
        walker.y_cur = walker.column_start();
        walker
    }

    /// Parity of the column currently being walked.
    pub fn parity(&self) -> ColumnParity {
        self.parity
    }

    fn column_start(&self) -> f64 {
        let y = self.parity.start_y(&self.extent, &self.dims);
        match self.policy {
            EdgePolicy::Centers => y,
            EdgePolicy::Cover => raise_to_edge(y, self.dims.half_height, self.extent.y_max()),
        }
    }

    fn column_open(&self) -> bool {
        match self.policy {
            EdgePolicy::Centers => self.x_cur <= self.extent.x_max(),
            EdgePolicy::Cover => self.x_cur - self.dims.gap < self.extent.x_max() + self.slack,
        }
    }

    fn row_open(&self) -> bool {
        match (self.policy, self.floor) {
            (EdgePolicy::Centers, _) => self.y_cur >= self.extent.y_min(),
            (EdgePolicy::Cover, None) => {
                self.y_cur + self.dims.half_height > self.extent.y_min() - self.slack
            }
            (EdgePolicy::Cover, Some(floor)) => floor > self.extent.y_min() - self.slack,
        }
    }

    fn advance_row(&mut self) {
        let floor = self.y_cur - self.dims.half_height;
        let next = self.y_cur - self.dims.height;
        if next == self.y_cur {
            self.done = true;
        }
        self.y_cur = match self.policy {
            EdgePolicy::Centers => next,
            EdgePolicy::Cover => raise_to_edge(next, self.dims.half_height, floor),
        };
        self.floor = Some(floor);
    }

    fn advance_column(&mut self) {
        let next = self.x_cur + self.dims.column_pitch();
        if next == self.x_cur {
            self.done = true;
        }
        self.x_cur = next;
        self.parity = self.parity.toggle();
        self.floor = None;
        self.y_cur = self.column_start();
    }
}

impl Iterator for GridWalker {
    type Item = Point<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // A step too small to move the coordinate would repeat points forever.
            if self.done || !self.column_open() {
                return None;
            }
            if self.row_open() {
                let point = Point::new(self.x_cur, self.y_cur);
                self.advance_row();
                return Some(point);
            }
            self.advance_column();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HexcoverError;

    fn walk(extent: Extent, width: f64, policy: EdgePolicy) -> Result<Vec<Point<f64>>, HexcoverError> {
        let dims = HexagonDims::from_width(width)?;
        Ok(GridWalker::new(extent, dims, policy).collect())
    }

    #[test]
    fn test_first_point_is_top_left() -> Result<(), HexcoverError> {
        let points = walk(Extent::from_corners(0.0, 0.0, 100.0, 100.0), 10.0, EdgePolicy::Cover)?;
        assert_eq!(points[0], Point::new(0.0, 100.0));
        Ok(())
    }

    #[test]
    fn test_column_major_order_with_offset() -> Result<(), HexcoverError> {
        let extent = Extent::from_corners(0.0, 0.0, 100.0, 100.0);
        let dims = HexagonDims::from_width(10.0)?;
        let points = walk(extent, 10.0, EdgePolicy::Centers)?;

        // First column: x = 0, descending from the top edge, all inside.
        let first_column: Vec<_> = points.iter().take_while(|p| p.x() == 0.0).collect();
        assert_eq!(first_column.len(), 12);
        for pair in first_column.windows(2) {
            assert!((pair[0].y() - pair[1].y() - dims.height).abs() < 1e-9);
        }

        // Second column starts half a hexagon lower.
        let second = points[first_column.len()];
        assert!((second.x() - 7.5).abs() < 1e-9);
        assert!((second.y() - (100.0 - dims.half_height)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_centers_policy_stays_inside() -> Result<(), HexcoverError> {
        let extent = Extent::from_corners(0.0, 0.0, 100.0, 100.0);
        for point in walk(extent, 10.0, EdgePolicy::Centers)? {
            assert!(point.x() >= 0.0 && point.x() <= 100.0);
            assert!(point.y() >= 0.0 && point.y() <= 100.0);
        }
        Ok(())
    }

    #[test]
    fn test_cover_is_superset_of_centers() -> Result<(), HexcoverError> {
        let extent = Extent::from_corners(3.0, -7.0, 97.0, 61.0);
        let centers = walk(extent, 9.0, EdgePolicy::Centers)?;
        let cover = walk(extent, 9.0, EdgePolicy::Cover)?;

        assert!(cover.len() > centers.len());
        for point in &centers {
            assert!(
                cover
                    .iter()
                    .any(|p| (p.x() - point.x()).abs() < 1e-9 && (p.y() - point.y()).abs() < 1e-9)
            );
        }
        Ok(())
    }

    #[test]
    fn test_cover_rings_reach_top_and_stay_edge_to_edge() -> Result<(), HexcoverError> {
        for i in 0..200 {
            let y_max = 185.0 + (i as f64) * 0.137_913;
            let extent = Extent::from_corners(136.89, -27.67 + (i as f64) * 0.01, 398.93, y_max);
            let dims = HexagonDims::from_width(3.0 + (i as f64) * 0.071)?;
            let points: Vec<_> = GridWalker::new(extent, dims, EdgePolicy::Cover).collect();

            let mut column_top = true;
            for pair in points.windows(2) {
                let (upper, lower) = (pair[0], pair[1]);
                if column_top {
                    assert!(upper.y() + dims.half_height >= y_max);
                }
                column_top = upper.x() != lower.x();
                if !column_top {
                    assert!(lower.y() + dims.half_height >= upper.y() - dims.half_height);
                }
            }
            let last = points[points.len() - 1];
            assert!(last.y() - dims.half_height <= extent.y_min());
        }
        Ok(())
    }

    #[test]
    fn test_walk_ends_when_steps_vanish() -> Result<(), HexcoverError> {
        let extent = Extent::from_corners(1e15, 1e15, 1e15 + 1.0, 1e15 + 1.0);
        let dims = HexagonDims::from_width(0.05)?;
        for policy in [EdgePolicy::Centers, EdgePolicy::Cover] {
            let count = GridWalker::new(extent, dims, policy).take(10_000).count();
            assert!(count < 10_000);
        }
        Ok(())
    }

    #[test]
    fn test_parity_alternates() {
        assert_eq!(ColumnParity::Even.toggle(), ColumnParity::Offset);
        assert_eq!(ColumnParity::Offset.toggle(), ColumnParity::Even);
    }

    #[test]
    fn test_short_offset_column_is_skipped() -> Result<(), HexcoverError> {
        // Offset columns start below y_min here, so only even columns yield points.
        let extent = Extent::from_corners(0.0, 0.0, 30.0, 0.2);
        let dims = HexagonDims::from_width(1.0)?;
        let points: Vec<_> = GridWalker::new(extent, dims, EdgePolicy::Centers).collect();
        assert!(!points.is_empty());
        for point in points {
            assert_eq!(point.y(), 0.2);
        }
        Ok(())
    }

    #[test]
    fn test_edge_policy_from_str() {
        assert_eq!("cover".parse::<EdgePolicy>(), Ok(EdgePolicy::Cover));
        assert_eq!("Centers".parse::<EdgePolicy>(), Ok(EdgePolicy::Centers));
        assert!("edges".parse::<EdgePolicy>().is_err());
    }
}
