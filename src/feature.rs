use crate::core::{HexagonDims, create_hexagon_from_point};
use crate::error::HexcoverError;
use crate::io::FeatureWriter;
use geo_types::{Coord, LineString, Point, Polygon};

/// A single hexagon ready to be written out.
///
/// # Example
///
/// ```
/// use hexcover::{FeatureEmitter, HexagonDims, HexagonFeature};
/// use geo_types::point;
///
/// # fn main() -> Result<(), hexcover::HexcoverError> {
/// let mut emitter = FeatureEmitter::new(HexagonDims::from_width(10.0)?);
/// let mut features: Vec<HexagonFeature> = Vec::new();
/// emitter.emit(point! { x: 0.0, y: 100.0 }, &mut features)?;
///
/// assert_eq!(features[0].id, 1);
/// assert_eq!(features[0].ring().0.len(), 7);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HexagonFeature {
    /// Position in scan order, starting at 1
    pub id: u64,
    /// Point the ring was built around
    pub reference: Point<f64>,
    /// Closed hexagon with seven exterior coordinates
    pub polygon: Polygon<f64>,
}

impl HexagonFeature {
    pub(crate) fn new(id: u64, reference: Point<f64>, polygon: Polygon<f64>) -> Self {
        Self {
            id,
            reference,
            polygon,
        }
    }

    pub fn ring(&self) -> &LineString<f64> {
        self.polygon.exterior()
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.polygon.exterior().0
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.polygon.clone()
    }
}

/// Numbers hexagons in scan order and hands them to a writer.
///
/// The counter only moves once the writer has accepted a feature, so the
/// identifiers written are always `1..=n` with no gaps.
#[derive(Debug, Clone)]
pub struct FeatureEmitter {
    dims: HexagonDims,
    next_id: u64,
}

impl FeatureEmitter {
    pub fn new(dims: HexagonDims) -> Self {
        Self { dims, next_id: 1 }
    }

    pub fn dims(&self) -> &HexagonDims {
        &self.dims
    }

    /// Identifier the next emitted feature will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of features accepted so far.
    pub fn emitted(&self) -> u64 {
        self.next_id - 1
    }

    pub fn emit<W>(&mut self, reference: Point<f64>, writer: &mut W) -> Result<u64, HexcoverError>
    where
        W: FeatureWriter + ?Sized,
    {
        let id = self.next_id;
        let polygon = create_hexagon_from_point(&reference, &self.dims);
        writer.append_feature(&HexagonFeature::new(id, reference, polygon))?;
        self.next_id += 1;
        Ok(id)
    }

    /// Emits every point of `references` in order and returns how many were written.
    pub fn emit_all<I, W>(&mut self, references: I, writer: &mut W) -> Result<u64, HexcoverError>
    where
        I: IntoIterator<Item = Point<f64>>,
        W: FeatureWriter + ?Sized,
    {
        let start = self.emitted();
        for reference in references {
            self.emit(reference, writer)?;
        }
        Ok(self.emitted() - start)
    }
}
