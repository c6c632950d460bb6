use crate::coord::Coordinate;
use geo_types::{Rect, coord};
use serde::Serialize;

/// Axis-aligned bounding rectangle that the hexagons must cover.
///
/// Always normalized: `x_min <= x_max` and `y_min <= y_max`. A flat extent
/// (zero width or height) can be built but cannot be tiled; sizing rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Extent {
    /// Builds an extent from raw corner values, swapping any reversed pair.
    ///
    /// # Example
    /// ```
    /// use hexcover::Extent;
    ///
    /// let extent = Extent::from_corners(100.0, 50.0, 0.0, 0.0);
    /// assert_eq!(extent.x_min(), 0.0);
    /// assert_eq!(extent.y_max(), 50.0);
    /// ```
    pub fn from_corners(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        let (x_min, x_max) = if x_max < x_min {
            (x_max, x_min)
        } else {
            (x_min, x_max)
        };
        let (y_min, y_max) = if y_max < y_min {
            (y_max, y_min)
        } else {
            (y_min, y_max)
        };

        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Builds an extent from any two opposite corners.
    pub fn from_coords<C: Coordinate>(a: &C, b: &C) -> Self {
        Self::from_corners(a.x(), a.y(), b.x(), b.y())
    }

    pub fn from_rect(rect: &Rect<f64>) -> Self {
        Self::from_corners(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when both sides have positive length.
    pub fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Largest absolute coordinate value on any side.
    pub fn magnitude(&self) -> f64 {
        self.x_min
            .abs()
            .max(self.x_max.abs())
            .max(self.y_min.abs())
            .max(self.y_max.abs())
    }

    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.x_min, y: self.y_min },
            coord! { x: self.x_max, y: self.y_max },
        )
    }

    /// Corners in the order lower-left, lower-right, upper-right, upper-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x_min, self.y_min),
            (self.x_max, self.y_min),
            (self.x_max, self.y_max),
            (self.x_min, self.y_max),
        ]
    }
}

impl From<Rect<f64>> for Extent {
    fn from(rect: Rect<f64>) -> Self {
        Self::from_rect(&rect)
    }
}
