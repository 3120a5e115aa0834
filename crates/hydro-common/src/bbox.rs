//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in georeferenced units.
///
/// Window ordering conventions differ between raster libraries, so the
/// members are always addressed by name: `x_min <= x_max`, `y_min <= y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Create a bounding box from its extents.
    ///
    /// The extents are reordered if given reversed, so the min/max invariant
    /// always holds.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min: x_min.min(x_max),
            x_max: x_min.max(x_max),
            y_min: y_min.min(y_max),
            y_max: y_min.max(y_max),
        }
    }

    /// Smallest bounding box containing every `(x, y)` point.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let mut bbox = Self {
            x_min: x0,
            x_max: x0,
            y_min: y0,
            y_max: y0,
        };
        for (x, y) in iter {
            bbox.x_min = bbox.x_min.min(x);
            bbox.x_max = bbox.x_max.max(x);
            bbox.y_min = bbox.y_min.min(y);
            bbox.y_max = bbox.y_max.max(y);
        }
        Some(bbox)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// The four corners, counter-clockwise from `(x_min, y_min)`.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x_min, self.y_min),
            (self.x_max, self.y_min),
            (self.x_max, self.y_max),
            (self.x_min, self.y_max),
        ]
    }

    /// Check that `other` lies inside this bbox without touching any edge.
    pub fn strictly_contains(&self, other: &BoundingBox) -> bool {
        self.x_min < other.x_min
            && self.x_max > other.x_max
            && self.y_min < other.y_min
            && self.y_max > other.y_max
    }
}
