//! Axes and axis-aligned bounding boxes.
//!
//! Every shape in the workspace reports its extent as a [`BoundingBox`].
//! Shapes that extend without limit along an axis use the [`UNBOUNDED`]
//! sentinel instead of `f64::INFINITY`, so box arithmetic (centres, sizes,
//! clipping) and JSON encoding stay finite.

use serde::{Deserialize, Serialize};

/// Sentinel extent (µm) standing in for "infinite" along an axis.
pub const UNBOUNDED: f64 = 1.0e20;

/// A Cartesian axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into `[x, y, z]` arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes spanning the plane normal to `self`, in increasing order.
    pub fn planar(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An axis-aligned box given by its minimum and maximum corners (µm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Box from a centre and a full size, clamping each half-extent to the
    /// [`UNBOUNDED`] sentinel.
    pub fn from_center_size(center: [f64; 3], size: [f64; 3]) -> Self {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            if size[i] >= UNBOUNDED {
                min[i] = -UNBOUNDED;
                max[i] = UNBOUNDED;
            } else {
                min[i] = center[i] - 0.5 * size[i];
                max[i] = center[i] + 0.5 * size[i];
            }
        }
        Self { min, max }
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }

    /// Lower and upper bound along one axis.
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        (self.min[axis.index()], self.max[axis.index()])
    }

    /// True if the box extends to the sentinel along `axis`.
    pub fn is_unbounded(&self, axis: Axis) -> bool {
        let (lo, hi) = self.span(axis);
        lo <= -UNBOUNDED || hi >= UNBOUNDED
    }

    pub fn contains_point(&self, point: &[f64; 3]) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Closed-interval overlap test: boxes that touch are considered intersecting.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// Overlapping region, or `None` if the boxes are disjoint.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            min[i] = self.min[i].max(other.min[i]);
            max[i] = self.max[i].min(other.max[i]);
        }
        Some(BoundingBox { min, max })
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            min[i] = self.min[i].min(other.min[i]);
            max[i] = self.max[i].max(other.max[i]);
        }
        BoundingBox { min, max }
    }
}
