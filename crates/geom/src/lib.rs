//! Geometry primitives used across trellis.
//!
//! All coordinates are screen-space pixels with the origin at the top-left
//! corner of the window and `y` growing downwards.

/// Axis-aligned bounding boxes.
mod bbox;
/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;

pub use bbox::BoundingBox;
pub use expanse::Expanse;
pub use point::Point;

/// Layout axes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}
