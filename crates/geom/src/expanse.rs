use super::{Axis, BoundingBox};

/// An `Expanse` has a width and height but no location. Measurement results
/// and size constraints are expressed as expanses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expanse {
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Expanse {
    /// Construct an expanse.
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// A zero-sized expanse.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Construct an expanse from main and cross axis extents.
    pub fn from_main_cross(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// The extent along an axis.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Grow both dimensions by `pad` on every side.
    pub fn pad(&self, pad: f32) -> Self {
        Self::new(self.w + 2.0 * pad, self.h + 2.0 * pad)
    }

    /// Clamp negative dimensions to zero.
    pub fn non_negative(&self) -> Self {
        Self::new(self.w.max(0.0), self.h.max(0.0))
    }

    /// Place this expanse at a position.
    pub fn at(&self, x: f32, y: f32) -> BoundingBox {
        BoundingBox::new(x, y, self.w, self.h)
    }
}

impl From<BoundingBox> for Expanse {
    fn from(b: BoundingBox) -> Self {
        Self {
            w: b.width,
            h: b.height,
        }
    }
}

impl From<(f32, f32)> for Expanse {
    fn from(v: (f32, f32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_cross() {
        let e = Expanse::from_main_cross(Axis::Vertical, 10.0, 3.0);
        assert_eq!(e, Expanse::new(3.0, 10.0));
        assert_eq!(e.along(Axis::Vertical), 10.0);
        assert_eq!(e.along(Axis::Horizontal), 3.0);
    }

    #[test]
    fn padding() {
        assert_eq!(Expanse::new(10.0, 5.0).pad(2.0), Expanse::new(14.0, 9.0));
        assert_eq!(
            Expanse::new(-3.0, 5.0).non_negative(),
            Expanse::new(0.0, 5.0)
        );
    }
}
