use super::{Expanse, Point};

/// An axis-aligned screen-space rectangle. `x` and `y` locate the top-left
/// corner.
///
/// Boxes with a zero or negative extent are *empty*: they contain no points
/// and intersect nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl BoundingBox {
    /// Construct a box from its top-left corner and extents.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The zero box at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The extents of this box without its position.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.width, self.height)
    }

    /// Does this box have no area?
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict interior test. Points on an edge belong to neither box sharing
    /// that edge.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x < x && x < self.right() && self.y < y && y < self.bottom()
    }

    /// Strict interior test for a point.
    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    /// Do the interiors of the two boxes overlap?
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// The overlapping region of two boxes, or the zero box if they are
    /// disjoint. Callers do not need to check `intersects` first.
    pub fn intersect(&self, other: &Self) -> Self {
        if !self.intersects(other) {
            return Self::zero();
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Self {
            x,
            y,
            width: self.right().min(other.right()) - x,
            height: self.bottom().min(other.bottom()) - y,
        }
    }

    /// Shrink the box by `pad` on every side, clamping extents at zero.
    pub fn inset(&self, pad: f32) -> Self {
        Self {
            x: self.x + pad,
            y: self.y + pad,
            width: (self.width - 2.0 * pad).max(0.0),
            height: (self.height - 2.0 * pad).max(0.0),
        }
    }

    /// Move the box by an offset.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn strict_containment() {
        let b = BoundingBox::new(10.0, 10.0, 10.0, 10.0);
        assert!(b.contains(15.0, 15.0));
        assert!(!b.contains(10.0, 15.0));
        assert!(!b.contains(20.0, 15.0));
        assert!(!b.contains(15.0, 10.0));
        assert!(!b.contains(15.0, 20.0));
        assert!(!BoundingBox::zero().contains(0.0, 0.0));
    }

    #[test]
    fn shared_edge_selects_neither() {
        let left = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        assert!(!left.contains(10.0, 5.0));
        assert!(!right.contains(10.0, 5.0));
        assert!(!left.intersects(&right));
        assert_eq!(left.intersect(&right), BoundingBox::zero());
    }

    #[test]
    fn intersection() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 3.0, 10.0, 4.0);
        assert_eq!(a.intersect(&b), BoundingBox::new(5.0, 3.0, 5.0, 4.0));

        let inner = BoundingBox::new(2.0, 2.0, 2.0, 2.0);
        assert_eq!(a.intersect(&inner), inner);

        let far = BoundingBox::new(50.0, 50.0, 1.0, 1.0);
        assert_eq!(a.intersect(&far), BoundingBox::zero());
    }

    #[test]
    fn empty_boxes_intersect_nothing() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let flat = BoundingBox::new(5.0, 5.0, 0.0, 3.0);
        assert!(!a.intersects(&flat));
        assert_eq!(a.intersect(&flat), BoundingBox::zero());
    }

    #[test]
    fn inset_and_translate() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 6.0);
        assert_eq!(a.inset(2.0), BoundingBox::new(2.0, 2.0, 6.0, 2.0));
        assert_eq!(a.inset(4.0), BoundingBox::new(4.0, 4.0, 2.0, 0.0));
        assert_eq!(a.translate(1.0, -1.0), BoundingBox::new(1.0, -1.0, 10.0, 6.0));
    }

    /// Boxes on an integer grid so that float arithmetic stays exact.
    fn bbox_strategy() -> impl Strategy<Value = BoundingBox> {
        (-50i32..50, -50i32..50, 0i32..60, 0i32..60).prop_map(|(x, y, w, h)| {
            BoundingBox::new(x as f32, y as f32, w as f32, h as f32)
        })
    }

    proptest! {
        #[test]
        fn intersect_is_commutative(a in bbox_strategy(), b in bbox_strategy()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            prop_assert_eq!(a.intersect(&b), b.intersect(&a));
        }

        #[test]
        fn intersect_is_associative(
            a in bbox_strategy(),
            b in bbox_strategy(),
            c in bbox_strategy(),
        ) {
            prop_assert_eq!(a.intersect(&b).intersect(&c), a.intersect(&b.intersect(&c)));
        }

        #[test]
        fn intersection_points_lie_in_both(
            a in bbox_strategy(),
            b in bbox_strategy(),
            px in -60i32..120,
            py in -60i32..120,
        ) {
            let (px, py) = (px as f32 + 0.5, py as f32 + 0.5);
            let i = a.intersect(&b);
            prop_assert_eq!(i.contains(px, py), a.contains(px, py) && b.contains(px, py));
        }

        #[test]
        fn disjoint_yields_zero(a in bbox_strategy(), b in bbox_strategy()) {
            if !a.intersects(&b) {
                prop_assert_eq!(a.intersect(&b), BoundingBox::zero());
            } else {
                prop_assert!(!a.intersect(&b).is_empty());
            }
        }
    }
}
