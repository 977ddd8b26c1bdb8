use super::{Child, MeasureConstraints, Measurer, Placement, Slot, Strategy};
use crate::geom::{BoundingBox, Expanse, Point};

/// Children sit at explicit offsets from the padded origin. A child that
/// would overflow the far edge is pulled back inside, but never past the
/// near edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Free {
    /// Inset on every side.
    pub padding: f32,
}

/// The requested offset for a child.
fn offset(child: &Child) -> Point {
    match child.placement {
        Placement::At(p) => p,
        _ => Point::zero(),
    }
}

/// Clamp a span starting at `pos` so it ends before `far`, without moving
/// it before `near`.
fn clamp_span(pos: f32, extent: f32, near: f32, far: f32) -> f32 {
    if pos + extent > far {
        (far - extent).max(near)
    } else {
        pos
    }
}

impl Strategy for Free {
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse {
        let inner = c.shrink(self.padding);
        children
            .iter()
            .fold(Expanse::zero(), |acc, child| {
                let size = m.measure(child.id, inner);
                let at = offset(child);
                Expanse::new(acc.w.max(at.x + size.w), acc.h.max(at.y + size.h))
            })
            .pad(self.padding)
    }

    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        m: &mut dyn Measurer,
    ) -> Vec<Slot> {
        let inner = area.inset(self.padding);
        let bounds = MeasureConstraints::exact(inner.size());
        children
            .iter()
            .map(|child| {
                let size = m.measure(child.id, bounds);
                let at = offset(child);
                let x = clamp_span(inner.x + at.x, size.w, inner.x, inner.right());
                let y = clamp_span(inner.y + at.y, size.h, inner.y, inner.bottom());
                Slot::new(child.id, size.at(x, y))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testutil::{FixedMeasurer, children};

    #[test]
    fn overflow_is_pulled_back() {
        let mut m = FixedMeasurer::default();
        let menu = m.fixed(200.0, 60.0);
        let inside = m.fixed(10.0, 10.0);
        let huge = m.fixed(500.0, 10.0);
        let kids = children(&[
            (menu, Placement::At(Point::new(250.0, 270.0))),
            (inside, Placement::At(Point::new(5.0, 5.0))),
            (huge, Placement::At(Point::new(50.0, 0.0))),
        ]);
        let mut f = Free { padding: 0.0 };
        let slots = f.arrange(BoundingBox::new(0.0, 0.0, 300.0, 300.0), &kids, &mut m);
        assert_eq!(slots[0].bbox, BoundingBox::new(100.0, 240.0, 200.0, 60.0));
        assert_eq!(slots[1].bbox, BoundingBox::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(slots[2].bbox.x, 0.0);
    }

    #[test]
    fn offsets_are_relative_to_padded_origin() {
        let mut m = FixedMeasurer::default();
        let a = m.fixed(4.0, 4.0);
        let kids = children(&[(a, Placement::At(Point::new(3.0, 2.0)))]);
        let mut f = Free { padding: 2.0 };
        let slots = f.arrange(BoundingBox::new(10.0, 10.0, 50.0, 50.0), &kids, &mut m);
        assert_eq!(slots[0].bbox, BoundingBox::new(15.0, 14.0, 4.0, 4.0));
        assert_eq!(
            f.measure(&kids, MeasureConstraints::unbounded(), &mut m),
            Expanse::new(11.0, 10.0)
        );
    }
}
