use super::{Child, MeasureConstraints, Measurer, Slot, Strategy};
use crate::geom::{BoundingBox, Expanse};

/// Every child is placed at the padded origin and sized within the padded
/// box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Single {
    /// Inset on every side.
    pub padding: f32,
}

impl Strategy for Single {
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse {
        let inner = c.shrink(self.padding);
        children
            .iter()
            .map(|child| m.measure(child.id, inner))
            .fold(Expanse::zero(), |acc, s| {
                Expanse::new(acc.w.max(s.w), acc.h.max(s.h))
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
                Slot::new(child.id, size.at(inner.x, inner.y))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{
        Placement,
        testutil::{FixedMeasurer, children},
    };

    #[test]
    fn fill_child_takes_padded_box() {
        let mut m = FixedMeasurer::default();
        let fill = m.sized(None, None);
        let fixed = m.fixed(5.0, 5.0);
        let kids = children(&[(fill, Placement::Flow), (fixed, Placement::Flow)]);
        let mut s = Single { padding: 2.0 };
        let slots = s.arrange(BoundingBox::new(10.0, 10.0, 20.0, 30.0), &kids, &mut m);
        assert_eq!(slots[0].bbox, BoundingBox::new(12.0, 12.0, 16.0, 26.0));
        assert_eq!(slots[1].bbox, BoundingBox::new(12.0, 12.0, 5.0, 5.0));
    }

    #[test]
    fn measure_adds_padding() {
        let mut m = FixedMeasurer::default();
        let a = m.fixed(5.0, 8.0);
        let b = m.fixed(7.0, 3.0);
        let kids = children(&[(a, Placement::Flow), (b, Placement::Flow)]);
        let s = Single { padding: 1.0 };
        assert_eq!(
            s.measure(&kids, MeasureConstraints::unbounded(), &mut m),
            Expanse::new(9.0, 10.0)
        );
    }
}
