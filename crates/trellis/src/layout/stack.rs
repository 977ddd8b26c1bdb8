use super::{Child, MeasureConstraints, Measurer, Slot, Strategy};
use crate::geom::{Axis, BoundingBox, Expanse};

/// Children follow one another along `axis` in child order.
///
/// Padding insets children on the cross axis only. Along the main axis the
/// first child starts at the container's edge and the container's extent is
/// the plain sum of its children's extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stack {
    /// Main axis.
    pub axis: Axis,
    /// Inset on every side.
    pub padding: f32,
}

impl Stack {
    /// The constraint handed to each child: bounded across, free along.
    fn child_bounds(&self, cross: Option<f32>) -> MeasureConstraints {
        let cross = cross.map(|v| (v - 2.0 * self.padding).max(0.0));
        MeasureConstraints::from_main_cross(self.axis, None, cross)
    }
}

impl Strategy for Stack {
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse {
        let bounds = self.child_bounds(c.along(self.axis.cross()));
        let (main, cross) = children.iter().fold((0.0f32, 0.0f32), |(main, cross), child| {
            let size = m.measure(child.id, bounds);
            (
                main + size.along(self.axis),
                cross.max(size.along(self.axis.cross())),
            )
        });
        Expanse::from_main_cross(self.axis, main, cross + 2.0 * self.padding)
    }

    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        m: &mut dyn Measurer,
    ) -> Vec<Slot> {
        let cross_extent = Expanse::from(area).along(self.axis.cross());
        let bounds = self.child_bounds(Some(cross_extent));
        let mut offset = 0.0;
        children
            .iter()
            .map(|child| {
                let size = m.measure(child.id, bounds);
                let (x, y) = match self.axis {
                    Axis::Vertical => (area.x + self.padding, area.y + offset),
                    Axis::Horizontal => (area.x + offset, area.y + self.padding),
                };
                offset += size.along(self.axis);
                Slot::new(child.id, size.at(x, y))
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
    fn vertical_stack_with_padding() {
        let mut m = FixedMeasurer::default();
        let ids: Vec<_> = [10.0, 20.0, 30.0]
            .iter()
            .map(|h| m.sized(None, Some(*h)))
            .collect();
        let kids = children(&ids.iter().map(|id| (*id, Placement::Flow)).collect::<Vec<_>>());
        let mut s = Stack {
            axis: Axis::Vertical,
            padding: 4.0,
        };
        let c = MeasureConstraints {
            width: Some(100.0),
            height: None,
        };
        assert_eq!(s.measure(&kids, c, &mut m).h, 60.0);

        let slots = s.arrange(BoundingBox::new(0.0, 0.0, 100.0, 60.0), &kids, &mut m);
        let ys: Vec<f32> = slots.iter().map(|s| s.bbox.y).collect();
        assert_eq!(ys, vec![0.0, 10.0, 30.0]);
        let last = slots[2].bbox;
        assert_eq!(last.bottom(), 60.0);
        assert!(slots.iter().all(|s| s.bbox.width == 92.0 && s.bbox.x == 4.0));
    }

    #[test]
    fn horizontal_stack() {
        let mut m = FixedMeasurer::default();
        let a = m.fixed(5.0, 5.0);
        let b = m.fixed(7.0, 9.0);
        let kids = children(&[(a, Placement::Flow), (b, Placement::Flow)]);
        let mut s = Stack {
            axis: Axis::Horizontal,
            padding: 0.0,
        };
        assert_eq!(
            s.measure(&kids, MeasureConstraints::unbounded(), &mut m),
            Expanse::new(12.0, 9.0)
        );
        let slots = s.arrange(BoundingBox::new(1.0, 1.0, 50.0, 9.0), &kids, &mut m);
        assert_eq!(slots[1].bbox, BoundingBox::new(6.0, 1.0, 7.0, 9.0));
    }

    #[test]
    fn children_are_measured_unbounded_along_the_axis() {
        let mut m = FixedMeasurer::default();
        let a = m.fixed(5.0, 5.0);
        let kids = children(&[(a, Placement::Flow)]);
        let mut s = Stack {
            axis: Axis::Vertical,
            padding: 1.0,
        };
        let slots = s.arrange(BoundingBox::new(0.0, 0.0, 10.0, 10.0), &kids, &mut m);
        assert_eq!(slots[0].bbox, BoundingBox::new(1.0, 0.0, 8.0, 5.0));
        assert_eq!(
            m.calls[0].1,
            MeasureConstraints {
                width: Some(8.0),
                height: None
            }
        );
    }
}
