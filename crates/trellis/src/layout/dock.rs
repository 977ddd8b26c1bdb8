use std::collections::HashMap;

use super::{Child, DockSlot, MeasureConstraints, Measurer, Placement, Slot, Strategy};
use crate::{
    NodeId,
    geom::{BoundingBox, Expanse},
};

/// Children dock to the padded box's edges. Top and bottom span the full
/// width, left and right fill the height between them, and the center takes
/// what remains. Each slot holds at most one child; the last one wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dock {
    /// Inset on every side.
    pub padding: f32,
}

/// The child occupying each slot.
fn slots(children: &[Child]) -> HashMap<DockSlot, NodeId> {
    let mut out = HashMap::new();
    for child in children {
        let slot = match child.placement {
            Placement::Dock(slot) => slot,
            _ => DockSlot::Center,
        };
        out.insert(slot, child.id);
    }
    out
}

impl Strategy for Dock {
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse {
        let inner = c.shrink(self.padding);
        let slots = slots(children);
        let mut size = |slot| {
            slots
                .get(&slot)
                .map_or(Expanse::zero(), |id| m.measure(*id, inner))
        };
        let (top, bottom) = (size(DockSlot::Top), size(DockSlot::Bottom));
        let (left, right) = (size(DockSlot::Left), size(DockSlot::Right));
        let center = size(DockSlot::Center);
        let middle_w = left.w + center.w + right.w;
        let middle_h = left.h.max(center.h).max(right.h);
        Expanse::new(
            middle_w.max(top.w).max(bottom.w),
            top.h + middle_h + bottom.h,
        )
        .pad(self.padding)
    }

    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        m: &mut dyn Measurer,
    ) -> Vec<Slot> {
        let inner = area.inset(self.padding);
        let slots = slots(children);
        let mut out = Vec::with_capacity(slots.len());

        let across = MeasureConstraints {
            width: Some(inner.width),
            height: None,
        };
        let top_h = slots.get(&DockSlot::Top).map_or(0.0, |id| {
            let h = m.measure(*id, across).h.min(inner.height);
            out.push(Slot::new(*id, BoundingBox::new(inner.x, inner.y, inner.width, h)));
            h
        });
        let bottom_h = slots.get(&DockSlot::Bottom).map_or(0.0, |id| {
            let h = m.measure(*id, across).h.min(inner.height - top_h).max(0.0);
            out.push(Slot::new(
                *id,
                BoundingBox::new(inner.x, inner.bottom() - h, inner.width, h),
            ));
            h
        });

        let mid_y = inner.y + top_h;
        let mid_h = (inner.height - top_h - bottom_h).max(0.0);
        let down = MeasureConstraints {
            width: None,
            height: Some(mid_h),
        };
        let left_w = slots.get(&DockSlot::Left).map_or(0.0, |id| {
            let w = m.measure(*id, down).w.min(inner.width);
            out.push(Slot::new(*id, BoundingBox::new(inner.x, mid_y, w, mid_h)));
            w
        });
        let right_w = slots.get(&DockSlot::Right).map_or(0.0, |id| {
            let w = m.measure(*id, down).w.min(inner.width - left_w).max(0.0);
            out.push(Slot::new(
                *id,
                BoundingBox::new(inner.right() - w, mid_y, w, mid_h),
            ));
            w
        });

        if let Some(id) = slots.get(&DockSlot::Center) {
            let center = BoundingBox::new(
                inner.x + left_w,
                mid_y,
                (inner.width - left_w - right_w).max(0.0),
                mid_h,
            );
            out.push(Slot::new(*id, center));
        }
        out
    }
}
