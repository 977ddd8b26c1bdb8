use super::{Child, DockSlot, MeasureConstraints, Measurer, Placement, Slot, Strategy};
use crate::geom::{Axis, BoundingBox, Expanse};

/// Scroll state for one axis of a scroll container.
///
/// The thumb offset is authoritative: dragging moves the thumb, and the
/// content offset follows as `thumb_offset * ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollAxis {
    /// Content overflows the viewport on this axis.
    pub enabled: bool,
    /// Viewport extent, which is also the scrollbar track length.
    pub track: f32,
    /// Thumb length.
    pub thumb: f32,
    /// Thumb position from the start of the track.
    pub thumb_offset: f32,
    /// Content extent over viewport extent.
    pub ratio: f32,
    /// Content displacement.
    pub offset: f32,
}

impl ScrollAxis {
    /// Recompute the thumb from content and viewport extents, keeping the
    /// thumb offset where possible.
    ///
    /// The thumb is `viewport - (content - viewport) / ratio`, so it fills
    /// the track when nothing overflows and the thumb's travel maps exactly
    /// onto the content's overflow.
    pub fn resolve(&mut self, content: f32, viewport: f32) {
        self.track = viewport.max(0.0);
        if viewport <= 0.0 || content <= viewport {
            self.enabled = false;
            self.ratio = 1.0;
            self.thumb = self.track;
            self.thumb_offset = 0.0;
            self.offset = 0.0;
            return;
        }
        self.enabled = true;
        self.ratio = content / viewport;
        self.thumb = viewport - (content - viewport) / self.ratio;
        self.set_thumb_offset(self.thumb_offset);
    }

    /// Furthest the thumb can travel.
    pub fn max_thumb_offset(&self) -> f32 {
        (self.track - self.thumb).max(0.0)
    }

    /// Move the thumb, clamped to the track. Ignored while scrolling is
    /// disabled on this axis.
    pub fn set_thumb_offset(&mut self, thumb_offset: f32) {
        if !self.enabled {
            self.thumb_offset = 0.0;
            self.offset = 0.0;
            return;
        }
        self.thumb_offset = thumb_offset.clamp(0.0, self.max_thumb_offset());
        self.offset = self.thumb_offset * self.ratio;
    }
}

/// Scroll state for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Vertical axis.
    pub vertical: ScrollAxis,
    /// Horizontal axis.
    pub horizontal: ScrollAxis,
}

impl ScrollState {
    /// State for one axis.
    pub fn axis(&self, axis: Axis) -> &ScrollAxis {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    /// Mutable state for one axis.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut ScrollAxis {
        match axis {
            Axis::Vertical => &mut self.vertical,
            Axis::Horizontal => &mut self.horizontal,
        }
    }
}

/// A viewport onto one content child. A child docked right is the vertical
/// scrollbar and a child docked bottom is the horizontal one; any other
/// child is the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scroll {
    /// Scroll vertically.
    pub vertical: bool,
    /// Scroll horizontally.
    pub horizontal: bool,
    /// State carried between passes. Updated by `arrange`.
    pub state: ScrollState,
}

/// The content, vertical bar and horizontal bar children.
struct Parts {
    /// Scrolled content.
    content: Option<Child>,
    /// Vertical scrollbar.
    vbar: Option<Child>,
    /// Horizontal scrollbar.
    hbar: Option<Child>,
}

impl Scroll {
    /// Split the children into their roles.
    fn parts(&self, children: &[Child]) -> Parts {
        let mut parts = Parts {
            content: None,
            vbar: None,
            hbar: None,
        };
        for child in children {
            match child.placement {
                Placement::Dock(DockSlot::Right) if self.vertical => parts.vbar = Some(*child),
                Placement::Dock(DockSlot::Bottom) if self.horizontal => parts.hbar = Some(*child),
                _ => parts.content = Some(*child),
            }
        }
        parts
    }

    /// Bounds for the content: free along scrolling axes.
    fn content_bounds(&self, viewport: MeasureConstraints) -> MeasureConstraints {
        MeasureConstraints {
            width: if self.horizontal { None } else { viewport.width },
            height: if self.vertical { None } else { viewport.height },
        }
    }
}

impl Strategy for Scroll {
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse {
        let parts = self.parts(children);
        let vbar_w = parts
            .vbar
            .map_or(0.0, |b| m.measure(b.id, MeasureConstraints::unbounded()).w);
        let hbar_h = parts
            .hbar
            .map_or(0.0, |b| m.measure(b.id, MeasureConstraints::unbounded()).h);
        let content = parts
            .content
            .map_or(Expanse::zero(), |child| m.measure(child.id, self.content_bounds(c)));
        Expanse::new(content.w + vbar_w, content.h + hbar_h)
    }

    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        m: &mut dyn Measurer,
    ) -> Vec<Slot> {
        let parts = self.parts(children);
        let vbar_w = parts.vbar.map_or(0.0, |b| {
            let bounds = MeasureConstraints {
                width: None,
                height: Some(area.height),
            };
            m.measure(b.id, bounds).w.min(area.width)
        });
        let hbar_h = parts.hbar.map_or(0.0, |b| {
            let bounds = MeasureConstraints {
                width: Some(area.width),
                height: None,
            };
            m.measure(b.id, bounds).h.min(area.height)
        });
        let viewport = BoundingBox::new(
            area.x,
            area.y,
            area.width - vbar_w,
            area.height - hbar_h,
        );

        let mut out = Vec::with_capacity(3);
        if let Some(content) = parts.content {
            let bounds = self.content_bounds(MeasureConstraints::exact(viewport.size()));
            let size = m.measure(content.id, bounds);
            let w = if self.horizontal { size.w } else { viewport.width };
            let h = if self.vertical { size.h } else { viewport.height };
            self.state.vertical.resolve(h, viewport.height);
            self.state.horizontal.resolve(w, viewport.width);
            let bbox = BoundingBox::new(
                viewport.x - self.state.horizontal.offset,
                viewport.y - self.state.vertical.offset,
                w,
                h,
            );
            out.push(Slot {
                id: content.id,
                bbox,
                clip: Some(viewport),
            });
        } else {
            self.state.vertical.resolve(0.0, viewport.height);
            self.state.horizontal.resolve(0.0, viewport.width);
        }
        if let Some(vbar) = parts.vbar {
            let bbox = BoundingBox::new(viewport.right(), area.y, vbar_w, viewport.height);
            out.push(Slot::new(vbar.id, bbox));
        }
        if let Some(hbar) = parts.hbar {
            let bbox = BoundingBox::new(area.x, viewport.bottom(), viewport.width, hbar_h);
            out.push(Slot::new(hbar.id, bbox));
        }
        out
    }
}

/// A scrollbar track. The first child is the thumb, positioned from the
/// owning scroll container's state on `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Track direction.
    pub axis: Axis,
    /// The owning container's state on this axis.
    pub state: ScrollAxis,
}

impl Strategy for Track {
    fn measure(
        &self,
        _children: &[Child],
        _c: MeasureConstraints,
        _m: &mut dyn Measurer,
    ) -> Expanse {
        Expanse::zero()
    }

    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        _m: &mut dyn Measurer,
    ) -> Vec<Slot> {
        let Some(thumb) = children.first() else {
            return Vec::new();
        };
        let bbox = match self.axis {
            Axis::Vertical => BoundingBox::new(
                area.x,
                area.y + self.state.thumb_offset,
                area.width,
                self.state.thumb,
            ),
            Axis::Horizontal => BoundingBox::new(
                area.x + self.state.thumb_offset,
                area.y,
                self.state.thumb,
                area.height,
            ),
        };
        vec![Slot::new(thumb.id, bbox)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testutil::{FixedMeasurer, children};

    #[test]
    fn thumb_length() {
        let mut a = ScrollAxis::default();
        a.resolve(500.0, 100.0);
        assert!(a.enabled);
        assert_eq!(a.thumb, 20.0);
        assert_eq!(a.max_thumb_offset(), 80.0);
        a.set_thumb_offset(80.0);
        assert_eq!(a.offset, 400.0);
    }

    #[test]
    fn no_overflow_disables_scrolling() {
        let mut a = ScrollAxis::default();
        a.resolve(80.0, 100.0);
        assert!(!a.enabled);
        assert_eq!(a.thumb, 100.0);
        a.set_thumb_offset(30.0);
        assert_eq!(a.thumb_offset, 0.0);
        assert_eq!(a.offset, 0.0);

        a.resolve(100.0, 100.0);
        assert!(!a.enabled);
        assert_eq!(a.thumb, 100.0);
    }

    #[test]
    fn thumb_offset_is_clamped() {
        let mut a = ScrollAxis::default();
        a.resolve(200.0, 100.0);
        a.set_thumb_offset(-5.0);
        assert_eq!(a.thumb_offset, 0.0);
        a.set_thumb_offset(1000.0);
        assert_eq!(a.thumb_offset, 50.0);
        assert_eq!(a.offset, 100.0);
        a.resolve(150.0, 100.0);
        assert!(a.thumb_offset <= a.max_thumb_offset());
    }

    #[test]
    fn viewport_and_content() {
        let mut m = FixedMeasurer::default();
        let content = m.sized(None, Some(500.0));
        let vbar = m.fixed(10.0, 0.0);
        let kids = children(&[
            (content, Placement::Dock(DockSlot::Center)),
            (vbar, Placement::Dock(DockSlot::Right)),
        ]);
        let mut s = Scroll {
            vertical: true,
            horizontal: false,
            state: ScrollState::default(),
        };
        s.state.vertical.thumb_offset = 40.0;
        let slots = s.arrange(BoundingBox::new(0.0, 0.0, 110.0, 100.0), &kids, &mut m);
        assert_eq!(s.state.vertical.thumb, 20.0);
        assert_eq!(s.state.vertical.offset, 200.0);
        assert_eq!(slots[0].bbox, BoundingBox::new(0.0, -200.0, 100.0, 500.0));
        assert_eq!(slots[0].clip, Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(slots[1].bbox, BoundingBox::new(100.0, 0.0, 10.0, 100.0));

        let mut t = Track {
            axis: Axis::Vertical,
            state: s.state.vertical,
        };
        let thumb = m.sized(None, None);
        let slots = t.arrange(slots[1].bbox, &children(&[(thumb, Placement::Flow)]), &mut m);
        assert_eq!(slots[0].bbox, BoundingBox::new(100.0, 40.0, 10.0, 20.0));
    }
}
