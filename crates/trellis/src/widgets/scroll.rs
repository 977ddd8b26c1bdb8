//! Scroll containers and their scrollbars.

use crate::{
    Context, NodeId, ViewContext,
    error::Result,
    event::{Button, Event},
    geom::{Axis, Point},
    layout::{DockSlot, Layout, Placement, Sizing},
    style::Style,
    widget::{EventOutcome, Widget},
};

/// A fixed-size viewport onto one content child. The content keeps its
/// measured size and is shifted under the viewport by the scroll offset.
///
/// Add the content as an ordinary child. The scrollbars are created on
/// mount, docked right and bottom.
pub struct ScrollContainer {
    /// Scroll vertically.
    vertical: bool,
    /// Scroll horizontally.
    horizontal: bool,
    /// Layout sizing, before the scroll arrangement is applied.
    layout: Layout,
}

impl Default for ScrollContainer {
    fn default() -> Self {
        Self::vertical()
    }
}

impl ScrollContainer {
    /// Scroll on the chosen axes.
    pub fn new(vertical: bool, horizontal: bool) -> Self {
        Self {
            vertical,
            horizontal,
            layout: Layout::scroll(vertical, horizontal),
        }
    }

    /// Scroll vertically only.
    pub fn vertical() -> Self {
        Self::new(true, false)
    }

    /// Fix both extents of the viewport.
    pub fn fixed(mut self, width: f32, height: f32) -> Self {
        self.layout = self.layout.fixed(width, height);
        self
    }

    /// Set width sizing.
    pub fn width(mut self, sizing: Sizing) -> Self {
        self.layout = self.layout.width(sizing);
        self
    }

    /// Set height sizing.
    pub fn height(mut self, sizing: Sizing) -> Self {
        self.layout = self.layout.height(sizing);
        self
    }
}

impl Widget for ScrollContainer {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn receive_events(&self) -> bool {
        false
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let node = ctx.node_id();
        if self.vertical {
            ctx.add_placed(node, Scrollbar::new(Axis::Vertical), Placement::Dock(DockSlot::Right))?;
        }
        if self.horizontal {
            ctx.add_placed(
                node,
                Scrollbar::new(Axis::Horizontal),
                Placement::Dock(DockSlot::Bottom),
            )?;
        }
        Ok(())
    }
}

/// Where a thumb drag started.
#[derive(Debug, Clone, Copy)]
struct Grab {
    /// Cursor coordinate along the axis at the press.
    start: f32,
    /// Thumb offset at the press.
    thumb_offset: f32,
}

/// A scrollbar track. Its only child is the thumb. Pressing the thumb
/// captures the drag; pressing the track centers the thumb on the cursor.
pub struct Scrollbar {
    /// Track direction.
    axis: Axis,
    /// Active thumb drag.
    grab: Option<Grab>,
}

impl Scrollbar {
    /// A scrollbar along `axis`.
    pub fn new(axis: Axis) -> Self {
        Self { axis, grab: None }
    }

    /// The owning scroll container.
    fn container(ctx: &dyn Context) -> Option<NodeId> {
        ctx.parent_of(ctx.node_id())
    }

    /// Move the thumb of the owning container.
    fn move_thumb(&self, ctx: &mut dyn Context, offset: f32) -> Result<()> {
        if let Some(container) = Self::container(ctx) {
            ctx.scroll_thumb_to(container, self.axis, offset)?;
        }
        Ok(())
    }

    /// Start a drag, or jump if the press missed the thumb.
    fn press(&mut self, ctx: &mut dyn Context) -> Result<EventOutcome> {
        let Some(container) = Self::container(ctx) else {
            return Ok(EventOutcome::Ignore);
        };
        let Some(state) = ctx.scroll_state(container).map(|s| *s.axis(self.axis)) else {
            return Ok(EventOutcome::Ignore);
        };
        if !state.enabled {
            return Ok(EventOutcome::Consume);
        }
        let cursor = ctx.cursor().along(self.axis);
        let track_start = ctx.bbox().origin().along(self.axis);
        let local = cursor - track_start;
        if local >= state.thumb_offset && local <= state.thumb_offset + state.thumb {
            self.grab = Some(Grab {
                start: cursor,
                thumb_offset: state.thumb_offset,
            });
            ctx.capture_drag();
        } else {
            self.move_thumb(ctx, local - state.thumb / 2.0)?;
        }
        Ok(EventOutcome::Handle)
    }

    /// Follow the cursor during a drag.
    fn drag(&self, ctx: &mut dyn Context, point: Point) -> Result<EventOutcome> {
        let Some(grab) = self.grab else {
            return Ok(EventOutcome::Ignore);
        };
        let delta = point.along(self.axis) - grab.start;
        self.move_thumb(ctx, grab.thumb_offset + delta)?;
        Ok(EventOutcome::Handle)
    }
}

impl Widget for Scrollbar {
    fn layout(&self) -> Layout {
        Layout::track(self.axis)
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let width = ctx.theme().scrollbar_width;
        let axis = self.axis;
        ctx.with_layout(&mut |layout| {
            *layout = match axis {
                Axis::Vertical => layout.width(Sizing::Fixed(width)),
                Axis::Horizontal => layout.height(Sizing::Fixed(width)),
            };
        })?;
        ctx.add_child(Thumb)?;
        Ok(())
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        Some(Style::fill(ctx.theme().scroll_track))
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::Press(Button::Left) => self.press(ctx),
            Event::Drag(point) => self.drag(ctx, *point),
            Event::DragStopped => {
                self.grab = None;
                Ok(EventOutcome::Handle)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

/// The draggable part of a scrollbar. Presses pass through to the track.
struct Thumb;

impl Widget for Thumb {
    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        Some(Style::fill(ctx.theme().scroll_thumb))
    }

    fn receive_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::NullBackend,
        core::Core,
        geom::{BoundingBox, Expanse},
        resources::MonospaceLoader,
        testing::Harness,
        widgets::Frame,
    };

    /// A 100x100 vertical scroller around 50x500 content.
    fn scroller() -> (Core, NodeId, NodeId) {
        let mut core = Core::new(NullBackend::default(), MonospaceLoader);
        let content = core.content_id();
        let scroll = core
            .add_child_to(content, ScrollContainer::vertical().fixed(100.0, 100.0))
            .unwrap();
        let body = core.add_child_to(scroll, Frame::new().fixed(50.0, 500.0)).unwrap();
        core.update_layout(Expanse::new(400.0, 300.0));
        (core, scroll.into(), body.into())
    }

    #[test]
    fn thumb_follows_content_ratio() {
        let (core, scroll, _) = scroller();
        let state = core.node(scroll).unwrap().scroll().vertical;
        assert!(state.enabled);
        assert_eq!(state.ratio, 5.0);
        assert_eq!(state.thumb, 20.0);

        let bar = core.node(scroll).unwrap().children()[0];
        let thumb = core.node(bar).unwrap().children()[0];
        assert_eq!(core.node(bar).unwrap().bbox(), BoundingBox::new(90.0, 0.0, 10.0, 100.0));
        assert_eq!(core.node(thumb).unwrap().bbox(), BoundingBox::new(90.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn thumb_offset_shifts_content() {
        let (mut core, scroll, body) = scroller();
        core.scroll_thumb_to(scroll, Axis::Vertical, 40.0).unwrap();
        core.update_layout(Expanse::new(400.0, 300.0));

        let state = core.node(scroll).unwrap().scroll().vertical;
        assert_eq!(state.offset, 200.0);
        let node = core.node(body).unwrap();
        // Content spans the viewport's width on the fixed axis.
        assert_eq!(node.bbox(), BoundingBox::new(0.0, -200.0, 90.0, 500.0));
        assert_eq!(node.visible(), BoundingBox::new(0.0, 0.0, 90.0, 100.0));

        core.scroll_thumb_to(scroll, Axis::Vertical, 1000.0).unwrap();
        core.update_layout(Expanse::new(400.0, 300.0));
        assert_eq!(core.node(scroll).unwrap().scroll().vertical.thumb_offset, 80.0);
    }

    #[test]
    fn dragging_the_thumb_scrolls_content() {
        let mut h = Harness::new();
        let scroll = h.add(ScrollContainer::vertical().fixed(100.0, 100.0)).unwrap();
        let body = h
            .gui
            .core
            .add_child_to(scroll, Frame::new().fixed(50.0, 500.0))
            .unwrap();
        h.frame().unwrap();

        h.move_to(95.0, 10.0).unwrap();
        h.press(Button::Left).unwrap();
        h.move_to(95.0, 50.0).unwrap();
        let state = h.core().node(scroll).unwrap().scroll().vertical;
        assert_eq!(state.thumb_offset, 40.0);
        assert_eq!(state.offset, 200.0);
        assert_eq!(h.bbox(body).y, -200.0);

        h.release(Button::Left).unwrap();
        h.move_to(95.0, 90.0).unwrap();
        assert_eq!(h.core().node(scroll).unwrap().scroll().vertical.offset, 200.0);
    }

    #[test]
    fn short_content_disables_scrolling() {
        let mut h = Harness::new();
        let scroll = h.add(ScrollContainer::vertical().fixed(100.0, 100.0)).unwrap();
        h.gui
            .core
            .add_child_to(scroll, Frame::new().fixed(50.0, 50.0))
            .unwrap();
        h.frame().unwrap();
        h.click(95.0, 50.0).unwrap();
        let state = h.core().node(scroll).unwrap().scroll().vertical;
        assert!(!state.enabled);
        assert_eq!(state.thumb, 100.0);
        assert_eq!(state.offset, 0.0);
    }
}
