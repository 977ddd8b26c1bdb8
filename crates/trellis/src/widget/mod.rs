//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use crate::{
    Context, ViewContext,
    error::Result,
    event::Event,
    geom::Expanse,
    layout::{Layout, MeasureConstraints},
    state::NodeName,
    style::Style,
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was processed without a state change and propagation stops.
    Consume,
    /// The event was not handled and will bubble up the tree.
    Ignore,
}

/// Widgets are the behavior attached to nodes in the Core arena.
pub trait Widget: Any + Send {
    /// Layout configuration for this widget.
    fn layout(&self) -> Layout {
        Layout::single()
    }

    /// Intrinsic content size for a node without visible children, padding
    /// excluded.
    fn measure(&self, _c: MeasureConstraints, _ctx: &dyn ViewContext) -> Expanse {
        Expanse::zero()
    }

    /// What the backend draws for this node. `None` draws nothing and the
    /// node never acquires a backend handle.
    fn style(&self, _ctx: &dyn ViewContext) -> Option<Style> {
        None
    }

    /// Whether hit-testing may select this node. Read once at creation;
    /// change it later through the context.
    fn receive_events(&self) -> bool {
        true
    }

    /// Handle events.
    fn on_event(&mut self, _event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Whether a press on this node, or on a descendant that declines focus,
    /// gives it focus.
    fn accept_focus(&self) -> bool {
        false
    }

    /// Called exactly once when the node first becomes reachable from the
    /// root. Widgets build their child nodes here.
    fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Called once, just before the node is removed from the arena.
    fn on_unmount(&mut self, _ctx: &mut dyn Context) {}

    /// Name used in dumps and logs.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let short = name.split('<').next().unwrap_or(name);
        let short = short.rsplit("::").next().unwrap_or(short);
        NodeName::convert(short)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

impl dyn Widget {
    /// Downcast to a concrete widget type.
    pub fn downcast_ref<W: Widget>(&self) -> Option<&W> {
        (self as &dyn Any).downcast_ref::<W>()
    }

    /// Downcast to a concrete widget type, mutably.
    pub fn downcast_mut<W: Widget>(&mut self) -> Option<&mut W> {
        (self as &mut dyn Any).downcast_mut::<W>()
    }
}
