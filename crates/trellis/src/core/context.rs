use std::any::type_name;

use super::{
    id::{NodeId, TypedId},
    router::Router,
    world::Core,
};
use crate::{
    error::{Error, Result},
    geom::{Axis, BoundingBox, Point},
    layout::{Layout, Placement, ScrollState},
    resources::Resources,
    style::Theme,
    widget::Widget,
};

/// Read-only context available to widgets.
pub trait ViewContext {
    /// The node this context is bound to.
    fn node_id(&self) -> NodeId;

    /// The window root.
    fn root_id(&self) -> NodeId;

    /// The layer that hosts application content.
    fn content_id(&self) -> NodeId;

    /// The free-placement layer that hosts context menus.
    fn overlay_id(&self) -> NodeId;

    /// A node's bounding box from the last layout pass.
    fn node_bbox(&self, node: NodeId) -> Option<BoundingBox>;

    /// This node's bounding box.
    fn bbox(&self) -> BoundingBox {
        self.node_bbox(self.node_id()).unwrap_or_default()
    }

    /// A node's children, back to front.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;

    /// This node's children.
    fn children(&self) -> Vec<NodeId> {
        self.children_of(self.node_id())
    }

    /// A node's parent.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Does a node exist and reach the root?
    fn is_attached(&self, node: NodeId) -> bool;

    /// Is a node hidden?
    fn is_hidden(&self, node: NodeId) -> bool;

    /// Does a node hold focus?
    fn node_is_focused(&self, node: NodeId) -> bool;

    /// Does this node hold focus?
    fn is_focused(&self) -> bool {
        self.node_is_focused(self.node_id())
    }

    /// Is this node under the cursor?
    fn is_hovered(&self) -> bool;

    /// Does this node hold the drag?
    fn holds_drag(&self) -> bool;

    /// The last sampled cursor position.
    fn cursor(&self) -> Point;

    /// The active theme.
    fn theme(&self) -> &Theme;

    /// Fonts, images and text measurement.
    fn resources(&self) -> &Resources;

    /// A scroll container's state.
    fn scroll_state(&self, node: NodeId) -> Option<ScrollState>;
}

/// Mutable context available to widgets during event dispatch and
/// lifecycle hooks.
pub trait Context: ViewContext {
    /// Move focus to a node. Returns `true` if the holder changed.
    fn set_focus(&mut self, node: NodeId) -> bool;

    /// Release focus.
    fn clear_focus(&mut self);

    /// Make this node the drag holder. Returns `true` if the holder changed.
    fn capture_drag(&mut self) -> bool;

    /// Release the drag if this node holds it.
    fn release_drag(&mut self);

    /// Mark a node's visual state as changed.
    fn taint_node(&mut self, node: NodeId);

    /// Mark this node's visual state as changed.
    fn taint(&mut self) {
        self.taint_node(self.node_id());
    }

    /// Mark a node's content as changed in a way that may alter its size.
    fn relayout_node(&mut self, node: NodeId);

    /// Mark this node's content as changed in a way that may alter its size.
    fn relayout(&mut self) {
        self.relayout_node(self.node_id());
    }

    /// Create a detached node.
    fn add(&mut self, widget: Box<dyn Widget>) -> NodeId;

    /// Attach a detached node as the last child of `parent`.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Attach a detached node at a child index of `parent`.
    fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()>;

    /// Unlink a node from its parent, keeping it alive.
    fn detach(&mut self, node: NodeId) -> Result<()>;

    /// Remove a node and its descendants from the arena.
    fn remove(&mut self, node: NodeId) -> Result<()>;

    /// Set a node's placement hint.
    fn set_placement(&mut self, node: NodeId, placement: Placement) -> Result<()>;

    /// Modify a node's layout configuration.
    fn with_layout_of(&mut self, node: NodeId, f: &mut dyn FnMut(&mut Layout)) -> Result<()>;

    /// Modify this node's layout configuration.
    fn with_layout(&mut self, f: &mut dyn FnMut(&mut Layout)) -> Result<()> {
        let node = self.node_id();
        self.with_layout_of(node, f)
    }

    /// Show or hide a node. Returns `true` if visibility changed.
    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> bool;

    /// Allow or prevent hit-testing from selecting a node.
    fn set_receive_events(&mut self, node: NodeId, receive: bool) -> Result<()>;

    /// Run a closure against another node's widget.
    fn with_widget_mut(
        &mut self,
        node: NodeId,
        f: &mut dyn FnMut(&mut dyn Widget, &mut dyn Context) -> Result<()>,
    ) -> Result<()>;

    /// Move a scroll container's thumb on one axis.
    fn scroll_thumb_to(&mut self, node: NodeId, axis: Axis, thumb_offset: f32) -> Result<()>;

    /// Show a node in the overlay layer at a screen position. The node
    /// must be detached.
    fn open_overlay(&mut self, node: NodeId, at: Point) -> Result<()>;

    /// Detach everything in the overlay layer.
    fn close_overlays(&mut self) -> Result<()>;
}

impl dyn Context + '_ {
    /// Execute a closure with mutable access to a widget of type `W`.
    pub fn with_widget<W, R>(
        &mut self,
        node: NodeId,
        mut f: impl FnMut(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        let mut output = None;
        self.with_widget_mut(node, &mut |widget, ctx| {
            let widget = widget.downcast_mut::<W>().ok_or_else(|| {
                Error::Invalid(format!("expected widget type {}", type_name::<W>()))
            })?;
            output = Some(f(widget, ctx)?);
            Ok(())
        })?;
        output.ok_or_else(|| Error::Internal("missing widget result".into()))
    }

    /// Execute a closure with mutable access to a widget using a typed node ID.
    pub fn with_typed<W, R>(
        &mut self,
        node: TypedId<W>,
        f: impl FnMut(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget,
    {
        self.with_widget(node.into(), f)
    }

    /// Create a detached node.
    pub fn add_orphan<W: Widget>(&mut self, widget: W) -> NodeId {
        self.add(widget.into())
    }

    /// Add a widget as the last child of this node.
    pub fn add_child<W: Widget>(&mut self, widget: W) -> Result<NodeId> {
        let parent = self.node_id();
        self.add_child_to(parent, widget)
    }

    /// Add a widget as the last child of `parent`.
    pub fn add_child_to<W: Widget>(&mut self, parent: NodeId, widget: W) -> Result<NodeId> {
        let child = self.add_orphan(widget);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Add a widget as the last child of `parent` with a placement hint.
    pub fn add_placed<W: Widget>(
        &mut self,
        parent: NodeId,
        widget: W,
        placement: Placement,
    ) -> Result<NodeId> {
        let child = self.add_orphan(widget);
        self.set_placement(child, placement)?;
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Add a widget as the last child of `parent` and return a typed id.
    pub fn add_typed<W: Widget>(&mut self, parent: NodeId, widget: W) -> Result<TypedId<W>> {
        self.add_child_to(parent, widget).map(TypedId::new)
    }
}

/// Mutable context bound to a node.
pub struct CoreContext<'a> {
    /// Core state reference.
    core: &'a mut Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Create a new context for a node.
    pub fn new(core: &'a mut Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

/// Implement [`ViewContext`] by delegating to a `core` field.
macro_rules! view_context_impl {
    ($ty:ty) => {
        impl ViewContext for $ty {
            fn node_id(&self) -> NodeId {
                self.node_id
            }

            fn root_id(&self) -> NodeId {
                self.core.root
            }

            fn content_id(&self) -> NodeId {
                self.core.content
            }

            fn overlay_id(&self) -> NodeId {
                self.core.overlay
            }

            fn node_bbox(&self, node: NodeId) -> Option<BoundingBox> {
                self.core.nodes.get(node).map(|n| n.bbox)
            }

            fn children_of(&self, node: NodeId) -> Vec<NodeId> {
                self.core
                    .nodes
                    .get(node)
                    .map(|n| n.children.clone())
                    .unwrap_or_default()
            }

            fn parent_of(&self, node: NodeId) -> Option<NodeId> {
                self.core.nodes.get(node).and_then(|n| n.parent)
            }

            fn is_attached(&self, node: NodeId) -> bool {
                self.core.is_attached_to_root(node)
            }

            fn is_hidden(&self, node: NodeId) -> bool {
                self.core.nodes.get(node).is_some_and(|n| n.hidden)
            }

            fn node_is_focused(&self, node: NodeId) -> bool {
                self.core.focus_id() == Some(node)
            }

            fn is_hovered(&self) -> bool {
                self.core.hover_id() == Some(self.node_id)
            }

            fn holds_drag(&self) -> bool {
                self.core.drag_id() == Some(self.node_id)
            }

            fn cursor(&self) -> Point {
                self.core.cursor()
            }

            fn theme(&self) -> &Theme {
                &self.core.theme
            }

            fn resources(&self) -> &Resources {
                &self.core.resources
            }

            fn scroll_state(&self, node: NodeId) -> Option<ScrollState> {
                self.core.nodes.get(node).map(|n| n.scroll)
            }
        }
    };
}

view_context_impl!(CoreContext<'_>);
view_context_impl!(CoreViewContext<'_>);

impl Context for CoreContext<'_> {
    fn set_focus(&mut self, node: NodeId) -> bool {
        self.core.set_focus(Some(node))
    }

    fn clear_focus(&mut self) {
        self.core.set_focus(None);
    }

    fn capture_drag(&mut self) -> bool {
        self.core.capture_drag(self.node_id)
    }

    fn release_drag(&mut self) {
        if self.core.drag_id() == Some(self.node_id) {
            self.core.release_drag();
        }
    }

    fn taint_node(&mut self, node: NodeId) {
        self.core.taint(node);
    }

    fn relayout_node(&mut self, node: NodeId) {
        self.core.relayout(node);
    }

    fn add(&mut self, widget: Box<dyn Widget>) -> NodeId {
        self.core.create_detached_boxed(widget)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.core.attach(parent, child)
    }

    fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        self.core.attach_at(parent, index, child)
    }

    fn detach(&mut self, node: NodeId) -> Result<()> {
        self.core.detach(node)
    }

    fn remove(&mut self, node: NodeId) -> Result<()> {
        self.core.remove_subtree(node)
    }

    fn set_placement(&mut self, node: NodeId, placement: Placement) -> Result<()> {
        self.core.set_placement(node, placement)
    }

    fn with_layout_of(&mut self, node: NodeId, f: &mut dyn FnMut(&mut Layout)) -> Result<()> {
        self.core.with_layout_of(node, f)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> bool {
        self.core.set_hidden(node, hidden)
    }

    fn set_receive_events(&mut self, node: NodeId, receive: bool) -> Result<()> {
        self.core.set_receive_events(node, receive)
    }

    fn with_widget_mut(
        &mut self,
        node: NodeId,
        f: &mut dyn FnMut(&mut dyn Widget, &mut dyn Context) -> Result<()>,
    ) -> Result<()> {
        self.core.with_widget_mut(node, |widget, core| {
            let mut ctx = CoreContext::new(core, node);
            f(widget, &mut ctx)
        })?
    }

    fn scroll_thumb_to(&mut self, node: NodeId, axis: Axis, thumb_offset: f32) -> Result<()> {
        self.core.scroll_thumb_to(node, axis, thumb_offset)
    }

    fn open_overlay(&mut self, node: NodeId, at: Point) -> Result<()> {
        self.core.open_overlay(node, at)
    }

    fn close_overlays(&mut self) -> Result<()> {
        self.core.close_overlays()
    }
}

/// Read-only context bound to a node.
pub struct CoreViewContext<'a> {
    /// Core state reference.
    core: &'a Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreViewContext<'a> {
    /// Create a new read-only context for a node.
    pub fn new(core: &'a Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}
