use std::collections::{HashMap, HashSet, VecDeque};

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::{
    context::{Context, CoreContext, CoreViewContext},
    id::{NodeId, TypedId},
    node::Node,
    render,
    router::{Router, RouterState},
};
use crate::{
    backend::RenderBackend,
    error::{Error, Result},
    event::Event,
    geom::{Axis, BoundingBox, Expanse, Point},
    layout::{
        Arrangement, Child, Dock, Free, Grid, Layout, MeasureConstraints, Measurer, Placement,
        Scroll, Single, Slot, Stack, Strategy, Track,
    },
    resources::{ResourceLoader, Resources},
    style::Theme,
    widget::{EventOutcome, Widget},
    widgets::window::{ContentLayer, OverlayLayer, Window},
};

/// Upper bound on queued lifecycle events delivered by one flush. Handlers
/// that keep queueing events past this are cut off with a warning.
const MAX_PENDING_EVENTS: usize = 1024;

/// Core state for the arena, layout engine, input routing and rendering.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Window root.
    pub(crate) root: NodeId,
    /// Layer that hosts application content.
    pub(crate) content: NodeId,
    /// Free-placement layer for context menus, drawn over content.
    pub(crate) overlay: NodeId,
    /// Hover, focus and drag state.
    pub(crate) router: RouterState,
    /// Lifecycle events waiting for the current dispatch to finish.
    pub(crate) pending: VecDeque<(NodeId, Event)>,
    /// Render target.
    pub(crate) backend: Box<dyn RenderBackend>,
    /// Fonts, images and text measurement.
    pub(crate) resources: Resources,
    /// Widget palette.
    pub(crate) theme: Theme,
    /// Screen size used by the last layout pass.
    pub(crate) screen: Expanse,
    /// Set when anything that affects layout has changed.
    pub(crate) needs_layout: bool,
}

impl Core {
    /// Create a core with an empty window: a content layer and an overlay
    /// layer above it.
    pub fn new(backend: impl RenderBackend + 'static, loader: impl ResourceLoader + 'static) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(Box::new(Window)));
        let content = nodes.insert(Node::new(Box::new(ContentLayer)));
        let overlay = nodes.insert(Node::new(Box::new(OverlayLayer)));
        for child in [content, overlay] {
            if let Some(node) = nodes.get_mut(child) {
                node.parent = Some(root);
                node.mounted = true;
            }
        }
        if let Some(node) = nodes.get_mut(root) {
            node.children = vec![content, overlay];
            node.mounted = true;
        }
        Self {
            nodes,
            root,
            content,
            overlay,
            router: RouterState::default(),
            pending: VecDeque::new(),
            backend: Box::new(backend),
            resources: Resources::new(loader),
            theme: Theme::default(),
            screen: Expanse::zero(),
            needs_layout: true,
        }
    }

    /// Return the root node id.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Return the content layer id.
    pub fn content_id(&self) -> NodeId {
        self.content
    }

    /// Return the overlay layer id.
    pub fn overlay_id(&self) -> NodeId {
        self.overlay
    }

    /// Return a reference to a node by id.
    pub fn node(&self, node_id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(node_id.into())
    }

    /// Return the number of live nodes, the window layers included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the active theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Replace the theme and restyle every node.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        for node in self.nodes.values_mut() {
            node.tainted = true;
        }
        self.needs_layout = true;
    }

    /// Return the resource cache.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Return true if a layout pass is due.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Create a node in the arena detached from the tree.
    pub fn create_detached<W: Widget>(&mut self, widget: W) -> TypedId<W> {
        TypedId::new(self.create_detached_boxed(Box::new(widget)))
    }

    /// Create a node in the arena detached from the tree using a boxed widget.
    pub fn create_detached_boxed(&mut self, widget: Box<dyn Widget>) -> NodeId {
        let id = self.nodes.insert(Node::new(widget));
        trace!(?id, name = %self.nodes[id].name, "node created");
        id
    }

    /// Create a node and attach it as the last child of `parent`.
    pub fn add_child_to<W: Widget>(&mut self, parent: impl Into<NodeId>, widget: W) -> Result<TypedId<W>> {
        let child = self.create_detached(widget);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Create a node and attach it at a child index of `parent`.
    pub fn add_child_at<W: Widget>(
        &mut self,
        parent: impl Into<NodeId>,
        index: usize,
        widget: W,
    ) -> Result<TypedId<W>> {
        let child = self.create_detached(widget);
        self.attach_at(parent, index, child)?;
        Ok(child)
    }

    /// Attach a detached child as the last child of `parent`.
    pub fn attach(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<()> {
        self.attach_inner(parent.into(), child.into(), None)
    }

    /// Attach a detached child at `index` among `parent`'s children. Indices
    /// past the end append.
    pub fn attach_at(
        &mut self,
        parent: impl Into<NodeId>,
        index: usize,
        child: impl Into<NodeId>,
    ) -> Result<()> {
        self.attach_inner(parent.into(), child.into(), Some(index))
    }

    /// Link a child under a parent, mount it if the parent is reachable from
    /// the root, and start rendering it if the parent renders.
    fn attach_inner(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let Some(child_node) = self.nodes.get(child) else {
            return Err(Error::NodeNotFound(child));
        };
        if child_node.parent.is_some() || child == self.root {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            let index = index.unwrap_or(node.children.len()).min(node.children.len());
            node.children.insert(index, child);
        }
        self.needs_layout = true;

        if self.is_attached_to_root(parent) {
            self.mount_subtree_pre_order(child)?;
        }
        let parent_renders = self.nodes.get(parent).is_some_and(|n| n.rendering);
        if parent_renders && self.nodes.get(child).is_some_and(|n| n.parent == Some(parent)) {
            render::start_render(self, child);
        }
        Ok(())
    }

    /// Detach a child from its parent, keeping the subtree alive. Detaching
    /// an already detached node does nothing.
    pub fn detach(&mut self, child: impl Into<NodeId>) -> Result<()> {
        let child = child.into();
        let Some(node) = self.nodes.get(child) else {
            return Err(Error::NodeNotFound(child));
        };
        let Some(parent) = node.parent else {
            return Ok(());
        };
        if child == self.content || child == self.overlay {
            return Err(Error::InvalidOperation("cannot detach a window layer".into()));
        }
        render::stop_render(self, child);
        self.clear_layout(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.needs_layout = true;
        self.ensure_router_valid();
        Ok(())
    }

    /// Mount unmounted nodes in a subtree using pre-order traversal.
    fn mount_subtree_pre_order(&mut self, root: NodeId) -> Result<()> {
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(node_id) else {
                continue;
            };
            if !node.mounted {
                node.mounted = true;
                // A widget checked out for the current call mounts without its hook.
                if node.widget.is_none() {
                    stack.extend(node.children.iter().rev().copied());
                    continue;
                }
                self.with_widget_mut(node_id, |widget, core| {
                    let mut ctx = CoreContext::new(core, node_id);
                    widget.on_mount(&mut ctx)
                })??;
            }
            if let Some(node) = self.nodes.get(node_id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(())
    }

    /// Remove a node and all descendants from the arena. Unmount hooks run
    /// children first. Router roles held inside the subtree are released
    /// without callbacks.
    pub fn remove_subtree(&mut self, root_id: impl Into<NodeId>) -> Result<()> {
        let root_id = root_id.into();
        if root_id == self.root || root_id == self.content || root_id == self.overlay {
            return Err(Error::InvalidOperation("cannot remove a window layer".into()));
        }
        if !self.nodes.contains_key(root_id) {
            return Err(Error::NodeNotFound(root_id));
        }

        render::stop_render(self, root_id);

        for node_id in self.subtree_post_order(root_id) {
            let ready = self
                .nodes
                .get(node_id)
                .is_some_and(|n| n.mounted && n.widget.is_some());
            if ready {
                self.with_widget_mut(node_id, |widget, core| {
                    let mut ctx = CoreContext::new(core, node_id);
                    widget.on_unmount(&mut ctx);
                })?;
            }
        }

        let parent = self.nodes.get(root_id).and_then(|node| node.parent);
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.retain(|id| *id != root_id);
        }

        let doomed = self.subtree_post_order(root_id);
        debug!(?root_id, count = doomed.len(), "removing subtree");
        for node_id in doomed {
            self.nodes.remove(node_id);
        }

        self.needs_layout = true;
        self.ensure_router_valid();
        Ok(())
    }

    /// Collect a subtree in pre-order, including the root.
    pub(crate) fn subtree_pre_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Collect a subtree in post-order, including the root.
    pub(crate) fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Reset boxes and clips across a subtree that has left the layout.
    pub(crate) fn clear_layout(&mut self, root: NodeId) {
        for id in self.subtree_pre_order(root) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.bbox = BoundingBox::zero();
                node.clip = BoundingBox::zero();
            }
        }
    }

    /// Is `ancestor` a strict ancestor of `node`?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Does the node exist and reach the root through its parents?
    pub fn is_attached_to_root(&self, node_id: impl Into<NodeId>) -> bool {
        let node_id = node_id.into();
        (node_id == self.root && self.nodes.contains_key(node_id))
            || self.is_ancestor(self.root, node_id)
    }

    /// Is the node reachable from the root with no hidden node on the way?
    pub fn is_reachable(&self, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if node.hidden {
                return false;
            }
            if id == self.root {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Is the node inside the overlay layer?
    pub fn is_in_overlay(&self, node_id: NodeId) -> bool {
        self.is_ancestor(self.overlay, node_id)
    }

    /// Set a node's placement hint.
    pub fn set_placement(&mut self, node_id: impl Into<NodeId>, placement: Placement) -> Result<()> {
        let node_id = node_id.into();
        let node = self.nodes.get_mut(node_id).ok_or(Error::NodeNotFound(node_id))?;
        node.placement = placement;
        self.needs_layout = true;
        Ok(())
    }

    /// Update the layout configuration for a node.
    pub fn with_layout_of(
        &mut self,
        node_id: impl Into<NodeId>,
        f: impl FnOnce(&mut Layout),
    ) -> Result<()> {
        let node_id = node_id.into();
        let node = self.nodes.get_mut(node_id).ok_or(Error::NodeNotFound(node_id))?;
        f(&mut node.layout);
        self.needs_layout = true;
        Ok(())
    }

    /// Set a node's hidden flag. Returns `true` if visibility changed.
    /// Hiding stops rendering the subtree; showing resumes it if the parent
    /// renders.
    pub fn set_hidden(&mut self, node_id: impl Into<NodeId>, hidden: bool) -> bool {
        let node_id = node_id.into();
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        if node.hidden == hidden {
            return false;
        }
        node.hidden = hidden;
        let parent = node.parent;
        self.needs_layout = true;
        if hidden {
            render::stop_render(self, node_id);
            self.clear_layout(node_id);
            self.ensure_router_valid();
        } else if parent.and_then(|p| self.nodes.get(p)).is_some_and(|p| p.rendering) {
            render::start_render(self, node_id);
        }
        true
    }

    /// Allow or prevent hit-testing from selecting a node.
    pub fn set_receive_events(&mut self, node_id: impl Into<NodeId>, receive: bool) -> Result<()> {
        let node_id = node_id.into();
        let node = self.nodes.get_mut(node_id).ok_or(Error::NodeNotFound(node_id))?;
        node.receive_events = receive;
        Ok(())
    }

    /// Mark a node's visual state as changed. Its style is recomputed at the
    /// next sync. Layout is left alone; use [`Core::relayout`] when the
    /// node's size may change.
    pub fn taint(&mut self, node_id: impl Into<NodeId>) {
        if let Some(node) = self.nodes.get_mut(node_id.into()) {
            node.tainted = true;
        }
    }

    /// Mark a node's content as changed. Its style is recomputed and layout
    /// reruns before the next sync.
    pub fn relayout(&mut self, node_id: impl Into<NodeId>) {
        if let Some(node) = self.nodes.get_mut(node_id.into()) {
            node.tainted = true;
            self.needs_layout = true;
        }
    }

    /// Check a widget out of its slot for a single call. The widget is put
    /// back afterwards unless its node was removed during the call.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let node = self.nodes.get_mut(node_id).ok_or(Error::NodeNotFound(node_id))?;
        let mut widget = node
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
        let out = f(widget.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.widget = Some(widget);
        }
        Ok(out)
    }

    /// Run a closure against a widget of a known type with a context bound
    /// to its node.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        node_id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R> {
        let node_id = node_id.into();
        self.with_widget_mut(node_id, |widget, core| {
            let widget = widget.downcast_mut::<W>().ok_or_else(|| {
                Error::Invalid(format!("unexpected widget type at {node_id:?}"))
            })?;
            let mut ctx = CoreContext::new(core, node_id);
            f(widget, &mut ctx)
        })?
    }

    /// Read a widget of a known type.
    pub fn widget<W: Widget>(&self, node_id: impl Into<NodeId>) -> Option<&W> {
        self.nodes
            .get(node_id.into())
            .and_then(|n| n.widget.as_deref())
            .and_then(|w| w.downcast_ref::<W>())
    }

    /// Dispatch an event to a node, bubbling to parents while unhandled.
    pub fn dispatch_event(&mut self, start: impl Into<NodeId>, event: &Event) -> Result<EventOutcome> {
        let mut target = Some(start.into());
        while let Some(id) = target {
            if !self.nodes.contains_key(id) {
                break;
            }
            let outcome = self.dispatch_event_on_node(id, event)?;
            match outcome {
                EventOutcome::Handle | EventOutcome::Consume => return Ok(outcome),
                EventOutcome::Ignore => {
                    target = self.nodes.get(id).and_then(|n| n.parent);
                }
            }
        }
        Ok(EventOutcome::Ignore)
    }

    /// Dispatch an event to a single node without bubbling.
    pub fn dispatch_event_on_node(
        &mut self,
        node_id: impl Into<NodeId>,
        event: &Event,
    ) -> Result<EventOutcome> {
        let node_id = node_id.into();
        trace!(?node_id, ?event, "dispatch");
        self.with_widget_mut(node_id, |w, core| {
            let mut ctx = CoreContext::new(core, node_id);
            w.on_event(event, &mut ctx)
        })?
    }

    /// Queue an event for delivery after the current dispatch finishes.
    pub(crate) fn queue_event(&mut self, node_id: NodeId, event: Event) {
        self.pending.push_back((node_id, event));
    }

    /// Deliver queued events in order, skipping nodes that no longer exist.
    pub fn flush_pending(&mut self) -> Result<()> {
        let mut delivered = 0;
        while let Some((node_id, event)) = self.pending.pop_front() {
            if delivered == MAX_PENDING_EVENTS {
                warn!(dropped = self.pending.len() + 1, "pending event limit reached");
                self.pending.clear();
                break;
            }
            delivered += 1;
            if self.nodes.contains_key(node_id) {
                self.dispatch_event_on_node(node_id, &event)?;
            }
        }
        Ok(())
    }

    /// Run a full layout pass for a screen size.
    pub fn update_layout(&mut self, screen: Expanse) {
        self.screen = screen;
        let root = self.root;
        let mut pass = LayoutPass::new(self);
        let size = pass.measure_node(root, MeasureConstraints::exact(screen));
        let bbox = BoundingBox::new(0.0, 0.0, size.w, size.h);
        pass.arrange_node(root, bbox, bbox);
        self.needs_layout = false;
    }

    /// Locate the deepest event-receiving node under a point, searching
    /// front to back from the root.
    pub fn locate(&self, point: Point) -> Option<NodeId> {
        self.locate_from(self.root, point)
    }

    /// Locate the deepest event-receiving node under a point within a
    /// subtree. Detached subtrees never produce a hit.
    pub fn locate_from(&self, start: NodeId, point: Point) -> Option<NodeId> {
        if !self.is_attached_to_root(start) {
            return None;
        }
        locate_recursive(self, start, point)
    }

    /// Move a scroll container's thumb on one axis.
    pub fn scroll_thumb_to(&mut self, node_id: NodeId, axis: Axis, thumb_offset: f32) -> Result<()> {
        let node = self.nodes.get_mut(node_id).ok_or(Error::NodeNotFound(node_id))?;
        node.scroll.axis_mut(axis).set_thumb_offset(thumb_offset);
        self.needs_layout = true;
        Ok(())
    }

    /// Show a detached node in the overlay layer at a screen position. The
    /// overlay clamps it inside the window.
    pub fn open_overlay(&mut self, node_id: NodeId, at: Point) -> Result<()> {
        let node = self.nodes.get(node_id).ok_or(Error::NodeNotFound(node_id))?;
        if node.parent.is_some() {
            return Err(Error::AlreadyAttached(node_id));
        }
        let origin = self.nodes.get(self.overlay).map_or(Point::zero(), |n| n.bbox.origin());
        self.set_placement(node_id, Placement::At(at - origin))?;
        self.attach(self.overlay, node_id)?;
        debug!(?node_id, x = at.x, y = at.y, "overlay opened");
        Ok(())
    }

    /// Detach every node in the overlay layer. Owners keep their nodes
    /// alive and may reopen them.
    pub fn close_overlays(&mut self) -> Result<()> {
        let open = self
            .nodes
            .get(self.overlay)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for node_id in open {
            self.detach(node_id)?;
        }
        Ok(())
    }

    /// Are any overlays open?
    pub fn has_overlays(&self) -> bool {
        self.nodes.get(self.overlay).is_some_and(|n| !n.children.is_empty())
    }

    /// Push geometry and style changes to the backend.
    pub fn sync_render(&mut self) {
        render::sync(self);
    }
}

/// Cache key for per-pass measurements. Constraints are keyed by their bit
/// patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MeasureKey {
    /// Node being measured.
    node: NodeId,
    /// Width bound.
    width: Option<u32>,
    /// Height bound.
    height: Option<u32>,
}

impl MeasureKey {
    /// Build a key for a node and constraint.
    fn new(node: NodeId, c: MeasureConstraints) -> Self {
        Self {
            node,
            width: c.width.map(f32::to_bits),
            height: c.height.map(f32::to_bits),
        }
    }
}

/// Layout traversal with per-pass measurement caching.
struct LayoutPass<'a> {
    /// Core state being updated.
    core: &'a mut Core,
    /// Cached measurements for this pass.
    cache: HashMap<MeasureKey, Expanse>,
}

impl<'a> LayoutPass<'a> {
    /// Create a new layout pass with a fresh measurement cache.
    fn new(core: &'a mut Core) -> Self {
        Self {
            core,
            cache: HashMap::new(),
        }
    }

    /// Visible children with their placements.
    fn visible_children(&self, node_id: NodeId) -> Vec<Child> {
        let Some(node) = self.core.nodes.get(node_id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|id| {
                let child = self.core.nodes.get(*id)?;
                (!child.hidden).then_some(Child {
                    id: *id,
                    placement: child.placement,
                })
            })
            .collect()
    }

    /// The strategy for a node's arrangement.
    fn strategy(&self, node_id: NodeId, layout: Layout) -> Box<dyn Strategy> {
        let padding = layout.padding;
        match layout.arrangement {
            Arrangement::Single => Box::new(Single { padding }),
            Arrangement::Stack(axis) => Box::new(Stack { axis, padding }),
            Arrangement::Dock => Box::new(Dock { padding }),
            Arrangement::Grid { rows, columns } => Box::new(Grid {
                rows,
                columns,
                padding,
            }),
            Arrangement::Free => Box::new(Free { padding }),
            Arrangement::Scroll {
                vertical,
                horizontal,
            } => Box::new(Scroll {
                vertical,
                horizontal,
                state: self.core.nodes.get(node_id).map(|n| n.scroll).unwrap_or_default(),
            }),
            Arrangement::Track(axis) => {
                let state = self
                    .core
                    .nodes
                    .get(node_id)
                    .and_then(|n| n.parent)
                    .and_then(|p| self.core.nodes.get(p))
                    .map(|p| *p.scroll.axis(axis))
                    .unwrap_or_default();
                Box::new(Track { axis, state })
            }
        }
    }

    /// Measure a node, consulting the pass cache.
    fn measure_node(&mut self, node_id: NodeId, c: MeasureConstraints) -> Expanse {
        let key = MeasureKey::new(node_id, c);
        if let Some(size) = self.cache.get(&key) {
            return *size;
        }
        let Some(node) = self.core.nodes.get(node_id) else {
            return Expanse::zero();
        };
        if node.hidden {
            return Expanse::zero();
        }
        let layout = node.layout;
        let bounds = layout.content_bounds(c);
        let children = self.visible_children(node_id);
        let content = if children.is_empty() {
            let inner = bounds.shrink(layout.padding);
            let ctx = CoreViewContext::new(self.core, node_id);
            node.widget
                .as_deref()
                .map_or(Expanse::zero(), |w| w.measure(inner, &ctx))
                .pad(layout.padding)
        } else {
            let strategy = self.strategy(node_id, layout);
            strategy.measure(&children, bounds, self)
        };
        let size = layout.resolve(c, content);
        self.cache.insert(key, size);
        size
    }

    /// Place a node and arrange its children inside it.
    fn arrange_node(&mut self, node_id: NodeId, bbox: BoundingBox, clip: BoundingBox) {
        let Some(node) = self.core.nodes.get_mut(node_id) else {
            return;
        };
        node.bbox = bbox;
        node.clip = clip;
        let layout = node.layout;
        let all_children = node.children.clone();

        let children = self.visible_children(node_id);
        let slots = self.arrange_children(node_id, layout, bbox, &children);
        let child_clip = clip.intersect(&bbox);
        let mut placed = HashSet::with_capacity(slots.len());
        for slot in slots {
            placed.insert(slot.id);
            let clip = slot
                .clip
                .map_or(child_clip, |extra| child_clip.intersect(&extra));
            self.arrange_node(slot.id, slot.bbox, clip);
        }
        for child in all_children {
            if !placed.contains(&child) {
                self.core.clear_layout(child);
            }
        }
    }

    /// Run the node's strategy, storing scroll state back on the node.
    fn arrange_children(
        &mut self,
        node_id: NodeId,
        layout: Layout,
        bbox: BoundingBox,
        children: &[Child],
    ) -> Vec<Slot> {
        if children.is_empty() {
            return Vec::new();
        }
        if let Arrangement::Scroll {
            vertical,
            horizontal,
        } = layout.arrangement
        {
            let mut scroll = Scroll {
                vertical,
                horizontal,
                state: self.core.nodes.get(node_id).map(|n| n.scroll).unwrap_or_default(),
            };
            let slots = scroll.arrange(bbox, children, self);
            if let Some(node) = self.core.nodes.get_mut(node_id) {
                node.scroll = scroll.state;
            }
            return slots;
        }
        let mut strategy = self.strategy(node_id, layout);
        strategy.arrange(bbox, children, self)
    }

}

impl Measurer for LayoutPass<'_> {
    fn measure(&mut self, node: NodeId, c: MeasureConstraints) -> Expanse {
        self.measure_node(node, c)
    }
}

/// Depth-first search for the front-most event-receiving node under a
/// point. Children are searched last to first, since later children draw
/// over earlier ones.
fn locate_recursive(core: &Core, node_id: NodeId, point: Point) -> Option<NodeId> {
    let node = core.nodes.get(node_id)?;
    if node.hidden || !node.visible().contains_point(point) {
        return None;
    }
    node.children
        .iter()
        .rev()
        .find_map(|child| locate_recursive(core, *child, point))
        .or_else(|| node.receive_events.then_some(node_id))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{backend::NullBackend, resources::MonospaceLoader, widgets::Frame};

    /// Records mount and unmount hooks into a shared log.
    struct Tracer {
        /// Name written to the log.
        name: &'static str,
        /// Shared hook log.
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Widget for Tracer {
        fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
            self.log.lock().unwrap().push(format!("mount {}", self.name));
            Ok(())
        }

        fn on_unmount(&mut self, _ctx: &mut dyn Context) {
            self.log.lock().unwrap().push(format!("unmount {}", self.name));
        }
    }

    fn core() -> Core {
        Core::new(NullBackend::default(), MonospaceLoader)
    }

    #[test]
    fn attach_rejects_cycles_and_double_attach() {
        let mut core = core();
        let a = core.create_detached(Frame::new());
        let b = core.create_detached(Frame::new());
        core.attach(a, b).unwrap();

        assert!(matches!(core.attach(b, a), Err(Error::WouldCreateCycle { .. })));
        assert!(matches!(core.attach(a, a), Err(Error::WouldCreateCycle { .. })));
        let c = core.create_detached(Frame::new());
        assert!(matches!(core.attach(c, b), Err(Error::AlreadyAttached(_))));
        let root = core.root_id();
        assert!(matches!(core.attach(a, root), Err(Error::AlreadyAttached(_))));

        core.detach(b).unwrap();
        core.detach(b).unwrap();
        core.attach(c, b).unwrap();
        assert_eq!(core.node(b).unwrap().parent(), Some(c.into()));
    }

    #[test]
    fn mount_waits_for_the_root() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut core = core();
        let outer = core.create_detached(Tracer { name: "outer", log: log.clone() });
        core.add_child_to(outer, Tracer { name: "inner", log: log.clone() })
            .unwrap();
        assert!(log.lock().unwrap().is_empty());

        let content = core.content_id();
        core.attach(content, outer).unwrap();
        assert_eq!(*log.lock().unwrap(), ["mount outer", "mount inner"]);

        core.detach(outer).unwrap();
        core.attach(content, outer).unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn remove_subtree_unmounts_children_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut core = core();
        let content = core.content_id();
        let outer = core
            .add_child_to(content, Tracer { name: "outer", log: log.clone() })
            .unwrap();
        let inner = core
            .add_child_to(outer, Tracer { name: "inner", log: log.clone() })
            .unwrap();
        log.lock().unwrap().clear();

        core.remove_subtree(outer).unwrap();
        assert_eq!(*log.lock().unwrap(), ["unmount inner", "unmount outer"]);
        assert!(core.node(inner).is_none());
        assert!(core.node(content).unwrap().children().is_empty());
    }

    #[test]
    fn window_layers_cannot_be_removed() {
        let mut core = core();
        for layer in [core.root_id(), core.content_id(), core.overlay_id()] {
            assert!(matches!(core.remove_subtree(layer), Err(Error::InvalidOperation(_))));
        }
        let content = core.content_id();
        assert!(core.detach(content).is_err());
    }

    #[test]
    fn locate_prefers_later_children() {
        let mut core = core();
        let content = core.content_id();
        let back = core.add_child_to(content, Frame::new().fixed(100.0, 100.0)).unwrap();
        let front = core.add_child_to(content, Frame::new().fixed(50.0, 50.0)).unwrap();
        let glass = core
            .add_child_to(content, Frame::new().fixed(100.0, 100.0).passive())
            .unwrap();
        core.update_layout(Expanse::new(200.0, 200.0));

        assert_eq!(core.locate(Point::new(10.0, 10.0)), Some(front.into()));
        assert_eq!(core.locate(Point::new(80.0, 80.0)), Some(back.into()));
        assert_eq!(core.locate(Point::new(150.0, 150.0)), None);
        assert_eq!(core.node(glass).unwrap().bbox().size(), Expanse::new(100.0, 100.0));
    }

    #[test]
    fn detached_and_hidden_nodes_never_hit() {
        let mut core = core();
        let content = core.content_id();
        let frame = core.add_child_to(content, Frame::new().fixed(100.0, 100.0)).unwrap();
        core.update_layout(Expanse::new(200.0, 200.0));

        core.set_hidden(frame, true);
        core.update_layout(Expanse::new(200.0, 200.0));
        assert_eq!(core.locate(Point::new(10.0, 10.0)), None);
        assert_eq!(core.node(frame).unwrap().bbox(), BoundingBox::zero());

        core.set_hidden(frame, false);
        core.detach(frame).unwrap();
        assert_eq!(core.locate_from(frame.into(), Point::new(10.0, 10.0)), None);
    }
}
