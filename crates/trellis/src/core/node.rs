use crate::{
    backend::{Geometry, Handle},
    core::id::NodeId,
    geom::BoundingBox,
    layout::{Layout, Placement, ScrollState},
    state::NodeName,
    style::Style,
    widget::Widget,
};

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state. Empty while the widget is checked out for
    /// a call.
    pub(crate) widget: Option<Box<dyn Widget>>,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, back to front.
    pub(crate) children: Vec<NodeId>,

    /// Layout configuration, seeded from the widget at creation.
    pub(crate) layout: Layout,
    /// Placement hint read by the parent's arrangement.
    pub(crate) placement: Placement,

    /// Screen-space bounding box from the last layout pass.
    pub(crate) bbox: BoundingBox,
    /// Intersection of all ancestor boxes from the last layout pass.
    pub(crate) clip: BoundingBox,
    /// Scroll state, used by scroll containers.
    pub(crate) scroll: ScrollState,

    /// Whether hit-testing may select this node.
    pub(crate) receive_events: bool,
    /// Hidden nodes are skipped by layout, hit-testing and rendering.
    pub(crate) hidden: bool,
    /// Whether this node is attached to the render backend.
    pub(crate) rendering: bool,
    /// Backend handle while rendering, if the widget draws anything.
    pub(crate) handle: Option<Handle>,
    /// Geometry last sent to the backend.
    pub(crate) synced: Option<Geometry>,
    /// Style last sent to the backend.
    pub(crate) style: Option<Style>,
    /// The widget's visual state changed since the last sync.
    pub(crate) tainted: bool,

    /// Node name for dumps and logs.
    pub(crate) name: NodeName,
    /// Whether the widget mount hook has run.
    pub(crate) mounted: bool,
}

impl Node {
    /// Wrap a widget in a fresh, unattached node.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        Self {
            name: widget.name(),
            layout: widget.layout(),
            receive_events: widget.receive_events(),
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            placement: Placement::Flow,
            bbox: BoundingBox::zero(),
            clip: BoundingBox::zero(),
            scroll: ScrollState::default(),
            hidden: false,
            rendering: false,
            handle: None,
            synced: None,
            style: None,
            tainted: true,
            mounted: false,
        }
    }

    /// Return the node's widget name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the cached layout configuration.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Return the placement hint.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Return the screen-space bounding box.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Return the clip region.
    pub fn clip(&self) -> BoundingBox {
        self.clip
    }

    /// Return the visible part of the node: its box intersected with its
    /// clip.
    pub fn visible(&self) -> BoundingBox {
        self.bbox.intersect(&self.clip)
    }

    /// Return the scroll state.
    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    /// Return true if hit-testing may select this node.
    pub fn receive_events(&self) -> bool {
        self.receive_events
    }

    /// Return true if the node is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Return true if the node is attached to the render backend.
    pub fn rendering(&self) -> bool {
        self.rendering
    }

    /// Return the backend handle, if any.
    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    /// Return true if the widget mount hook has run.
    pub fn mounted(&self) -> bool {
        self.mounted
    }
}
