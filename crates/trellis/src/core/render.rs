//! Keeping the render backend in step with the tree.
//!
//! A node is *rendering* while it is reachable from a rendering root with no
//! hidden node on the way. Rendering nodes whose widget has a style hold a
//! backend handle. Starting and stopping are recursive; [`sync`] pushes
//! geometry and style changes once per frame.

use tracing::debug;

use super::{context::CoreViewContext, id::NodeId, world::Core};
use crate::backend::Geometry;

/// Mark a subtree as rendering and acquire handles for styled nodes. Hidden
/// subtrees and subtrees that already render are skipped.
pub(crate) fn start_render(core: &mut Core, root: NodeId) {
    let mut stack = vec![root];
    let mut started = 0usize;
    while let Some(id) = stack.pop() {
        let Some(node) = core.nodes.get_mut(id) else {
            continue;
        };
        if node.hidden || node.rendering {
            continue;
        }
        node.rendering = true;
        node.tainted = true;
        started += 1;
        stack.extend(node.children.iter().rev().copied());
        refresh(core, id);
    }
    debug!(?root, started, "render started");
}

/// Release every handle in a subtree, children first, and clear the
/// rendering flags. Always visits the whole subtree, and stopping a subtree
/// that is not rendering does nothing.
pub(crate) fn stop_render(core: &mut Core, root: NodeId) {
    let mut stopped = 0usize;
    for id in core.subtree_post_order(root) {
        let Some(node) = core.nodes.get_mut(id) else {
            continue;
        };
        if let Some(handle) = node.handle.take() {
            core.backend.detach(handle);
        }
        if node.rendering {
            stopped += 1;
        }
        node.rendering = false;
        node.synced = None;
        node.style = None;
    }
    if stopped > 0 {
        debug!(?root, stopped, "render stopped");
    }
}

/// Push pending changes for every rendering node to the backend. Tainted
/// nodes are restyled; others are updated only if their geometry moved.
pub(crate) fn sync(core: &mut Core) {
    let mut stack = vec![core.root];
    while let Some(id) = stack.pop() {
        let Some(node) = core.nodes.get(id) else {
            continue;
        };
        if !node.rendering {
            continue;
        }
        stack.extend(node.children.iter().rev().copied());
        if node.tainted {
            refresh(core, id);
        } else {
            move_only(core, id);
        }
    }
}

/// Recompute a node's style and attach, update or detach its handle to
/// match. A node whose widget is checked out stays tainted for the next
/// sync.
fn refresh(core: &mut Core, id: NodeId) {
    let Some(widget) = core.nodes.get(id).and_then(|n| n.widget.as_deref()) else {
        return;
    };
    let style = widget.style(&CoreViewContext::new(core, id));
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let geometry = Geometry {
        bbox: node.bbox,
        clip: node.clip,
    };
    node.tainted = false;

    match (node.handle, style.as_ref()) {
        (None, Some(style)) => {
            node.handle = Some(core.backend.attach(geometry, style));
        }
        (Some(handle), Some(style)) => {
            if node.style.as_ref() != Some(style) || node.synced != Some(geometry) {
                core.backend.update(handle, geometry, style);
            }
        }
        (Some(handle), None) => {
            core.backend.detach(handle);
            node.handle = None;
        }
        (None, None) => {}
    }
    node.synced = Some(geometry);
    node.style = style;
}

/// Send new geometry for an untainted node if it moved.
fn move_only(core: &mut Core, id: NodeId) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let geometry = Geometry {
        bbox: node.bbox,
        clip: node.clip,
    };
    if node.synced == Some(geometry) {
        return;
    }
    if let (Some(handle), Some(style)) = (node.handle, node.style.as_ref()) {
        core.backend.update(handle, geometry, style);
    }
    node.synced = Some(geometry);
}
