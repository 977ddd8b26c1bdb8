//! Pointer and keyboard routing.
//!
//! The host has no per-widget input events. Instead the pointer is sampled
//! once per frame and hit-tested against the tree, and press, release and
//! key input is routed to whichever node owns it: the press target, the
//! drag holder or the focus holder.

use std::{mem, time::Duration};

use tracing::{debug, trace};

use super::{id::NodeId, world::Core};
use crate::{
    error::Result,
    event::{Button, Event, key::Key},
    geom::Point,
};

/// Hover, focus and drag ownership. Each role is held by at most one node,
/// and the roles are independent of each other.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RouterState {
    /// Front-most node under the cursor.
    pub(crate) hover: Option<NodeId>,
    /// Node receiving keyboard input.
    pub(crate) focus: Option<NodeId>,
    /// Node receiving all pointer motion until release.
    pub(crate) drag: Option<NodeId>,
    /// Node that received the last press.
    pub(crate) press_target: Option<NodeId>,
    /// Latest pointer position.
    pub(crate) cursor: Point,
    /// Position at the last hit-test. `None` forces the next sample to
    /// hit-test again.
    pub(crate) sampled: Option<Point>,
}

/// Input routing over the node tree.
pub trait Router {
    /// The hover holder.
    fn hover_id(&self) -> Option<NodeId>;

    /// The focus holder.
    fn focus_id(&self) -> Option<NodeId>;

    /// The drag holder.
    fn drag_id(&self) -> Option<NodeId>;

    /// The latest pointer position.
    fn cursor(&self) -> Point;

    /// Move focus. The previous holder gets `FocusLost` and the new one
    /// `FocusGained`. Returns `true` if the holder changed.
    fn set_focus(&mut self, node: Option<NodeId>) -> bool;

    /// Make a node the drag holder. Returns `true` if the holder changed.
    fn capture_drag(&mut self, node: NodeId) -> bool;

    /// End the current drag, notifying the holder with `DragStopped`.
    fn release_drag(&mut self);

    /// Clear role holders that are gone from the tree. Removed nodes are
    /// dropped silently. Nodes that still exist but are detached or hidden
    /// get their release callback.
    fn ensure_router_valid(&mut self);

    /// Force the next pointer sample to hit-test.
    fn invalidate_cursor(&mut self);

    /// Sample the pointer. Motion goes to the drag holder while there is
    /// one, otherwise it updates the hover holder.
    fn pointer_moved(&mut self, point: Point) -> Result<()>;

    /// Route a button press to the node under the cursor.
    fn press(&mut self, button: Button) -> Result<()>;

    /// Route a button release to the gesture owner.
    fn release(&mut self, button: Button) -> Result<()>;

    /// Route a key to the focus holder.
    fn key(&mut self, key: Key) -> Result<()>;

    /// Deliver a frame tick to the focus holder.
    fn tick(&mut self, elapsed: Duration) -> Result<()>;
}

/// The nearest ancestor-or-self of `node` whose widget accepts focus.
fn focus_target(core: &Core, node: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        let n = core.nodes.get(id)?;
        if n.widget.as_deref().is_some_and(|w| w.accept_focus()) {
            return Some(id);
        }
        current = n.parent;
    }
    None
}

/// Check one role holder, returning it if it may keep the role. A holder
/// that was removed is dropped without a callback. One that is detached or
/// hidden gets `release` queued.
fn validate_holder(
    core: &mut Core,
    role: &str,
    holder: Option<NodeId>,
    release: Option<Event>,
) -> Option<NodeId> {
    let id = holder?;
    if !core.nodes.contains_key(id) {
        debug!(?id, role, "holder removed, releasing");
        return None;
    }
    if !core.is_reachable(id) {
        debug!(?id, role, "holder unreachable, releasing");
        if let Some(event) = release {
            core.queue_event(id, event);
        }
        return None;
    }
    Some(id)
}

/// Deliver an event to a node if it still exists.
fn deliver(core: &mut Core, node: NodeId, event: &Event) -> Result<()> {
    if core.nodes.contains_key(node) {
        core.dispatch_event_on_node(node, event)?;
    }
    Ok(())
}

impl Router for Core {
    fn hover_id(&self) -> Option<NodeId> {
        self.router.hover
    }

    fn focus_id(&self) -> Option<NodeId> {
        self.router.focus
    }

    fn drag_id(&self) -> Option<NodeId> {
        self.router.drag
    }

    fn cursor(&self) -> Point {
        self.router.cursor
    }

    fn set_focus(&mut self, node: Option<NodeId>) -> bool {
        let node = node.filter(|id| self.is_reachable(*id));
        if self.router.focus == node {
            return false;
        }
        let previous = mem::replace(&mut self.router.focus, node);
        debug!(?previous, next = ?node, "focus changed");
        if let Some(previous) = previous {
            self.taint(previous);
            self.queue_event(previous, Event::FocusLost);
        }
        if let Some(next) = node {
            self.taint(next);
            self.queue_event(next, Event::FocusGained);
        }
        true
    }

    fn capture_drag(&mut self, node: NodeId) -> bool {
        if self.router.drag == Some(node) || !self.nodes.contains_key(node) {
            return false;
        }
        if let Some(previous) = self.router.drag.replace(node) {
            self.queue_event(previous, Event::DragStopped);
        }
        debug!(?node, "drag captured");
        true
    }

    fn release_drag(&mut self) {
        if let Some(previous) = self.router.drag.take() {
            debug!(?previous, "drag released");
            self.queue_event(previous, Event::DragStopped);
        }
    }

    fn ensure_router_valid(&mut self) {
        let (hover, focus, drag, press) = (
            self.router.hover,
            self.router.focus,
            self.router.drag,
            self.router.press_target,
        );
        self.router.hover = validate_holder(self, "hover", hover, Some(Event::CursorExit));
        self.router.focus = validate_holder(self, "focus", focus, Some(Event::FocusLost));
        self.router.drag = validate_holder(self, "drag", drag, Some(Event::DragStopped));
        self.router.press_target = validate_holder(self, "press", press, None);
    }

    fn invalidate_cursor(&mut self) {
        self.router.sampled = None;
    }

    fn pointer_moved(&mut self, point: Point) -> Result<()> {
        self.router.cursor = point;
        if self.router.sampled == Some(point) {
            return Ok(());
        }
        self.router.sampled = Some(point);
        self.ensure_router_valid();

        if let Some(holder) = self.router.drag {
            deliver(self, holder, &Event::Drag(point))?;
            return self.flush_pending();
        }

        let hit = self.locate(point);
        if hit != self.router.hover {
            let previous = mem::replace(&mut self.router.hover, hit);
            trace!(?previous, next = ?hit, "hover changed");
            if let Some(previous) = previous {
                self.taint(previous);
                deliver(self, previous, &Event::CursorExit)?;
            }
            if let Some(next) = hit {
                self.taint(next);
                deliver(self, next, &Event::CursorEnter)?;
            }
        }
        self.flush_pending()
    }

    fn press(&mut self, button: Button) -> Result<()> {
        self.ensure_router_valid();
        let target = self.locate(self.router.cursor);

        if self.has_overlays() && !target.is_some_and(|t| self.is_in_overlay(t)) {
            self.close_overlays()?;
        }
        let target = target.filter(|t| self.is_reachable(*t));

        if button == Button::Left {
            let focus = target.and_then(|t| focus_target(self, t));
            self.set_focus(focus);
            self.flush_pending()?;
        }

        self.router.press_target = target;
        if let Some(target) = target
            && self.nodes.contains_key(target)
        {
            self.dispatch_event(target, &Event::Press(button))?;
        }
        self.invalidate_cursor();
        self.flush_pending()
    }

    fn release(&mut self, button: Button) -> Result<()> {
        self.ensure_router_valid();
        let target = self.router.press_target.take();
        if let Some(holder) = self.router.drag.take() {
            debug!(?holder, "drag stopped");
            deliver(self, holder, &Event::DragStopped)?;
        } else if let Some(target) = target
            && self.nodes.contains_key(target)
        {
            self.dispatch_event(target, &Event::Release(button))?;
        }
        self.invalidate_cursor();
        self.flush_pending()
    }

    fn key(&mut self, key: Key) -> Result<()> {
        self.ensure_router_valid();
        if let Some(focus) = self.router.focus {
            deliver(self, focus, &Event::Key(key))?;
        }
        self.flush_pending()
    }

    fn tick(&mut self, elapsed: Duration) -> Result<()> {
        self.ensure_router_valid();
        if let Some(focus) = self.router.focus {
            deliver(self, focus, &Event::Tick(elapsed))?;
        }
        self.flush_pending()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        Context,
        layout::Layout,
        testing::Harness,
        widget::{EventOutcome, Widget},
        widgets::Container,
    };

    /// Shared log of `name event` lines.
    type Log = Arc<Mutex<Vec<String>>>;

    /// A fixed-size box that logs the events it receives.
    struct Tracer {
        /// Name written to the log.
        name: &'static str,
        /// Shared log.
        log: Log,
        /// Take focus when pressed.
        focus: bool,
        /// Capture the drag when pressed.
        drag: bool,
    }

    impl Tracer {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
                focus: false,
                drag: false,
            }
        }
    }

    impl Widget for Tracer {
        fn layout(&self) -> Layout {
            Layout::single().fixed(50.0, 50.0)
        }

        fn accept_focus(&self) -> bool {
            self.focus
        }

        fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
            let label = match event {
                Event::CursorEnter => "enter",
                Event::CursorExit => "exit",
                Event::Press(_) => "press",
                Event::Release(_) => "release",
                Event::Drag(_) => "drag",
                Event::DragStopped => "drag-stopped",
                Event::Key(_) => "key",
                Event::FocusGained => "focus",
                Event::FocusLost => "blur",
                Event::Tick(_) => return Ok(EventOutcome::Ignore),
            };
            self.log.lock().unwrap().push(format!("{} {label}", self.name));
            if matches!(event, Event::Press(_)) && self.drag {
                ctx.capture_drag();
            }
            Ok(EventOutcome::Handle)
        }
    }

    /// Two tracers side by side: `a` at x 0..50 and `b` at x 50..100.
    fn pair(a: Tracer, b: Tracer) -> (Harness, NodeId, NodeId) {
        let mut h = Harness::new();
        let row = h.add(Container::row()).unwrap();
        let a = h.core_mut().add_child_to(row, a).unwrap().id();
        let b = h.core_mut().add_child_to(row, b).unwrap().id();
        h.frame().unwrap();
        (h, a, b)
    }

    fn take(log: &Log) -> Vec<String> {
        mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn hover_exit_fires_before_enter() {
        let log = Log::default();
        let (mut h, a, b) = pair(Tracer::new("a", &log), Tracer::new("b", &log));
        h.move_to(10.0, 10.0).unwrap();
        h.move_to(60.0, 10.0).unwrap();
        h.move_to(200.0, 200.0).unwrap();
        assert_eq!(take(&log), ["a enter", "a exit", "b enter", "b exit"]);
        assert_eq!(h.core().hover_id(), None);
        assert_ne!(a, b);
    }

    #[test]
    fn drag_holder_gets_motion_without_hit_testing() {
        let log = Log::default();
        let mut a = Tracer::new("a", &log);
        a.drag = true;
        let (mut h, a, _) = pair(a, Tracer::new("b", &log));
        h.move_to(10.0, 10.0).unwrap();
        h.press(Button::Left).unwrap();
        assert_eq!(h.core().drag_id(), Some(a));
        h.move_to(80.0, 10.0).unwrap();
        h.release(Button::Left).unwrap();
        assert_eq!(
            take(&log),
            ["a enter", "a press", "a drag", "a drag-stopped"]
        );
        assert_eq!(h.core().drag_id(), None);
    }

    #[test]
    fn removed_drag_holder_is_cleared_silently() {
        let log = Log::default();
        let mut a = Tracer::new("a", &log);
        a.drag = true;
        let (mut h, a, _) = pair(a, Tracer::new("b", &log));
        h.move_to(10.0, 10.0).unwrap();
        h.press(Button::Left).unwrap();
        take(&log);

        h.core_mut().remove_subtree(a).unwrap();
        assert_eq!(h.core().drag_id(), None);
        h.release(Button::Left).unwrap();
        h.frame().unwrap();
        assert!(take(&log).is_empty());
    }

    #[test]
    fn detached_drag_holder_is_released() {
        let log = Log::default();
        let mut a = Tracer::new("a", &log);
        a.drag = true;
        let (mut h, a, _) = pair(a, Tracer::new("b", &log));
        h.move_to(10.0, 10.0).unwrap();
        h.press(Button::Left).unwrap();
        take(&log);

        h.core_mut().detach(a).unwrap();
        h.core_mut().flush_pending().unwrap();
        assert_eq!(h.core().drag_id(), None);
        assert_eq!(take(&log), ["a exit", "a drag-stopped"]);
    }

    #[test]
    fn press_moves_focus_and_keys_follow_it() {
        let log = Log::default();
        let mut a = Tracer::new("a", &log);
        a.focus = true;
        let (mut h, a, _) = pair(a, Tracer::new("b", &log));
        h.click(10.0, 10.0).unwrap();
        assert_eq!(h.core().focus_id(), Some(a));
        h.move_to(60.0, 10.0).unwrap();
        h.key('x').unwrap();
        h.click(60.0, 10.0).unwrap();
        assert_eq!(h.core().focus_id(), None);
        assert_eq!(
            take(&log),
            [
                "a enter", "a focus", "a press", "a release", "a exit", "b enter", "a key",
                "a blur", "b press", "b release",
            ]
        );
    }
}
