//! Events delivered to widgets.

use std::time::Duration;

use crate::geom::Point;

/// Keyboard input.
pub mod key;

pub use key::{Key, KeyCode, Mods};

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// An event routed to a single widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The pointer moved onto this node.
    CursorEnter,
    /// The pointer left this node.
    CursorExit,
    /// A pointer button went down over this node.
    Press(Button),
    /// A pointer button came up after being pressed over this node.
    Release(Button),
    /// The pointer moved while this node holds the drag. Carries the cursor
    /// position in screen space.
    Drag(Point),
    /// This node lost the drag.
    DragStopped,
    /// A key was pressed while this node holds focus.
    Key(Key),
    /// This node became the focus holder.
    FocusGained,
    /// This node stopped being the focus holder.
    FocusLost,
    /// Frame time advanced. Only the focus holder receives ticks.
    Tick(Duration),
}
