//! Built-in widgets.

use crate::{Context, error::Result};

/// Buttons.
pub mod button;
/// Layout-only containers.
pub mod container;
/// Dropdown selector.
pub mod dropdown;
/// Filled boxes.
pub mod frame;
/// Static text.
pub mod label;
/// Collapsible selectable lists.
pub mod list;
/// Popup menus.
pub mod menu;
/// Numeric entry.
pub mod number_box;
/// Scroll containers.
pub mod scroll;
/// Editable text.
pub mod text_box;
/// External scene view.
pub mod viewport;
/// Window layers.
pub mod window;

pub use button::Button;
pub use container::Container;
pub use dropdown::Dropdown;
pub use frame::Frame;
pub use label::Label;
pub use list::{ItemId, List, ListItem, ListRow};
pub use menu::{ContextMenu, MenuItem};
pub use number_box::{NumberBox, NumberKind};
pub use scroll::{ScrollContainer, Scrollbar};
pub use text_box::{TextBox, TextBuf};
pub use viewport::{ObjectId, ObjectPicker, Viewport};
pub use window::{ContentLayer, OverlayLayer, Window};

/// A click-style callback with access to the tree.
pub type Callback = Box<dyn FnMut(&mut dyn Context) -> Result<()> + Send>;
