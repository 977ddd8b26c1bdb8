//! The window root and its two layers.

use crate::{layout::Layout, widget::Widget};

/// The window root. Its children are the content layer and, above it, the
/// overlay layer, both filling the window.
pub struct Window;

impl Widget for Window {
    fn receive_events(&self) -> bool {
        false
    }
}

/// The layer that hosts application content.
pub struct ContentLayer;

impl Widget for ContentLayer {
    fn receive_events(&self) -> bool {
        false
    }
}

/// Floating layer for context menus and dropdowns. Children are placed with
/// [`Placement::At`](crate::layout::Placement::At) and pulled back inside
/// the window when they would overflow it.
pub struct OverlayLayer;

impl Widget for OverlayLayer {
    fn layout(&self) -> Layout {
        Layout::free()
    }

    fn receive_events(&self) -> bool {
        false
    }
}
