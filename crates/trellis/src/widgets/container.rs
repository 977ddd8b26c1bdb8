//! Invisible containers that only arrange their children.

use crate::{
    geom::Axis,
    layout::{Layout, Sizing},
    widget::Widget,
};

/// A node that draws nothing and arranges its children with a layout
/// strategy. Containers are transparent to hit-testing.
pub struct Container {
    /// Layout configuration.
    layout: Layout,
}

impl Container {
    /// A container with an explicit layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// A vertical stack.
    pub fn column() -> Self {
        Self::new(Layout::column())
    }

    /// A horizontal stack.
    pub fn row() -> Self {
        Self::new(Layout::row())
    }

    /// A stack along `axis`.
    pub fn stack(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self::column(),
            Axis::Horizontal => Self::row(),
        }
    }

    /// A five-slot dock.
    pub fn dock() -> Self {
        Self::new(Layout::dock())
    }

    /// A uniform grid.
    pub fn grid(rows: usize, columns: usize) -> Self {
        Self::new(Layout::grid(rows, columns))
    }

    /// Free placement.
    pub fn free() -> Self {
        Self::new(Layout::free())
    }

    /// Set padding.
    pub fn padding(mut self, padding: f32) -> Self {
        self.layout = self.layout.padding(padding);
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

impl Widget for Container {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn receive_events(&self) -> bool {
        false
    }
}
