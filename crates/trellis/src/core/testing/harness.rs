use std::time::Duration;

use crate::{
    Context, Core, Gui, NodeId, TypedId,
    backend::{BackendLog, RecordingBackend},
    error::Result,
    event::{Button, Key},
    geom::{BoundingBox, Expanse, Point},
    resources::MonospaceLoader,
    style::Theme,
    widget::Widget,
};

/// Nominal frame length used by [`Harness::frame`].
const FRAME: Duration = Duration::from_millis(16);

/// A window on a [`RecordingBackend`] with monospace resources. Tests drive
/// it with pointer, button and key input and then inspect the tree or the
/// backend log.
pub struct Harness {
    /// The window under test.
    pub gui: Gui,
    /// Every call the backend received.
    pub log: BackendLog,
}

/// Builder for creating a test harness with a fluent API.
pub struct HarnessBuilder {
    /// Window size.
    size: Expanse,
    /// Theme override.
    theme: Option<Theme>,
}

impl HarnessBuilder {
    /// A 400x300 window with the default theme.
    fn new() -> Self {
        Self {
            size: Expanse::new(400.0, 300.0),
            theme: None,
        }
    }

    /// Set the window size.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Expanse::new(width, height);
        self
    }

    /// Use a theme other than the default.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Build the harness.
    pub fn build(self) -> Harness {
        let (backend, log) = RecordingBackend::new();
        let mut gui = Gui::new(backend, MonospaceLoader);
        gui.resize(self.size);
        if let Some(theme) = self.theme {
            gui.set_theme(theme);
        }
        Harness { gui, log }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness builder.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::new()
    }

    /// A 400x300 window with the default theme.
    pub fn new() -> Self {
        HarnessBuilder::new().build()
    }

    /// The core arena.
    pub fn core(&self) -> &Core {
        &self.gui.core
    }

    /// The core arena, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        &mut self.gui.core
    }

    /// Add a widget to the content layer.
    pub fn add<W: Widget>(&mut self, widget: W) -> Result<TypedId<W>> {
        self.gui.add_content(widget)
    }

    /// Run one frame without moving the pointer.
    pub fn frame(&mut self) -> Result<()> {
        self.gui.frame(None, FRAME)
    }

    /// Run frames covering `elapsed`, one nominal frame at a time.
    pub fn advance(&mut self, elapsed: Duration) -> Result<()> {
        let mut left = elapsed;
        while !left.is_zero() {
            let step = left.min(FRAME);
            self.gui.frame(None, step)?;
            left -= step;
        }
        Ok(())
    }

    /// Move the pointer and run a frame.
    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.gui.frame(Some(Point::new(x, y)), FRAME)
    }

    /// Press a button at the current pointer position.
    pub fn press(&mut self, button: Button) -> Result<()> {
        self.gui.press(button)
    }

    /// Release a button.
    pub fn release(&mut self, button: Button) -> Result<()> {
        self.gui.release(button)
    }

    /// Move to a point, press and release the left button, then run a frame.
    pub fn click(&mut self, x: f32, y: f32) -> Result<()> {
        self.move_to(x, y)?;
        self.press(Button::Left)?;
        self.release(Button::Left)?;
        self.frame()
    }

    /// Click the center of a node's box.
    pub fn click_node(&mut self, node: impl Into<NodeId>) -> Result<()> {
        let b = self.bbox(node);
        self.click(b.x + b.width / 2.0, b.y + b.height / 2.0)
    }

    /// Send a key to the focus holder.
    pub fn key(&mut self, key: impl Into<Key>) -> Result<()> {
        self.gui.key(key)
    }

    /// Type a string as a sequence of character keys.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.key(c)?;
        }
        Ok(())
    }

    /// A node's box from the last layout. Missing nodes give a zero box.
    pub fn bbox(&self, node: impl Into<NodeId>) -> BoundingBox {
        self.gui.core.node(node).map_or(BoundingBox::zero(), |n| n.bbox())
    }

    /// Borrow a widget.
    pub fn widget<W: Widget>(&self, node: TypedId<W>) -> Option<&W> {
        self.gui.core.widget::<W>(node)
    }

    /// Execute a closure with mutable access to a widget and a context.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        node: TypedId<W>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R> {
        self.gui.with_widget(node, f)
    }

    /// Dump the window tree as text.
    pub fn dump(&self) -> Result<String> {
        self.gui.dump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Frame;

    #[test]
    fn frame_attaches_drawable_nodes() {
        let mut h = Harness::new();
        let f = h.add(Frame::new().fixed(50.0, 40.0)).unwrap();
        h.frame().unwrap();
        assert_eq!(h.bbox(f), BoundingBox::new(0.0, 0.0, 50.0, 40.0));
        assert!(h.log.live() >= 1);
        assert_eq!(h.log.stray_detaches(), 0);
    }
}
