use std::time::Duration;

use tracing::debug;

use super::{
    context::Context,
    dump,
    id::{NodeId, TypedId},
    render,
    router::Router,
    world::Core,
};
use crate::{
    backend::RenderBackend,
    error::Result,
    event::{Button, Key},
    geom::{Expanse, Point},
    resources::ResourceLoader,
    style::Theme,
    widget::Widget,
};

/// The application-facing runtime: a window tree, driven one frame at a
/// time by the host.
///
/// Each [`Gui::frame`] delivers queued lifecycle events, re-runs layout if
/// anything changed, pushes geometry and style to the backend, samples the
/// pointer and ticks the focus holder. Button and key input arrive between
/// frames through [`Gui::press`], [`Gui::release`] and [`Gui::key`].
pub struct Gui {
    /// Core state.
    pub core: Core,
}

impl Gui {
    /// Construct a window drawing into `backend` with resources from
    /// `loader`.
    pub fn new(backend: impl RenderBackend + 'static, loader: impl ResourceLoader + 'static) -> Self {
        let mut core = Core::new(backend, loader);
        let root = core.root;
        render::start_render(&mut core, root);
        Self { core }
    }

    /// Set the window size. Layout reruns at the next frame.
    pub fn resize(&mut self, screen: Expanse) {
        if self.core.screen != screen {
            debug!(w = screen.w, h = screen.h, "resize");
            self.core.screen = screen;
            self.core.needs_layout = true;
        }
    }

    /// The current window size.
    pub fn screen(&self) -> Expanse {
        self.core.screen
    }

    /// Add a widget to the content layer.
    pub fn add_content<W: Widget>(&mut self, widget: W) -> Result<TypedId<W>> {
        let content = self.core.content;
        let id = self.core.add_child_to(content, widget)?;
        self.core.flush_pending()?;
        Ok(id)
    }

    /// Run one frame.
    pub fn frame(&mut self, pointer: Option<Point>, elapsed: Duration) -> Result<()> {
        self.core.flush_pending()?;
        self.layout();
        if let Some(point) = pointer {
            self.core.pointer_moved(point)?;
        }
        self.core.tick(elapsed)?;
        // Handlers may have changed the tree.
        self.layout();
        self.core.sync_render();
        Ok(())
    }

    /// Re-run layout if anything changed since the last pass.
    fn layout(&mut self) {
        if self.core.needs_layout {
            let screen = self.core.screen;
            self.core.update_layout(screen);
            self.core.invalidate_cursor();
        }
    }

    /// Move the pointer and hit-test immediately, without a full frame.
    pub fn pointer(&mut self, point: Point) -> Result<()> {
        self.layout();
        self.core.pointer_moved(point)
    }

    /// A button went down at the current pointer position.
    pub fn press(&mut self, button: Button) -> Result<()> {
        self.layout();
        self.core.press(button)
    }

    /// A button came up.
    pub fn release(&mut self, button: Button) -> Result<()> {
        self.layout();
        self.core.release(button)
    }

    /// A key was typed.
    pub fn key(&mut self, key: impl Into<Key>) -> Result<()> {
        self.core.key(key.into())
    }

    /// Run a closure against a widget with a context bound to its node, then
    /// deliver any lifecycle events it caused.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        node: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> Result<R>,
    ) -> Result<R> {
        let out = self.core.with_widget(node, f)?;
        self.core.flush_pending()?;
        Ok(out)
    }

    /// Move focus to a node, or clear it.
    pub fn set_focus(&mut self, node: Option<NodeId>) -> Result<()> {
        self.core.set_focus(node);
        self.core.flush_pending()
    }

    /// Show a detached node in the overlay layer.
    pub fn open_overlay(&mut self, node: impl Into<NodeId>, at: Point) -> Result<()> {
        self.core.open_overlay(node.into(), at)
    }

    /// Close every overlay.
    pub fn close_overlays(&mut self) -> Result<()> {
        self.core.close_overlays()?;
        self.core.flush_pending()
    }

    /// Replace the theme. Every node restyles at the next frame.
    pub fn set_theme(&mut self, theme: Theme) {
        self.core.set_theme(theme);
    }

    /// Dump the window tree as text.
    pub fn dump(&self) -> Result<String> {
        dump::dump(&self.core, self.core.root)
    }
}
