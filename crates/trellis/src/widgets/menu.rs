//! Popup menus shown in the overlay layer.

use crate::{
    Context, NodeId, ViewContext,
    error::Result,
    event::{Button, Event},
    geom::Point,
    layout::{Layout, Sizing},
    style::Style,
    widget::{EventOutcome, Widget},
    widgets::{Callback, Label},
};

/// Menu width.
const MENU_WIDTH: f32 = 200.0;

/// A column of [`MenuItem`]s with a fixed width, sized to its items
/// vertically. Opened in the overlay layer, it closes when an item fires or
/// when a press lands outside it.
pub struct ContextMenu {
    /// Items waiting to be added on mount.
    pending: Vec<MenuItem>,
    /// Item nodes in order.
    items: Vec<NodeId>,
}

impl ContextMenu {
    /// A menu holding `items`.
    pub fn new(items: impl IntoIterator<Item = MenuItem>) -> Self {
        Self {
            pending: items.into_iter().collect(),
            items: Vec::new(),
        }
    }

    /// Item nodes in order.
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    /// Create a menu and show it at a screen position. Returns the menu
    /// node. The node stays alive after the menu closes; remove it when it
    /// is no longer needed.
    pub fn open(ctx: &mut dyn Context, menu: Self, at: Point) -> Result<NodeId> {
        let node = ctx.add_orphan(menu);
        ctx.open_overlay(node, at)?;
        Ok(node)
    }
}

impl Widget for ContextMenu {
    fn layout(&self) -> Layout {
        Layout::column()
            .width(Sizing::Fixed(MENU_WIDTH))
            .height(Sizing::Fit)
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        for item in self.pending.drain(..) {
            self.items.push(ctx.add_child(item)?);
        }
        Ok(())
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        Some(Style::fill(ctx.theme().menu))
    }

    fn on_event(&mut self, event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        // Presses on the menu's padding stop here rather than reaching the
        // content underneath.
        Ok(match event {
            Event::Press(_) | Event::Release(_) => EventOutcome::Consume,
            _ => EventOutcome::Ignore,
        })
    }
}

/// One entry in a [`ContextMenu`]. Fires its action when the left button is
/// released over it, then closes every open overlay.
pub struct MenuItem {
    /// Caption text.
    label: String,
    /// Action.
    action: Option<Callback>,
}

impl MenuItem {
    /// An item running `action` when chosen.
    pub fn new(
        label: impl Into<String>,
        action: impl FnMut(&mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            action: Some(Box::new(action)),
        }
    }

    /// An item with no action. Choosing it just closes the menu.
    pub fn inert(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
        }
    }

    /// The caption text.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Widget for MenuItem {
    fn layout(&self) -> Layout {
        Layout::single().height(Sizing::Fit).padding(4.0)
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.add_child(Label::new(self.label.clone()))?;
        Ok(())
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        ctx.is_hovered()
            .then(|| Style::fill(ctx.theme().row_selected))
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::Press(Button::Left) => Ok(EventOutcome::Consume),
            Event::Release(Button::Left) => {
                if let Some(action) = self.action.as_mut() {
                    action(ctx)?;
                }
                ctx.close_overlays()?;
                Ok(EventOutcome::Handle)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{geom::BoundingBox, testing::Harness};

    #[test]
    fn menus_clamp_into_the_window_and_close_after_choosing() {
        let chosen = Arc::new(Mutex::new(Vec::new()));
        let log = chosen.clone();
        let mut h = Harness::new();
        let menu = h.core_mut().create_detached(ContextMenu::new([
            MenuItem::inert("Cut"),
            MenuItem::new("Paste", move |_| {
                log.lock().unwrap().push("paste");
                Ok(())
            }),
        ]));
        h.gui.open_overlay(menu, Point::new(350.0, 280.0)).unwrap();
        h.frame().unwrap();
        assert_eq!(h.bbox(menu), BoundingBox::new(200.0, 254.0, 200.0, 46.0));
        let items = h.widget(menu).unwrap().items().to_vec();
        assert_eq!(h.bbox(items[1]), BoundingBox::new(200.0, 277.0, 200.0, 23.0));

        h.click(250.0, 290.0).unwrap();
        assert_eq!(*chosen.lock().unwrap(), ["paste"]);
        assert!(!h.core().has_overlays());
        assert_eq!(h.core().node(menu).and_then(|n| n.parent()), None);

        h.gui.open_overlay(menu, Point::new(0.0, 0.0)).unwrap();
        h.frame().unwrap();
        h.click(300.0, 200.0).unwrap();
        assert!(!h.core().has_overlays());
        assert_eq!(chosen.lock().unwrap().len(), 1);
    }
}
