//! Button widget.

use crate::{
    Context, NodeId, ViewContext,
    error::Result,
    event::{Button as MouseButton, Event},
    layout::Layout,
    style::{Color, Style},
    widget::{EventOutcome, Widget},
    widgets::{Callback, Label},
};

/// A clickable box with a text caption. Fires its click handler when the
/// left button goes down over it.
pub struct Button {
    /// Caption text.
    label: String,
    /// Caption node, once mounted.
    label_id: Option<NodeId>,
    /// Click handler.
    on_click: Option<Callback>,
    /// The left button is down on this button.
    pressed: bool,
    /// Layout configuration.
    layout: Layout,
    /// Normal fill. Falls back to the theme's button color.
    color: Option<Color>,
}

impl Button {
    /// A button sized to its caption.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            label_id: None,
            on_click: None,
            pressed: false,
            layout: Layout::single().fit().padding(4.0),
            color: None,
        }
    }

    /// Set the click handler.
    pub fn on_click(
        mut self,
        f: impl FnMut(&mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Replace the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the normal fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// The caption text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Is the left button held on this button?
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Replace the caption.
    pub fn set_label(&mut self, ctx: &mut dyn Context, label: impl Into<String>) -> Result<()> {
        self.label = label.into();
        if let Some(id) = self.label_id {
            let text = self.label.clone();
            ctx.with_widget(id, |l: &mut Label, ctx| {
                l.set_text(text.clone());
                ctx.relayout();
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Run the click handler.
    pub fn click(&mut self, ctx: &mut dyn Context) -> Result<()> {
        if let Some(f) = self.on_click.as_mut() {
            f(ctx)?;
        }
        Ok(())
    }
}

impl Widget for Button {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.label_id = Some(ctx.add_child(Label::new(self.label.clone()))?);
        Ok(())
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        let theme = ctx.theme();
        let color = if self.pressed {
            theme.button_pressed
        } else if ctx.is_hovered() {
            theme.button_hover
        } else {
            self.color.unwrap_or(theme.button)
        };
        Some(Style::fill(color))
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::Press(MouseButton::Left) => {
                self.pressed = true;
                ctx.taint();
                self.click(ctx)?;
                Ok(EventOutcome::Handle)
            }
            Event::Release(_) if self.pressed => {
                self.pressed = false;
                ctx.taint();
                Ok(EventOutcome::Handle)
            }
            Event::CursorExit if self.pressed => {
                self.pressed = false;
                ctx.taint();
                Ok(EventOutcome::Ignore)
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
    fn fits_caption_and_tracks_pointer_state() {
        let mut h = Harness::new();
        let b = h.add(Button::new("Go")).unwrap();
        h.frame().unwrap();
        assert_eq!(h.bbox(b), BoundingBox::new(0.0, 0.0, 20.0, 23.0));

        let theme = h.core().theme().clone();
        let handle = h.core().node(b).and_then(|n| n.handle()).unwrap();
        let fill = |h: &Harness| h.log.last_style(handle).map(|s| s.background);
        assert_eq!(fill(&h), Some(theme.button));

        h.move_to(10.0, 10.0).unwrap();
        assert_eq!(fill(&h), Some(theme.button_hover));
        h.press(MouseButton::Left).unwrap();
        h.frame().unwrap();
        assert_eq!(fill(&h), Some(theme.button_pressed));
        assert!(h.widget(b).unwrap().is_pressed());
        h.release(MouseButton::Left).unwrap();
        h.frame().unwrap();
        assert_eq!(fill(&h), Some(theme.button_hover));
        h.move_to(300.0, 200.0).unwrap();
        assert_eq!(fill(&h), Some(theme.button));
    }

    #[test]
    fn left_press_fires_the_handler_once() {
        let clicks = Arc::new(Mutex::new(0));
        let counter = clicks.clone();
        let mut h = Harness::new();
        h.add(Button::new("Go").on_click(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        }))
        .unwrap();
        h.frame().unwrap();

        h.click(10.0, 10.0).unwrap();
        h.move_to(10.0, 10.0).unwrap();
        h.press(MouseButton::Right).unwrap();
        h.release(MouseButton::Right).unwrap();
        assert_eq!(*clicks.lock().unwrap(), 1);
    }

    #[test]
    fn relabeling_updates_the_caption() {
        let mut h = Harness::new();
        let b = h.add(Button::new("Go")).unwrap();
        h.with_widget(b, |b, ctx| b.set_label(ctx, "Stop")).unwrap();
        h.frame().unwrap();
        assert_eq!(h.widget(b).unwrap().label(), "Stop");
        assert_eq!(h.bbox(b).width, 32.0);
    }
}
