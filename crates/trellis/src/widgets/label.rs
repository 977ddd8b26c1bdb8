use crate::{
    ViewContext,
    geom::Expanse,
    layout::{Layout, MeasureConstraints},
    style::{Color, Style},
    widget::Widget,
};

/// Read-only text, sized to fit its contents. Labels are transparent to
/// hit-testing, so a press on a button's caption reaches the button.
pub struct Label {
    /// The text.
    text: String,
    /// Glyph color. Falls back to the theme's text color.
    color: Option<Color>,
    /// Point size. Falls back to the theme's text size.
    size: Option<f32>,
    /// Font name.
    font: String,
}

impl Label {
    /// A label in the default font.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            size: None,
            font: "default".into(),
        }
    }

    /// Set the glyph color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the point size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the font by name.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The glyph color override, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Replace the text. The caller relayouts the node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the glyph color. The caller taints the node.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// The point size in effect.
    fn size(&self, ctx: &dyn ViewContext) -> f32 {
        self.size.unwrap_or(ctx.theme().text_size)
    }
}

impl Widget for Label {
    fn layout(&self) -> Layout {
        Layout::single().fit()
    }

    fn measure(&self, _c: MeasureConstraints, ctx: &dyn ViewContext) -> Expanse {
        let res = ctx.resources();
        res.text_extent(res.font(&self.font), self.size(ctx), &self.text)
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        let color = self.color.unwrap_or(ctx.theme().text);
        Some(Style::text(
            self.text.clone(),
            color,
            self.size(ctx),
            ctx.resources().font(&self.font),
        ))
    }

    fn receive_events(&self) -> bool {
        false
    }
}
