use crate::{
    ViewContext,
    layout::{Layout, Sizing},
    style::{Color, Style},
    widget::Widget,
};

/// A filled box with an optional image, holding a single child.
pub struct Frame {
    /// Fill color. Falls back to the theme's frame color.
    color: Option<Color>,
    /// Named image drawn over the box.
    image: Option<String>,
    /// Layout configuration.
    layout: Layout,
    /// Whether hit-testing may select this frame.
    interactive: bool,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// A frame that fills its parent, drawn in the theme's frame color.
    pub fn new() -> Self {
        Self {
            color: None,
            image: None,
            layout: Layout::single(),
            interactive: true,
        }
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Draw a named image over the box.
    pub fn with_image(mut self, name: impl Into<String>) -> Self {
        self.image = Some(name.into());
        self
    }

    /// Replace the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Inset the child.
    pub fn padding(mut self, padding: f32) -> Self {
        self.layout = self.layout.padding(padding);
        self
    }

    /// Shrink horizontally to the child.
    pub fn fit_width(mut self) -> Self {
        self.layout = self.layout.width(Sizing::Fit);
        self
    }

    /// Shrink vertically to the child.
    pub fn fit_height(mut self) -> Self {
        self.layout = self.layout.height(Sizing::Fit);
        self
    }

    /// Fix both extents.
    pub fn fixed(mut self, width: f32, height: f32) -> Self {
        self.layout = self.layout.fixed(width, height);
        self
    }

    /// Make the frame pure decoration, invisible to hit-testing.
    pub fn passive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// The fill color, if set explicitly.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Change the fill color. Takes effect after the node is tainted.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }
}

impl Widget for Frame {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        let color = self.color.unwrap_or(ctx.theme().frame);
        let image = self.image.as_deref().and_then(|name| ctx.resources().image(name));
        Some(Style::fill(color).with_image(image))
    }

    fn receive_events(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::NullBackend,
        core::Core,
        geom::{BoundingBox, Expanse},
        resources::MonospaceLoader,
    };

    #[test]
    fn fit_frame_wraps_child() {
        let mut core = Core::new(NullBackend::default(), MonospaceLoader);
        let content = core.content_id();
        let outer = core
            .add_child_to(content, Frame::new().padding(5.0).fit_width().fit_height())
            .unwrap();
        let inner = core.add_child_to(outer, Frame::new().fixed(30.0, 20.0)).unwrap();
        core.update_layout(Expanse::new(200.0, 100.0));

        assert_eq!(core.node(outer).unwrap().bbox(), BoundingBox::new(0.0, 0.0, 40.0, 30.0));
        assert_eq!(core.node(inner).unwrap().bbox(), BoundingBox::new(5.0, 5.0, 30.0, 20.0));
    }
}
