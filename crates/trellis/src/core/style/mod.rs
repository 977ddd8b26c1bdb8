/// Color helpers.
mod color;
/// Serializable widget palette.
mod theme;

pub use color::Color;
pub use theme::Theme;

use crate::core::resources::{FontHandle, ImageHandle};

/// A run of text drawn by the backend inside a node's box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// The text itself.
    pub text: String,
    /// Glyph color.
    pub color: Color,
    /// Point size.
    pub size: f32,
    /// Resolved font.
    pub font: FontHandle,
}

/// Everything a render backend needs to draw one node, apart from geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    /// Fill color for the node's box.
    pub background: Color,
    /// Image stretched over the node's box.
    pub image: Option<ImageHandle>,
    /// Text drawn at the node's origin.
    pub text: Option<TextStyle>,
}

impl Style {
    /// A plain filled box.
    pub fn fill(background: Color) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    /// A text run over a transparent background.
    pub fn text(text: impl Into<String>, color: Color, size: f32, font: FontHandle) -> Self {
        Self {
            text: Some(TextStyle {
                text: text.into(),
                color,
                size,
                font,
            }),
            ..Self::default()
        }
    }

    /// Set the image.
    pub fn with_image(mut self, image: Option<ImageHandle>) -> Self {
        self.image = image;
        self
    }
}
