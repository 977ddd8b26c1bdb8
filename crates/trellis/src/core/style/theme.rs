use serde::{Deserialize, Serialize};

use super::Color;
use crate::error::Result;

/// Colors and metrics shared by the built-in widgets.
///
/// Every field has a default, so a theme file only needs to name the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Default frame fill.
    pub frame: Color,
    /// Button fill at rest.
    pub button: Color,
    /// Button fill under the cursor.
    pub button_hover: Color,
    /// Button fill while pressed.
    pub button_pressed: Color,
    /// List row fill at rest.
    pub row: Color,
    /// List row fill when selected.
    pub row_selected: Color,
    /// Text color.
    pub text: Color,
    /// Text color for input that fails validation.
    pub text_error: Color,
    /// Text box fill.
    pub text_box: Color,
    /// Caret color.
    pub caret: Color,
    /// Scrollbar track fill.
    pub scroll_track: Color,
    /// Scrollbar thumb fill.
    pub scroll_thumb: Color,
    /// Context menu fill.
    pub menu: Color,
    /// Default text size in points.
    pub text_size: f32,
    /// Scrollbar thickness.
    pub scrollbar_width: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            frame: Color::TRANSPARENT,
            button: Color::grey(0.2),
            button_hover: Color::grey(0.4),
            button_pressed: Color::grey(0.5),
            row: Color::TRANSPARENT,
            row_selected: Color::grey(0.5),
            text: Color::WHITE,
            text_error: Color::rgba(1.0, 0.3, 0.3, 1.0),
            text_box: Color::rgba(1.0, 1.0, 1.0, 0.2),
            caret: Color::WHITE,
            scroll_track: Color::rgba(1.0, 1.0, 1.0, 0.1),
            scroll_thumb: Color::rgba(1.0, 1.0, 1.0, 0.8),
            menu: Color::grey(0.5),
            text_size: 12.0,
            scrollbar_width: 10.0,
        }
    }
}

impl Theme {
    /// Load a theme from JSON, filling unspecified fields from the default.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let theme = Theme::from_json(r#"{"text_size": 16.0, "menu": {"r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0}}"#)?;
        assert_eq!(theme.text_size, 16.0);
        assert_eq!(theme.menu, Color::rgba(1.0, 0.0, 0.0, 1.0));
        assert_eq!(theme.button, Theme::default().button);
        Ok(())
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            Theme::from_json("{\"text_size\": \"big\"}"),
            Err(Error::Invalid(_))
        ));
    }
}
