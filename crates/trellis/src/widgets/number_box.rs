use crate::{
    Context, NodeId,
    error::Result,
    layout::{Layout, Sizing},
    widget::Widget,
    widgets::{Button, TextBox},
};

/// The kind of number a [`NumberBox`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// Whole numbers.
    Integer,
    /// Decimal numbers, stepped to three decimal places.
    Float,
}

impl NumberKind {
    /// Does `text` parse as this kind of number?
    pub fn accepts(self, text: &str) -> bool {
        self.parse(text).is_some()
    }

    /// Parse `text` as this kind of number.
    pub fn parse(self, text: &str) -> Option<f64> {
        let text = text.trim();
        match self {
            Self::Integer => text.parse::<i64>().ok().map(|v| v as f64),
            Self::Float => text.parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Format a value for display.
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Integer => format!("{}", value.round() as i64),
            Self::Float => format!("{}", (value * 1000.0).round() / 1000.0),
        }
    }

    /// Step `text` by `delta`. Returns `None` if the text is not a number.
    pub fn step(self, text: &str, delta: f64) -> Option<String> {
        self.parse(text).map(|v| self.format(v + delta))
    }
}

/// Receives a committed number.
type NumberCallback = Box<dyn FnMut(f64, &mut dyn Context) -> Result<()> + Send>;

/// A text box restricted to numbers, with buttons that step the value up
/// and down. Steps are ignored while the text is not a valid number.
pub struct NumberBox {
    /// Accepted kind.
    kind: NumberKind,
    /// Initial value.
    value: f64,
    /// Step size.
    step: f64,
    /// Commit callback, moved into the text box on mount.
    on_commit: Option<NumberCallback>,
    /// Text box node, once mounted.
    text_box: Option<NodeId>,
}

impl NumberBox {
    /// A number box holding `value`.
    pub fn new(kind: NumberKind, value: f64) -> Self {
        Self {
            kind,
            value,
            step: 1.0,
            on_commit: None,
            text_box: None,
        }
    }

    /// Set the step size.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the callback for committed valid values.
    pub fn on_commit(
        mut self,
        f: impl FnMut(f64, &mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_commit = Some(Box::new(f));
        self
    }

    /// The text box node.
    pub fn text_box(&self) -> Option<NodeId> {
        self.text_box
    }

    /// Show a value without firing the commit callback.
    pub fn set_value(&mut self, ctx: &mut dyn Context, value: f64) -> Result<()> {
        self.value = value;
        let Some(id) = self.text_box else {
            return Ok(());
        };
        let text = self.kind.format(value);
        ctx.with_widget(id, |tb: &mut TextBox, ctx| tb.set_text(ctx, text.clone()))
    }
}

/// Step the number in a text box. Invalid text is left alone.
fn step_text_box(ctx: &mut dyn Context, id: NodeId, kind: NumberKind, delta: f64) -> Result<()> {
    ctx.with_widget(id, |tb: &mut TextBox, ctx| match kind.step(tb.text(), delta) {
        Some(text) => tb.replace(ctx, text),
        None => Ok(()),
    })
}

impl Widget for NumberBox {
    fn layout(&self) -> Layout {
        Layout::row()
    }

    fn receive_events(&self) -> bool {
        false
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let kind = self.kind;
        let mut on_commit = self.on_commit.take();
        let text_box = TextBox::new(kind.format(self.value))
            .width(Sizing::Fixed(80.0))
            .with_validator(move |text| kind.accepts(text))
            .on_commit(move |text, valid, ctx| {
                if let (true, Some(f), Some(v)) = (valid, on_commit.as_mut(), kind.parse(text)) {
                    f(v, ctx)?;
                }
                Ok(())
            });
        let tb = ctx.add_child(text_box)?;
        self.text_box = Some(tb);

        let step = self.step;
        ctx.add_child(Button::new("+").on_click(move |ctx| step_text_box(ctx, tb, kind, step)))?;
        ctx.add_child(Button::new("-").on_click(move |ctx| step_text_box(ctx, tb, kind, -step)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::testing::Harness;

    #[test]
    fn float_steps_round_to_three_places() {
        assert_eq!(NumberKind::Float.step("0.1", 0.2).as_deref(), Some("0.3"));
        assert_eq!(NumberKind::Float.step("1.23456", 0.0).as_deref(), Some("1.235"));
        assert_eq!(NumberKind::Float.step("abc", 1.0), None);
    }

    #[test]
    fn integer_validation() {
        assert!(NumberKind::Integer.accepts(" 42 "));
        assert!(!NumberKind::Integer.accepts("4.2"));
        assert_eq!(NumberKind::Integer.step("41", 1.0).as_deref(), Some("42"));
        assert!(NumberKind::Float.accepts("4.2"));
        assert!(!NumberKind::Float.accepts("inf"));
    }

    #[test]
    fn plus_button_steps_and_commits() {
        let mut h = Harness::new();
        let values = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&values);
        let nb = h
            .add(NumberBox::new(NumberKind::Integer, 1.0).on_commit(move |v, _| {
                log.lock().unwrap().push(v);
                Ok(())
            }))
            .unwrap();
        h.frame().unwrap();

        // Text box is 80 wide, so "+" starts at x=80.
        h.click(85.0, 10.0).unwrap();
        let tb = h.widget(nb).unwrap().text_box().unwrap();
        assert_eq!(h.core().widget::<TextBox>(tb).unwrap().text(), "2");
        assert_eq!(*values.lock().unwrap(), vec![2.0]);
    }

    #[test]
    fn invalid_text_blocks_steps() {
        let mut h = Harness::new();
        let nb = h.add(NumberBox::new(NumberKind::Integer, 5.0)).unwrap();
        h.frame().unwrap();
        let tb = h.widget(nb).unwrap().text_box().unwrap();
        h.gui
            .with_widget(tb, |t: &mut TextBox, ctx| t.set_text(ctx, "five"))
            .unwrap();
        h.click(85.0, 10.0).unwrap();
        assert_eq!(h.core().widget::<TextBox>(tb).unwrap().text(), "five");
    }
}
