//! Single-line text entry.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Context, NodeId, ViewContext,
    error::Result,
    event::{Event, Key, KeyCode},
    geom::Expanse,
    layout::{Layout, MeasureConstraints, Sizing},
    style::{Color, Style},
    widget::{EventOutcome, Widget},
    widgets::{Container, Label},
};

/// Half-period of the caret blink.
const BLINK: Duration = Duration::from_millis(500);

/// Width of the caret bar.
const CARET_WIDTH: f32 = 1.0;

/// Decides whether a value is acceptable.
pub type Validator = Box<dyn Fn(&str) -> bool + Send>;

/// Receives the text and whether it passed validation.
pub type TextCallback = Box<dyn FnMut(&str, bool, &mut dyn Context) -> Result<()> + Send>;

/// An editable line of text with a cursor. The cursor is a grapheme index
/// in `0..=len`.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct TextBuf {
    /// Text value.
    value: String,
    /// Cursor position in graphemes.
    cursor: usize,
}

impl TextBuf {
    /// A buffer with the cursor at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let mut buf = Self {
            value: text.into(),
            cursor: 0,
        };
        buf.end();
        buf
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.value
    }

    /// The cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in graphemes.
    pub fn len(&self) -> usize {
        self.value.graphemes(true).count()
    }

    /// Is the buffer empty?
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Byte offset of a grapheme index.
    fn byte_offset(&self, index: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    /// Text before the cursor.
    pub fn pre(&self) -> &str {
        &self.value[..self.byte_offset(self.cursor)]
    }

    /// Text from the cursor on.
    pub fn post(&self) -> &str {
        &self.value[self.byte_offset(self.cursor)..]
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.value = text.into();
        self.end();
    }

    /// Insert text at the cursor and advance past it.
    pub fn insert(&mut self, text: &str) {
        let offset = self.byte_offset(self.cursor);
        self.value.insert_str(offset, text);
        self.cursor += text.graphemes(true).count();
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    /// Delete the grapheme at the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.value.replace_range(start..end, "");
        true
    }

    /// Move the cursor one grapheme left.
    pub fn left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move the cursor one grapheme right.
    pub fn right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move the cursor to the start.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn end(&mut self) {
        self.cursor = self.len();
    }
}

/// Child nodes, created on mount.
#[derive(Debug, Clone, Copy)]
struct Parts {
    /// The whole text, shown while unfocused.
    whole: NodeId,
    /// Text before the cursor.
    pre: NodeId,
    /// The caret bar.
    caret: NodeId,
    /// Text after the cursor.
    post: NodeId,
}

/// A text entry box.
///
/// Unfocused, the box shows its text as a single label. Focused, the text
/// is split at the cursor around a blinking caret. Every edit is validated;
/// invalid text is kept and drawn in the theme's error color. `on_change`
/// fires after every edit. `on_commit` fires when focus leaves or Enter is
/// pressed, but only if the text differs from the last commit.
pub struct TextBox {
    /// Edit buffer.
    buf: TextBuf,
    /// Text at the last commit.
    committed: String,
    /// The current text passed validation.
    valid: bool,
    /// Validation predicate. Everything is valid without one.
    validator: Option<Validator>,
    /// Per-edit callback.
    on_change: Option<TextCallback>,
    /// Commit callback.
    on_commit: Option<TextCallback>,
    /// Editing mode.
    focused: bool,
    /// Caret blink phase.
    caret_on: bool,
    /// Time since the caret last toggled.
    blink: Duration,
    /// Child nodes.
    parts: Option<Parts>,
    /// Layout configuration.
    layout: Layout,
}

impl TextBox {
    /// A text box holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let buf = TextBuf::new(text);
        Self {
            committed: buf.text().to_string(),
            buf,
            valid: true,
            validator: None,
            on_change: None,
            on_commit: None,
            focused: false,
            caret_on: false,
            blink: Duration::ZERO,
            parts: None,
            layout: Layout::single().height(Sizing::Fit).padding(2.0),
        }
    }

    /// Set the validator and check the initial text against it.
    pub fn with_validator(mut self, f: impl Fn(&str) -> bool + Send + 'static) -> Self {
        self.valid = f(self.buf.text());
        self.validator = Some(Box::new(f));
        self
    }

    /// Set the per-edit callback.
    pub fn on_change(
        mut self,
        f: impl FnMut(&str, bool, &mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Set the commit callback.
    pub fn on_commit(
        mut self,
        f: impl FnMut(&str, bool, &mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_commit = Some(Box::new(f));
        self
    }

    /// Set width sizing.
    pub fn width(mut self, sizing: Sizing) -> Self {
        self.layout = self.layout.width(sizing);
        self
    }

    /// The current text.
    pub fn text(&self) -> &str {
        self.buf.text()
    }

    /// The cursor position in graphemes.
    pub fn cursor(&self) -> usize {
        self.buf.cursor()
    }

    /// Did the current text pass validation?
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The text at the last commit.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Is the box in editing mode?
    pub fn is_editing(&self) -> bool {
        self.focused
    }

    /// Replace the text from application code. The new text counts as
    /// committed and no callbacks fire.
    pub fn set_text(&mut self, ctx: &mut dyn Context, text: impl Into<String>) -> Result<()> {
        self.buf.set_text(text);
        self.committed = self.buf.text().to_string();
        self.validate();
        self.sync(ctx)
    }

    /// Replace the text as if the user had typed it, then commit.
    pub fn replace(&mut self, ctx: &mut dyn Context, text: impl Into<String>) -> Result<()> {
        self.buf.set_text(text);
        self.edited(ctx)?;
        self.commit(ctx)
    }

    /// Re-run the validator.
    fn validate(&mut self) {
        self.valid = self.validator.as_ref().is_none_or(|f| f(self.buf.text()));
    }

    /// Validate, notify and redraw after an edit.
    fn edited(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.validate();
        if let Some(f) = self.on_change.as_mut() {
            f(self.buf.text(), self.valid, ctx)?;
        }
        self.sync(ctx)
    }

    /// Fire the commit callback if the text changed since the last commit.
    fn commit(&mut self, ctx: &mut dyn Context) -> Result<()> {
        if self.buf.text() == self.committed {
            return Ok(());
        }
        self.committed = self.buf.text().to_string();
        if let Some(f) = self.on_commit.as_mut() {
            f(&self.committed, self.valid, ctx)?;
        }
        Ok(())
    }

    /// Push text, colors and visibility to the child nodes.
    fn sync(&self, ctx: &mut dyn Context) -> Result<()> {
        let Some(parts) = self.parts else {
            return Ok(());
        };
        let color = (!self.valid).then(|| ctx.theme().text_error);
        set_label(ctx, parts.whole, self.buf.text(), color)?;
        set_label(ctx, parts.pre, self.buf.pre(), color)?;
        set_label(ctx, parts.post, self.buf.post(), color)?;

        let caret_on = self.caret_on;
        ctx.with_widget(parts.caret, |caret: &mut Caret, ctx| {
            caret.on = caret_on;
            ctx.taint();
            Ok(())
        })?;

        ctx.set_hidden(parts.whole, self.focused);
        for id in [parts.pre, parts.caret, parts.post] {
            ctx.set_hidden(id, !self.focused);
        }
        Ok(())
    }

    /// Apply a key while editing.
    fn key(&mut self, key: Key, ctx: &mut dyn Context) -> Result<EventOutcome> {
        if let Some(c) = key.text() {
            self.buf.insert(c.encode_utf8(&mut [0; 4]));
            self.restart_blink();
            self.edited(ctx)?;
            return Ok(EventOutcome::Handle);
        }
        let edited = match key.key {
            KeyCode::Backspace => self.buf.backspace(),
            KeyCode::Delete => self.buf.delete(),
            KeyCode::Left => {
                self.buf.left();
                false
            }
            KeyCode::Right => {
                self.buf.right();
                false
            }
            KeyCode::Home => {
                self.buf.home();
                false
            }
            KeyCode::End => {
                self.buf.end();
                false
            }
            KeyCode::Enter => {
                self.commit(ctx)?;
                ctx.clear_focus();
                return Ok(EventOutcome::Handle);
            }
            KeyCode::Esc => {
                ctx.clear_focus();
                return Ok(EventOutcome::Handle);
            }
            _ => return Ok(EventOutcome::Ignore),
        };
        self.restart_blink();
        if edited {
            self.edited(ctx)?;
        } else {
            self.sync(ctx)?;
        }
        Ok(EventOutcome::Handle)
    }

    /// Show the caret and restart its blink cycle.
    fn restart_blink(&mut self) {
        self.caret_on = true;
        self.blink = Duration::ZERO;
    }

    /// Advance the caret blink.
    fn tick(&mut self, elapsed: Duration, ctx: &mut dyn Context) -> Result<()> {
        self.blink += elapsed;
        if self.blink < BLINK {
            return Ok(());
        }
        let periods = self.blink.as_millis() / BLINK.as_millis();
        self.blink = Duration::from_millis((self.blink.as_millis() % BLINK.as_millis()) as u64);
        if periods % 2 == 1 {
            self.caret_on = !self.caret_on;
            self.sync(ctx)?;
        }
        Ok(())
    }
}

/// Update a label's text and color. A new text reruns layout; a new color
/// only restyles.
fn set_label(ctx: &mut dyn Context, id: NodeId, text: &str, color: Option<Color>) -> Result<()> {
    ctx.with_widget(id, |label: &mut Label, ctx| {
        if label.text() != text {
            label.set_text(text);
            label.set_color(color);
            ctx.relayout();
        } else if label.color() != color {
            label.set_color(color);
            ctx.taint();
        }
        Ok(())
    })
}

impl Widget for TextBox {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn accept_focus(&self) -> bool {
        true
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let row = ctx.add_child(Container::row().height(Sizing::Fit))?;
        let whole = ctx.add_child_to(row, Label::new(self.buf.text()))?;
        let pre = ctx.add_child_to(row, Label::new(""))?;
        let caret = ctx.add_child_to(row, Caret { on: false })?;
        let post = ctx.add_child_to(row, Label::new(""))?;
        self.parts = Some(Parts {
            whole,
            pre,
            caret,
            post,
        });
        self.sync(ctx)
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        Some(Style::fill(ctx.theme().text_box))
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::FocusGained => {
                self.focused = true;
                self.buf.end();
                self.restart_blink();
                self.sync(ctx)?;
                Ok(EventOutcome::Handle)
            }
            Event::FocusLost => {
                self.focused = false;
                self.caret_on = false;
                self.commit(ctx)?;
                self.sync(ctx)?;
                Ok(EventOutcome::Handle)
            }
            Event::Key(key) if self.focused => self.key(*key, ctx),
            Event::Tick(elapsed) if self.focused => {
                self.tick(*elapsed, ctx)?;
                Ok(EventOutcome::Consume)
            }
            Event::Press(_) => Ok(EventOutcome::Consume),
            _ => Ok(EventOutcome::Ignore),
        }
    }
}

/// The editing caret. Draws nothing during the off phase of its blink.
struct Caret {
    /// Blink phase.
    on: bool,
}

impl Widget for Caret {
    fn layout(&self) -> Layout {
        Layout::single().fit()
    }

    fn measure(&self, _c: MeasureConstraints, ctx: &dyn ViewContext) -> Expanse {
        let res = ctx.resources();
        let line = res.text_extent(res.font("default"), ctx.theme().text_size, "");
        Expanse::new(CARET_WIDTH, line.h)
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        self.on.then(|| Style::fill(ctx.theme().caret))
    }

    fn receive_events(&self) -> bool {
        false
    }
}
