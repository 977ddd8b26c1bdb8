//! Dropdown selector backed by a popup menu.

use tracing::warn;

use crate::{
    Context, NodeId, ViewContext,
    error::{Error, Result},
    event::{Button, Event},
    geom::Point,
    layout::Layout,
    style::Style,
    widget::{EventOutcome, Widget},
    widgets::{ContextMenu, Label, MenuItem},
};

/// Receives the index and text of a newly chosen option.
type ChangeCallback = Box<dyn FnMut(usize, &str, &mut dyn Context) -> Result<()> + Send>;

/// A button showing the chosen option. Pressing it opens a menu of every
/// option directly below it; choosing one updates the button.
pub struct Dropdown {
    /// Available options.
    options: Vec<String>,
    /// Chosen option index.
    selected: usize,
    /// Caption node, once mounted.
    label: Option<NodeId>,
    /// Menu node, created on first open and reused.
    menu: Option<NodeId>,
    /// Change callback.
    on_change: Option<ChangeCallback>,
}

impl Dropdown {
    /// A dropdown over `options` with the first one chosen.
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected: 0,
            label: None,
            menu: None,
            on_change: None,
        }
    }

    /// Start with a different option chosen.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = index.min(self.options.len().saturating_sub(1));
        self
    }

    /// Set the change callback.
    pub fn on_change(
        mut self,
        f: impl FnMut(usize, &str, &mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// The chosen option index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The chosen option's text.
    pub fn selected_text(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    /// All options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The menu node, if the menu has been opened.
    pub fn menu(&self) -> Option<NodeId> {
        self.menu
    }

    /// Caption text for the current choice.
    fn caption(&self) -> String {
        format!("{} ▾", self.selected_text().unwrap_or(""))
    }

    /// Choose an option and run the change callback.
    pub fn select(&mut self, ctx: &mut dyn Context, index: usize) -> Result<()> {
        if index >= self.options.len() {
            return Err(Error::Invalid(format!("no dropdown option {index}")));
        }
        if index == self.selected {
            return Ok(());
        }
        self.selected = index;
        if let Some(label) = self.label {
            let caption = self.caption();
            ctx.with_widget(label, |l: &mut Label, ctx| {
                l.set_text(caption.clone());
                ctx.relayout();
                Ok(())
            })?;
        }
        if let Some(f) = self.on_change.as_mut() {
            f(index, &self.options[index], ctx)?;
        }
        Ok(())
    }

    /// Show the menu under the dropdown.
    fn open(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let menu = match self.menu {
            Some(menu) => menu,
            None => {
                let owner = ctx.node_id();
                let items = (0..self.options.len()).map(|i| {
                    MenuItem::new(self.options[i].clone(), move |ctx| {
                        ctx.with_widget(owner, |d: &mut Self, ctx| d.select(ctx, i))
                    })
                });
                let menu = ctx.add_orphan(ContextMenu::new(items));
                self.menu = Some(menu);
                menu
            }
        };
        if ctx.is_attached(menu) {
            return Ok(());
        }
        let bbox = ctx.bbox();
        ctx.open_overlay(menu, Point::new(bbox.x, bbox.bottom()))
    }
}

impl Widget for Dropdown {
    fn layout(&self) -> Layout {
        Layout::single().fit().padding(4.0)
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.label = Some(ctx.add_child(Label::new(self.caption()))?);
        Ok(())
    }

    fn on_unmount(&mut self, ctx: &mut dyn Context) {
        if let Some(menu) = self.menu.take()
            && let Err(e) = ctx.remove(menu)
        {
            warn!(?menu, error = %e, "failed to remove dropdown menu");
        }
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        let theme = ctx.theme();
        Some(Style::fill(if ctx.is_hovered() {
            theme.button_hover
        } else {
            theme.button
        }))
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        match event {
            Event::Press(Button::Left) => {
                self.open(ctx)?;
                Ok(EventOutcome::Handle)
            }
            _ => Ok(EventOutcome::Ignore),
        }
    }
}
