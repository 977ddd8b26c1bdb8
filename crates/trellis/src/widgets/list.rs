//! Selectable lists with collapsible nested rows.
//!
//! A [`List`] holds a tree of items but shows them as one column of rows:
//! the pre-order traversal of every item whose ancestors are all expanded.
//! Expanding an item splices its visible descendants in directly after its
//! row. Collapsing removes that same contiguous run.

use std::marker::PhantomData;

use tracing::debug;

use crate::{
    Context, NodeId, ViewContext,
    error::{Error, Result},
    event::{Button, Event},
    layout::{Layout, Sizing},
    style::Style,
    widget::{EventOutcome, Widget},
    widgets::{Container, Label},
};

/// Horizontal indent per nesting level.
const INDENT: f32 = 22.0;

/// Side of the expand/collapse arrow.
const ARROW: f32 = 12.0;

/// Gap between the arrow and the label.
const GAP: f32 = 4.0;

/// Identifies an item within its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

/// Receives the payload of a newly selected item.
type SelectCallback<T> = Box<dyn FnMut(&T, &mut dyn Context) -> Result<()> + Send>;

/// An item to insert into a list, with its nested items.
pub struct ListItem<T> {
    /// Row text.
    label: String,
    /// Application data handed to the selection callback.
    payload: T,
    /// Nested items.
    children: Vec<Self>,
    /// Whether nested items start out shown.
    expanded: bool,
}

impl<T> ListItem<T> {
    /// A collapsed item with no children.
    pub fn new(label: impl Into<String>, payload: T) -> Self {
        Self {
            label: label.into(),
            payload,
            children: Vec::new(),
            expanded: false,
        }
    }

    /// Add nested items.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Start out expanded.
    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }
}

/// An item in the list's tree.
struct Entry<T> {
    /// Row text.
    label: String,
    /// Application data.
    payload: T,
    /// Parent item.
    parent: Option<ItemId>,
    /// Nested items in order.
    children: Vec<ItemId>,
    /// Nesting depth. Top-level items are at 0.
    level: usize,
    /// Nested items are shown.
    expanded: bool,
    /// Row node while the item is visible.
    row: Option<NodeId>,
    /// Arrow node inside the row.
    arrow: Option<NodeId>,
}

/// A vertical list of selectable rows backed by a tree of items. At most
/// one row is selected at a time.
pub struct List<T: Send + 'static> {
    /// Every item, indexed by `ItemId`.
    entries: Vec<Entry<T>>,
    /// Top-level items in order.
    roots: Vec<ItemId>,
    /// Visible items in display order. Mirrors the node's children.
    rows: Vec<ItemId>,
    /// Selected item.
    selected: Option<ItemId>,
    /// Selection callback.
    on_select: Option<SelectCallback<T>>,
    /// Set once rows exist.
    mounted: bool,
}

impl<T: Send + 'static> Default for List<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Send + 'static> List<T> {
    /// A list holding `items` at the top level.
    pub fn new(items: Vec<ListItem<T>>) -> Self {
        let mut list = Self {
            entries: Vec::new(),
            roots: Vec::new(),
            rows: Vec::new(),
            selected: None,
            on_select: None,
            mounted: false,
        };
        for item in items {
            let id = list.insert_entry(None, item);
            list.roots.push(id);
        }
        list
    }

    /// Set the selection callback.
    pub fn on_select(
        mut self,
        f: impl FnMut(&T, &mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Store an item and its descendants. Returns the item's id.
    fn insert_entry(&mut self, parent: Option<ItemId>, item: ListItem<T>) -> ItemId {
        let id = ItemId(self.entries.len());
        let level = parent.and_then(|p| self.entries.get(p.0)).map_or(0, |p| p.level + 1);
        self.entries.push(Entry {
            label: item.label,
            payload: item.payload,
            parent,
            children: Vec::new(),
            level,
            expanded: item.expanded,
            row: None,
            arrow: None,
        });
        for child in item.children {
            let child = self.insert_entry(Some(id), child);
            self.entries[id.0].children.push(child);
        }
        id
    }

    /// Look up an entry.
    fn entry(&self, id: ItemId) -> Result<&Entry<T>> {
        self.entries
            .get(id.0)
            .ok_or_else(|| Error::Invalid(format!("no list item {id:?}")))
    }

    /// Number of items, shown or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Does the list hold no items?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visible items in display order.
    pub fn rows(&self) -> &[ItemId] {
        &self.rows
    }

    /// Labels of the visible rows in display order.
    pub fn row_labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|id| self.entries.get(id.0))
            .map(|e| e.label.as_str())
            .collect()
    }

    /// Top-level items.
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Nested items of an item.
    pub fn children_of(&self, id: ItemId) -> &[ItemId] {
        self.entries.get(id.0).map_or(&[], |e| &e.children)
    }

    /// Parent of an item.
    pub fn parent_of(&self, id: ItemId) -> Option<ItemId> {
        self.entries.get(id.0).and_then(|e| e.parent)
    }

    /// An item's label.
    pub fn label(&self, id: ItemId) -> Option<&str> {
        self.entries.get(id.0).map(|e| e.label.as_str())
    }

    /// An item's payload.
    pub fn payload(&self, id: ItemId) -> Option<&T> {
        self.entries.get(id.0).map(|e| &e.payload)
    }

    /// The first item, in insertion order, whose payload matches.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<ItemId> {
        self.entries.iter().position(|e| pred(&e.payload)).map(ItemId)
    }

    /// Is an item expanded?
    pub fn is_expanded(&self, id: ItemId) -> bool {
        self.entries.get(id.0).is_some_and(|e| e.expanded)
    }

    /// The row node of a visible item.
    pub fn row_node(&self, id: ItemId) -> Option<NodeId> {
        self.entries.get(id.0).and_then(|e| e.row)
    }

    /// The selected item.
    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Descendants of `id` that are shown while `id` is expanded, in
    /// pre-order.
    fn visible_descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemId> = self.children_of(id).iter().rev().copied().collect();
        while let Some(item) = stack.pop() {
            out.push(item);
            if let Some(e) = self.entries.get(item.0)
                && e.expanded
            {
                stack.extend(e.children.iter().rev().copied());
            }
        }
        out
    }

    /// All items that should be visible, in display order.
    fn visible_items(&self) -> Vec<ItemId> {
        let mut out = Vec::new();
        for root in &self.roots {
            out.push(*root);
            if self.is_expanded(*root) {
                out.extend(self.visible_descendants(*root));
            }
        }
        out
    }

    /// Is every ancestor of `id` expanded?
    fn is_visible(&self, id: ItemId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if !self.is_expanded(p) {
                return false;
            }
            current = self.parent_of(p);
        }
        true
    }

    /// Build a detached row for an item: an indent of `22 × level`, the
    /// arrow, a gap and the label, side by side.
    fn build_row(&self, ctx: &mut dyn Context, item: ItemId) -> Result<(NodeId, NodeId)> {
        let e = self.entry(item)?;
        let strip = ctx.add_orphan(Container::row().height(Sizing::Fit));
        let indent = INDENT * e.level as f32;
        ctx.add_child_to(strip, Container::new(Layout::single().fixed(indent, 0.0)))?;
        let arrow = ctx.add_child_to(strip, Arrow { state: ArrowState::of(e) })?;
        ctx.add_child_to(strip, Container::new(Layout::single().fixed(GAP, 0.0)))?;
        ctx.add_child_to(strip, Label::new(e.label.clone()))?;
        let row = ctx.add_orphan(ListRow::<T> {
            item,
            arrow,
            selected: self.selected == Some(item),
            _payload: PhantomData,
        });
        ctx.attach(row, strip)?;
        Ok((row, arrow))
    }

    /// Create row nodes for `items` and attach them at `index`.
    fn splice_rows(&mut self, ctx: &mut dyn Context, index: usize, items: &[ItemId]) -> Result<()> {
        let list = ctx.node_id();
        for (offset, item) in items.iter().enumerate() {
            let (row, arrow) = self.build_row(ctx, *item)?;
            ctx.attach_at(list, index + offset, row)?;
            let e = &mut self.entries[item.0];
            e.row = Some(row);
            e.arrow = Some(arrow);
        }
        let at = index.min(self.rows.len());
        self.rows.splice(at..at, items.iter().copied());
        Ok(())
    }

    /// Remove `count` rows starting at `index`.
    fn remove_rows(&mut self, ctx: &mut dyn Context, index: usize, count: usize) -> Result<Vec<ItemId>> {
        let end = (index + count).min(self.rows.len());
        let removed: Vec<ItemId> = self.rows.drain(index..end).collect();
        for item in &removed {
            let Some(e) = self.entries.get_mut(item.0) else {
                continue;
            };
            e.arrow = None;
            if let Some(node) = e.row.take() {
                ctx.remove(node)?;
            }
        }
        Ok(removed)
    }

    /// Show an item's nested items.
    pub fn expand(&mut self, ctx: &mut dyn Context, id: ItemId) -> Result<()> {
        if self.entry(id)?.expanded {
            return Ok(());
        }
        self.entries[id.0].expanded = true;
        self.sync_arrow(ctx, id)?;
        if let Some(index) = self.rows.iter().position(|r| *r == id) {
            let items = self.visible_descendants(id);
            debug!(?id, rows = items.len(), "expand");
            self.splice_rows(ctx, index + 1, &items)?;
        }
        Ok(())
    }

    /// Hide an item's nested items. A selection inside the hidden run moves
    /// to the collapsed item.
    pub fn collapse(&mut self, ctx: &mut dyn Context, id: ItemId) -> Result<()> {
        self.collapse_from(ctx, id, None)
    }

    /// Collapse an item. `origin` is a row that updates its own highlight.
    fn collapse_from(&mut self, ctx: &mut dyn Context, id: ItemId, origin: Option<NodeId>) -> Result<()> {
        if !self.entry(id)?.expanded {
            return Ok(());
        }
        let count = self.visible_descendants(id).len();
        self.entries[id.0].expanded = false;
        self.sync_arrow(ctx, id)?;
        if let Some(index) = self.rows.iter().position(|r| *r == id) {
            debug!(?id, rows = count, "collapse");
            let removed = self.remove_rows(ctx, index + 1, count)?;
            if self.selected.is_some_and(|s| removed.contains(&s)) {
                self.selected = None;
                self.select_from(ctx, id, origin)?;
            }
        }
        Ok(())
    }

    /// Flip an item between expanded and collapsed. Returns the new state.
    pub fn toggle(&mut self, ctx: &mut dyn Context, id: ItemId) -> Result<bool> {
        self.toggle_from(ctx, id, None)
    }

    /// Toggle an item. `origin` is a row that updates its own highlight.
    fn toggle_from(&mut self, ctx: &mut dyn Context, id: ItemId, origin: Option<NodeId>) -> Result<bool> {
        let e = self.entry(id)?;
        if e.children.is_empty() {
            return Ok(e.expanded);
        }
        if e.expanded {
            self.collapse_from(ctx, id, origin)?;
            Ok(false)
        } else {
            self.expand(ctx, id)?;
            Ok(true)
        }
    }

    /// Select an item, deselecting the previous one, and run the selection
    /// callback with its payload.
    pub fn select(&mut self, ctx: &mut dyn Context, id: ItemId) -> Result<()> {
        self.select_from(ctx, id, None)
    }

    /// Select an item. `origin` is a row that already shows itself selected
    /// and is left alone.
    fn select_from(&mut self, ctx: &mut dyn Context, id: ItemId, origin: Option<NodeId>) -> Result<()> {
        self.entry(id)?;
        if self.selected == Some(id) {
            return Ok(());
        }
        if let Some(previous) = self.selected.replace(id) {
            self.mark_row(ctx, previous, false, origin)?;
        }
        self.mark_row(ctx, id, true, origin)?;
        if let Some(f) = self.on_select.as_mut() {
            f(&self.entries[id.0].payload, ctx)?;
        }
        Ok(())
    }

    /// Clear the selection without running the callback.
    pub fn deselect(&mut self, ctx: &mut dyn Context) -> Result<()> {
        if let Some(previous) = self.selected.take() {
            self.mark_row(ctx, previous, false, None)?;
        }
        Ok(())
    }

    /// Update a row's selection highlight.
    fn mark_row(
        &self,
        ctx: &mut dyn Context,
        id: ItemId,
        selected: bool,
        skip: Option<NodeId>,
    ) -> Result<()> {
        let Some(node) = self.row_node(id) else {
            return Ok(());
        };
        if skip == Some(node) {
            return Ok(());
        }
        ctx.with_widget(node, |row: &mut ListRow<T>, ctx| {
            row.selected = selected;
            ctx.taint();
            Ok(())
        })
    }

    /// Push an item's expand state to its row's arrow.
    fn sync_arrow(&self, ctx: &mut dyn Context, id: ItemId) -> Result<()> {
        let e = self.entry(id)?;
        let Some(arrow) = e.arrow else {
            return Ok(());
        };
        let state = ArrowState::of(e);
        ctx.with_widget(arrow, |a: &mut Arrow, ctx| {
            a.state = state;
            ctx.taint();
            Ok(())
        })
    }

    /// Add an item under `parent`, or at the top level. Rows appear at once
    /// if the item is visible.
    pub fn push(
        &mut self,
        ctx: &mut dyn Context,
        parent: Option<ItemId>,
        item: ListItem<T>,
    ) -> Result<ItemId> {
        if let Some(p) = parent {
            self.entry(p)?;
        }
        let id = self.insert_entry(parent, item);
        match parent {
            Some(p) => self.entries[p.0].children.push(id),
            None => self.roots.push(id),
        }
        if !self.mounted {
            return Ok(id);
        }
        if let Some(p) = parent {
            self.sync_arrow(ctx, p)?;
        }
        let shown = parent.is_none_or(|p| self.is_expanded(p) && self.is_visible(p));
        if shown {
            let mut items = vec![id];
            if self.is_expanded(id) {
                items.extend(self.visible_descendants(id));
            }
            // Everything visible before the new item in pre-order.
            let index = self
                .visible_items()
                .iter()
                .position(|i| *i == id)
                .unwrap_or(self.rows.len());
            self.splice_rows(ctx, index, &items)?;
        }
        Ok(id)
    }

    /// Remove every item and row.
    pub fn clear(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let count = self.rows.len();
        self.remove_rows(ctx, 0, count)?;
        self.entries.clear();
        self.roots.clear();
        self.selected = None;
        Ok(())
    }
}

impl<T: Send + 'static> Widget for List<T> {
    fn layout(&self) -> Layout {
        Layout::column()
    }

    fn receive_events(&self) -> bool {
        false
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.mounted = true;
        let items = self.visible_items();
        self.splice_rows(ctx, 0, &items)
    }
}

/// What a row's arrow shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrowState {
    /// No nested items.
    Leaf,
    /// Nested items hidden.
    Collapsed,
    /// Nested items shown.
    Expanded,
}

impl ArrowState {
    /// The arrow for an entry.
    fn of<T>(e: &Entry<T>) -> Self {
        match (e.children.is_empty(), e.expanded) {
            (true, _) => Self::Leaf,
            (false, false) => Self::Collapsed,
            (false, true) => Self::Expanded,
        }
    }
}

/// The expand/collapse marker. Presses land on the row, which checks the
/// arrow's box.
struct Arrow {
    /// Current marker.
    state: ArrowState,
}

impl Widget for Arrow {
    fn layout(&self) -> Layout {
        Layout::single().fixed(ARROW, ARROW)
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        let glyph = match self.state {
            ArrowState::Leaf => return None,
            ArrowState::Collapsed => "▸",
            ArrowState::Expanded => "▾",
        };
        let theme = ctx.theme();
        Some(Style::text(glyph, theme.text, theme.text_size, ctx.resources().font("default")))
    }

    fn receive_events(&self) -> bool {
        false
    }
}

/// One visible row of a [`List`]. Pressing the arrow toggles the item;
/// pressing anywhere else selects it.
pub struct ListRow<T> {
    /// The item shown.
    item: ItemId,
    /// Arrow node.
    arrow: NodeId,
    /// Selection highlight.
    selected: bool,
    /// Payload type of the owning list.
    _payload: PhantomData<fn() -> T>,
}

impl<T> ListRow<T> {
    /// The item shown.
    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Is the row highlighted as selected?
    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

impl<T: Send + 'static> Widget for ListRow<T> {
    fn layout(&self) -> Layout {
        Layout::single().height(Sizing::Fit).padding(2.0)
    }

    fn style(&self, ctx: &dyn ViewContext) -> Option<Style> {
        let theme = ctx.theme();
        Some(Style::fill(if self.selected {
            theme.row_selected
        } else {
            theme.row
        }))
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        let Event::Press(Button::Left) = event else {
            return Ok(EventOutcome::Ignore);
        };
        let Some(list) = ctx.parent_of(ctx.node_id()) else {
            return Ok(EventOutcome::Ignore);
        };
        let item = self.item;
        let me = ctx.node_id();
        let on_arrow = ctx
            .node_bbox(self.arrow)
            .is_some_and(|b| b.contains_point(ctx.cursor()));
        let selected = ctx.with_widget(list, |l: &mut List<T>, ctx| {
            if on_arrow {
                l.toggle_from(ctx, item, Some(me))?;
            } else {
                l.select_from(ctx, item, Some(me))?;
            }
            Ok(l.selected() == Some(item))
        })?;
        if selected != self.selected {
            self.selected = selected;
            ctx.taint();
        }
        Ok(EventOutcome::Handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{backend::NullBackend, core::Core, resources::MonospaceLoader, testing::Harness};

    /// Row height: a 15px label plus 2px padding on each side.
    const ROW: f32 = 19.0;

    /// Root with three children, the second expanded with two of its own.
    fn tree() -> Vec<ListItem<u32>> {
        vec![
            ListItem::new("root", 0).with_children([
                ListItem::new("a", 1),
                ListItem::new("b", 2)
                    .with_children([ListItem::new("b1", 21), ListItem::new("b2", 22)])
                    .expanded(),
                ListItem::new("c", 3),
            ]),
            ListItem::new("tail", 9),
        ]
    }

    #[test]
    fn expand_splices_preorder_and_collapse_removes_it() {
        let mut core = Core::new(NullBackend::default(), MonospaceLoader);
        let content = core.content_id();
        let list = core.add_child_to(content, List::new(tree())).unwrap();
        let labels = |core: &Core| core.widget::<List<u32>>(list).unwrap().row_labels().join(",");
        assert_eq!(labels(&core), "root,tail");

        let root = core.widget::<List<u32>>(list).unwrap().roots()[0];
        core.with_widget(list, |l: &mut List<u32>, ctx| l.expand(ctx, root))
            .unwrap();
        assert_eq!(labels(&core), "root,a,b,b1,b2,c,tail");
        assert_eq!(core.node(list).unwrap().children().len(), 7);

        core.with_widget(list, |l: &mut List<u32>, ctx| l.collapse(ctx, root))
            .unwrap();
        assert_eq!(labels(&core), "root,tail");
        assert_eq!(core.node(list).unwrap().children().len(), 2);
    }

    #[test]
    fn collapse_moves_selection_to_the_collapsed_item() {
        let mut core = Core::new(NullBackend::default(), MonospaceLoader);
        let content = core.content_id();
        let list = core.add_child_to(content, List::new(tree())).unwrap();
        let root = core.widget::<List<u32>>(list).unwrap().roots()[0];
        core.with_widget(list, |l: &mut List<u32>, ctx| {
            l.expand(ctx, root)?;
            let b1 = l.rows()[3];
            l.select(ctx, b1)?;
            l.collapse(ctx, root)
        })
        .unwrap();
        let l = core.widget::<List<u32>>(list).unwrap();
        assert_eq!(l.selected(), Some(root));
        let row = l.row_node(root).unwrap();
        assert!(core.widget::<ListRow<u32>>(row).unwrap().is_selected());
    }

    #[test]
    fn push_under_expanded_parent_lands_after_its_subtree() {
        let mut core = Core::new(NullBackend::default(), MonospaceLoader);
        let content = core.content_id();
        let list = core.add_child_to(content, List::new(tree())).unwrap();
        core.with_widget(list, |l: &mut List<u32>, ctx| {
            let root = l.roots()[0];
            l.expand(ctx, root)?;
            let b = l.children_of(root)[1];
            l.push(ctx, Some(b), ListItem::new("b3", 23))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(
            core.widget::<List<u32>>(list).unwrap().row_labels().join(","),
            "root,a,b,b1,b2,b3,c,tail"
        );
    }

    #[test]
    fn arrow_click_expands_and_row_click_selects() {
        let mut h = Harness::new();
        let picked = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&picked);
        let list = h
            .add(List::new(tree()).on_select(move |v: &u32, _| {
                log.lock().unwrap().push(*v);
                Ok(())
            }))
            .unwrap();
        h.frame().unwrap();
        assert_eq!(h.widget(list).unwrap().rows().len(), 2);

        h.click(8.0, 8.0).unwrap();
        assert_eq!(
            h.widget(list).unwrap().row_labels().join(","),
            "root,a,b,b1,b2,c,tail"
        );
        assert!(picked.lock().unwrap().is_empty());

        h.click(100.0, ROW * 1.5).unwrap();
        let l = h.widget(list).unwrap();
        let a = l.rows()[1];
        assert_eq!(l.selected(), Some(a));
        let row = l.row_node(a).unwrap();
        assert!(h.core().widget::<ListRow<u32>>(row).unwrap().is_selected());
        assert_eq!(*picked.lock().unwrap(), vec![1]);
    }

    #[test]
    fn collapsing_through_the_arrow_reselects_the_row() {
        let mut h = Harness::new();
        let list = h.add(List::<u32>::new(tree())).unwrap();
        h.frame().unwrap();
        h.click(8.0, 8.0).unwrap();
        // Select b1, the fourth row.
        h.click(100.0, ROW * 3.5).unwrap();
        let b1 = h.widget(list).unwrap().rows()[3];
        assert_eq!(h.widget(list).unwrap().selected(), Some(b1));

        h.click(8.0, 8.0).unwrap();
        let l = h.widget(list).unwrap();
        let root = l.roots()[0];
        assert_eq!(l.row_labels().join(","), "root,tail");
        assert_eq!(l.selected(), Some(root));
        let row = l.row_node(root).unwrap();
        assert!(h.core().widget::<ListRow<u32>>(row).unwrap().is_selected());
    }
}
