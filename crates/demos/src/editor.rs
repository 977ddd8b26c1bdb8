//! A scene editor shell: a toolbar across the top, an object hierarchy on
//! the left, a property grid on the right, a status line along the bottom,
//! and a viewport onto the scene in the middle.
//!
//! The scene itself is plain data shared between the panels. Selecting in
//! the hierarchy or picking in the viewport selects the same object, and the
//! property grid edits whatever is selected.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};
use trellis::{
    Context, NodeId,
    error::{Error, Result},
    layout::{DockSlot, Layout, Placement, Sizing},
    widget::Widget,
    widgets::{
        Button, Container, Dropdown, Label, List, ListItem, NumberBox, NumberKind, ObjectId,
        ScrollContainer, Viewport,
    },
};

/// Width of the hierarchy panel.
const HIERARCHY_WIDTH: f32 = 180.0;
/// Width of the property panel.
const PROPERTIES_WIDTH: f32 = 240.0;
/// Tool modes offered in the toolbar.
pub const TOOLS: [&str; 4] = ["Select", "Move", "Rotate", "Scale"];
/// The scene's root group.
pub const WORLD: ObjectId = ObjectId(0);

/// A scripted session against an 800x600 window: expand the hierarchy,
/// select the crate, pick the barrel in the viewport, nudge and retype its
/// geometry, switch tools and add an object.
pub const DEMO_SCRIPT: &str = "\
# Expand the world group.
click 8 31
# Select the crate.
click 120 89
# Pick the barrel in the viewport.
click 420 420
# Step its x position up.
click 766 50
# Retype its height.
click 700 119
key backspace
key backspace
type 75
key enter
# Switch to the move tool.
click 40 10
click 100 57
# Add an object.
click 10 10
wait 500
";

/// An editable property of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Left edge.
    X,
    /// Top edge.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
}

impl Field {
    /// Every field in display order.
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::Width, Self::Height];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// One object in the scene. Groups have no area and cannot be picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Identity.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Containing group.
    pub parent: Option<ObjectId>,
    /// Left edge in screen space.
    pub x: f64,
    /// Top edge in screen space.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl SceneObject {
    /// Read a field.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::X => self.x,
            Field::Y => self.y,
            Field::Width => self.w,
            Field::Height => self.h,
        }
    }

    /// Write a field.
    pub fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::X => self.x = value,
            Field::Y => self.y = value,
            Field::Width => self.w = value,
            Field::Height => self.h = value,
        }
    }

    /// Does the object cover a screen point?
    fn contains(&self, x: f32, y: f32) -> bool {
        let (x, y) = (f64::from(x), f64::from(y));
        self.w > 0.0
            && self.h > 0.0
            && x >= self.x
            && x < self.x + self.w
            && y >= self.y
            && y < self.y + self.h
    }
}

/// A flat list of objects linked into groups by parent ids. Later objects
/// draw over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Objects in draw order.
    objects: Vec<SceneObject>,
}

impl Scene {
    /// A small scene with ground, two props and a light.
    pub fn sample() -> Self {
        let mut scene = Self::default();
        let world = scene.add("World", None, [0.0; 4]);
        scene.add("Ground", Some(world), [200.0, 480.0, 340.0, 80.0]);
        let props = scene.add("Props", Some(world), [0.0; 4]);
        scene.add("Crate", Some(props), [240.0, 380.0, 60.0, 60.0]);
        scene.add("Barrel", Some(props), [400.0, 390.0, 40.0, 60.0]);
        let lights = scene.add("Lights", Some(world), [0.0; 4]);
        scene.add("Sun", Some(lights), [460.0, 60.0, 50.0, 50.0]);
        scene
    }

    /// Add an object with `[x, y, w, h]` geometry.
    pub fn add(&mut self, name: impl Into<String>, parent: Option<ObjectId>, rect: [f64; 4]) -> ObjectId {
        let id = ObjectId(self.objects.len() as u64);
        let [x, y, w, h] = rect;
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            parent,
            x,
            y,
            w,
            h,
        });
        id
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Is the scene empty?
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Look up an object mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// The topmost object at a screen point.
    pub fn object_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.objects.iter().rev().find(|o| o.contains(x, y)).map(|o| o.id)
    }

    /// The hierarchy as list items. The top level starts collapsed and
    /// every nested group starts expanded.
    fn items(&self) -> Vec<ListItem<ObjectId>> {
        self.children(None)
    }

    /// List items for the objects under `parent`.
    fn children(&self, parent: Option<ObjectId>) -> Vec<ListItem<ObjectId>> {
        self.objects
            .iter()
            .filter(|o| o.parent == parent)
            .map(|o| {
                let item = ListItem::new(o.name.clone(), o.id).with_children(self.children(Some(o.id)));
                if parent.is_some() { item.expanded() } else { item }
            })
            .collect()
    }
}

/// Everything the panels share.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// The scene being edited.
    pub scene: Scene,
    /// The selected object.
    pub selected: Option<ObjectId>,
    /// The active tool.
    pub tool: String,
}

impl EditorState {
    /// Text for the status line.
    pub fn status(&self) -> String {
        let name = self
            .selected
            .and_then(|id| self.scene.get(id))
            .map_or("nothing selected", |o| o.name.as_str());
        format!("{name} | {}", self.tool)
    }
}

/// Editor state behind a lock, shared by widget callbacks.
pub type Shared = Arc<Mutex<EditorState>>;

/// Lock the shared state.
fn lock(state: &Shared) -> Result<MutexGuard<'_, EditorState>> {
    state
        .lock()
        .map_err(|_| Error::Internal("editor state lock poisoned".into()))
}

/// Nodes that show the selection.
#[derive(Debug, Clone, Copy)]
struct Panel {
    /// Status line.
    status: NodeId,
    /// One number box per [`Field`], in [`Field::ALL`] order.
    fields: [NodeId; 4],
}

impl Panel {
    /// Push the selection into the status line and property grid.
    fn refresh(self, state: &Shared, ctx: &mut dyn Context) -> Result<()> {
        // Copy out first: widget updates must not run under the lock.
        let (status, values) = {
            let s = lock(state)?;
            let values = s
                .selected
                .and_then(|id| s.scene.get(id))
                .map(|o| Field::ALL.map(|f| o.get(f)));
            (s.status(), values)
        };
        ctx.with_widget(self.status, |l: &mut Label, ctx| {
            l.set_text(status.clone());
            ctx.relayout();
            Ok(())
        })?;
        let values = values.unwrap_or([0.0; 4]);
        for (id, value) in self.fields.iter().zip(values) {
            ctx.with_widget(*id, |nb: &mut NumberBox, ctx| nb.set_value(ctx, value))?;
        }
        Ok(())
    }
}

/// Select a scene object in the hierarchy, or clear the selection.
fn select_object(
    ctx: &mut dyn Context,
    list: NodeId,
    picked: Option<ObjectId>,
    state: &Shared,
    panel: Panel,
) -> Result<()> {
    match picked {
        Some(obj) => ctx.with_widget(list, |l: &mut List<ObjectId>, ctx| {
            match l.find(|p| *p == obj) {
                Some(item) => l.select(ctx, item),
                None => Ok(()),
            }
        }),
        None => {
            ctx.with_widget(list, |l: &mut List<ObjectId>, ctx| l.deselect(ctx))?;
            lock(state)?.selected = None;
            panel.refresh(state, ctx)
        }
    }
}

/// Add a new object to the world group and the hierarchy.
fn add_object(ctx: &mut dyn Context, list: NodeId, state: &Shared) -> Result<()> {
    let (id, name) = {
        let mut s = lock(state)?;
        let name = format!("Cube {}", s.scene.len());
        let id = s.scene.add(name.clone(), Some(WORLD), [300.0, 200.0, 40.0, 40.0]);
        (id, name)
    };
    info!(?id, name, "object added");
    ctx.with_widget(list, |l: &mut List<ObjectId>, ctx| {
        let parent = l.find(|p| *p == WORLD);
        l.push(ctx, parent, ListItem::new(name.clone(), id))?;
        Ok(())
    })
}

/// The editor shell. Its panels are built when it mounts.
pub struct Editor {
    /// Shared state.
    state: Shared,
    /// Hierarchy list node, once mounted.
    list: Option<NodeId>,
}

impl Editor {
    /// An editor over `scene` with the first tool active.
    pub fn new(scene: Scene) -> Self {
        Self {
            state: Arc::new(Mutex::new(EditorState {
                scene,
                selected: None,
                tool: TOOLS[0].to_string(),
            })),
            list: None,
        }
    }

    /// The shared state.
    pub fn state(&self) -> Shared {
        Arc::clone(&self.state)
    }

    /// The hierarchy list node.
    pub fn list(&self) -> Option<NodeId> {
        self.list
    }

    /// Build the property grid. Returns the number box for each field.
    fn properties(&self, ctx: &mut dyn Context) -> Result<[NodeId; 4]> {
        let me = ctx.node_id();
        let column = Container::column().width(Sizing::Fixed(PROPERTIES_WIDTH));
        let panel = ctx.add_placed(me, column, Placement::Dock(DockSlot::Right))?;
        ctx.add_child_to(panel, Label::new("Properties"))?;
        let grid = ctx.add_child_to(panel, Container::grid(Field::ALL.len(), 2))?;

        let mut fields = [me; 4];
        for (row, field) in Field::ALL.into_iter().enumerate() {
            ctx.add_placed(grid, Label::new(field.label()), Placement::Cell { row, column: 0 })?;
            let state = Arc::clone(&self.state);
            let input = NumberBox::new(NumberKind::Float, 0.0).on_commit(move |value, _| {
                let mut s = lock(&state)?;
                let Some(id) = s.selected else {
                    return Ok(());
                };
                if let Some(o) = s.scene.get_mut(id) {
                    debug!(?id, field = field.label(), value, "property set");
                    o.set(field, value);
                }
                Ok(())
            });
            fields[row] = ctx.add_placed(grid, input, Placement::Cell { row, column: 1 })?;
        }
        Ok(fields)
    }
}

impl Widget for Editor {
    fn layout(&self) -> Layout {
        Layout::dock()
    }

    fn receive_events(&self) -> bool {
        false
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let me = ctx.node_id();
        let status = ctx.add_placed(me, Label::new(""), Placement::Dock(DockSlot::Bottom))?;
        let panel = Panel {
            status,
            fields: self.properties(ctx)?,
        };

        let items = lock(&self.state)?.scene.items();
        let hierarchy = ScrollContainer::vertical().width(Sizing::Fixed(HIERARCHY_WIDTH));
        let scroll = ctx.add_placed(me, hierarchy, Placement::Dock(DockSlot::Left))?;
        let state = Arc::clone(&self.state);
        let list = List::new(items).on_select(move |id: &ObjectId, ctx| {
            lock(&state)?.selected = Some(*id);
            panel.refresh(&state, ctx)
        });
        let list = ctx.add_child_to(scroll, list)?;
        self.list = Some(list);

        let picker_state = Arc::clone(&self.state);
        let state = Arc::clone(&self.state);
        let viewport = Viewport::new(move |x: f32, y: f32| picker_state.lock().ok()?.scene.object_at(x, y))
            .on_pick(move |picked, ctx| select_object(ctx, list, picked, &state, panel));
        ctx.add_placed(me, viewport, Placement::Dock(DockSlot::Center))?;

        let toolbar = ctx.add_placed(me, Container::row(), Placement::Dock(DockSlot::Top))?;
        let state = Arc::clone(&self.state);
        let add = Button::new("Add").on_click(move |ctx| add_object(ctx, list, &state));
        ctx.add_child_to(toolbar, add)?;
        let state = Arc::clone(&self.state);
        let tools = Dropdown::new(TOOLS).on_change(move |_, text, ctx| {
            lock(&state)?.tool = text.to_string();
            panel.refresh(&state, ctx)
        });
        ctx.add_child_to(toolbar, tools)?;

        panel.refresh(&self.state, ctx)
    }
}
