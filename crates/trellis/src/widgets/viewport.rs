//! A window onto an external scene view.
//!
//! The scene draws itself outside the GUI. The widget reserves its area in
//! the layout and asks an [`ObjectPicker`] what lies under a press. Scene
//! picking never looks at the widget tree.

use tracing::debug;

use crate::{
    Context,
    error::Result,
    event::{Button, Event},
    layout::Layout,
    widget::{EventOutcome, Widget},
};

/// Identifies an object in the external scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Finds scene objects by screen position.
pub trait ObjectPicker: Send {
    /// The object drawn at a screen position, if any.
    fn object_at(&self, x: f32, y: f32) -> Option<ObjectId>;
}

impl<F> ObjectPicker for F
where
    F: Fn(f32, f32) -> Option<ObjectId> + Send,
{
    fn object_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        self(x, y)
    }
}

/// Receives the result of a pick.
type PickCallback = Box<dyn FnMut(Option<ObjectId>, &mut dyn Context) -> Result<()> + Send>;

/// A leaf that fills its slot and reports scene picks on left presses.
pub struct Viewport {
    /// Scene lookup.
    picker: Box<dyn ObjectPicker>,
    /// Pick callback.
    on_pick: Option<PickCallback>,
    /// Result of the latest pick.
    picked: Option<ObjectId>,
}

impl Viewport {
    /// A viewport backed by `picker`.
    pub fn new(picker: impl ObjectPicker + 'static) -> Self {
        Self {
            picker: Box::new(picker),
            on_pick: None,
            picked: None,
        }
    }

    /// Set the pick callback. It also runs for presses that hit nothing.
    pub fn on_pick(
        mut self,
        f: impl FnMut(Option<ObjectId>, &mut dyn Context) -> Result<()> + Send + 'static,
    ) -> Self {
        self.on_pick = Some(Box::new(f));
        self
    }

    /// The object found by the latest press.
    pub fn picked(&self) -> Option<ObjectId> {
        self.picked
    }
}

impl Widget for Viewport {
    fn layout(&self) -> Layout {
        Layout::single()
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        let Event::Press(Button::Left) = event else {
            return Ok(EventOutcome::Ignore);
        };
        let at = ctx.cursor();
        self.picked = self.picker.object_at(at.x, at.y);
        debug!(x = at.x, y = at.y, picked = ?self.picked, "viewport pick");
        if let Some(f) = self.on_pick.as_mut() {
            f(self.picked, ctx)?;
        }
        Ok(EventOutcome::Handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::testing::Harness;

    #[test]
    fn presses_pick_scene_objects() {
        let mut h = Harness::new();
        let picks = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&picks);
        let vp = h
            .add(
                Viewport::new(|x: f32, _y: f32| (x < 100.0).then_some(ObjectId(7))).on_pick(
                    move |picked, _| {
                        log.lock().unwrap().push(picked);
                        Ok(())
                    },
                ),
            )
            .unwrap();
        h.frame().unwrap();

        h.click(50.0, 50.0).unwrap();
        assert_eq!(h.widget(vp).unwrap().picked(), Some(ObjectId(7)));
        h.click(300.0, 50.0).unwrap();
        assert_eq!(h.widget(vp).unwrap().picked(), None);
        assert_eq!(*picks.lock().unwrap(), vec![Some(ObjectId(7)), None]);
    }
}
