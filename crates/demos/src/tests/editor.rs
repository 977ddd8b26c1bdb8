use trellis::{
    TypedId,
    error::Result,
    geom::BoundingBox,
    testing::Harness,
    widgets::{List, ObjectId},
};

use crate::{
    editor::{DEMO_SCRIPT, Editor, Scene, WORLD},
    script,
};

/// An 800x600 harness holding a sample editor.
fn editor() -> Result<(Harness, TypedId<Editor>)> {
    let mut h = Harness::builder().size(800.0, 600.0).build();
    let id = h.add(Editor::new(Scene::sample()))?;
    h.frame()?;
    Ok((h, id))
}

/// The editor's hierarchy labels in row order.
fn rows(h: &Harness, id: TypedId<Editor>) -> String {
    let list = h.widget(id).and_then(Editor::list).unwrap();
    h.core()
        .widget::<List<ObjectId>>(list)
        .unwrap()
        .row_labels()
        .join(",")
}

#[test]
fn panels_dock_around_the_viewport() -> Result<()> {
    let (h, id) = editor()?;
    let list = h.widget(id).and_then(Editor::list).unwrap();
    let scroll = h.core().node(list).and_then(|n| n.parent()).unwrap();
    assert_eq!(h.bbox(scroll), BoundingBox::new(0.0, 23.0, 180.0, 562.0));
    assert_eq!(rows(&h, id), "World");
    let state = h.widget(id).unwrap().state();
    assert_eq!(state.lock().unwrap().status(), "nothing selected | Select");
    Ok(())
}

#[test]
fn viewport_pick_selects_in_the_hierarchy() -> Result<()> {
    let (mut h, id) = editor()?;
    h.click(8.0, 31.0)?;
    assert_eq!(rows(&h, id), "World,Ground,Props,Crate,Barrel,Lights,Sun");

    h.click(480.0, 80.0)?;
    let state = h.widget(id).unwrap().state();
    assert_eq!(state.lock().unwrap().selected, Some(ObjectId(6)));

    // Empty space clears the selection.
    h.click(300.0, 100.0)?;
    assert_eq!(state.lock().unwrap().selected, None);
    Ok(())
}

#[test]
fn demo_script_edits_the_scene() -> Result<()> {
    let (mut h, id) = editor()?;
    script::run(&mut h.gui, &script::parse(DEMO_SCRIPT)?)?;

    let state = h.widget(id).unwrap().state();
    let s = state.lock().unwrap();
    let barrel = s.scene.get(ObjectId(4)).unwrap();
    assert_eq!(s.selected, Some(barrel.id));
    assert_eq!((barrel.x, barrel.h), (401.0, 75.0));
    assert_eq!(s.tool, "Move");
    assert_eq!(s.scene.len(), 8);
    assert_eq!(s.scene.get(ObjectId(7)).unwrap().parent, Some(WORLD));
    drop(s);

    assert_eq!(
        rows(&h, id),
        "World,Ground,Props,Crate,Barrel,Lights,Sun,Cube 7"
    );
    assert!(!h.core().has_overlays());
    assert_eq!(h.log.stray_detaches(), 0);
    Ok(())
}
