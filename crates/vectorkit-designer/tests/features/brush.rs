use vectorkit_core::{shared, Shared};
use vectorkit_designer::brush::{BrushState, MembraneBrush};
use vectorkit_designer::model::{ObjectKind, SceneObject};
use vectorkit_designer::scene::{Scene, SceneGraph};
use vectorkit_designer::tools::InteractiveTool;
use vectorkit_settings::BrushSettings;

fn setup(settings: BrushSettings) -> (Shared<Scene>, MembraneBrush<Scene>) {
    let scene = shared(Scene::new());
    let brush = MembraneBrush::new(scene.clone(), settings);
    (scene, brush)
}

fn children(scene: &Scene, id: vectorkit_core::ObjectId) -> Vec<SceneObject> {
    match &scene.object(id).unwrap().kind {
        ObjectKind::Group { children } => children.clone(),
        other => panic!("expected group, got {other:?}"),
    }
}

#[test]
fn test_straight_stroke_places_four_instances() {
    let (scene, mut brush) = setup(BrushSettings::default());
    brush.start();
    brush.add_point(0.0, 0.0);
    brush.add_point(100.0, 0.0);
    let id = brush.finish().unwrap();

    assert_eq!(brush.state(), BrushState::Committed);
    let scene = scene.borrow();
    assert_eq!(scene.len(), 1);
    assert_eq!(children(&scene, id).len(), 4);
    assert_eq!(brush.stroke_meta(id).unwrap().instances, 4);
}

#[test]
fn test_smoothed_collinear_stroke_keeps_length() {
    let (scene, mut brush) = setup(BrushSettings::default());
    brush.start();
    for x in [0.0, 25.0, 50.0, 75.0, 100.0] {
        brush.add_point(x, 10.0);
    }
    let id = brush.finish().unwrap();
    assert_eq!(children(&scene.borrow(), id).len(), 4);
}

#[test]
fn test_double_sided_doubles_instances() {
    let settings = BrushSettings {
        double_sided: true,
        ..BrushSettings::default()
    };
    let (scene, mut brush) = setup(settings);
    brush.start();
    brush.add_point(0.0, 0.0);
    brush.add_point(100.0, 0.0);
    let id = brush.finish().unwrap();

    let instances = children(&scene.borrow(), id);
    assert_eq!(instances.len(), 8);
    let mirrored = &instances[4];
    assert!((mirrored.transform.m32 - 14.0).abs() < 1e-9);
    // rotated half a turn
    assert!((mirrored.transform.m11 + 1.0).abs() < 1e-9);
}

#[test]
fn test_preview_is_translucent_and_non_interactive() {
    let (scene, mut brush) = setup(BrushSettings::default());
    brush.start();
    brush.add_point(0.0, 0.0);
    brush.add_point(60.0, 0.0);
    brush.update_preview(100.0, 0.0);
    assert_eq!(brush.state(), BrushState::Previewing);

    let scene = scene.borrow();
    let previews = brush.preview_ids();
    assert_eq!(previews.len(), 4);
    for id in previews {
        let obj = scene.object(*id).unwrap();
        assert!(!obj.interactive);
        assert_eq!(obj.style.opacity, 0.5);
    }
}

#[test]
fn test_interaction_suspended_during_gesture_and_restored() {
    let (scene, mut brush) = setup(BrushSettings::default());
    let existing = scene
        .borrow_mut()
        .add_object(SceneObject::new(ObjectKind::Circle { radius: 4.0 }));

    brush.start();
    assert_eq!(scene.borrow().is_interactive(existing), Some(false));
    brush.add_point(0.0, 0.0);
    brush.add_point(50.0, 50.0);
    brush.finish().unwrap();
    assert_eq!(scene.borrow().is_interactive(existing), Some(true));

    brush.start();
    assert_eq!(scene.borrow().is_interactive(existing), Some(false));
    brush.cancel();
    assert_eq!(scene.borrow().is_interactive(existing), Some(true));
}

#[test]
fn test_too_few_points_emits_nothing() {
    let (scene, mut brush) = setup(BrushSettings::default());
    brush.start();
    brush.add_point(3.0, 3.0);
    brush.update_preview(3.0, 3.0);
    assert_eq!(brush.finish(), None);
    assert!(scene.borrow().is_empty());
}

#[test]
fn test_cancel_discards_preview() {
    let (scene, mut brush) = setup(BrushSettings::default());
    brush.start();
    brush.add_point(0.0, 0.0);
    brush.update_preview(80.0, 0.0);
    assert!(!scene.borrow().is_empty());
    brush.cancel();
    assert!(scene.borrow().is_empty());
    assert_eq!(brush.state(), BrushState::Cancelled);
    assert!(!brush.is_active());
}

#[test]
fn test_custom_decoration() {
    let (scene, brush) = setup(BrushSettings::default());
    let mut brush = brush.with_decoration(SceneObject::new(ObjectKind::Rectangle {
        width: 4.0,
        height: 4.0,
    }));
    brush.start();
    brush.add_point(0.0, 0.0);
    brush.add_point(100.0, 0.0);
    let id = brush.finish().unwrap();
    let instances = children(&scene.borrow(), id);
    assert!(instances
        .iter()
        .all(|obj| matches!(obj.kind, ObjectKind::Rectangle { .. })));
}
