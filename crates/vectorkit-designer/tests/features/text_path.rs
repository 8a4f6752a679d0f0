use vectorkit_core::{shared, Error, GeometryError, ObjectId, SceneError, Shared};
use vectorkit_designer::model::{ObjectKind, Point, SceneObject, Transform};
use vectorkit_designer::sampler::SampleShape;
use vectorkit_designer::scene::{Scene, SceneGraph};
use vectorkit_designer::text_path::{TextPathEngine, TextPathOptions, TextPathOptionsPatch};
use vectorkit_settings::TextPathSettings;

fn setup() -> (Shared<Scene>, TextPathEngine<Scene>) {
    let scene = shared(Scene::new());
    let engine = TextPathEngine::new(scene.clone(), TextPathSettings::default());
    (scene, engine)
}

fn glyphs(scene: &Scene, group: ObjectId) -> Vec<SceneObject> {
    match &scene.object(group).unwrap().kind {
        ObjectKind::Group { children } => children.clone(),
        other => panic!("expected group, got {other:?}"),
    }
}

fn glyph_position(glyph: &SceneObject) -> Point {
    Point::new(glyph.transform.m31, glyph.transform.m32)
}

#[test]
fn test_text_wraps_circle() {
    let (scene, mut engine) = setup();
    let circle = scene
        .borrow_mut()
        .add_object(SceneObject::new(ObjectKind::Circle { radius: 40.0 }).at(50.0, 50.0));

    let options = engine.defaults();
    let group = engine.create_on_object("HELLO", circle, options).unwrap();

    let scene = scene.borrow();
    let glyphs = glyphs(&scene, group);
    assert_eq!(glyphs.len(), 5);
    let center = Point::new(50.0, 50.0);
    for glyph in &glyphs {
        assert!((glyph_position(glyph).distance_to(&center) - 40.0).abs() < 1e-9);
        assert!(matches!(glyph.kind, ObjectKind::Text { font_size, .. } if font_size == 16.0));
    }
    let contents: String = glyphs
        .iter()
        .map(|g| match &g.kind {
            ObjectKind::Text { content, .. } => content.clone(),
            _ => String::new(),
        })
        .collect();
    assert_eq!(contents, "HELLO");
    assert_eq!(engine.record(group).unwrap().source, Some(circle));
}

#[test]
fn test_update_replaces_group() {
    let (scene, mut engine) = setup();
    let line = SampleShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(300.0, 0.0)]);
    let group = engine
        .create("abc", line, TextPathOptions::default())
        .unwrap();
    scene
        .borrow_mut()
        .transform_object(group, &Transform::translation(0.0, 25.0))
        .unwrap();

    let patch = TextPathOptionsPatch {
        text: Some("abcd".to_string()),
        offset: Some(4.0),
        ..Default::default()
    };
    let rebuilt = engine.update(group, None, &patch).unwrap();
    assert_ne!(rebuilt, group);
    assert!(engine.record(group).is_none());

    let record = engine.record(rebuilt).unwrap();
    assert_eq!(record.text, "abcd");
    assert_eq!(record.options.offset, 4.0);
    assert_eq!(record.options.font_size, 16.0);

    let scene = scene.borrow();
    assert!(scene.object(group).is_none());
    assert_eq!(scene.len(), 1);
    assert_eq!(glyphs(&scene, rebuilt).len(), 4);
    // the move the user made survives the rebuild
    assert_eq!(scene.object(rebuilt).unwrap().transform.m32, 25.0);
}

#[test]
fn test_update_with_new_shape() {
    let (scene, mut engine) = setup();
    let line = SampleShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    let group = engine.create("ab", line, TextPathOptions::default()).unwrap();

    let circle = SampleShape::Circle {
        center: Point::new(0.0, 0.0),
        radius: 10.0,
    };
    let rebuilt = engine
        .update(group, Some(circle.clone()), &TextPathOptionsPatch::default())
        .unwrap();
    assert_eq!(engine.record(rebuilt).unwrap().shape, circle);
    let first = glyphs(&scene.borrow(), rebuilt)[0].clone();
    assert!((glyph_position(&first).distance_to(&Point::new(0.0, 0.0)) - 10.0).abs() < 1e-9);
}

#[test]
fn test_failed_update_keeps_old_group() {
    let (scene, mut engine) = setup();
    let line = SampleShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    let group = engine.create("ab", line, TextPathOptions::default()).unwrap();

    let patch = TextPathOptionsPatch {
        text: Some(String::new()),
        ..Default::default()
    };
    assert!(matches!(
        engine.update(group, None, &patch),
        Err(Error::Geometry(GeometryError::EmptyText))
    ));
    assert!(scene.borrow().object(group).is_some());
    assert!(engine.record(group).is_some());
}

#[test]
fn test_text_target_is_not_sampleable() {
    let (scene, mut engine) = setup();
    let label = scene.borrow_mut().add_object(SceneObject::new(ObjectKind::Text {
        content: "label".to_string(),
        font_size: 12.0,
    }));
    let result = engine.create_on_object("x", label, TextPathOptions::default());
    assert!(matches!(
        result,
        Err(Error::Geometry(GeometryError::NotSampleable { id })) if id == label
    ));
    assert_eq!(scene.borrow().len(), 1);
}

#[test]
fn test_missing_target() {
    let (_scene, mut engine) = setup();
    let result = engine.create_on_object("x", ObjectId::new(9), TextPathOptions::default());
    assert!(matches!(
        result,
        Err(Error::Scene(SceneError::ObjectNotFound { .. }))
    ));
}

#[test]
fn test_long_text_truncated_at_outline_end() {
    let (scene, mut engine) = setup();
    let options = TextPathOptions {
        start_alignment: 0.95,
        ..TextPathOptions::default()
    };
    let line = SampleShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    let group = engine.create("abcdef", line, options).unwrap();
    let count = glyphs(&scene.borrow(), group).len();
    assert!(count < 6);
    assert!(count > 0);
}

#[test]
fn test_forget_drops_record() {
    let (_scene, mut engine) = setup();
    let line = SampleShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    let group = engine.create("ab", line, TextPathOptions::default()).unwrap();
    assert!(engine.forget(group).is_some());
    assert!(engine
        .update(group, None, &TextPathOptionsPatch::default())
        .is_err());
}

#[test]
fn test_update_of_removed_group_fails_and_drops_record() {
    let (scene, mut engine) = setup();
    let line = SampleShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    let group = engine.create("ab", line, TextPathOptions::default()).unwrap();
    scene.borrow_mut().remove_object(group);

    let patch = TextPathOptionsPatch {
        offset: Some(2.0),
        ..Default::default()
    };
    let result = engine.update(group, None, &patch);
    assert!(matches!(
        result,
        Err(Error::Scene(SceneError::ObjectNotFound { id })) if id == group
    ));
    assert!(engine.record(group).is_none());
    assert!(scene.borrow().is_empty());
}
