use vectorkit_core::ObjectId;
use vectorkit_designer::model::{ObjectKind, SceneObject};
use vectorkit_designer::scene::{Scene, SceneDocument, SceneGraph};

fn rect(x: f64, y: f64) -> SceneObject {
    SceneObject::new(ObjectKind::Rectangle {
        width: 10.0,
        height: 10.0,
    })
    .at(x, y)
}

#[test]
fn test_scene_queries() {
    let mut scene = Scene::new();
    let id = scene.add_object(rect(5.0, 5.0));

    let bounds = scene.bounding_rect(id).unwrap();
    assert_eq!((bounds.min_x, bounds.max_x), (5.0, 15.0));
    let matrix = scene.transform_matrix(id).unwrap();
    assert_eq!((matrix.m31, matrix.m32), (5.0, 5.0));
    assert!(scene.bounding_rect(ObjectId::new(99)).is_none());
}

#[test]
fn test_remove_object() {
    let mut scene = Scene::new();
    let a = scene.add_object(rect(0.0, 0.0));
    let b = scene.add_object(rect(20.0, 0.0));
    assert!(scene.remove_object(a).is_some());
    assert!(scene.remove_object(a).is_none());
    assert_eq!(scene.object_ids(), vec![b]);
}

#[test]
fn test_add_keeps_unused_explicit_id() {
    let mut scene = Scene::new();
    let mut obj = rect(0.0, 0.0);
    obj.id = ObjectId::new(10);
    assert_eq!(scene.add_object(obj.clone()), ObjectId::new(10));
    // duplicate id gets a fresh one
    assert_eq!(scene.add_object(obj), ObjectId::new(11));
}

#[test]
fn test_document_shape() {
    let mut scene = Scene::new();
    scene.add_object(rect(1.0, 2.0));
    let text = scene.serialize_scene().unwrap();
    let document: SceneDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(document.version, 1);
    assert_eq!(document.objects.len(), 1);
    assert!(document.background.is_none());

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["objects"][0]["id"], 1);
    assert_eq!(value["objects"][0]["type"], "rectangle");
}

#[test]
fn test_interaction_flags() {
    let mut scene = Scene::new();
    let id = scene.add_object(rect(0.0, 0.0));
    assert_eq!(scene.is_interactive(id), Some(true));
    assert!(scene.set_interactive(id, false));
    assert_eq!(scene.is_interactive(id), Some(false));
    assert!(!scene.set_interactive(ObjectId::new(50), false));
}
