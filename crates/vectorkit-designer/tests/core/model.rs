use vectorkit_designer::model::{
    ObjectKind, OverlayKind, PathSampleable, Point, Rect, SceneObject, Transform, VectorPath,
};
use vectorkit_designer::sampler::SampleShape;

#[test]
fn test_object_round_trips_through_json() {
    let obj = SceneObject::new(ObjectKind::Polygon {
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ],
    })
    .with_transform(Transform::scale(1.5, 1.5).then_translate(lyon::geom::vector(3.0, 4.0)));

    let json = serde_json::to_string(&obj).unwrap();
    assert!(json.contains(r#""type":"polygon""#));
    let back: SceneObject = serde_json::from_str(&json).unwrap();
    assert_eq!(back, obj);
}

#[test]
fn test_nested_group_round_trip() {
    let inner = SceneObject::new(ObjectKind::Group {
        children: vec![SceneObject::new(ObjectKind::Text {
            content: "x".into(),
            font_size: 12.0,
        })],
    });
    let outer = SceneObject::new(ObjectKind::Group {
        children: vec![inner, SceneObject::new(ObjectKind::Ellipse { rx: 3.0, ry: 2.0 })],
    });
    let json = serde_json::to_string(&outer).unwrap();
    let back: SceneObject = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outer);
}

#[test]
fn test_capabilities_per_kind() {
    let kinds = [
        (ObjectKind::Rectangle { width: 1.0, height: 1.0 }, true, true),
        (ObjectKind::Circle { radius: 1.0 }, true, true),
        (
            ObjectKind::Text {
                content: "a".into(),
                font_size: 10.0,
            },
            true,
            false,
        ),
        (
            ObjectKind::Overlay {
                overlay: OverlayKind::Handle,
                path: VectorPath::new(),
            },
            false,
            false,
        ),
        (
            ObjectKind::EraseStroke {
                path: VectorPath::new(),
                width: 4.0,
            },
            false,
            false,
        ),
    ];
    for (kind, erasable, sampleable) in kinds {
        let caps = kind.capabilities();
        assert_eq!(caps.erasable, erasable, "{}", kind.type_name());
        assert_eq!(caps.path_sampleable, sampleable, "{}", kind.type_name());
    }
}

#[test]
fn test_rotated_rectangle_bounds() {
    let obj = SceneObject::new(ObjectKind::Rectangle {
        width: 10.0,
        height: 10.0,
    })
    .with_transform(Transform::rotation(lyon::geom::euclid::Angle::degrees(45.0)));
    let bounds = obj.bounding_rect().unwrap();
    let diagonal = 200f64.sqrt();
    assert!((bounds.width() - diagonal).abs() < 1e-9);
    assert!((bounds.height() - diagonal).abs() < 1e-9);
}

#[test]
fn test_rectangle_outline_is_closed_in_canvas_space() {
    let obj = SceneObject::new(ObjectKind::Rectangle {
        width: 20.0,
        height: 10.0,
    })
    .at(5.0, 5.0);
    match obj.sample_shape() {
        SampleShape::Polyline(points) => {
            assert_eq!(points.len(), 5);
            assert_eq!(points[0], Point::new(5.0, 5.0));
            assert_eq!(points[0], points[4]);
            let bounds = Rect::from_points(&points).unwrap();
            assert_eq!(bounds, Rect::new(5.0, 5.0, 25.0, 15.0));
        }
        other => panic!("expected polyline, got {other:?}"),
    }
}
