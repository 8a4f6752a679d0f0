use proptest::prelude::*;
use vectorkit_core::ObjectId;
use vectorkit_designer::history::{compress, HistoryManager, SceneDiff, SceneState};
use vectorkit_designer::model::{ObjectKind, SceneObject};
use vectorkit_designer::scene::{Scene, SceneGraph};
use vectorkit_settings::HistorySettings;

#[derive(Debug, Clone)]
enum Op {
    Add(f64),
    Move(usize, f64),
    Remove(usize),
    Background(Option<String>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-500.0f64..500.0).prop_map(Op::Add),
        (0usize..16, -50.0f64..50.0).prop_map(|(i, dx)| Op::Move(i, dx)),
        (0usize..16).prop_map(Op::Remove),
        prop::option::of("#[0-9a-f]{6}").prop_map(Op::Background),
    ]
}

fn apply(scene: &mut Scene, op: &Op) {
    let ids = scene.object_ids();
    match op {
        Op::Add(x) => {
            scene.add_object(
                SceneObject::new(ObjectKind::Rectangle {
                    width: 10.0,
                    height: 4.0,
                })
                .at(*x, 0.0),
            );
        }
        Op::Move(i, dx) => {
            if !ids.is_empty() {
                scene.translate_object(ids[i % ids.len()], *dx, 1.0).unwrap();
            }
        }
        Op::Remove(i) => {
            if !ids.is_empty() {
                scene.remove_object(ids[i % ids.len()]);
            }
        }
        Op::Background(bg) => scene.set_background(bg.clone()),
    }
}

fn restored(history: &HistoryManager, step: usize) -> String {
    let mut scene = Scene::new();
    history.restore_state(&mut scene, step).unwrap();
    scene.serialize_scene().unwrap()
}

fn rect_scene(count: usize) -> Scene {
    let mut scene = Scene::new();
    for i in 0..count {
        scene.add_object(
            SceneObject::new(ObjectKind::Rectangle {
                width: 10.0,
                height: 10.0,
            })
            .at(i as f64 * 12.0, 0.0),
        );
    }
    scene
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_step_restores_exactly(ops in prop::collection::vec(op_strategy(), 1..12)) {
        let mut scene = Scene::new();
        let mut history = HistoryManager::new();
        let mut recorded = vec![scene.serialize_scene().unwrap()];
        history.save_state(&scene).unwrap();

        for op in &ops {
            apply(&mut scene, op);
            history.save_state(&scene).unwrap();
            recorded.push(scene.serialize_scene().unwrap());
        }

        prop_assert_eq!(history.history_length(), recorded.len());
        for (step, expected) in recorded.iter().enumerate() {
            prop_assert_eq!(&restored(&history, step), expected);
        }

        for entry in history.entries() {
            if let Some(base) = entry.base_index() {
                prop_assert!(!history.entries()[base].is_diff());
            }
        }

        // walk all the way back and forward again
        let mut live = scene.clone();
        let mut step = recorded.len() - 1;
        while history.undo(&mut live).unwrap() {
            step -= 1;
            prop_assert_eq!(&live.serialize_scene().unwrap(), &recorded[step]);
        }
        prop_assert_eq!(step, 0);
        while history.redo(&mut live).unwrap() {
            step += 1;
            prop_assert_eq!(&live.serialize_scene().unwrap(), &recorded[step]);
        }
        prop_assert_eq!(step, recorded.len() - 1);
    }
}

#[test]
fn test_coordinates_restore_bit_exact() {
    let x = -10.576648639783599;
    let mut scene = Scene::new();
    let mut history = HistoryManager::new();
    history.save_state(&scene).unwrap();
    let id = scene.add_object(
        SceneObject::new(ObjectKind::Rectangle {
            width: 10.0,
            height: 4.0,
        })
        .at(x, 0.0),
    );
    history.save_state(&scene).unwrap();

    let mut moved = rect_scene(40);
    let mut diffed = HistoryManager::new();
    diffed.save_state(&moved).unwrap();
    let target = moved.object_ids()[3];
    moved.translate_object(target, x, 0.1).unwrap();
    diffed.save_state(&moved).unwrap();
    assert!(diffed.snapshot(1).unwrap().is_diff());

    for (history, scene, step, id) in [(&history, &scene, 1, id), (&diffed, &moved, 1, target)] {
        let mut live = Scene::new();
        history.restore_state(&mut live, step).unwrap();
        let expected = scene.object(id).unwrap().transform;
        assert_eq!(live.object(id).unwrap().transform.m31.to_bits(), expected.m31.to_bits());
        assert_eq!(live.serialize_scene().unwrap(), scene.serialize_scene().unwrap());
    }
}

#[test]
fn test_small_change_stored_as_diff() {
    let mut scene = rect_scene(40);
    let mut history = HistoryManager::new();
    history.save_state(&scene).unwrap();

    let target = scene.object_ids()[7];
    scene.translate_object(target, 3.0, 3.0).unwrap();
    history.save_state(&scene).unwrap();

    let entry = history.snapshot(1).unwrap();
    assert!(entry.is_diff());
    assert_eq!(entry.base_index(), Some(0));
    assert!(entry.payload().len() < history.snapshot(0).unwrap().payload().len());
    assert_eq!(restored(&history, 1), scene.serialize_scene().unwrap());
}

#[test]
fn test_large_diff_falls_back_to_full() {
    let settings = HistorySettings {
        diff_threshold: 0.01,
        ..HistorySettings::default()
    };
    let mut scene = rect_scene(10);
    let mut history = HistoryManager::with_settings(settings);
    history.save_state(&scene).unwrap();
    let before = scene.serialize_scene().unwrap();

    for id in scene.object_ids() {
        scene.translate_object(id, 1.0, 0.0).unwrap();
    }
    let text = scene.serialize_scene().unwrap();
    let diff = SceneDiff::between(
        &SceneState::parse(&before).unwrap(),
        &SceneState::parse(&text).unwrap(),
    )
    .unwrap();
    let payload = compress(&serde_json::to_string(&diff).unwrap()).unwrap();
    assert!(payload.len() as f64 > 0.01 * text.len() as f64);

    history.save_state(&scene).unwrap();
    assert!(!history.snapshot(1).unwrap().is_diff());
    assert_eq!(restored(&history, 1), text);
}

#[test]
fn test_diffs_never_chain() {
    let mut scene = rect_scene(40);
    let mut history = HistoryManager::new();
    history.save_state(&scene).unwrap();
    let ids = scene.object_ids();
    for step in 1..6 {
        scene.translate_object(ids[step], 1.0, 1.0).unwrap();
        history.save_state(&scene).unwrap();
    }

    let kinds: Vec<bool> = history.entries().iter().map(|e| e.is_diff()).collect();
    // steps 2 and 4 follow a diff, step 5 is a checkpoint
    assert_eq!(kinds, vec![false, true, false, true, false, false]);
    assert_eq!(history.snapshot(3).unwrap().base_index(), Some(2));
}

#[test]
fn test_pruning_bounds_history() {
    let settings = HistorySettings {
        max_size: 5,
        ..HistorySettings::default()
    };
    let mut scene = rect_scene(30);
    let mut history = HistoryManager::with_settings(settings);
    let mut recorded = Vec::new();
    let ids = scene.object_ids();
    for step in 0..12 {
        scene.translate_object(ids[step], 2.0, 0.0).unwrap();
        history.save_state(&scene).unwrap();
        recorded.push(scene.serialize_scene().unwrap());
    }

    assert_eq!(history.history_length(), 5);
    assert_eq!(history.current_step(), Some(4));
    assert!(!history.entries()[0].is_diff());
    for (step, expected) in recorded[7..].iter().enumerate() {
        assert_eq!(&restored(&history, step), expected);
    }
    for (i, entry) in history.entries().iter().enumerate() {
        if let Some(base) = entry.base_index() {
            assert!(base < i);
        }
    }
}

#[test]
fn test_checkpoints_keep_absolute_spacing_once_full() {
    let settings = HistorySettings {
        max_size: 5,
        ..HistorySettings::default()
    };
    let mut scene = rect_scene(40);
    let mut history = HistoryManager::with_settings(settings);
    let ids = scene.object_ids();
    for step in 0..12 {
        scene.translate_object(ids[step], 1.0, 1.0).unwrap();
        history.save_state(&scene).unwrap();
    }

    // retained steps 7..=11; step 10 is the checkpoint, 8 and 11 are diffs
    let kinds: Vec<bool> = history.entries().iter().map(|e| e.is_diff()).collect();
    assert_eq!(kinds, vec![false, true, false, false, true]);
    assert_eq!(history.snapshot(1).unwrap().base_index(), Some(0));
    assert_eq!(history.snapshot(4).unwrap().base_index(), Some(3));
}

#[test]
fn test_full_record_restores_alone() {
    let mut scene = rect_scene(3);
    let mut history = HistoryManager::new();
    history.save_state(&scene).unwrap();
    scene.set_background(Some("#102030".to_string()));
    history.save_state(&scene).unwrap();
    scene.translate_object(ObjectId::new(2), 5.0, 5.0).unwrap();
    history.save_state(&scene).unwrap();

    let records = history.to_records();
    let (index, full) = records
        .iter()
        .enumerate()
        .rev()
        .find(|(_, r)| !r.is_diff)
        .unwrap();
    let alone =
        HistoryManager::from_records(std::slice::from_ref(full), HistorySettings::default())
            .unwrap();
    assert_eq!(restored(&alone, 0), restored(&history, index));
}

#[test]
fn test_records_round_trip() {
    let mut scene = rect_scene(40);
    let mut history = HistoryManager::new();
    history.save_state(&scene).unwrap();
    for id in scene.object_ids().into_iter().take(4) {
        scene.translate_object(id, 0.0, 9.0).unwrap();
        history.save_state(&scene).unwrap();
    }

    let records = history.to_records();
    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[1]["isDiff"], true);
    assert_eq!(json[1]["baseIndex"], 0);
    assert!(json[0].get("baseIndex").is_none());
    assert_eq!(json[0]["objectCount"], 40);

    let rebuilt = HistoryManager::from_records(&records, HistorySettings::default()).unwrap();
    assert_eq!(rebuilt.history_length(), history.history_length());
    assert_eq!(rebuilt.current_step(), Some(4));
    for step in 0..history.history_length() {
        assert_eq!(rebuilt.state_text(step).unwrap(), history.state_text(step).unwrap());
    }
    let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_clear_resets() {
    let scene = rect_scene(2);
    let mut history = HistoryManager::new();
    history.save_state(&scene).unwrap();
    history.save_state(&scene).unwrap();
    assert!(history.can_undo());
    history.clear();
    assert_eq!(history.history_length(), 0);
    assert!(!history.can_undo());
    assert_eq!(history.memory_usage(), 0);
}
