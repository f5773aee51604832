//! Level files loaded through the built-in registry, end to end

use std::path::PathBuf;

use glam::DVec2;
use serde_json::json;

use jack_of_blades::assets::AnimationLibrary;
use jack_of_blades::sim::{
    CollisionType, DynamicObject, Level, LevelObject, LoadContext, ObjectRegistry, Player,
    StaticObject,
};
use jack_of_blades::{LevelError, Rect, Settings};

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load(doc: serde_json::Value) -> jack_of_blades::Result<Level> {
    let animations = AnimationLibrary::new();
    let settings = Settings::default();
    let ctx = LoadContext::new(&animations, &settings);
    let registry = ObjectRegistry::builtin()?;
    Level::from_value(&doc, &registry, &ctx)
}

// ============================================================
// Loading
// ============================================================

#[test]
fn test_blocking_object_is_reported() {
    let level = load(json!({
        "name": "test",
        "objects": [
            { "type": "level_floor", "area": [0, 0, 100, 100] },
            {
                "type": "level_object",
                "collision": [40, 40, 20, 20],
                "collision_type": 3,
                "walkable": false
            }
        ]
    }))
    .unwrap();

    assert_eq!(level.name(), "test");
    assert_eq!(level.len(), 2);
    assert_eq!(level.collision_index().len(), 2);

    let hit = level.colliding(Rect::new(35.0, 35.0, 10.0, 10.0), None);
    assert!(hit.hit);
    assert_eq!(hit.max_collider_status, CollisionType::BlockAll);
    assert_eq!(hit.objects.len(), 2);
    assert!(!hit.walkable);
}

#[test]
fn test_floor_alone_is_walkable() {
    let level = load(json!({
        "name": "floor",
        "objects": [{ "type": "level_floor", "area": [0, 0, 100, 100] }]
    }))
    .unwrap();

    let hit = level.colliding(Rect::new(10.0, 10.0, 5.0, 5.0), None);
    assert!(hit.hit);
    assert!(hit.walkable);
    assert_eq!(hit.max_collider_status, CollisionType::NoCollision);

    let miss = level.colliding(Rect::new(500.0, 500.0, 5.0, 5.0), None);
    assert!(!miss.hit);
    assert!(miss.objects.is_empty());
}

#[test]
fn test_malformed_entries_fail_the_whole_load() {
    let cases = [
        // Missing required key
        json!({ "name": "bad", "objects": [{ "type": "level_floor" }] }),
        // Wrong JSON type
        json!({ "name": "bad", "objects": [{ "type": "level_object", "walkable": "yes" }] }),
        // Wrong arity
        json!({ "name": "bad", "objects": [{ "type": "level_object", "collision": [1, 2, 3] }] }),
        // Unknown type
        json!({ "name": "bad", "objects": [{ "type": "level_dragon" }] }),
    ];

    for doc in cases {
        let err = load(doc.clone()).err();
        assert!(
            matches!(err, Some(LevelError::Object { index: 0, .. })),
            "expected an object error for {doc}, got {err:?}"
        );
    }
}

#[test]
fn test_error_names_the_failing_entry() {
    let err = load(json!({
        "name": "bad",
        "objects": [
            { "type": "level_floor", "area": [0, 0, 10, 10] },
            { "type": "level_object", "collision_type": 9 }
        ]
    }))
    .unwrap_err();

    match err {
        LevelError::Object { index, type_id, source } => {
            assert_eq!(index, 1);
            assert_eq!(type_id, "level_object");
            assert!(matches!(*source, LevelError::OutOfRange { ref key, .. } if key == "collision_type"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_document_shape_is_checked() {
    assert!(matches!(
        load(json!({ "objects": [] })),
        Err(LevelError::MissingKey { ref key, .. }) if key == "name"
    ));
    assert!(matches!(
        load(json!({ "name": "bad", "objects": {} })),
        Err(LevelError::WrongType { ref key, .. }) if key == "objects"
    ));

    let registry = ObjectRegistry::builtin().unwrap();
    let animations = AnimationLibrary::new();
    let settings = Settings::default();
    let ctx = LoadContext::new(&animations, &settings);
    assert!(matches!(
        Level::from_json("{ not json", &registry, &ctx),
        Err(LevelError::Json(_))
    ));
}

#[test]
fn test_registry_round_trip() {
    let registry = ObjectRegistry::builtin().unwrap();
    let animations = AnimationLibrary::new();
    let settings = Settings::default();
    let ctx = LoadContext::new(&animations, &settings);

    let entry = json!({
        "type": "level_object",
        "collision": [4, 8, 15, 16],
        "collision_type": 2,
        "walkable": false
    });
    let handle = registry.create("level_object", &entry, &ctx).unwrap();
    let data = registry.serialize("level_object", &*handle.borrow()).unwrap();

    let copy = registry.create("level_object", &data, &ctx).unwrap();
    let copy = copy.borrow();
    assert_eq!(copy.body().rect(), Rect::new(4.0, 8.0, 15.0, 16.0));
    assert_eq!(copy.body().collision_type(), CollisionType::from_u32(2).unwrap());
    assert!(!copy.body().walkable());

    assert!(matches!(
        registry.serialize("level_floor", &*handle.borrow()),
        Err(LevelError::TypeMismatch(_))
    ));
}

// ============================================================
// Movement and queries
// ============================================================

#[test]
fn test_move_into_wall_is_rejected() {
    let mut level = Level::new("walls");
    level.spawn(StaticObject::new(Rect::new(20.0, 0.0, 10.0, 10.0), CollisionType::BlockAll, false));
    let mover = level.spawn(DynamicObject::new(Rect::new(0.0, 0.0, 10.0, 10.0), CollisionType::BlockAll, true));

    mover.borrow_mut().move_by(DVec2::new(50.0, 0.0), false, &mut level);

    let mover = mover.borrow();
    assert_eq!(mover.body().rect().x, 0.0);
    assert_eq!(mover.motion.last_movement.x, 0.0);
}

#[test]
fn test_ray_cast_returns_hits_nearest_first() {
    let mut level = Level::new("rays");
    let far = level.spawn(StaticObject::new(Rect::new(80.0, -5.0, 10.0, 10.0), CollisionType::BlockAll, false));
    let near = level.spawn(StaticObject::new(Rect::new(20.0, -5.0, 10.0, 10.0), CollisionType::BlockAll, false));

    let hit = level.ray_cast(DVec2::ZERO, DVec2::new(100.0, 0.0), None, false, CollisionType::NoCollision);
    assert!(hit.hit);
    assert_eq!(hit.objects.len(), 2);
    assert!(hit.objects[0].is(near.borrow().body()));
    assert!(hit.objects[1].is(far.borrow().body()));

    let closest = level.ray_cast(DVec2::ZERO, DVec2::new(100.0, 0.0), None, true, CollisionType::NoCollision);
    assert_eq!(closest.objects.len(), 1);
    assert!(closest.objects[0].is(near.borrow().body()));

    // Results outlive a destroy of the object they name
    let id = hit.objects[0].id().unwrap();
    assert!(level.force_destroy(id));
    assert_eq!(hit.objects[0].rect(), Rect::new(20.0, -5.0, 10.0, 10.0));
    assert!(!hit.objects[0].body().is_attached());
}

// ============================================================
// Shipped content
// ============================================================

#[test]
fn test_example_level_loads_and_runs() {
    let animations = AnimationLibrary::load_dir(manifest_path("data/animation")).unwrap();
    let settings = Settings::load(manifest_path("settings.json"));
    let ctx = LoadContext::new(&animations, &settings);
    let registry = ObjectRegistry::builtin().unwrap();

    let mut level = Level::load(manifest_path("data/level/example.json"), &registry, &ctx).unwrap();
    let loaded = level.len();
    assert!(loaded > 0);
    assert_eq!(level.collision_index().len(), loaded);

    level.start();
    // One sprite and one player spawn on start
    assert_eq!(level.len(), loaded + 2);
    assert!(level.objects().iter().any(|e| e.downcast::<Player>().is_some()));

    for _ in 0..120 {
        level.update(jack_of_blades::consts::SIM_DT);
    }
    assert_eq!(level.len(), level.collision_index().len());
}

#[test]
fn test_missing_level_file_is_io_error() {
    let animations = AnimationLibrary::new();
    let settings = Settings::default();
    let ctx = LoadContext::new(&animations, &settings);
    let registry = ObjectRegistry::builtin().unwrap();
    assert!(matches!(
        Level::load(manifest_path("data/level/does_not_exist.json"), &registry, &ctx),
        Err(LevelError::Io { .. })
    ));
}
