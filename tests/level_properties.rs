//! Property-based tests using proptest
//!
//! Invariants that must hold for any input:
//! - Rect overlap is symmetric and its area is never negative
//! - Collision queries report the strongest overlapping type
//! - Object list and collision index stay in lockstep through any
//!   sequence of spawns and destroys
//! - A zero move never changes anything

use std::collections::HashSet;

use glam::DVec2;
use proptest::prelude::*;

use jack_of_blades::Rect;
use jack_of_blades::assets::AnimationLibrary;
use jack_of_blades::settings::PlayerTuning;
use jack_of_blades::sim::{
    CollisionType, DynamicObject, Level, LevelObject, Player, PlayerAnimations, StaticObject,
};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-200.0..200.0f64, -200.0..200.0f64, 0.0..100.0f64, 0.0..100.0f64)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn collision_type_strategy() -> impl Strategy<Value = CollisionType> {
    (0u32..4).prop_map(|n| CollisionType::from_u32(n).unwrap_or_default())
}

#[derive(Debug, Clone)]
enum Op {
    SpawnStatic(Rect, CollisionType),
    SpawnDynamic(Rect),
    Destroy(usize),
    ForceDestroy(usize),
    Update,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (rect_strategy(), collision_type_strategy()).prop_map(|(r, t)| Op::SpawnStatic(r, t)),
        rect_strategy().prop_map(Op::SpawnDynamic),
        any::<usize>().prop_map(Op::Destroy),
        any::<usize>().prop_map(Op::ForceDestroy),
        Just(Op::Update),
        Just(Op::Reset),
    ]
}

fn assert_consistent(level: &Level) -> Result<(), TestCaseError> {
    prop_assert_eq!(level.objects().len(), level.collision_index().len());
    let mut ids = HashSet::new();
    for entry in level.collision_index() {
        let id = entry.id();
        prop_assert!(id.is_some(), "detached object left in the collision index");
        prop_assert!(ids.insert(id), "duplicate id {:?}", id);
        prop_assert!(level.objects().iter().any(|o| o.is(entry.body())));
    }
    Ok(())
}

// ============================================================
// Geometry Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_intersects_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn prop_intersection_area_is_non_negative(a in rect_strategy(), b in rect_strategy()) {
        let area = a.intersection_area(&b);
        prop_assert!(area >= 0.0, "negative overlap {area}");
        if !a.intersects(&b) {
            prop_assert_eq!(area, 0.0);
        }
    }
}

// ============================================================
// Query Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_colliding_reports_strongest_type(
        objects in prop::collection::vec((rect_strategy(), collision_type_strategy()), 0..20),
        area in rect_strategy(),
    ) {
        let mut level = Level::new("query");
        for (rect, collision_type) in &objects {
            level.spawn(StaticObject::new(*rect, *collision_type, true));
        }

        let expected = objects
            .iter()
            .filter(|(rect, _)| rect.intersects(&area))
            .map(|(_, collision_type)| *collision_type)
            .max();

        let hit = level.colliding(area, None);
        prop_assert_eq!(hit.hit, expected.is_some());
        prop_assert_eq!(hit.max_collider_status, expected.unwrap_or_default());
        prop_assert_eq!(
            hit.objects.len(),
            objects.iter().filter(|(rect, _)| rect.intersects(&area)).count()
        );
    }
}

// ============================================================
// Lifecycle Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_index_matches_objects(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut level = Level::new("lifecycle");
        level.start();

        for op in ops {
            match op {
                Op::SpawnStatic(rect, collision_type) => {
                    level.spawn(StaticObject::new(rect, collision_type, true));
                }
                Op::SpawnDynamic(rect) => {
                    level.spawn(DynamicObject::new(rect, CollisionType::BlockAll, true));
                }
                Op::Destroy(pick) | Op::ForceDestroy(pick) if !level.is_empty() => {
                    let id = level.objects()[pick % level.len()].id();
                    prop_assert!(id.is_some());
                    if let Some(id) = id {
                        let before = level.len();
                        let removed = match op {
                            Op::Destroy(_) => level.destroy(id),
                            _ => level.force_destroy(id),
                        };
                        prop_assert!(removed);
                        prop_assert_eq!(level.len(), before - 1);
                        prop_assert!(level.object(id).is_none());
                    }
                }
                Op::Destroy(_) | Op::ForceDestroy(_) => {}
                Op::Update => level.update(1.0 / 60.0),
                Op::Reset => {
                    level.reset();
                    prop_assert!(level.objects().iter().all(|e| !e.is_dynamic()));
                }
            }
            assert_consistent(&level)?;
        }
    }

    #[test]
    fn prop_zero_move_changes_nothing(
        start in rect_strategy(),
        obstacles in prop::collection::vec((rect_strategy(), collision_type_strategy()), 0..10),
    ) {
        let mut level = Level::new("still");
        for (rect, collision_type) in &obstacles {
            level.spawn(StaticObject::new(*rect, *collision_type, false));
        }
        let mover = level.spawn(DynamicObject::new(start, CollisionType::BlockAll, true));
        let motion = mover.borrow().motion;
        let scroll = level.scroll();

        let moved = mover.borrow_mut().move_by(DVec2::ZERO, true, &mut level);
        prop_assert!(!moved);
        prop_assert_eq!(mover.borrow().body().rect(), start);
        prop_assert_eq!(mover.borrow().motion, motion);
        prop_assert_eq!(level.scroll(), scroll);
    }

    #[test]
    fn prop_vetoed_destroy_keeps_id(spawn_x in -100.0..100.0f64, spawn_y in -100.0..100.0f64) {
        let animations = PlayerAnimations::from_library(&AnimationLibrary::new());
        let mut level = Level::new("veto");
        let player = level.spawn(Player::new(DVec2::new(spawn_x, spawn_y), &PlayerTuning::default(), animations));
        let id = player.borrow().body().id();
        prop_assert!(id.is_some());

        if let Some(id) = id {
            prop_assert!(!level.destroy(id));
            prop_assert_eq!(player.borrow().body().id(), Some(id));
            prop_assert!(level.object(id).is_some());

            prop_assert!(level.force_destroy(id));
            prop_assert!(level.is_empty());
            prop_assert!(level.collision_index().is_empty());
        }
    }
}
