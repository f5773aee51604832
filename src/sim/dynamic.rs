//! Moving objects and axis-separated collision response
//!
//! Each axis is resolved on its own: x first, then y from wherever x ended
//! up. An axis step is rejected when the strip swept by the leading edge
//! meets a `BlockAll` object, so a blocked diagonal still slides along the
//! free axis and large steps cannot skip over thin walls. Objects behind
//! the leading edge or only grazing the sides never block, so anything
//! already touching or overlapping a blocker can still move away from it.

use std::any::Any;
use std::rc::Rc;

use glam::DVec2;

use super::body::Body;
use super::collision::CollisionType;
use super::level::Level;
use super::object::{LevelObject, ObjectHandle, into_handle};
use super::params::ParameterSet;
use crate::geom::{Direction, Rect};

/// Area swept by the leading edge of `from` moving along one axis by `delta`
fn leading_strip(from: Rect, delta: DVec2) -> Rect {
    if delta.x > 0.0 {
        Rect::new(from.right(), from.y, delta.x, from.h)
    } else if delta.x < 0.0 {
        Rect::new(from.x + delta.x, from.y, -delta.x, from.h)
    } else if delta.y > 0.0 {
        Rect::new(from.x, from.bottom(), from.w, delta.y)
    } else {
        Rect::new(from.x, from.y + delta.y, from.w, -delta.y)
    }
}

/// Strict overlap of `from` and `other` on the axis perpendicular to `delta`
fn overlaps_across(from: Rect, other: Rect, delta: DVec2) -> bool {
    if delta.x != 0.0 {
        other.y < from.bottom() && from.y < other.bottom()
    } else {
        other.x < from.right() && from.x < other.right()
    }
}

/// Movement state carried by every dynamic object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub on_ground: bool,
    pub moving: bool,
    /// Per-axis movement actually committed by the last move
    pub last_movement: DVec2,
    /// Last position at which the object stood on walkable ground
    pub last_valid_pos: DVec2,
    pub direction: Direction,
}

impl Motion {
    pub fn new(start: DVec2) -> Self {
        Self {
            on_ground: true,
            moving: false,
            last_movement: DVec2::ZERO,
            last_valid_pos: start,
            direction: Direction::None,
        }
    }

    /// Move `body` by `amount`; returns whether it moved at all
    ///
    /// A zero `amount` changes nothing.
    pub fn move_by(&mut self, body: &Body, amount: DVec2, should_scroll: bool, level: &mut Level) -> bool {
        if amount == DVec2::ZERO {
            return false;
        }

        let moved_x = self.step_axis(body, DVec2::new(amount.x, 0.0), should_scroll, level);
        self.last_movement.x = if moved_x { amount.x } else { 0.0 };

        let moved_y = self.step_axis(body, DVec2::new(0.0, amount.y), should_scroll, level);
        self.last_movement.y = if moved_y { amount.y } else { 0.0 };

        self.moving = moved_x || moved_y;
        self.direction = Direction::from_vector(self.last_movement);
        if self.on_ground {
            self.last_valid_pos = body.pos();
        }
        self.moving
    }

    fn step_axis(&mut self, body: &Body, delta: DVec2, should_scroll: bool, level: &mut Level) -> bool {
        if delta == DVec2::ZERO {
            return false;
        }
        let from = body.rect();
        let to = from.translated(delta);
        let ahead = level.colliding(leading_strip(from, delta), Some(body));
        if ahead
            .objects
            .iter()
            .any(|e| e.collision_type() == CollisionType::BlockAll && overlaps_across(from, e.rect(), delta))
        {
            return false;
        }

        self.on_ground = level.colliding(to, Some(body)).walkable;
        body.set_rect(to);
        if should_scroll {
            level.add_scroll(delta);
        }
        true
    }

    /// Teleport `body` to `pos`
    ///
    /// With `check_collision` the move only happens when the destination is
    /// not blocked, and `on_ground` is refreshed from it. Scrolling focuses
    /// the camera on the new position.
    pub fn set_position(
        &mut self,
        body: &Body,
        pos: DVec2,
        check_collision: bool,
        should_scroll: bool,
        level: &mut Level,
    ) -> bool {
        if check_collision {
            let hit = level.colliding(body.rect().with_pos(pos), Some(body));
            if hit.is_blocking() {
                return false;
            }
            self.on_ground = hit.walkable;
            self.moving = true;
        }
        body.set_pos(pos);
        if should_scroll {
            level.focus_scroll(body.rect().center());
        }
        true
    }
}

/// A bare moving object; only ever created with `Level::spawn`
pub struct DynamicObject {
    body: Rc<Body>,
    pub motion: Motion,
}

impl DynamicObject {
    pub fn new(rect: Rect, collision_type: CollisionType, walkable: bool) -> Self {
        Self {
            body: Body::new(rect, collision_type, walkable).dynamic().shared(),
            motion: Motion::new(rect.pos()),
        }
    }

    pub fn move_by(&mut self, amount: DVec2, should_scroll: bool, level: &mut Level) -> bool {
        self.motion.move_by(&self.body, amount, should_scroll, level)
    }

    pub fn set_position(&mut self, pos: DVec2, check_collision: bool, should_scroll: bool, level: &mut Level) -> bool {
        self.motion
            .set_position(&self.body, pos, check_collision, should_scroll, level)
    }
}

impl LevelObject for DynamicObject {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Self {
            body: self.body.duplicate_at(pos),
            motion: Motion::new(pos),
        })
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Dynamic Object", &self.body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
