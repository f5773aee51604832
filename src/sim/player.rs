//! The player-controlled sprite
//!
//! Movement comes from the four `move_*` actions. Walking off walkable
//! ground plays the fall animation; when it ends the player takes fall
//! damage and is put back on the last valid position, pushed back against
//! the step that took them over the edge.

use std::any::Any;
use std::rc::Rc;

use glam::DVec2;

use super::body::Body;
use super::collision::CollisionType;
use super::dynamic::Motion;
use super::level::Level;
use super::object::{LevelObject, ObjectHandle, into_handle};
use super::params::ParameterSet;
use super::sprite::{Health, PhysicalDamage, Vitals, draw_shadow};
use crate::assets::{Animation, AnimationLibrary};
use crate::consts::{PLAYER_COLLISION_OFFSET, PLAYER_COLLISION_SIZE};
use crate::geom::{Direction, Rect};
use crate::input::{InputSource, actions};
use crate::render::{self, Canvas, color};
use crate::settings::PlayerTuning;

fn collision_offset() -> DVec2 {
    DVec2::new(PLAYER_COLLISION_OFFSET.0, PLAYER_COLLISION_OFFSET.1)
}

/// Animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    SideIdle,
    Walking,
    Falling,
}

#[derive(Debug, Clone)]
pub struct PlayerAnimations {
    pub fall: Animation,
    pub front_idle: Animation,
    pub front_walking: Animation,
    pub side_idle: Animation,
}

impl PlayerAnimations {
    pub fn from_library(library: &AnimationLibrary) -> Self {
        Self {
            fall: library.get("player_fall"),
            front_idle: library.get("player_front_idle"),
            front_walking: library.get("player_front_walking"),
            side_idle: library.get("player_side_idle"),
        }
    }

    pub fn get(&self, state: PlayerState) -> &Animation {
        match state {
            PlayerState::Idle => &self.front_idle,
            PlayerState::SideIdle => &self.side_idle,
            PlayerState::Walking => &self.front_walking,
            PlayerState::Falling => &self.fall,
        }
    }

    fn get_mut(&mut self, state: PlayerState) -> &mut Animation {
        match state {
            PlayerState::Idle => &mut self.front_idle,
            PlayerState::SideIdle => &mut self.side_idle,
            PlayerState::Walking => &mut self.front_walking,
            PlayerState::Falling => &mut self.fall,
        }
    }

    fn reset_all(&mut self) {
        self.fall.reset();
        self.front_idle.reset();
        self.front_walking.reset();
        self.side_idle.reset();
    }
}

/// Unit-less movement wish from the move actions; later keys win per axis
pub fn read_movement(input: &dyn InputSource) -> DVec2 {
    let mut movement = DVec2::ZERO;
    if input.is_down(actions::MOVE_UP) {
        movement.y = -1.0;
    }
    if input.is_down(actions::MOVE_DOWN) {
        movement.y = 1.0;
    }
    if input.is_down(actions::MOVE_LEFT) {
        movement.x = -1.0;
    }
    if input.is_down(actions::MOVE_RIGHT) {
        movement.x = 1.0;
    }
    movement
}

pub struct Player {
    body: Rc<Body>,
    pub motion: Motion,
    pub vitals: Vitals,
    tuning: PlayerTuning,
    animations: PlayerAnimations,
    state: PlayerState,
    facing: Direction,
}

impl Player {
    /// Player standing on `spawn`; only the feet collide
    pub fn new(spawn: DVec2, tuning: &PlayerTuning, mut animations: PlayerAnimations) -> Self {
        let (w, h) = PLAYER_COLLISION_SIZE;
        let rect = Rect::from_pos_size(spawn + collision_offset(), w, h);
        animations.reset_all();
        Self {
            body: Body::new(rect, CollisionType::BlockAll, true).dynamic().shared(),
            motion: Motion::new(rect.pos()),
            vitals: Vitals::new(Health::new(tuning.max_health)),
            tuning: tuning.clone(),
            animations,
            state: PlayerState::Idle,
            facing: Direction::South,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn health(&self) -> &Health {
        &self.vitals.health
    }

    pub fn current_animation(&self) -> &Animation {
        self.animations.get(self.state)
    }

    fn switch(&mut self, state: PlayerState) {
        if self.state != state {
            self.state = state;
            self.animations.get_mut(state).reset();
        }
    }

    /// Fall animation is over: take damage and go back to solid ground
    fn recover_from_fall(&mut self, dt: f64, level: &mut Level) {
        self.animations.fall.reset();
        self.vitals.inflict(PhysicalDamage::new(self.tuning.fall_damage));

        let body = self.body.clone();
        let knockback = -self.motion.last_movement * self.tuning.fall_knockback * dt;
        self.motion
            .set_position(&body, self.motion.last_valid_pos, false, false, level);
        self.motion.move_by(&body, knockback, false, level);
        level.focus_scroll(body.rect().center());
        self.motion.on_ground = true;
        log::debug!("Player recovered from fall at {:?}", body.pos());
    }
}

impl LevelObject for Player {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn on_spawn(&mut self, level: &mut Level) {
        level.focus_scroll(self.body.rect().center());
    }

    /// Respawn in place instead of leaving the level
    fn on_death(&mut self, level: &mut Level) -> bool {
        let body = self.body.clone();
        self.motion
            .set_position(&body, self.motion.last_valid_pos, false, true, level);
        false
    }

    fn update(&mut self, dt: f64, level: &mut Level) {
        if dt == 0.0 {
            return;
        }
        self.animations.get_mut(self.state).advance(dt);

        if self.vitals.update(dt) {
            if let Some(id) = self.body.id() {
                level.queue_destroy(id, false);
            }
            return;
        }

        if !self.motion.on_ground {
            self.switch(PlayerState::Falling);
            if !self.animations.fall.is_finished() {
                return;
            }
            self.recover_from_fall(dt, level);
        }

        let wish = read_movement(level.input());
        if wish != DVec2::ZERO {
            let body = self.body.clone();
            let step = wish.normalize() * self.tuning.speed * dt;
            self.motion.move_by(&body, step, true, level);
        } else {
            self.motion.moving = false;
            self.motion.direction = Direction::None;
        }

        if self.motion.moving {
            self.facing = self.motion.direction;
            self.switch(PlayerState::Walking);
        } else if self.motion.on_ground {
            if self.facing.is_sideways() {
                self.switch(PlayerState::SideIdle);
            } else {
                self.switch(PlayerState::Idle);
            }
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        let rect = self.body.rect() - offset;
        draw_shadow(
            canvas,
            DVec2::new(rect.center().x - 1.0, rect.bottom()),
            (rect.w / 2.5) as f32,
            (rect.h * 0.8) as f32,
        );
        render::draw_animation_at(
            canvas,
            self.current_animation(),
            rect.pos() - collision_offset(),
            color::WHITE,
        );
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Player::new(
            pos - collision_offset(),
            &self.tuning,
            self.animations.clone(),
        ))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Player", &self.body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
