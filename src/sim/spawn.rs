//! Spawn points: level-file markers that place dynamic objects on start

use std::any::Any;
use std::rc::Rc;

use glam::DVec2;
use serde_json::{Value, json};

use super::body::Body;
use super::collision::CollisionType;
use super::data;
use super::level::Level;
use super::object::{LevelObject, ObjectHandle, into_handle};
use super::params::ParameterSet;
use super::player::{Player, PlayerAnimations};
use super::registry::{LoadContext, ObjectFactory};
use super::sprite::Sprite;
use crate::consts::MARKER_SIZE;
use crate::error::Result;
use crate::geom::Rect;
use crate::settings::PlayerTuning;

fn marker_body(pos: DVec2) -> Rc<Body> {
    Body::new(
        Rect::from_pos_size(pos, MARKER_SIZE, MARKER_SIZE),
        CollisionType::NoCollision,
        true,
    )
    .shared()
}

fn position_data(body: &Body) -> Value {
    let pos = body.pos();
    json!({ "position": [pos.x, pos.y] })
}

/// Places a generic `Sprite` when the level starts
pub struct SpriteSpawnPoint {
    body: Rc<Body>,
}

impl SpriteSpawnPoint {
    pub const REGISTRY_ID: &'static str = "sprite_spawn_point";

    pub fn new(pos: DVec2) -> Self {
        Self {
            body: marker_body(pos),
        }
    }
}

impl LevelObject for SpriteSpawnPoint {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn registry_id(&self) -> Option<&'static str> {
        Some(Self::REGISTRY_ID)
    }

    fn on_spawn(&mut self, level: &mut Level) {
        level.spawn(Sprite::new(self.body.pos()));
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Self::new(pos))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Sprite Spawn Point", &self.body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ObjectFactory for SpriteSpawnPoint {
    fn from_data(data: &Value, _ctx: &LoadContext) -> Result<Self> {
        Ok(Self::new(data::opt_vec2(data, "position")?.unwrap_or_default()))
    }

    fn with_defaults(_ctx: &LoadContext) -> Self {
        Self::new(DVec2::ZERO)
    }

    fn to_data(&self) -> Value {
        position_data(&self.body)
    }
}

/// Places the player when the level starts
///
/// Tuning and animations are captured when the marker is loaded, so the
/// player needs nothing from outside the level at spawn time.
pub struct PlayerSpawnPoint {
    body: Rc<Body>,
    tuning: PlayerTuning,
    animations: PlayerAnimations,
}

impl PlayerSpawnPoint {
    pub const REGISTRY_ID: &'static str = "player_spawn_point";

    pub fn new(pos: DVec2, tuning: PlayerTuning, animations: PlayerAnimations) -> Self {
        Self {
            body: marker_body(pos),
            tuning,
            animations,
        }
    }
}

impl LevelObject for PlayerSpawnPoint {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn registry_id(&self) -> Option<&'static str> {
        Some(Self::REGISTRY_ID)
    }

    fn on_spawn(&mut self, level: &mut Level) {
        log::info!("Spawning player at {:?}", self.body.pos());
        level.spawn(Player::new(
            self.body.pos(),
            &self.tuning,
            self.animations.clone(),
        ));
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Self::new(pos, self.tuning.clone(), self.animations.clone()))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Player Spawn Point", &self.body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ObjectFactory for PlayerSpawnPoint {
    fn from_data(data: &Value, ctx: &LoadContext) -> Result<Self> {
        let pos = data::opt_vec2(data, "position")?.unwrap_or_default();
        Ok(Self::new(
            pos,
            ctx.settings.player.clone(),
            PlayerAnimations::from_library(ctx.animations),
        ))
    }

    fn with_defaults(ctx: &LoadContext) -> Self {
        Self::new(
            DVec2::ZERO,
            ctx.settings.player.clone(),
            PlayerAnimations::from_library(ctx.animations),
        )
    }

    fn to_data(&self) -> Value {
        position_data(&self.body)
    }
}
