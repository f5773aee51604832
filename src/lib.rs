//! Jack of Blades - level simulation core
//!
//! Core modules:
//! - `geom`: Rectangles, segment tests and compass directions
//! - `sim`: Level objects, the object registry, collision queries and movement
//! - `assets`: Animation descriptors and playback state
//! - `input`: Action-level keybind state consumed by the player
//! - `render`: Draw-command boundary (no rendering technique lives here)
//! - `settings`: Data-driven tuning loaded from JSON

pub mod assets;
pub mod error;
pub mod geom;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{LevelError, Result};
pub use geom::{Direction, Rect};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the harness (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Base render resolution; the camera centres on points using half of it
    pub const BASE_WIDTH: f64 = 1280.0;
    pub const BASE_HEIGHT: f64 = 720.0;

    /// Animation every library falls back to
    pub const DEFAULT_ANIMATION: &str = "default";

    /// Player defaults
    pub const PLAYER_SPEED: f64 = 90.0; // pixels per second
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_FALL_DAMAGE: f32 = 1.0;
    /// Multiplier on the last movement used to push the player back after a fall
    pub const PLAYER_FALL_KNOCKBACK: f64 = 500.0;
    /// Collision box relative to the spawn point (feet only)
    pub const PLAYER_COLLISION_OFFSET: (f64, f64) = (5.0, 25.0);
    pub const PLAYER_COLLISION_SIZE: (f64, f64) = (24.0, 7.0);

    /// Default side length of sprites and marker objects
    pub const MARKER_SIZE: f64 = 32.0;
}

/// Base resolution as a vector
#[inline]
pub fn base_resolution() -> DVec2 {
    DVec2::new(consts::BASE_WIDTH, consts::BASE_HEIGHT)
}

/// Squared distance, used wherever only ordering matters
#[inline]
pub fn distance_sq(a: DVec2, b: DVec2) -> f64 {
    (a - b).length_squared()
}
