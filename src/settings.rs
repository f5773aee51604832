//! Engine settings and tuning
//!
//! Loaded from `settings.json` next to the executable. A missing or broken
//! file is not fatal: defaults are used and the reason is logged.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{LevelError, Result};

/// Player movement and survival tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Walking speed (pixels per second)
    pub speed: f64,
    pub max_health: f32,
    /// Health lost each time the player falls off walkable ground
    pub fall_damage: f32,
    /// Push-back multiplier applied to the last movement after a fall
    pub fall_knockback: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            fall_damage: PLAYER_FALL_DAMAGE,
            fall_knockback: PLAYER_FALL_KNOCKBACK,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical view size; the camera centres on points using half of it
    pub view_width: f64,
    pub view_height: f64,

    pub player: PlayerTuning,

    /// Draw collision outlines over the level
    pub debug_collision: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_width: BASE_WIDTH,
            view_height: BASE_HEIGHT,
            player: PlayerTuning::default(),
            debug_collision: false,
        }
    }
}

impl Settings {
    pub fn view_size(&self) -> DVec2 {
        DVec2::new(self.view_width, self.view_height)
    }

    /// Parse settings JSON; absent fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::info!("No settings at {} ({e}), using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not validate {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write settings to `path` as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| LevelError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
