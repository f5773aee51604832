//! RGBA colors used by draw commands

use serde::{Deserialize, Serialize};

use crate::sim::CollisionType;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from normalized channels, clamping each to [0, 1]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self::rgb(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Same color with alpha scaled to `alpha` (0-1)
    pub fn fade(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0) as u8,
            ..self
        }
    }

    pub fn rgb_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        WHITE
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const GRAY: Color = Color::rgb(130, 130, 130);
pub const PINK: Color = Color::rgb(255, 109, 194);
pub const GOLD: Color = Color::rgb(255, 203, 0);
pub const VIOLET: Color = Color::rgb(135, 60, 190);
pub const RED: Color = Color::rgb(230, 41, 55);

/// Outline color for collision debug drawing, one per collision type
pub fn debug_color(kind: CollisionType) -> Color {
    match kind {
        CollisionType::NoCollision => WHITE,
        CollisionType::EventsOnly => GRAY,
        CollisionType::AiObstacleMarker => PINK,
        CollisionType::BlockAll => GOLD,
    }
}
