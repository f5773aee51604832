//! Eight-way compass directions derived from movement vectors

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Discrete movement direction (screen space: positive y is south)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// Classify a vector by the signs of its components
    pub fn from_vector(v: DVec2) -> Self {
        match (v.x, v.y) {
            (x, y) if x == 0.0 && y == 0.0 => Direction::None,
            (x, y) if x == 0.0 => {
                if y > 0.0 {
                    Direction::South
                } else {
                    Direction::North
                }
            }
            (x, y) if y == 0.0 => {
                if x < 0.0 {
                    Direction::West
                } else {
                    Direction::East
                }
            }
            (x, y) if x < 0.0 => {
                if y > 0.0 {
                    Direction::SouthWest
                } else {
                    Direction::NorthWest
                }
            }
            (_, y) => {
                if y > 0.0 {
                    Direction::SouthEast
                } else {
                    Direction::NorthEast
                }
            }
        }
    }

    /// Angle counter-clockwise from east in 45° steps (0 for `None`)
    pub fn to_radians(self) -> f64 {
        let step = match self {
            Direction::None | Direction::East => 0.0,
            Direction::NorthEast => 1.0,
            Direction::North => 2.0,
            Direction::NorthWest => 3.0,
            Direction::West => 4.0,
            Direction::SouthWest => 5.0,
            Direction::South => 6.0,
            Direction::SouthEast => 7.0,
        };
        step * std::f64::consts::FRAC_PI_4
    }

    /// Whether the direction has a horizontal component only
    pub fn is_sideways(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::None => "None",
            Direction::East => "East",
            Direction::NorthEast => "NorthEast",
            Direction::North => "North",
            Direction::NorthWest => "NorthWest",
            Direction::West => "West",
            Direction::SouthWest => "SouthWest",
            Direction::South => "South",
            Direction::SouthEast => "SouthEast",
        }
    }
}
