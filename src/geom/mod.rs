//! Geometry primitives shared by every spatial query

pub mod direction;
pub mod rect;

pub use direction::Direction;
pub use rect::{Rect, segments_intersect};
