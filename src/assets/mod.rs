//! Asset collaborators consumed by the level core

pub mod animation;

pub use animation::{Animation, AnimationDesc, AnimationLibrary, Playback};
