//! Level simulation module
//!
//! Everything that lives in a level is here:
//! - Object model (`LevelObject`, shared `Body` collision state)
//! - Registry-driven construction from level files
//! - Spatial queries and object lifecycle on `Level`
//! - Axis-separated movement for dynamic objects
//!
//! Single-threaded and frame driven. Nothing here touches a window, a GPU
//! or a file other than the level document being loaded.

pub mod body;
pub mod collision;
pub mod data;
pub mod dynamic;
pub mod level;
pub mod object;
pub mod params;
pub mod player;
pub mod props;
pub mod registry;
pub mod spawn;
pub mod sprite;

pub use body::{Body, Layer, ObjectId};
pub use collision::{CollisionHit, CollisionType, SimpleHit};
pub use dynamic::{DynamicObject, Motion};
pub use level::Level;
pub use object::{LevelObject, ObjectHandle, ObjectRef, StaticObject, into_handle};
pub use params::{ObjectParameter, ParamField, ParamKind, ParameterSet};
pub use player::{Player, PlayerAnimations, PlayerState, read_movement};
pub use props::{LevelFloor, LevelLightSource, LevelProp};
pub use registry::{LoadContext, ObjectFactory, ObjectRegistry};
pub use spawn::{PlayerSpawnPoint, SpriteSpawnPoint};
pub use sprite::{Damage, Health, PhysicalDamage, Sprite, Vitals};
