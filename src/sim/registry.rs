//! Object registry: type identifiers to factory functions
//!
//! Built once at startup and passed to whatever loads levels. Each entry
//! holds three monomorphized functions for one concrete type: construct
//! from level-file data, construct with defaults (editor placement), and
//! serialize back to level-file data.

use std::collections::HashMap;

use serde_json::Value;

use super::object::{LevelObject, ObjectHandle, StaticObject, into_handle};
use super::props::{LevelFloor, LevelLightSource, LevelProp};
use super::spawn::{PlayerSpawnPoint, SpriteSpawnPoint};
use crate::assets::AnimationLibrary;
use crate::error::{LevelError, Result};
use crate::settings::Settings;

/// Collaborators available to factories
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    pub animations: &'a AnimationLibrary,
    pub settings: &'a Settings,
}

impl<'a> LoadContext<'a> {
    pub fn new(animations: &'a AnimationLibrary, settings: &'a Settings) -> Self {
        Self {
            animations,
            settings,
        }
    }
}

/// Level-file (de)serialization for one object type
pub trait ObjectFactory: LevelObject + Sized {
    /// Build from a level-file entry; the whole load fails on error
    fn from_data(data: &Value, ctx: &LoadContext) -> Result<Self>;

    fn with_defaults(ctx: &LoadContext) -> Self;

    /// Serialize to a level-file entry (without the `type` key)
    fn to_data(&self) -> Value;
}

type FromDataFn = fn(&Value, &LoadContext) -> Result<ObjectHandle>;
type DefaultFn = fn(&LoadContext) -> ObjectHandle;
type ToDataFn = fn(&dyn LevelObject) -> Option<Value>;

#[derive(Clone, Copy)]
struct Entry {
    from_data: FromDataFn,
    with_defaults: DefaultFn,
    to_data: ToDataFn,
}

fn create_entry<T: ObjectFactory>(data: &Value, ctx: &LoadContext) -> Result<ObjectHandle> {
    Ok(into_handle(T::from_data(data, ctx)?))
}

fn default_entry<T: ObjectFactory>(ctx: &LoadContext) -> ObjectHandle {
    into_handle(T::with_defaults(ctx))
}

fn serialize_entry<T: ObjectFactory>(object: &dyn LevelObject) -> Option<Value> {
    object.as_any().downcast_ref::<T>().map(T::to_data)
}

#[derive(Default)]
pub struct ObjectRegistry {
    entries: HashMap<String, Entry>,
}

impl ObjectRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in object type
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register::<StaticObject>(StaticObject::REGISTRY_ID)?;
        registry.register::<LevelFloor>(LevelFloor::REGISTRY_ID)?;
        registry.register::<LevelProp>(LevelProp::REGISTRY_ID)?;
        registry.register::<LevelLightSource>(LevelLightSource::REGISTRY_ID)?;
        registry.register::<SpriteSpawnPoint>(SpriteSpawnPoint::REGISTRY_ID)?;
        registry.register::<PlayerSpawnPoint>(PlayerSpawnPoint::REGISTRY_ID)?;
        Ok(registry)
    }

    /// Associate `id` with `T`'s factories; each id can be registered once
    pub fn register<T: ObjectFactory>(&mut self, id: &str) -> Result<()> {
        if self.entries.contains_key(id) {
            return Err(LevelError::DuplicateType(id.to_string()));
        }
        self.entries.insert(
            id.to_string(),
            Entry {
                from_data: create_entry::<T>,
                with_defaults: default_entry::<T>,
                to_data: serialize_entry::<T>,
            },
        );
        log::debug!("Registered object type {id}");
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Sorted identifiers, for editor palettes
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn entry(&self, id: &str) -> Result<&Entry> {
        self.entries
            .get(id)
            .ok_or_else(|| LevelError::UnknownType(id.to_string()))
    }

    pub fn create(&self, id: &str, data: &Value, ctx: &LoadContext) -> Result<ObjectHandle> {
        (self.entry(id)?.from_data)(data, ctx)
    }

    pub fn create_default(&self, id: &str, ctx: &LoadContext) -> Result<ObjectHandle> {
        Ok((self.entry(id)?.with_defaults)(ctx))
    }

    /// Serialize `object` with the serializer registered under `id`
    ///
    /// Fails when `object` is not the type registered under `id`.
    pub fn serialize(&self, id: &str, object: &dyn LevelObject) -> Result<Value> {
        (self.entry(id)?.to_data)(object).ok_or_else(|| LevelError::TypeMismatch(id.to_string()))
    }
}
