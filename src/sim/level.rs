//! The level: object ownership, spatial queries and lifecycle
//!
//! `objects` is the draw/update list and is re-sorted by depth every update.
//! `collision_index` is the query substrate and keeps spawn order. Both hold
//! exactly one entry per live object; spawn and destroy change them together.
//!
//! Objects receive `&mut Level` in their hooks. While an object runs a hook
//! it is mutably borrowed, so a destroy aimed at it is deferred until the
//! end of the current update instead of failing.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use glam::DVec2;
use serde_json::Value;

use super::body::{Body, ObjectId};
use super::collision::{CollisionHit, CollisionType, SimpleHit};
use super::data;
use super::object::{LevelObject, ObjectHandle, ObjectRef};
use super::registry::{LoadContext, ObjectRegistry};
use crate::base_resolution;
use crate::distance_sq;
use crate::error::{LevelError, Result};
use crate::geom::Rect;
use crate::input::{InputSource, KeyState, actions};
use crate::render::Canvas;

/// Whether `a` should win a "topmost object" pick over `b`
fn is_above(a: &ObjectRef, b: &ObjectRef) -> bool {
    match a.depth().total_cmp(&b.depth()) {
        std::cmp::Ordering::Equal => a.id() > b.id(),
        ord => ord.is_gt(),
    }
}

pub struct Level {
    name: String,
    objects: Vec<ObjectRef>,
    collision_index: Vec<ObjectRef>,
    scroll: DVec2,
    view_size: DVec2,
    next_id: u32,
    started: bool,
    pending_destroy: Vec<(ObjectId, bool)>,
    input: Box<dyn InputSource>,
    debug_collision: bool,
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("objects", &self.objects)
            .field("scroll", &self.scroll)
            .field("view_size", &self.view_size)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl Level {
    /// Empty, not yet started level
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            collision_index: Vec::new(),
            scroll: DVec2::ZERO,
            view_size: base_resolution(),
            next_id: 0,
            started: false,
            pending_destroy: Vec::new(),
            input: Box::new(KeyState::new()),
            debug_collision: false,
        }
    }

    pub fn with_view_size(mut self, view_size: DVec2) -> Self {
        self.view_size = view_size;
        self
    }

    /// Parse a level document
    ///
    /// Every object is built before the level exists, so a bad entry fails
    /// the whole load and nothing half-constructed is ever observable.
    pub fn from_json(text: &str, registry: &ObjectRegistry, ctx: &LoadContext) -> Result<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_value(&doc, registry, ctx)
    }

    pub fn from_value(doc: &Value, registry: &ObjectRegistry, ctx: &LoadContext) -> Result<Self> {
        let name = data::req_str(doc, "name")?;
        let entries = data::req_array(doc, "objects")?;

        let mut handles = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let type_id = data::req_str(entry, "type").map_err(|e| e.in_object(index, "?"))?;
            let handle = registry
                .create(type_id, entry, ctx)
                .map_err(|e| e.in_object(index, type_id))?;
            log::debug!("Created level object #{index} of type {type_id}");
            handles.push(handle);
        }

        let mut level = Self::new(name).with_view_size(ctx.settings.view_size());
        level.debug_collision = ctx.settings.debug_collision;
        for handle in handles {
            level.add_object(handle);
        }
        log::info!("Loaded level {} with {} objects", level.name, level.len());
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>, registry: &ObjectRegistry, ctx: &LoadContext) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LevelError::io(path, e))?;
        Self::from_json(&text, registry, ctx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Draw/update list, in the order of the last update
    pub fn objects(&self) -> &[ObjectRef] {
        &self.objects
    }

    /// Query substrate, in spawn order
    pub fn collision_index(&self) -> &[ObjectRef] {
        &self.collision_index
    }

    pub fn object(&self, id: ObjectId) -> Option<ObjectRef> {
        self.collision_index.iter().find(|e| e.id() == Some(id)).cloned()
    }

    /// Input read by objects during `update`
    pub fn input(&self) -> &dyn InputSource {
        self.input.as_ref()
    }

    /// Replace the input source; hosts usually hand in a shared
    /// `Rc<RefCell<KeyState>>` and keep feeding it between updates
    pub fn set_input(&mut self, input: impl InputSource + 'static) {
        self.input = Box::new(input);
    }

    /// Whether collision outlines should be drawn over the level
    pub fn debug_collision(&self) -> bool {
        self.debug_collision
    }

    pub fn set_debug_collision(&mut self, enabled: bool) {
        self.debug_collision = enabled;
    }

    // Lifecycle

    /// Activate the level: fires `on_spawn` on every held object in
    /// collection order. Objects spawned from then on get it immediately.
    pub fn start(&mut self) {
        if self.started {
            log::warn!("Level {} already started", self.name);
            return;
        }
        self.started = true;
        log::info!("Starting level {}", self.name);

        let snapshot = self.objects.clone();
        for entry in snapshot {
            if !entry.body.is_attached() {
                continue;
            }
            if let Ok(mut object) = entry.object.try_borrow_mut() {
                object.on_spawn(self);
            }
        }
    }

    /// Add a concrete object, keeping typed access to it
    pub fn spawn<T: LevelObject>(&mut self, object: T) -> Rc<RefCell<T>> {
        let typed = Rc::new(RefCell::new(object));
        let handle: ObjectHandle = typed.clone();
        self.add_object(handle);
        typed
    }

    /// Add an object: assigns its id, indexes it and, in a started level,
    /// fires `on_spawn`
    pub fn add_object(&mut self, handle: ObjectHandle) -> ObjectRef {
        let entry = ObjectRef::new(handle);
        if let Some(id) = entry.id() {
            log::warn!("Object {id} is already part of a level");
            return entry;
        }

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        entry.body.attach(id);
        self.objects.push(entry.clone());
        self.collision_index.push(entry.clone());
        log::debug!("Spawned object {id} at {:?}", entry.rect());

        if self.started {
            match entry.object.try_borrow_mut() {
                Ok(mut object) => object.on_spawn(self),
                Err(_) => log::warn!("Object {id} is busy, skipping on_spawn"),
            }
        }
        entry
    }

    /// Place a default-constructed object of a registered type
    pub fn create_default(
        &mut self,
        registry: &ObjectRegistry,
        type_id: &str,
        ctx: &LoadContext,
    ) -> Result<ObjectRef> {
        let handle = registry.create_default(type_id, ctx)?;
        Ok(self.add_object(handle))
    }

    /// Graceful destroy: the object's `on_death` may veto
    ///
    /// Returns whether the object was removed now.
    pub fn destroy(&mut self, id: ObjectId) -> bool {
        self.kill(id, false)
    }

    /// Destroy regardless of what `on_death` answers
    pub fn force_destroy(&mut self, id: ObjectId) -> bool {
        self.kill(id, true)
    }

    /// Destroy at the end of the current update
    pub fn queue_destroy(&mut self, id: ObjectId, force: bool) {
        self.pending_destroy.push((id, force));
    }

    fn kill(&mut self, id: ObjectId, force: bool) -> bool {
        let Some(entry) = self.object(id) else {
            return false;
        };

        let allowed = match entry.object.try_borrow_mut() {
            Ok(mut object) => object.on_death(self),
            Err(_) => {
                log::debug!("Object {id} is busy, deferring destroy");
                self.pending_destroy.push((id, force));
                return false;
            }
        };

        if !allowed && !force {
            log::debug!("Object {id} vetoed its destroy");
            return false;
        }
        self.remove(id)
    }

    fn remove(&mut self, id: ObjectId) -> bool {
        let Some(index_pos) = self.collision_index.iter().position(|e| e.id() == Some(id)) else {
            return false;
        };
        let entry = self.collision_index.remove(index_pos);
        self.objects.retain(|e| !Rc::ptr_eq(&e.body, &entry.body));
        entry.body.detach();
        log::debug!("Destroyed object {id}");
        true
    }

    fn apply_pending_destroys(&mut self) {
        let pending = std::mem::take(&mut self.pending_destroy);
        for (id, force) in pending {
            self.kill(id, force);
        }
    }

    /// Back to edit mode: dynamic objects are force-destroyed, static
    /// objects get their `on_death` hook and stay
    pub fn reset(&mut self) {
        self.pending_destroy.clear();
        let snapshot = self.objects.clone();
        for entry in snapshot {
            let Some(id) = entry.id() else {
                continue;
            };
            if entry.is_dynamic() {
                self.force_destroy(id);
            } else if let Ok(mut object) = entry.object.try_borrow_mut() {
                object.on_death(self);
            }
        }
        log::info!("Reset level {} ({} objects remain)", self.name, self.len());
    }

    // Queries

    fn overlapping<'a>(
        &'a self,
        area: Rect,
        ignore: Option<&'a Body>,
    ) -> impl Iterator<Item = &'a ObjectRef> + 'a {
        self.collision_index
            .iter()
            .filter(move |e| !ignore.is_some_and(|body| e.is(body)))
            .filter(move |e| e.rect().intersects(&area))
    }

    fn reduce<'a>(entries: impl Iterator<Item = &'a ObjectRef>) -> CollisionHit {
        let mut hit = CollisionHit::miss();
        let mut top: Option<&ObjectRef> = None;
        for entry in entries {
            hit.accumulate(entry);
            if top.is_none_or(|t| is_above(entry, t)) {
                top = Some(entry);
            }
        }
        hit.walkable = top.is_some_and(ObjectRef::walkable);
        hit
    }

    /// Everything overlapping `area` except the object owning `ignore`
    ///
    /// Walkability comes from the deepest overlapping object.
    pub fn colliding(&self, area: Rect, ignore: Option<&Body>) -> CollisionHit {
        Self::reduce(self.overlapping(area, ignore))
    }

    /// Everything overlapping `area`
    pub fn all_objects(&self, area: Rect) -> CollisionHit {
        Self::reduce(self.overlapping(area, None))
    }

    /// Deepest object containing `point`
    pub fn top_object(&self, point: DVec2) -> SimpleHit {
        let top = self
            .collision_index
            .iter()
            .filter(|e| e.rect().contains_point(point))
            .fold(None::<&ObjectRef>, |top, e| match top {
                Some(t) if !is_above(e, t) => Some(t),
                _ => Some(e),
            });

        match top {
            Some(entry) => SimpleHit {
                hit: true,
                walkable: entry.walkable(),
                object: Some(entry.clone()),
                collision_type: entry.collision_type(),
            },
            None => SimpleHit::miss(),
        }
    }

    /// Objects whose rect touches the segment `p1 -> p2`, nearest first
    ///
    /// Objects weaker than `filter` are skipped. Distance is measured from
    /// `p1` to each object's center; equal distances keep spawn order. With
    /// `closest_only` at most one object is returned.
    pub fn ray_cast(
        &self,
        p1: DVec2,
        p2: DVec2,
        ignore: Option<&Body>,
        closest_only: bool,
        filter: CollisionType,
    ) -> CollisionHit {
        let mut hits: Vec<&ObjectRef> = self
            .collision_index
            .iter()
            .filter(|e| !ignore.is_some_and(|body| e.is(body)))
            .filter(|e| e.collision_type() >= filter)
            .filter(|e| e.rect().intersects_segment(p1, p2))
            .collect();
        hits.sort_by(|a, b| {
            distance_sq(p1, a.rect().center()).total_cmp(&distance_sq(p1, b.rect().center()))
        });
        if closest_only {
            hits.truncate(1);
        }

        let mut hit = CollisionHit::miss();
        for entry in hits {
            hit.accumulate(entry);
            hit.walkable |= entry.walkable();
        }
        hit
    }

    // Frame

    /// Sort by depth, then update every live object in that order
    ///
    /// A press of the `debug_mode` action toggles collision debug drawing.
    pub fn update(&mut self, dt: f64) {
        if self.input.is_pressed(actions::DEBUG_MODE) {
            self.debug_collision = !self.debug_collision;
            log::info!("Collision debug drawing {}", if self.debug_collision { "on" } else { "off" });
        }

        self.objects.sort_by(|a, b| a.depth().total_cmp(&b.depth()));

        let snapshot = self.objects.clone();
        for entry in snapshot {
            // Destroyed earlier in this pass
            if !entry.body.is_attached() {
                continue;
            }
            if let Ok(mut object) = entry.object.try_borrow_mut() {
                object.update(dt, self);
            }
        }

        self.apply_pending_destroys();
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for entry in &self.objects {
            if let Ok(object) = entry.object.try_borrow() {
                object.draw(canvas, self.scroll);
            }
        }
    }

    pub fn draw_lighting(&self, canvas: &mut dyn Canvas) {
        for entry in &self.objects {
            if let Ok(object) = entry.object.try_borrow() {
                object.draw_lighting(canvas, self.scroll);
            }
        }
    }

    pub fn debug_draw_collision(&self, canvas: &mut dyn Canvas) {
        for entry in &self.objects {
            if let Ok(object) = entry.object.try_borrow() {
                object.debug_draw_collision(canvas, self.scroll);
            }
        }
    }

    // Camera

    pub fn scroll(&self) -> DVec2 {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: DVec2) {
        self.scroll = scroll;
    }

    pub fn add_scroll(&mut self, delta: DVec2) {
        self.scroll += delta;
    }

    /// Centre the view on `pos`
    pub fn focus_scroll(&mut self, pos: DVec2) {
        self.scroll = pos - self.view_size / 2.0;
    }

    pub fn view_size(&self) -> DVec2 {
        self.view_size
    }
}
