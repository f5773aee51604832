//! Shared collision state of a level object
//!
//! The level's collision index and the owning object both hold the same
//! `Rc<Body>`. Spatial queries read bodies only, so they work while any
//! object (including the one asking) is mutably borrowed for its update.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionType;
use crate::geom::Rect;

/// Level-unique object identity, assigned at spawn and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Draw/update sorting layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    /// Always sorts before everything else
    Floor,
    /// Sorts by the bottom edge of the collision rect
    #[default]
    Standard,
}

#[derive(Debug)]
pub struct Body {
    rect: Cell<Rect>,
    collision_type: Cell<CollisionType>,
    walkable: Cell<bool>,
    id: Cell<Option<ObjectId>>,
    layer: Layer,
    dynamic: bool,
}

impl Body {
    pub fn new(rect: Rect, collision_type: CollisionType, walkable: bool) -> Self {
        Self {
            rect: Cell::new(rect),
            collision_type: Cell::new(collision_type),
            walkable: Cell::new(walkable),
            id: Cell::new(None),
            layer: Layer::Standard,
            dynamic: false,
        }
    }

    pub fn floor(mut self) -> Self {
        self.layer = Layer::Floor;
        self
    }

    /// Mark as a moving actor; `Level::reset` force-destroys these
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Fresh, unattached body with the same configuration at `pos`
    pub fn duplicate_at(&self, pos: DVec2) -> Rc<Self> {
        Rc::new(Self {
            rect: Cell::new(self.rect().with_pos(pos)),
            collision_type: Cell::new(self.collision_type()),
            walkable: Cell::new(self.walkable()),
            id: Cell::new(None),
            layer: self.layer,
            dynamic: self.dynamic,
        })
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect.get()
    }

    #[inline]
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    pub fn pos(&self) -> DVec2 {
        self.rect().pos()
    }

    pub fn set_pos(&self, pos: DVec2) {
        self.rect.set(self.rect().with_pos(pos));
    }

    #[inline]
    pub fn collision_type(&self) -> CollisionType {
        self.collision_type.get()
    }

    pub fn set_collision_type(&self, kind: CollisionType) {
        self.collision_type.set(kind);
    }

    #[inline]
    pub fn walkable(&self) -> bool {
        self.walkable.get()
    }

    pub fn set_walkable(&self, walkable: bool) {
        self.walkable.set(walkable);
    }

    /// Assigned while the object is part of a level
    pub fn id(&self) -> Option<ObjectId> {
        self.id.get()
    }

    pub fn is_attached(&self) -> bool {
        self.id.get().is_some()
    }

    pub(crate) fn attach(&self, id: ObjectId) {
        self.id.set(Some(id));
    }

    pub(crate) fn detach(&self) {
        self.id.set(None);
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Sort key for draw and update order
    pub fn depth(&self) -> f64 {
        match self.layer {
            Layer::Floor => f64::NEG_INFINITY,
            Layer::Standard => self.rect().bottom(),
        }
    }

    // Editor access

    pub(crate) fn rect_cell(&self) -> &Cell<Rect> {
        &self.rect
    }

    pub(crate) fn collision_type_cell(&self) -> &Cell<CollisionType> {
        &self.collision_type
    }

    pub(crate) fn walkable_cell(&self) -> &Cell<bool> {
        &self.walkable
    }
}
