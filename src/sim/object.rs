//! The level object trait and shared handles
//!
//! Every entity in a level implements `LevelObject`. The level owns objects
//! through `ObjectHandle`s; queries hand out `ObjectRef`s, which pair the
//! handle with the object's shared `Body` so callers can read collision
//! state without borrowing the object.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use glam::DVec2;
use serde_json::Value;

use super::body::{Body, ObjectId};
use super::collision::CollisionType;
use super::level::Level;
use super::params::ParameterSet;
use super::registry::{LoadContext, ObjectFactory};
use crate::error::Result;
use crate::geom::Rect;
use crate::render::{Canvas, debug_color};

pub type ObjectHandle = Rc<RefCell<dyn LevelObject>>;

pub trait LevelObject: Any {
    /// Shared collision state
    fn body(&self) -> &Rc<Body>;

    /// Identifier this type is registered under; `None` for objects that
    /// only ever come from `Level::spawn`
    fn registry_id(&self) -> Option<&'static str> {
        None
    }

    /// Called once when the object becomes active in a started level
    fn on_spawn(&mut self, _level: &mut Level) {}

    /// Called before removal; returning `false` vetoes a non-forced destroy
    fn on_death(&mut self, _level: &mut Level) -> bool {
        true
    }

    fn update(&mut self, _dt: f64, _level: &mut Level) {}

    fn draw(&self, _canvas: &mut dyn Canvas, _offset: DVec2) {}

    /// Additive lighting pass
    fn draw_lighting(&self, _canvas: &mut dyn Canvas, _offset: DVec2) {}

    fn debug_draw_collision(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        let body = self.body();
        let color = debug_color(body.collision_type());
        let rect = body.rect() - offset;
        canvas.outline_rect(rect, 2.0, color);
        canvas.circle(rect.pos(), 2.0, color);
    }

    /// New object with the same configuration at `pos`, not yet in any level
    fn copy_at(&self, pos: DVec2) -> ObjectHandle;

    /// Editable fields for tooling
    fn parameters(&mut self) -> ParameterSet<'_>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Wrap a concrete object into a handle
pub fn into_handle<T: LevelObject>(object: T) -> ObjectHandle {
    Rc::new(RefCell::new(object))
}

/// An object as seen by the level: its handle plus its shared body
///
/// This is also the collision index entry. Holding one past a destroy is
/// safe; the body reports `is_attached() == false` afterwards.
#[derive(Clone)]
pub struct ObjectRef {
    pub(crate) body: Rc<Body>,
    pub(crate) object: ObjectHandle,
}

impl ObjectRef {
    /// Borrows the object once to fetch its body
    pub fn new(object: ObjectHandle) -> Self {
        let body = object.borrow().body().clone();
        Self { body, object }
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.body.id()
    }

    pub fn body(&self) -> &Rc<Body> {
        &self.body
    }

    pub fn handle(&self) -> &ObjectHandle {
        &self.object
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn collision_type(&self) -> CollisionType {
        self.body.collision_type()
    }

    pub fn walkable(&self) -> bool {
        self.body.walkable()
    }

    pub fn depth(&self) -> f64 {
        self.body.depth()
    }

    pub fn is_dynamic(&self) -> bool {
        self.body.is_dynamic()
    }

    /// Identity check against a body
    pub fn is(&self, body: &Body) -> bool {
        std::ptr::eq(Rc::as_ptr(&self.body), body)
    }

    /// Typed read access; `None` if the type differs or the object is
    /// mutably borrowed right now
    pub fn downcast<T: LevelObject>(&self) -> Option<Ref<'_, T>> {
        let object = self.object.try_borrow().ok()?;
        Ref::filter_map(object, |o| o.as_any().downcast_ref::<T>()).ok()
    }

    pub fn downcast_mut<T: LevelObject>(&self) -> Option<RefMut<'_, T>> {
        let object = self.object.try_borrow_mut().ok()?;
        RefMut::filter_map(object, |o| o.as_any_mut().downcast_mut::<T>()).ok()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.id())
            .field("rect", &self.rect())
            .field("collision_type", &self.collision_type())
            .finish()
    }
}

/// Plain static object: collision only, draws nothing
pub struct StaticObject {
    body: Rc<Body>,
}

impl StaticObject {
    pub const REGISTRY_ID: &'static str = "level_object";

    pub fn new(rect: Rect, collision_type: CollisionType, walkable: bool) -> Self {
        Self {
            body: Body::new(rect, collision_type, walkable).shared(),
        }
    }
}

impl LevelObject for StaticObject {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn registry_id(&self) -> Option<&'static str> {
        Some(Self::REGISTRY_ID)
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Self {
            body: self.body.duplicate_at(pos),
        })
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Level Object", &self.body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ObjectFactory for StaticObject {
    fn from_data(data: &Value, _ctx: &LoadContext) -> Result<Self> {
        let rect = super::data::opt_rect(data, "collision")?.unwrap_or_default();
        let collision_type =
            super::data::opt_collision_type(data, "collision_type")?.unwrap_or_default();
        let walkable = super::data::opt_bool(data, "walkable")?.unwrap_or(true);
        Ok(Self::new(rect, collision_type, walkable))
    }

    fn with_defaults(_ctx: &LoadContext) -> Self {
        Self::new(Rect::ZERO, CollisionType::NoCollision, true)
    }

    fn to_data(&self) -> Value {
        super::data::body_to_data(&self.body, "collision")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_is_fresh_identity() {
        let original = StaticObject::new(Rect::new(0.0, 0.0, 8.0, 8.0), CollisionType::BlockAll, false);
        original.body.attach(ObjectId(3));

        let copy = ObjectRef::new(original.copy_at(DVec2::new(100.0, 0.0)));
        assert_eq!(copy.rect(), Rect::new(100.0, 0.0, 8.0, 8.0));
        assert_eq!(copy.collision_type(), CollisionType::BlockAll);
        assert!(!copy.walkable());
        assert_eq!(copy.id(), None);
        assert!(!copy.is(&original.body));
    }

    #[test]
    fn test_downcast() {
        let handle = into_handle(StaticObject::new(Rect::ZERO, CollisionType::NoCollision, true));
        let entry = ObjectRef::new(handle);
        assert!(entry.downcast::<StaticObject>().is_some());

        let _guard = entry.handle().borrow_mut();
        assert!(entry.downcast::<StaticObject>().is_none());
    }
}
