//! Editable parameter descriptors
//!
//! Objects describe their editable fields as typed references so external
//! tooling can build property panels without the core knowing any UI
//! toolkit. Collision state lives in shared cells and is exposed as such;
//! object-private fields are handed out as `&mut`.

use std::cell::Cell;

use super::body::Body;
use super::collision::CollisionType;
use crate::assets::Animation;
use crate::geom::Rect;
use crate::render::Color;

/// Type tag of a parameter, for tools that only need to pick a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Rect,
    Bool,
    CollisionType,
    Float,
    Byte,
    Color,
    Animation,
}

pub enum ParamField<'a> {
    Rect(&'a Cell<Rect>),
    Bool(&'a Cell<bool>),
    /// Enum field; labels come from `CollisionType::label`
    CollisionType(&'a Cell<CollisionType>),
    Float {
        value: &'a mut f32,
        min: f32,
        max: f32,
    },
    Byte {
        value: &'a mut u8,
        min: u8,
        max: u8,
    },
    Color(&'a mut Color),
    Animation(&'a mut Animation),
}

impl ParamField<'_> {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamField::Rect(_) => ParamKind::Rect,
            ParamField::Bool(_) => ParamKind::Bool,
            ParamField::CollisionType(_) => ParamKind::CollisionType,
            ParamField::Float { .. } => ParamKind::Float,
            ParamField::Byte { .. } => ParamKind::Byte,
            ParamField::Color(_) => ParamKind::Color,
            ParamField::Animation(_) => ParamKind::Animation,
        }
    }

    /// Numeric range, for fields that have one
    pub fn range(&self) -> Option<(f64, f64)> {
        match self {
            ParamField::Float { min, max, .. } => Some((*min as f64, *max as f64)),
            ParamField::Byte { min, max, .. } => Some((*min as f64, *max as f64)),
            _ => None,
        }
    }
}

pub struct ObjectParameter<'a> {
    pub name: &'static str,
    pub field: ParamField<'a>,
}

/// Titled list of editable fields for one object
pub struct ParameterSet<'a> {
    pub title: &'static str,
    pub fields: Vec<ObjectParameter<'a>>,
}

impl<'a> ParameterSet<'a> {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            fields: Vec::new(),
        }
    }

    /// Start from the collision, collision type and walkable fields
    pub fn for_body(title: &'static str, body: &'a Body) -> Self {
        Self::new(title)
            .with("Collision", ParamField::Rect(body.rect_cell()))
            .with("Collision Type", ParamField::CollisionType(body.collision_type_cell()))
            .with("Walkable", ParamField::Bool(body.walkable_cell()))
    }

    pub fn with(mut self, name: &'static str, field: ParamField<'a>) -> Self {
        self.fields.push(ObjectParameter { name, field });
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|p| p.name).collect()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParamField<'a>> {
        self.fields.iter_mut().find(|p| p.name == name).map(|p| &mut p.field)
    }
}
