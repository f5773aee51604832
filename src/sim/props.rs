//! Static scenery: floors, props and light sources

use std::any::Any;
use std::rc::Rc;

use glam::DVec2;
use serde_json::{Value, json};

use super::body::Body;
use super::collision::CollisionType;
use super::data;
use super::level::Level;
use super::object::{LevelObject, ObjectHandle, into_handle};
use super::params::{ParamField, ParameterSet};
use super::registry::{LoadContext, ObjectFactory};
use crate::assets::Animation;
use crate::consts::{DEFAULT_ANIMATION, MARKER_SIZE};
use crate::error::Result;
use crate::geom::Rect;
use crate::render::{self, Canvas, Color, color};

/// Walkable ground. Never collides and always sorts below everything else.
pub struct LevelFloor {
    body: Rc<Body>,
    texture: Animation,
    light_level: u8,
}

impl LevelFloor {
    pub const REGISTRY_ID: &'static str = "level_floor";

    pub fn new(area: Rect, texture: Animation, light_level: u8) -> Self {
        Self {
            body: Body::new(area, CollisionType::NoCollision, true).floor().shared(),
            texture,
            light_level,
        }
    }

    pub fn texture(&self) -> &Animation {
        &self.texture
    }

    pub fn light_level(&self) -> u8 {
        self.light_level
    }
}

impl LevelObject for LevelFloor {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn registry_id(&self) -> Option<&'static str> {
        Some(Self::REGISTRY_ID)
    }

    fn draw(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        render::draw_animation_tiled(canvas, &self.texture, self.body.rect() - offset, color::WHITE);
    }

    /// Darken by how far the light level is below full
    fn draw_lighting(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        let darkness = (255 - self.light_level) as f32 / 255.0;
        canvas.fill_rect(self.body.rect() - offset, color::BLACK.fade(darkness));
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Self::new(
            self.body.rect().with_pos(pos),
            self.texture.clone(),
            self.light_level,
        ))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::new("Level Floor")
            .with("Area", ParamField::Rect(self.body.rect_cell()))
            .with("Texture", ParamField::Animation(&mut self.texture))
            .with(
                "Light Level",
                ParamField::Byte {
                    value: &mut self.light_level,
                    min: 0,
                    max: 255,
                },
            )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ObjectFactory for LevelFloor {
    fn from_data(data: &Value, ctx: &LoadContext) -> Result<Self> {
        let area = data::req_rect(data, "area")?;
        let texture = data::opt_str(data, "texture")?.unwrap_or(DEFAULT_ANIMATION);
        let light_level = data::opt_u8(data, "light_level")?.unwrap_or(255);
        Ok(Self::new(area, ctx.animations.get(texture), light_level))
    }

    fn with_defaults(ctx: &LoadContext) -> Self {
        Self::new(
            Rect::new(0.0, 0.0, MARKER_SIZE, MARKER_SIZE),
            ctx.animations.get(DEFAULT_ANIMATION),
            255,
        )
    }

    fn to_data(&self) -> Value {
        json!({
            "area": self.body.rect().components(),
            "texture": self.texture.id(),
            "light_level": self.light_level,
        })
    }
}

/// Animated, tinted scenery with configurable collision
pub struct LevelProp {
    body: Rc<Body>,
    texture: Animation,
    tint: Color,
}

impl LevelProp {
    pub const REGISTRY_ID: &'static str = "level_prop";

    pub fn new(rect: Rect, collision_type: CollisionType, walkable: bool, texture: Animation, tint: Color) -> Self {
        Self {
            body: Body::new(rect, collision_type, walkable).shared(),
            texture,
            tint,
        }
    }

    pub fn texture(&self) -> &Animation {
        &self.texture
    }

    pub fn tint(&self) -> Color {
        self.tint
    }
}

impl LevelObject for LevelProp {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn registry_id(&self) -> Option<&'static str> {
        Some(Self::REGISTRY_ID)
    }

    fn update(&mut self, dt: f64, _level: &mut Level) {
        self.texture.advance(dt);
    }

    fn draw(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        render::draw_animation(canvas, &self.texture, self.body.rect() - offset, self.tint);
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        let mut texture = self.texture.clone();
        texture.reset();
        into_handle(Self::new(
            self.body.rect().with_pos(pos),
            self.body.collision_type(),
            self.body.walkable(),
            texture,
            self.tint,
        ))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Level Prop", &self.body)
            .with("Animation", ParamField::Animation(&mut self.texture))
            .with("Tint", ParamField::Color(&mut self.tint))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ObjectFactory for LevelProp {
    fn from_data(data: &Value, ctx: &LoadContext) -> Result<Self> {
        let rect = data::opt_rect(data, "collision")?.unwrap_or_default();
        let collision_type = data::opt_collision_type(data, "collision_type")?.unwrap_or_default();
        let walkable = data::opt_bool(data, "walkable")?.unwrap_or(true);
        let tint = data::opt_color(data, "tint")?.unwrap_or(color::WHITE);
        let texture = data::req_str(data, "texture")?;
        Ok(Self::new(rect, collision_type, walkable, ctx.animations.get(texture), tint))
    }

    fn with_defaults(ctx: &LoadContext) -> Self {
        Self::new(
            Rect::new(0.0, 0.0, MARKER_SIZE, MARKER_SIZE),
            CollisionType::BlockAll,
            false,
            ctx.animations.get(DEFAULT_ANIMATION),
            color::WHITE,
        )
    }

    fn to_data(&self) -> Value {
        let mut out = data::body_to_data(&self.body, "collision");
        out["texture"] = json!(self.texture.id());
        out["tint"] = data::color_to_data(self.tint);
        out
    }
}

/// Default light radius for editor-placed lights
const DEFAULT_LIGHT_RADIUS: f32 = 64.0;

/// Point light drawn in the lighting pass; a non-colliding marker otherwise
pub struct LevelLightSource {
    body: Rc<Body>,
    radius: f32,
    color: Color,
    light_level: u8,
}

impl LevelLightSource {
    pub const REGISTRY_ID: &'static str = "level_light_source";

    pub fn new(pos: DVec2, radius: f32, color: Color, light_level: u8) -> Self {
        Self {
            body: Body::new(
                Rect::from_pos_size(pos, MARKER_SIZE, MARKER_SIZE),
                CollisionType::NoCollision,
                true,
            )
            .shared(),
            radius,
            color,
            light_level,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl LevelObject for LevelLightSource {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn registry_id(&self) -> Option<&'static str> {
        Some(Self::REGISTRY_ID)
    }

    fn draw_lighting(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        canvas.radial_gradient(
            self.body.pos() - offset,
            self.radius,
            self.color.fade(self.light_level as f32 / 255.0),
            self.color.fade(0.003),
        );
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Self::new(pos, self.radius, self.color, self.light_level))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::new("Level Light Source")
            .with(
                "Radius",
                ParamField::Float {
                    value: &mut self.radius,
                    min: 0.0,
                    max: f32::MAX,
                },
            )
            .with("Color", ParamField::Color(&mut self.color))
            .with(
                "Light Level",
                ParamField::Byte {
                    value: &mut self.light_level,
                    min: 0,
                    max: 255,
                },
            )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ObjectFactory for LevelLightSource {
    fn from_data(data: &Value, _ctx: &LoadContext) -> Result<Self> {
        let pos = data::opt_vec2(data, "pos")?.unwrap_or_default();
        let color = data::opt_color(data, "color")?.unwrap_or(color::WHITE);
        let radius = data::opt_f32(data, "radius")?.unwrap_or(DEFAULT_LIGHT_RADIUS);
        let light_level = data::opt_u8(data, "light_level")?.unwrap_or(255);
        Ok(Self::new(pos, radius, color, light_level))
    }

    fn with_defaults(_ctx: &LoadContext) -> Self {
        Self::new(DVec2::ZERO, DEFAULT_LIGHT_RADIUS, color::WHITE, 255)
    }

    fn to_data(&self) -> Value {
        let pos = self.body.pos();
        json!({
            "pos": [pos.x, pos.y],
            "color": data::color_to_data(self.color),
            "radius": self.radius,
            "light_level": self.light_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AnimationDesc, AnimationLibrary, Playback};
    use crate::error::LevelError;
    use crate::render::{DrawCommand, DrawList};
    use crate::settings::Settings;

    fn library() -> AnimationLibrary {
        let mut library = AnimationLibrary::new();
        library
            .insert(
                "torch",
                AnimationDesc {
                    path: "props/torch.png".into(),
                    frame_width: 16,
                    frame_height: 32,
                    frame_duration: 0.1,
                    frame_count: 4,
                    playback: Playback::Loop,
                },
            )
            .unwrap();
        library
    }

    #[test]
    fn test_floor_requires_area() {
        let animations = library();
        let settings = Settings::default();
        let ctx = LoadContext::new(&animations, &settings);
        assert!(matches!(
            LevelFloor::from_data(&json!({"texture": "torch"}), &ctx),
            Err(LevelError::MissingKey { .. })
        ));
        let floor = LevelFloor::from_data(&json!({"area": [0, 0, 100, 100]}), &ctx).unwrap();
        assert_eq!(floor.texture().id(), DEFAULT_ANIMATION);
        assert_eq!(floor.light_level(), 255);
        assert_eq!(floor.body().depth(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_floor_lighting_darkens() {
        let floor = LevelFloor::new(Rect::new(0.0, 0.0, 10.0, 10.0), Animation::placeholder(), 55);
        let mut list = DrawList::new();
        floor.draw_lighting(&mut list, DVec2::ZERO);
        assert_eq!(
            list.commands()[0],
            DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                color: color::BLACK.fade(200.0 / 255.0),
            }
        );
    }

    #[test]
    fn test_prop_from_data() {
        let animations = library();
        let settings = Settings::default();
        let ctx = LoadContext::new(&animations, &settings);

        assert!(matches!(
            LevelProp::from_data(&json!({"collision": [0, 0, 8, 8]}), &ctx),
            Err(LevelError::MissingKey { .. })
        ));

        let prop = LevelProp::from_data(
            &json!({"texture": "torch", "tint": [0.0, 1.0, 0.0], "collision_type": 3}),
            &ctx,
        )
        .unwrap();
        assert_eq!(prop.tint(), Color::rgb(0, 255, 0));
        assert_eq!(prop.texture().frame_count(), 4);
        assert_eq!(prop.body().collision_type(), CollisionType::BlockAll);
        assert!(prop.body().walkable());

        let out = prop.to_data();
        assert_eq!(out["tint"], json!([0, 255, 0]));
        assert_eq!(out["texture"], json!("torch"));
    }

    #[test]
    fn test_light_round_trip() {
        let animations = AnimationLibrary::new();
        let settings = Settings::default();
        let ctx = LoadContext::new(&animations, &settings);

        let light = LevelLightSource::new(DVec2::new(5.0, 6.0), 120.0, Color::rgb(255, 200, 0), 180);
        let copy = LevelLightSource::from_data(&light.to_data(), &ctx).unwrap();
        assert_eq!(copy.body().rect(), light.body().rect());
        assert_eq!(copy.radius(), 120.0);
        assert_eq!(copy.color(), light.color());
        assert_eq!(copy.body().collision_type(), CollisionType::NoCollision);
    }

    #[test]
    fn test_light_draws_gradient() {
        let light = LevelLightSource::new(DVec2::new(50.0, 50.0), 80.0, color::WHITE, 255);
        let mut list = DrawList::new();
        light.draw(&mut list, DVec2::ZERO);
        assert!(list.is_empty());

        light.draw_lighting(&mut list, DVec2::new(10.0, 0.0));
        match &list.commands()[0] {
            DrawCommand::RadialGradient { center, radius, inner, .. } => {
                assert_eq!(*center, DVec2::new(40.0, 50.0));
                assert_eq!(*radius, 80.0);
                assert_eq!(inner.a, 255);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
