//! Living dynamic objects: health, damage effects and the generic sprite

use std::any::Any;
use std::rc::Rc;

use glam::DVec2;

use super::body::Body;
use super::collision::CollisionType;
use super::dynamic::Motion;
use super::level::Level;
use super::object::{LevelObject, ObjectHandle, into_handle};
use super::params::ParameterSet;
use crate::consts::MARKER_SIZE;
use crate::geom::Rect;
use crate::render::{Canvas, color};

/// Hit points clamped to `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Full health
    pub fn new(max: f32) -> Self {
        let max = max.abs();
        Self { current: max, max }
    }

    pub fn with_current(max: f32, current: f32) -> Self {
        let max = max.abs();
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Heal (positive) or hurt (negative)
    pub fn add(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn set_max(&mut self, max: f32) {
        self.max = max.abs();
        self.current = self.current.min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// An effect that changes health over time (poison, a single hit, ...)
pub trait Damage {
    fn name(&self) -> &str;
    fn apply(&mut self, dt: f64, health: &mut Health);
    /// The effect has run its course and can be dropped
    fn is_finished(&self) -> bool;
}

/// Deals its amount once
#[derive(Debug, Clone)]
pub struct PhysicalDamage {
    amount: f32,
    dealt: bool,
}

impl PhysicalDamage {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: amount.abs(),
            dealt: false,
        }
    }
}

impl Damage for PhysicalDamage {
    fn name(&self) -> &str {
        "physical_damage"
    }

    fn apply(&mut self, _dt: f64, health: &mut Health) {
        if !self.dealt {
            health.add(-self.amount);
            self.dealt = true;
        }
    }

    fn is_finished(&self) -> bool {
        self.dealt
    }
}

/// Health plus the single active damage effect
pub struct Vitals {
    pub health: Health,
    damage: Option<Box<dyn Damage>>,
}

impl Vitals {
    pub fn new(health: Health) -> Self {
        Self {
            health,
            damage: None,
        }
    }

    /// Replace the active damage effect
    pub fn inflict(&mut self, damage: impl Damage + 'static) {
        log::debug!("Inflicting {}", damage.name());
        self.damage = Some(Box::new(damage));
    }

    pub fn is_damaged(&self) -> bool {
        self.damage.is_some()
    }

    /// Run the active effect; returns whether the owner is dead
    pub fn update(&mut self, dt: f64) -> bool {
        if let Some(damage) = self.damage.as_mut() {
            damage.apply(dt, &mut self.health);
            if damage.is_finished() {
                self.damage = None;
            }
        }
        self.health.is_dead()
    }
}

pub(crate) fn draw_shadow(canvas: &mut dyn Canvas, center: DVec2, radius_x: f32, radius_y: f32) {
    canvas.ellipse(center, radius_x, radius_y, color::BLACK.fade(0.3));
}

/// Generic living object placed by `sprite_spawn_point`
pub struct Sprite {
    body: Rc<Body>,
    pub motion: Motion,
    pub vitals: Vitals,
}

impl Sprite {
    pub fn new(pos: DVec2) -> Self {
        Self {
            body: Body::new(
                Rect::from_pos_size(pos, MARKER_SIZE, MARKER_SIZE),
                CollisionType::BlockAll,
                true,
            )
            .dynamic()
            .shared(),
            motion: Motion::new(pos),
            vitals: Vitals::new(Health::new(1.0)),
        }
    }
}

impl LevelObject for Sprite {
    fn body(&self) -> &Rc<Body> {
        &self.body
    }

    fn update(&mut self, dt: f64, level: &mut Level) {
        if self.vitals.update(dt) {
            if let Some(id) = self.body.id() {
                level.queue_destroy(id, false);
            }
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, offset: DVec2) {
        let rect = self.body.rect() - offset;
        draw_shadow(
            canvas,
            DVec2::new(rect.center().x, rect.bottom()),
            (rect.w / 2.5) as f32,
            (rect.h * 0.2) as f32,
        );
    }

    fn copy_at(&self, pos: DVec2) -> ObjectHandle {
        into_handle(Sprite::new(pos))
    }

    fn parameters(&mut self) -> ParameterSet<'_> {
        ParameterSet::for_body("Sprite", &self.body)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_clamps() {
        let mut health = Health::new(-10.0);
        assert_eq!(health.max(), 10.0);
        health.add(5.0);
        assert_eq!(health.current(), 10.0);
        health.add(-25.0);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());

        let mut health = Health::with_current(10.0, 8.0);
        health.set_max(4.0);
        assert_eq!(health.current(), 4.0);
    }

    #[test]
    fn test_physical_damage_applies_once() {
        let mut vitals = Vitals::new(Health::new(3.0));
        vitals.inflict(PhysicalDamage::new(-1.0));
        assert!(!vitals.update(0.1));
        assert_eq!(vitals.health.current(), 2.0);
        assert!(!vitals.is_damaged());
        assert!(!vitals.update(0.1));
        assert_eq!(vitals.health.current(), 2.0);
    }

    #[test]
    fn test_dead_sprite_removes_itself() {
        let mut level = Level::new("sprites");
        let sprite = level.spawn(Sprite::new(DVec2::new(10.0, 10.0)));
        sprite.borrow_mut().vitals.inflict(PhysicalDamage::new(1.0));

        level.update(0.1);
        assert!(level.is_empty());
        assert!(level.collision_index().is_empty());
        assert!(!sprite.borrow().body().is_attached());
    }
}
