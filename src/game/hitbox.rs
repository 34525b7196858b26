//! Hurt Boxes and Projectiles
//!
//! Transient threat markers spawned by actor effects. They hold no reference
//! to whoever created them, only an origin tag, and ask the scene to remove
//! them once their time is up.

use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::core::timer::clamp_delta;
use crate::core::vec2::Vec2;
use crate::game::scene::{ObjectId, SceneHandle};

/// Which side produced a threat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Produced by the player
    Player,
    /// Produced by an enemy
    Enemy,
}

/// Short-lived damaging region.
#[derive(Clone, Debug, PartialEq)]
pub struct HurtBox {
    /// World position
    pub position: Vec2,
    /// Knockback strength
    pub intensity: f32,
    /// Producing side
    pub origin: Origin,
    /// Seconds alive
    pub age: f32,
    /// Seconds until removal
    pub lifespan: f32,
}

impl HurtBox {
    /// Spawn a hurt box with zero age.
    pub fn new(position: Vec2, intensity: f32, origin: Origin, lifespan: f32) -> Self {
        Self {
            position,
            intensity,
            origin,
            age: 0.0,
            lifespan,
        }
    }

    /// Has the lifespan run out?
    #[inline]
    pub fn expired(&self) -> bool {
        self.age >= self.lifespan
    }

    /// Age by `dt` and request removal once expired.
    pub fn tick(&mut self, id: ObjectId, dt: f32, scene: &mut dyn SceneHandle) {
        self.age += clamp_delta(dt);
        if self.expired() {
            trace!(id = id.0, age = self.age, "hurt box expired");
            scene.remove(id);
        }
    }
}

/// Arrow travelling in a straight line to a fixed target.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Current position
    pub position: Vec2,
    /// Launch point
    pub origin: Vec2,
    /// Landing point
    pub target: Vec2,
    /// Visual facing (points back toward the shooter)
    pub facing: Vec2,
    /// Knockback strength
    pub intensity: f32,
    /// Travel speed, units per second
    pub speed: f32,
}

impl Projectile {
    /// Launch from `origin` toward `target`.
    pub fn new(origin: Vec2, target: Vec2, intensity: f32, speed: f32) -> Self {
        Self {
            position: origin,
            origin,
            target,
            facing: -(target - origin).normalize(),
            intensity,
            speed,
        }
    }

    /// Always fired by the player.
    pub fn source(&self) -> Origin {
        Origin::Player
    }

    /// Has the projectile reached its target?
    pub fn arrived(&self) -> bool {
        self.position == self.target
    }

    /// Move toward the target; request removal on arrival.
    pub fn tick(&mut self, id: ObjectId, dt: f32, scene: &mut dyn SceneHandle) {
        let step = self.speed * clamp_delta(dt);
        let remaining = self.target - self.position;
        if remaining.length() <= step {
            self.position = self.target;
        } else {
            self.position += remaining.scale_to(step);
        }
        if self.arrived() {
            trace!(id = id.0, "projectile landed");
            scene.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Removals(Vec<ObjectId>);

    impl SceneHandle for Removals {
        fn add(&mut self, _object: crate::game::scene::SceneObject) {}

        fn remove(&mut self, id: ObjectId) {
            self.0.push(id);
        }
    }

    #[test]
    fn test_hurt_box_lives_for_its_lifespan() {
        let id = ObjectId(3);
        let mut scene = Removals::default();
        let mut hurt_box = HurtBox::new(Vec2::ZERO, 1.0, Origin::Player, 0.20);

        // 0.05s frames: ages 0.05, 0.10, 0.15 are alive
        for _ in 0..3 {
            hurt_box.tick(id, 0.05, &mut scene);
            assert!(scene.0.is_empty());
        }

        hurt_box.tick(id, 0.0625, &mut scene);
        assert!(hurt_box.expired());
        assert_eq!(scene.0, vec![id]);
    }

    #[test]
    fn test_hurt_box_ignores_negative_dt() {
        let mut scene = Removals::default();
        let mut hurt_box = HurtBox::new(Vec2::ZERO, 1.0, Origin::Enemy, 0.20);
        hurt_box.tick(ObjectId(1), -5.0, &mut scene);
        assert_eq!(hurt_box.age, 0.0);
        assert!(scene.0.is_empty());
    }

    #[test]
    fn test_projectile_flies_and_lands() {
        let id = ObjectId(9);
        let mut scene = Removals::default();
        let mut arrow = Projectile::new(Vec2::ZERO, Vec2::new(0.0, 4.0), 2.0, 10.0);
        assert_eq!(arrow.facing, Vec2::new(-0.0, -1.0));

        arrow.tick(id, 0.2, &mut scene);
        assert!(arrow.position.approx_eq(Vec2::new(0.0, 2.0), 1e-5));
        assert!(scene.0.is_empty());

        arrow.tick(id, 0.5, &mut scene);
        assert_eq!(arrow.position, Vec2::new(0.0, 4.0));
        assert_eq!(scene.0, vec![id]);
    }
}
