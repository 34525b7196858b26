//! Enemies and Bodies
//!
//! Enemies react to player hurt boxes and projectiles by flying back with
//! knockback. A stunned enemy that bumps into another enemy kills it; a dead
//! enemy is swapped for an inert [`Body`] on its next update.

use tracing::debug;

use crate::config::CombatConfig;
use crate::core::timer::clamp_delta;
use crate::core::vec2::Vec2;
use crate::game::events::{EventSink, GameEvent};
use crate::game::hitbox::Origin;
use crate::game::scene::{CollisionView, ObjectId, ObjectKind, SceneHandle, SceneObject};

/// A hostile that can be knocked around.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enemy {
    /// World position
    pub position: Vec2,
    /// Knockback velocity, units per second
    pub velocity: Vec2,
    /// Flying back from a hit
    pub stunned: bool,
    /// Waiting to be replaced by a body
    pub dead: bool,
}

impl Enemy {
    /// Idle enemy at `position`.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// React to an overlap with `other`.
    pub fn collided_with(&mut self, other: &CollisionView, combat: &CombatConfig) {
        if self.dead {
            return;
        }
        match other.kind {
            ObjectKind::HurtBox | ObjectKind::Projectile
                if other.origin == Some(Origin::Player) && !self.stunned =>
            {
                let mut away = (self.position - other.position).normalize();
                if away.is_zero() {
                    away = Vec2::UP;
                }
                self.velocity = away.scale(other.intensity.powf(combat.knockback_exponent));
                self.stunned = true;
                debug!(intensity = other.intensity, "enemy knocked back");
            }
            ObjectKind::Enemy if other.stunned && !self.stunned => {
                self.dead = true;
                debug!(by = other.id.0, "enemy killed");
            }
            _ => {}
        }
    }

    /// Fly back while stunned; request replacement by a body once dead.
    pub fn tick(
        &mut self,
        id: ObjectId,
        dt: f32,
        now: f64,
        combat: &CombatConfig,
        scene: &mut dyn SceneHandle,
        events: &mut dyn EventSink,
    ) {
        if self.dead {
            scene.remove(id);
            scene.add(SceneObject::Body(Body::new(self.position)));
            events.emit(GameEvent::defeated(now, id, self.position));
            return;
        }

        if !self.stunned {
            return;
        }
        let dt = clamp_delta(dt);
        self.position += self.velocity.scale(dt);
        self.velocity = self.velocity.scale(combat.knockback_damping.powf(dt));
        if self.velocity.length() < combat.knockback_epsilon {
            self.velocity = Vec2::ZERO;
            self.stunned = false;
        }
    }
}

/// What a defeated enemy leaves behind. Not collidable.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    /// World position
    pub position: Vec2,
}

impl Body {
    /// Body at `position`.
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}
