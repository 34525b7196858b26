//! Scene Object Store
//!
//! Owns every live object and applies additions and removals only between
//! updates: during an update objects write into a command buffer, and the
//! buffer is flushed once everything has run. Collision reactions look
//! objects up by id, so a removed object is simply absent.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use tracing::{debug, trace};

use crate::config::{SceneConfig, TuningConfig};
use crate::core::timer::Clock;
use crate::core::vec2::Vec2;
use crate::error::ConfigError;
use crate::game::actor::Actor;
use crate::game::collision::{circles_overlap, CollisionGroup, CollisionRule, CollisionScene};
use crate::game::enemy::{Body, Enemy};
use crate::game::events::GameEvent;
use crate::game::hitbox::{HurtBox, Origin, Projectile};
use crate::game::input::FrameInput;

/// Stable identifier of a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Identifier of a scene, used to key cached collision groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneId(pub u32);

/// Object kinds, also the names collision rules refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Input-driven actor
    Player,
    /// Knockable hostile
    Enemy,
    /// Transient damaging region
    HurtBox,
    /// Arrow in flight
    Projectile,
    /// Defeated enemy remains
    Body,
}

impl FromStr for ObjectKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(ObjectKind::Player),
            "enemy" => Ok(ObjectKind::Enemy),
            "hurt_box" => Ok(ObjectKind::HurtBox),
            "projectile" => Ok(ObjectKind::Projectile),
            "body" => Ok(ObjectKind::Body),
            other => Err(ConfigError::UnknownObjectKind(other.to_string())),
        }
    }
}

/// Anything that lives in a scene.
#[derive(Clone, Debug)]
pub enum SceneObject {
    /// Input-driven actor
    Player(Actor),
    /// Knockable hostile
    Enemy(Enemy),
    /// Transient damaging region
    HurtBox(HurtBox),
    /// Arrow in flight
    Projectile(Projectile),
    /// Defeated enemy remains
    Body(Body),
}

impl SceneObject {
    /// Kind tag.
    pub fn kind(&self) -> ObjectKind {
        match self {
            SceneObject::Player(_) => ObjectKind::Player,
            SceneObject::Enemy(_) => ObjectKind::Enemy,
            SceneObject::HurtBox(_) => ObjectKind::HurtBox,
            SceneObject::Projectile(_) => ObjectKind::Projectile,
            SceneObject::Body(_) => ObjectKind::Body,
        }
    }

    /// World position.
    pub fn position(&self) -> Vec2 {
        match self {
            SceneObject::Player(actor) => actor.position(),
            SceneObject::Enemy(enemy) => enemy.position,
            SceneObject::HurtBox(hurt_box) => hurt_box.position,
            SceneObject::Projectile(projectile) => projectile.position,
            SceneObject::Body(body) => body.position,
        }
    }

    /// Bodies and dead enemies take no part in collision.
    pub fn collidable(&self) -> bool {
        match self {
            SceneObject::Body(_) => false,
            SceneObject::Enemy(enemy) => !enemy.dead,
            _ => true,
        }
    }
}

/// Where objects queue additions and removals during an update.
pub trait SceneHandle {
    /// Queue an object for insertion.
    fn add(&mut self, object: SceneObject);
    /// Queue an object for removal.
    fn remove(&mut self, id: ObjectId);
}

/// Buffered scene mutations.
#[derive(Debug, Default)]
pub struct SceneCommands {
    adds: Vec<SceneObject>,
    removes: Vec<ObjectId>,
}

impl SceneCommands {
    /// Nothing queued?
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.removes.is_empty()
    }
}

impl SceneHandle for SceneCommands {
    fn add(&mut self, object: SceneObject) {
        self.adds.push(object);
    }

    fn remove(&mut self, id: ObjectId) {
        self.removes.push(id);
    }
}

/// Read-only view of one object, taken before any reaction runs.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionView {
    /// Object id
    pub id: ObjectId,
    /// Object kind
    pub kind: ObjectKind,
    /// Position at snapshot time
    pub position: Vec2,
    /// Collision radius
    pub radius: f32,
    /// Knockback strength for threats, 0 otherwise
    pub intensity: f32,
    /// Producing side, for threats
    pub origin: Option<Origin>,
    /// Enemy is flying back
    pub stunned: bool,
    /// Enemy is waiting for replacement
    pub dead: bool,
}

/// A scene: the object store plus its collision settings.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    objects: BTreeMap<ObjectId, SceneObject>,
    next_id: u32,
    pending: SceneCommands,
    events: Vec<GameEvent>,
    clock: Clock,
    provide_collision: bool,
    rules: Option<Vec<CollisionRule>>,
    tuning: Arc<TuningConfig>,
}

impl Scene {
    /// Empty scene without collision.
    pub fn new(id: SceneId, tuning: Arc<TuningConfig>) -> Self {
        Self {
            id,
            objects: BTreeMap::new(),
            next_id: 1,
            pending: SceneCommands::default(),
            events: Vec::new(),
            clock: Clock::new(),
            provide_collision: false,
            rules: None,
            tuning,
        }
    }

    /// Scene configured from [`SceneConfig`].
    pub fn from_config(
        id: SceneId,
        config: &SceneConfig,
        tuning: Arc<TuningConfig>,
    ) -> Result<Self, ConfigError> {
        let mut scene = Self::new(id, tuning);
        scene.provide_collision = config.provide_collision;
        let rules = config.rules()?;
        if !rules.is_empty() {
            scene.rules = Some(rules);
        }
        Ok(scene)
    }

    /// Opt in or out of collision.
    pub fn set_provide_collision(&mut self, provide: bool) {
        self.provide_collision = provide;
    }

    /// Declare which groups collide. Colliders that already cached this
    /// scene must be invalidated.
    pub fn declare_collision_rules(&mut self, rules: Vec<CollisionRule>) {
        self.rules = Some(rules);
    }

    /// Shared tuning.
    pub fn tuning(&self) -> &Arc<TuningConfig> {
        &self.tuning
    }

    /// Seconds simulated.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert a player at `position` immediately.
    pub fn spawn_player(&mut self, position: Vec2) -> ObjectId {
        let id = self.allocate_id();
        let actor = Actor::new(id, position, Arc::clone(&self.tuning));
        self.objects.insert(id, SceneObject::Player(actor));
        id
    }

    /// Insert any object immediately, for setup outside an update.
    pub fn spawn(&mut self, object: SceneObject) -> ObjectId {
        let id = match &object {
            SceneObject::Player(actor) => {
                self.next_id = self.next_id.max(actor.id().0 + 1);
                actor.id()
            }
            _ => self.allocate_id(),
        };
        self.objects.insert(id, object);
        id
    }

    /// Object by id.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Player by id.
    pub fn player(&self, id: ObjectId) -> Option<&Actor> {
        match self.objects.get(&id) {
            Some(SceneObject::Player(actor)) => Some(actor),
            _ => None,
        }
    }

    /// Enemy by id.
    pub fn enemy(&self, id: ObjectId) -> Option<&Enemy> {
        match self.objects.get(&id) {
            Some(SceneObject::Enemy(enemy)) => Some(enemy),
            _ => None,
        }
    }

    /// Every live object of `kind`, in id order.
    pub fn query_kind(&self, kind: ObjectKind) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .filter(move |(_, object)| object.kind() == kind)
            .map(|(id, object)| (*id, object))
    }

    /// Count of live objects of `kind`.
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.query_kind(kind).count()
    }

    /// Live object count.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// No live objects?
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Update every object once. Players receive `input`; everything else
    /// only the frame delta. Mutations are buffered until [`Scene::flush`].
    pub fn update(&mut self, input: &FrameInput) {
        self.clock.advance(input.dt);
        let now = self.clock.now();
        let combat = &self.tuning.combat;

        for (id, object) in self.objects.iter_mut() {
            match object {
                SceneObject::Player(actor) => {
                    actor.update(input, &mut self.pending, &mut self.events)
                }
                SceneObject::Enemy(enemy) => enemy.tick(
                    *id,
                    input.dt,
                    now,
                    combat,
                    &mut self.pending,
                    &mut self.events,
                ),
                SceneObject::HurtBox(hurt_box) => hurt_box.tick(*id, input.dt, &mut self.pending),
                SceneObject::Projectile(projectile) => {
                    projectile.tick(*id, input.dt, &mut self.pending)
                }
                SceneObject::Body(_) => {}
            }
        }
    }

    /// Apply queued removals, then queued additions.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let SceneCommands { adds, removes } = std::mem::take(&mut self.pending);
        for id in &removes {
            if self.objects.remove(id).is_some() {
                trace!(id = id.0, "object removed");
            }
        }
        for object in adds {
            let kind = object.kind();
            let id = self.spawn(object);
            trace!(id = id.0, ?kind, "object added");
        }
        debug!(
            scene = self.id.0,
            removed = removes.len(),
            live = self.objects.len(),
            "scene flushed"
        );
    }

    /// Take every event broadcast since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn view(&self, id: ObjectId, object: &SceneObject) -> CollisionView {
        let combat = &self.tuning.combat;
        let mut view = CollisionView {
            id,
            kind: object.kind(),
            position: object.position(),
            radius: 0.0,
            intensity: 0.0,
            origin: None,
            stunned: false,
            dead: false,
        };
        match object {
            SceneObject::Player(_) => view.radius = combat.player_radius,
            SceneObject::Enemy(enemy) => {
                view.radius = combat.enemy_radius;
                view.stunned = enemy.stunned;
                view.dead = enemy.dead;
            }
            SceneObject::HurtBox(hurt_box) => {
                view.radius = combat.hurt_box_radius;
                view.intensity = hurt_box.intensity;
                view.origin = Some(hurt_box.origin);
            }
            SceneObject::Projectile(projectile) => {
                view.radius = combat.projectile_radius;
                view.intensity = projectile.intensity;
                view.origin = Some(projectile.source());
            }
            SceneObject::Body(_) => {}
        }
        view
    }
}

impl SceneHandle for Scene {
    fn add(&mut self, object: SceneObject) {
        self.pending.add(object);
    }

    fn remove(&mut self, id: ObjectId) {
        self.pending.remove(id);
    }
}

impl CollisionScene for Scene {
    type Snapshot = CollisionView;

    fn scene_id(&self) -> SceneId {
        self.id
    }

    fn provides_collision(&self) -> bool {
        self.provide_collision
    }

    fn collision_rules(&self) -> Option<&[CollisionRule]> {
        self.rules.as_deref()
    }

    fn query(&self, group: CollisionGroup) -> Vec<CollisionView> {
        self.objects
            .iter()
            .filter(|(_, object)| object.collidable() && group.contains(object.kind()))
            .map(|(id, object)| self.view(*id, object))
            .collect()
    }

    fn same_object(left: &CollisionView, right: &CollisionView) -> bool {
        left.id == right.id
    }

    fn react(&mut self, target: &CollisionView, other: &CollisionView) -> bool {
        match self.objects.get_mut(&target.id) {
            Some(SceneObject::Enemy(enemy)) => {
                enemy.collided_with(other, &self.tuning.combat);
                true
            }
            _ => false,
        }
    }
}

/// Overlap predicate for [`Scene`] snapshots.
pub fn views_overlap(left: &CollisionView, right: &CollisionView) -> bool {
    circles_overlap(left.position, left.radius, right.position, right.radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(SceneId(1), Arc::new(TuningConfig::default()))
    }

    #[test]
    fn test_kind_names_parse() {
        assert_eq!("hurt_box".parse::<ObjectKind>().ok(), Some(ObjectKind::HurtBox));
        assert!(matches!(
            "HurtBox".parse::<ObjectKind>(),
            Err(ConfigError::UnknownObjectKind(_))
        ));
    }

    #[test]
    fn test_additions_wait_for_flush() {
        let mut scene = scene();
        scene.add(SceneObject::Enemy(Enemy::new(Vec2::ZERO)));
        assert!(scene.is_empty());

        scene.flush();
        assert_eq!(scene.count(ObjectKind::Enemy), 1);
    }

    #[test]
    fn test_removal_waits_for_flush() {
        let mut scene = scene();
        let id = scene.spawn(SceneObject::Body(Body::new(Vec2::ZERO)));
        scene.remove(id);
        assert!(scene.get(id).is_some());

        scene.flush();
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut scene = scene();
        let player = scene.spawn_player(Vec2::ZERO);
        let enemy = scene.spawn(SceneObject::Enemy(Enemy::new(Vec2::RIGHT)));
        assert_ne!(player, enemy);
        assert_eq!(scene.player(player).map(|a| a.id()), Some(player));
    }

    #[test]
    fn test_bodies_are_not_collidable() {
        let mut scene = scene();
        scene.spawn(SceneObject::Body(Body::new(Vec2::ZERO)));
        scene.spawn(SceneObject::Enemy(Enemy::new(Vec2::ZERO)));
        assert_eq!(scene.query(CollisionGroup::Any).len(), 1);
    }

    #[test]
    fn test_dead_enemies_leave_collision() {
        let mut scene = scene();
        let mut dead = Enemy::new(Vec2::ZERO);
        dead.dead = true;
        scene.spawn(SceneObject::Enemy(dead));
        assert!(scene.query(CollisionGroup::Kind(ObjectKind::Enemy)).is_empty());
    }

    #[test]
    fn test_react_on_missing_object_is_skipped() {
        let mut scene = scene();
        let id = scene.spawn(SceneObject::Enemy(Enemy::new(Vec2::ZERO)));
        let views = scene.query(CollisionGroup::Any);
        scene.objects.clear();
        assert!(!scene.react(&views[0], &views[0]));
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn test_hurt_box_view_carries_threat() {
        let mut scene = scene();
        scene.spawn(SceneObject::HurtBox(HurtBox::new(Vec2::RIGHT, 3.0, Origin::Player, 0.2)));
        let views = scene.query(CollisionGroup::Kind(ObjectKind::HurtBox));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].intensity, 3.0);
        assert_eq!(views[0].origin, Some(Origin::Player));
        assert_eq!(views[0].radius, 0.5);
    }
}
