//! Collision Resolution
//!
//! Deferred, type-grouped, pairwise overlap detection run once per frame
//! after every object has updated.
//!
//! ```text
//!   rules (A,B) ──▶ groups {A: [..], B: [..]} ──▶ candidate pairs
//!        │                 (fresh snapshot)             │
//!        ▼                                              ▼
//!   cached per scene                        collides(l, r)? ──▶ r reacts to l
//!                                                              l reacts to r
//! ```
//!
//! Groups are queried fresh on every pass and every snapshot is taken before
//! the first reaction runs, so a reaction can never change which pairs are
//! tested or what the other party looked like during the same pass.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use tracing::{debug, trace};

use crate::core::vec2::Vec2;
use crate::error::ConfigError;
use crate::game::scene::{ObjectKind, SceneId};

/// A collision group: every collidable object, or one object kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollisionGroup {
    /// Every collidable object (the base type)
    Any,
    /// Objects of one kind
    Kind(ObjectKind),
}

impl CollisionGroup {
    /// Does an object of `kind` belong to this group?
    pub fn contains(&self, kind: ObjectKind) -> bool {
        match self {
            CollisionGroup::Any => true,
            CollisionGroup::Kind(k) => *k == kind,
        }
    }
}

impl FromStr for CollisionGroup {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "any" {
            Ok(CollisionGroup::Any)
        } else {
            s.parse::<ObjectKind>().map(CollisionGroup::Kind)
        }
    }
}

/// Which groups are tested against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionRule {
    /// Left group
    pub left: CollisionGroup,
    /// Right group
    pub right: CollisionGroup,
}

impl CollisionRule {
    /// Rule between two groups.
    pub const fn new(left: CollisionGroup, right: CollisionGroup) -> Self {
        Self { left, right }
    }

    /// Rule between two object kinds.
    pub const fn kinds(left: ObjectKind, right: ObjectKind) -> Self {
        Self::new(CollisionGroup::Kind(left), CollisionGroup::Kind(right))
    }

    /// The default rule: everything against everything.
    pub const fn everything() -> Self {
        Self::new(CollisionGroup::Any, CollisionGroup::Any)
    }

    /// Parse a rule from two group names, failing on unknown names.
    pub fn parse(left: &str, right: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(left.parse()?, right.parse()?))
    }
}

/// Scene surface the resolver needs.
pub trait CollisionScene {
    /// Immutable per-pass view of one object.
    type Snapshot: Clone;

    /// Cache key for this scene's group definition.
    fn scene_id(&self) -> SceneId;

    /// Does this scene opt into collision at all?
    fn provides_collision(&self) -> bool;

    /// Declared rules, or `None` for the default.
    fn collision_rules(&self) -> Option<&[CollisionRule]>;

    /// Snapshot every live member of `group`.
    fn query(&self, group: CollisionGroup) -> Vec<Self::Snapshot>;

    /// Do two snapshots describe the same object?
    fn same_object(left: &Self::Snapshot, right: &Self::Snapshot) -> bool;

    /// Let `target` react to `other`. Returns false when `target` has no
    /// reaction or no longer exists.
    fn react(&mut self, target: &Self::Snapshot, other: &Self::Snapshot) -> bool;
}

/// Groups and pairs derived from a scene's rules.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupDefinition {
    /// Groups to query each pass
    pub requires: BTreeSet<CollisionGroup>,
    /// Pairs to test, in declaration order
    pub pairs: Vec<CollisionRule>,
}

impl GroupDefinition {
    /// Derive groups from declared rules; no rules means everything against
    /// everything. Repeated identical rules are kept once.
    pub fn from_rules(rules: Option<&[CollisionRule]>) -> Self {
        let declared = match rules {
            Some(rules) if !rules.is_empty() => rules.to_vec(),
            _ => vec![CollisionRule::everything()],
        };

        let mut requires = BTreeSet::new();
        let mut pairs = Vec::new();
        for rule in declared {
            requires.insert(rule.left);
            requires.insert(rule.right);
            if !pairs.contains(&rule) {
                pairs.push(rule);
            }
        }
        Self { requires, pairs }
    }
}

/// Candidate pairs for one rule.
///
/// The same group yields every unordered 2-combination (no self pairs, no
/// duplicates); two different groups yield the full cross product.
pub fn generate_pairs<T: Clone>(left: &[T], right: &[T], same_group: bool) -> Vec<(T, T)> {
    let mut pairs = Vec::new();
    if same_group {
        for i in 0..left.len() {
            for j in (i + 1)..left.len() {
                pairs.push((left[i].clone(), left[j].clone()));
            }
        }
    } else {
        for l in left {
            for r in right {
                pairs.push((l.clone(), r.clone()));
            }
        }
    }
    pairs
}

/// Check if two circles overlap.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let combined = radius_a + radius_b;
    pos_a.distance_squared(pos_b) <= combined * combined
}

/// Pure, order-independent overlap test.
pub type Predicate<T> = Box<dyn Fn(&T, &T) -> bool>;

/// Counters from one resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Pairs tested
    pub candidates: usize,
    /// Pairs that collided
    pub collisions: usize,
    /// Reactions that actually ran
    pub reactions: usize,
}

/// Once-per-frame collision resolver.
pub struct Collider<S: CollisionScene> {
    collides: Predicate<S::Snapshot>,
    definitions: BTreeMap<SceneId, GroupDefinition>,
    running: bool,
    primed: bool,
}

impl<S: CollisionScene> Default for Collider<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CollisionScene> Collider<S> {
    /// Collider whose predicate never fires; scenes opt in by supplying one.
    pub fn new() -> Self {
        Self::with_predicate(|_: &S::Snapshot, _: &S::Snapshot| false)
    }

    /// Collider with a custom predicate.
    pub fn with_predicate<F>(collides: F) -> Self
    where
        F: Fn(&S::Snapshot, &S::Snapshot) -> bool + 'static,
    {
        Self {
            collides: Box::new(collides),
            definitions: BTreeMap::new(),
            running: false,
            primed: false,
        }
    }

    /// Will `on_update` prime a pass?
    pub fn running(&self) -> bool {
        self.running
    }

    /// Is a pass pending for the end of this frame?
    pub fn primed(&self) -> bool {
        self.primed
    }

    /// A scene became active.
    pub fn on_scene_started(&mut self, scene: &S) {
        self.running = scene.provides_collision();
    }

    /// A paused scene resumed.
    pub fn on_scene_continued(&mut self, scene: &S) {
        self.running = scene.provides_collision();
    }

    /// Objects are updating this frame.
    pub fn on_update(&mut self) {
        if self.running {
            self.primed = true;
        }
    }

    /// End of frame: resolve once if an update primed a pass.
    pub fn on_idle(&mut self, scene: &mut S) -> Option<ResolveReport> {
        if !self.primed {
            return None;
        }
        self.primed = false;
        Some(self.resolve(scene))
    }

    /// Drop the cached group definition, e.g. after the rules changed.
    pub fn invalidate(&mut self, scene_id: SceneId) {
        self.definitions.remove(&scene_id);
    }

    /// Cached definition for a scene, if one was derived.
    pub fn definition(&self, scene_id: SceneId) -> Option<&GroupDefinition> {
        self.definitions.get(&scene_id)
    }

    /// Run one full pass over `scene`.
    pub fn resolve(&mut self, scene: &mut S) -> ResolveReport {
        let definition = self
            .definitions
            .entry(scene.scene_id())
            .or_insert_with(|| GroupDefinition::from_rules(scene.collision_rules()));

        let groups: BTreeMap<CollisionGroup, Vec<S::Snapshot>> = definition
            .requires
            .iter()
            .map(|group| (*group, scene.query(*group)))
            .collect();

        // Every candidate is fixed before the first reaction runs.
        let mut candidates = Vec::new();
        for rule in &definition.pairs {
            let (Some(left), Some(right)) = (groups.get(&rule.left), groups.get(&rule.right))
            else {
                continue;
            };
            candidates.extend(generate_pairs(left, right, rule.left == rule.right));
        }

        let mut report = ResolveReport {
            candidates: candidates.len(),
            ..ResolveReport::default()
        };

        let hits: Vec<(S::Snapshot, S::Snapshot)> = candidates
            .into_iter()
            .filter(|(left, right)| !S::same_object(left, right))
            .filter(|(left, right)| (self.collides)(left, right))
            .collect();

        for (left, right) in &hits {
            report.collisions += 1;
            if scene.react(left, right) {
                report.reactions += 1;
            }
            if scene.react(right, left) {
                report.reactions += 1;
            }
        }

        if report.collisions > 0 {
            debug!(
                scene = scene.scene_id().0,
                candidates = report.candidates,
                collisions = report.collisions,
                reactions = report.reactions,
                "collisions resolved"
            );
        } else {
            trace!(scene = scene.scene_id().0, candidates = report.candidates, "no collisions");
        }
        report
    }
}
