//! Action State Machine
//!
//! An actor owns exactly one [`ActionState`] and swaps it wholesale inside a
//! single call. The state × event matrix is spelled out in
//! [`ActionState::handle`]; anything not listed there keeps the current
//! state, which is what makes a commit without a charge, or a second kind
//! while one is active, a silent no-op.
//!
//! ```text
//!            charge(kind), cooldown clear
//!   Neutral ─────────────────────────────▶ Charging(kind)
//!      ▲                                       │ commit(kind)
//!      │          duration elapsed             ▼
//!      └─────────────────────────────────── Effect(kind)
//! ```
//!
//! The charge/commit/effect logic is written once; the kind only selects
//! an [`ActionTemplate`](crate::game::action::ActionTemplate).

use tracing::{debug, trace};

use crate::config::TuningConfig;
use crate::core::blackboard::Blackboard;
use crate::core::ease::{ease_in, ease_out};
use crate::core::vec2::Vec2;
use crate::game::action::{ActionKind, ActionTemplate, Effect, Slot, SlotKey, MAX_CHARGE_LEVEL};
use crate::game::actor::ActorBody;
use crate::game::events::{EventSink, GameEvent};
use crate::game::hitbox::{HurtBox, Origin, Projectile};
use crate::game::input::ActorEvent;
use crate::game::scene::{ObjectId, SceneHandle, SceneObject};

/// Non-owning handle to the state a charge returns to once its effect ends.
///
/// Resuming builds a fresh state from the handle, so nothing is kept alive
/// by the reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnState {
    /// Back to free movement
    Neutral,
}

impl ReturnState {
    fn resume(self) -> ActionState {
        match self {
            ReturnState::Neutral => ActionState::Neutral,
        }
    }
}

/// Charging toward the next level of `kind`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeState {
    /// Kind being charged
    pub kind: ActionKind,
    /// Clock reading when the charge began
    pub started_at: f64,
    /// Seconds spent charging
    pub elapsed: f32,
    /// Level reached so far, 0..=4
    pub level: u8,
    /// Where to go after the effect
    pub return_to: ReturnState,
}

impl ChargeState {
    fn new(kind: ActionKind, now: f64, return_to: ReturnState) -> Self {
        Self {
            kind,
            started_at: now,
            elapsed: 0.0,
            level: 0,
            return_to,
        }
    }

    fn advance(&mut self, dt: f32, ctx: &StateContext<'_>, events: &mut dyn EventSink) {
        self.elapsed += dt;
        let template = ctx.tuning.actions.get(self.kind);
        // A long frame can cross several thresholds; report each one.
        while self.level < MAX_CHARGE_LEVEL
            && self.elapsed >= template.thresholds[self.level as usize]
        {
            self.level += 1;
            trace!(actor = ctx.id.0, kind = ?self.kind, level = self.level, "charge level up");
            events.emit(GameEvent::increased_charge_level(ctx.now, ctx.id, self.kind, self.level));
        }
    }
}

/// Per-effect progress captured when the timed state is entered.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectProgress {
    /// Glide from `start` by `change`
    Dash {
        /// Position at commit
        start: Vec2,
        /// Total displacement
        change: Vec2,
    },
    /// Sword arc around the actor
    Slash,
    /// Bow release
    Release,
}

/// Running the committed effect of `kind`.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedState {
    /// Kind whose effect is running
    pub kind: ActionKind,
    /// Clock reading when the effect began
    pub started_at: f64,
    /// Seconds since the effect began
    pub elapsed: f32,
    /// Effect-specific progress
    pub progress: EffectProgress,
    /// Where to go when the duration runs out
    pub return_to: ReturnState,
}

impl TimedState {
    fn enter(charge: &ChargeState, ctx: &StateContext<'_>) -> Self {
        let template = ctx.tuning.actions.get(charge.kind);
        let progress = match &template.effect {
            Effect::Dash { lengths } => EffectProgress::Dash {
                start: ctx.body.position,
                change: ctx.body.facing.normalize().scale(lengths[charge.level as usize]),
            },
            Effect::Slash { .. } => EffectProgress::Slash,
            Effect::Release { .. } => EffectProgress::Release,
        };
        Self {
            kind: charge.kind,
            started_at: ctx.now,
            elapsed: 0.0,
            progress,
            return_to: charge.return_to,
        }
    }

    fn advance(
        mut self,
        dt: f32,
        ctx: &mut StateContext<'_>,
        scene: &mut dyn SceneHandle,
    ) -> ActionState {
        self.elapsed += dt;
        let tuning = ctx.tuning;
        let template = tuning.actions.get(self.kind);
        let finished = self.elapsed >= template.duration;
        let level = committed_level(self.kind, ctx);
        // Past the end the curves are evaluated at exactly `duration`.
        let t = self.elapsed.min(template.duration);

        match (&self.progress, &template.effect) {
            (EffectProgress::Dash { start, change }, _) => {
                ctx.body.position = if finished {
                    *start + *change
                } else {
                    ease_out(t, *start, *change, template.duration)
                };
            }
            (
                EffectProgress::Slash,
                Effect::Slash { initial_degrees, change_in_degrees, distance },
            ) => {
                let degrees = ease_in(t, *initial_degrees, *change_in_degrees, template.duration);
                let offset = ctx.body.facing.rotate(degrees).scale_to(*distance);
                scene.add(SceneObject::HurtBox(HurtBox::new(
                    ctx.body.position + offset,
                    f32::from(level + 1),
                    Origin::Player,
                    tuning.combat.hurt_box_lifespan,
                )));
            }
            (EffectProgress::Release, Effect::Release { base_range, range_per_level }) => {
                if finished {
                    let range = f32::from(level) * *range_per_level + *base_range;
                    let origin = ctx.body.position;
                    let target = origin + ctx.body.facing.scale(range);
                    scene.add(SceneObject::Projectile(Projectile::new(
                        origin,
                        target,
                        f32::from(level + 1),
                        tuning.combat.projectile_speed,
                    )));
                }
            }
            // Template swapped under a running effect; let it run out.
            _ => {}
        }

        if finished {
            ctx.blackboard.clear(&(self.kind, Slot::CommittedLevel));
            debug!(actor = ctx.id.0, kind = ?self.kind, "effect finished");
            self.return_to.resume()
        } else {
            ActionState::Effect(self)
        }
    }
}

/// The single state slot of an actor.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ActionState {
    /// Free movement, accepts charge requests
    #[default]
    Neutral,
    /// Charging an action
    Charging(ChargeState),
    /// Running a committed effect
    Effect(TimedState),
}

/// Everything a state may touch on its owner during one call.
pub struct StateContext<'a> {
    /// Owning actor
    pub id: ObjectId,
    /// Owner's clock reading
    pub now: f64,
    /// Owner's spatial data
    pub body: &'a mut ActorBody,
    /// Owner's blackboard
    pub blackboard: &'a mut Blackboard<SlotKey>,
    /// Shared tuning
    pub tuning: &'a TuningConfig,
}

impl ActionState {
    /// Leaf name of the state, for logs and debugging.
    pub fn name(&self) -> &'static str {
        match self {
            ActionState::Neutral => "Neutral",
            ActionState::Charging(charge) => match charge.kind {
                ActionKind::Dash => "DashCharge",
                ActionKind::Slash => "SwordCharge",
                ActionKind::Shoot => "Drawing",
            },
            ActionState::Effect(timed) => match timed.kind {
                ActionKind::Dash => "Dash",
                ActionKind::Slash => "Slash",
                ActionKind::Shoot => "StowBow",
            },
        }
    }

    /// Kind currently charging, if any.
    pub fn charging(&self) -> Option<ActionKind> {
        match self {
            ActionState::Charging(charge) => Some(charge.kind),
            _ => None,
        }
    }

    /// Is the actor free to move?
    pub fn is_neutral(&self) -> bool {
        matches!(self, ActionState::Neutral)
    }

    /// Deliver one discrete event and return the next state.
    pub fn handle(
        self,
        event: ActorEvent,
        ctx: &mut StateContext<'_>,
        events: &mut dyn EventSink,
    ) -> ActionState {
        match (self, event) {
            (state, ActorEvent::Aim(point)) => {
                ctx.body.aim_at(point);
                state
            }
            (ActionState::Neutral, ActorEvent::ChargeRequested(kind)) => {
                begin_charge(kind, ctx, events)
            }
            (ActionState::Charging(charge), ActorEvent::CommitRequested(kind))
                if charge.kind == kind =>
            {
                commit(charge, ctx, events)
            }
            (state @ ActionState::Neutral, ActorEvent::CommitRequested(_))
            | (
                state @ ActionState::Charging(_),
                ActorEvent::ChargeRequested(_) | ActorEvent::CommitRequested(_),
            )
            | (
                state @ ActionState::Effect(_),
                ActorEvent::ChargeRequested(_) | ActorEvent::CommitRequested(_),
            ) => state,
        }
    }

    /// Advance the state by `dt` seconds and return the next state.
    pub fn tick(
        self,
        dt: f32,
        walk: Vec2,
        ctx: &mut StateContext<'_>,
        scene: &mut dyn SceneHandle,
        events: &mut dyn EventSink,
    ) -> ActionState {
        match self {
            ActionState::Neutral => {
                neutral_tick(dt, walk, ctx);
                ActionState::Neutral
            }
            ActionState::Charging(mut charge) => {
                charge.advance(dt, ctx, events);
                ActionState::Charging(charge)
            }
            ActionState::Effect(timed) => timed.advance(dt, ctx, scene),
        }
    }
}

/// Level committed to the running effect of `kind`, 0 when none.
fn committed_level(kind: ActionKind, ctx: &StateContext<'_>) -> u8 {
    ctx.blackboard.get_or(&(kind, Slot::CommittedLevel), 0.0) as u8
}

/// Cooldown check shared by every kind.
fn cooldown_clear(kind: ActionKind, template: &ActionTemplate, ctx: &StateContext<'_>) -> bool {
    ctx.blackboard
        .has_elapsed(&(kind, Slot::LastCommitted), ctx.now, template.cooldown)
}

fn begin_charge(
    kind: ActionKind,
    ctx: &mut StateContext<'_>,
    events: &mut dyn EventSink,
) -> ActionState {
    let template = ctx.tuning.actions.get(kind);
    if !cooldown_clear(kind, template, ctx) {
        debug!(actor = ctx.id.0, ?kind, now = ctx.now, "charge refused: cooling down");
        return ActionState::Neutral;
    }

    debug!(actor = ctx.id.0, ?kind, now = ctx.now, "charge started");
    events.emit(GameEvent::charge_started(ctx.now, ctx.id, kind));
    ActionState::Charging(ChargeState::new(kind, ctx.now, ReturnState::Neutral))
}

fn commit(
    charge: ChargeState,
    ctx: &mut StateContext<'_>,
    events: &mut dyn EventSink,
) -> ActionState {
    ctx.blackboard.set((charge.kind, Slot::LastCommitted), ctx.now);
    ctx.blackboard
        .set((charge.kind, Slot::CommittedLevel), f64::from(charge.level));
    events.emit(GameEvent::charge_ended(ctx.now, ctx.id, charge.kind, charge.level));
    debug!(actor = ctx.id.0, kind = ?charge.kind, level = charge.level, "charge committed");

    ActionState::Effect(TimedState::enter(&charge, ctx))
}

fn neutral_tick(dt: f32, walk: Vec2, ctx: &mut StateContext<'_>) {
    let movement = &ctx.tuning.movement;
    if let Some(target) = ctx.body.target_facing {
        let smoothing = movement.smoothing();
        let steered = smoothing.apply(ctx.body.facing, target).normalize();
        if !steered.is_zero() {
            ctx.body.facing = steered;
        }
    }
    if !walk.is_zero() {
        ctx.body.position += walk.scale(movement.walk_speed * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;

    /// Scene stand-in that records spawned objects.
    #[derive(Default)]
    struct Spawned(Vec<SceneObject>);

    impl SceneHandle for Spawned {
        fn add(&mut self, object: SceneObject) {
            self.0.push(object);
        }

        fn remove(&mut self, _id: ObjectId) {}
    }

    struct Harness {
        body: ActorBody,
        blackboard: Blackboard<SlotKey>,
        tuning: TuningConfig,
        now: f64,
        state: ActionState,
        events: Vec<GameEvent>,
        spawned: Spawned,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                body: ActorBody::new(Vec2::ZERO),
                blackboard: Blackboard::new(),
                tuning: TuningConfig::default(),
                now: 0.0,
                state: ActionState::Neutral,
                events: Vec::new(),
                spawned: Spawned::default(),
            }
        }

        fn handle(&mut self, event: ActorEvent) {
            let mut ctx = StateContext {
                id: ObjectId(1),
                now: self.now,
                body: &mut self.body,
                blackboard: &mut self.blackboard,
                tuning: &self.tuning,
            };
            let state = std::mem::take(&mut self.state);
            self.state = state.handle(event, &mut ctx, &mut self.events);
        }

        fn tick(&mut self, dt: f32) {
            self.now += f64::from(dt);
            let mut ctx = StateContext {
                id: ObjectId(1),
                now: self.now,
                body: &mut self.body,
                blackboard: &mut self.blackboard,
                tuning: &self.tuning,
            };
            let state = std::mem::take(&mut self.state);
            self.state = state.tick(dt, Vec2::ZERO, &mut ctx, &mut self.spawned, &mut self.events);
        }
    }

    #[test]
    fn test_commit_without_charge_is_ignored() {
        let mut h = Harness::new();
        h.handle(ActorEvent::CommitRequested(ActionKind::Dash));
        assert_eq!(h.state, ActionState::Neutral);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_other_kind_ignored_while_charging() {
        let mut h = Harness::new();
        h.handle(ActorEvent::ChargeRequested(ActionKind::Slash));
        h.handle(ActorEvent::ChargeRequested(ActionKind::Dash));
        h.handle(ActorEvent::CommitRequested(ActionKind::Shoot));

        assert_eq!(h.state.charging(), Some(ActionKind::Slash));
        assert_eq!(h.events.len(), 1);
    }

    #[test]
    fn test_immediate_commit_ends_at_level_zero() {
        let mut h = Harness::new();
        h.handle(ActorEvent::ChargeRequested(ActionKind::Slash));
        h.tick(0.1);
        h.handle(ActorEvent::CommitRequested(ActionKind::Slash));

        assert_eq!(
            h.events.last().map(|e| e.data.clone()),
            Some(GameEventData::ChargeEnded { kind: ActionKind::Slash, level: 0 })
        );
        assert_eq!(h.state.name(), "Slash");
    }

    #[test]
    fn test_large_frame_reports_every_threshold() {
        let mut h = Harness::new();
        h.handle(ActorEvent::ChargeRequested(ActionKind::Shoot));
        h.tick(5.0);

        let levels: Vec<u8> = h
            .events
            .iter()
            .filter_map(|e| match e.data {
                GameEventData::IncreasedChargeLevel { level, .. } => Some(level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_slash_sweeps_hurt_boxes_then_returns() {
        let mut h = Harness::new();
        h.handle(ActorEvent::ChargeRequested(ActionKind::Slash));
        h.handle(ActorEvent::CommitRequested(ActionKind::Slash));

        // 0.18s arc at 0.05s frames: three frames mid-arc, the fourth finishes
        for _ in 0..4 {
            h.tick(0.05);
        }
        assert_eq!(h.state, ActionState::Neutral);
        assert_eq!(h.spawned.0.len(), 4);
        assert!(h
            .spawned
            .0
            .iter()
            .all(|o| matches!(o, SceneObject::HurtBox(b) if b.intensity == 1.0)));
    }

    #[test]
    fn test_effect_reads_committed_level_from_blackboard() {
        let mut h = Harness::new();
        h.handle(ActorEvent::ChargeRequested(ActionKind::Slash));
        h.tick(0.8);
        h.handle(ActorEvent::CommitRequested(ActionKind::Slash));
        assert_eq!(h.blackboard.get(&(ActionKind::Slash, Slot::CommittedLevel)), Some(2.0));

        for _ in 0..4 {
            h.tick(0.05);
        }
        assert!(h
            .spawned
            .0
            .iter()
            .all(|o| matches!(o, SceneObject::HurtBox(b) if b.intensity == 3.0)));
        assert_eq!(h.blackboard.get(&(ActionKind::Slash, Slot::CommittedLevel)), None);
    }

    #[test]
    fn test_bow_release_fires_once() {
        let mut h = Harness::new();
        h.handle(ActorEvent::ChargeRequested(ActionKind::Shoot));
        h.tick(0.8);
        h.handle(ActorEvent::CommitRequested(ActionKind::Shoot));
        h.tick(0.016);
        h.tick(0.016);

        assert_eq!(h.state, ActionState::Neutral);
        assert_eq!(h.spawned.0.len(), 1);
        match &h.spawned.0[0] {
            SceneObject::Projectile(p) => {
                assert_eq!(p.intensity, 3.0);
                // level 2: 2·1.5 + 2 along the default facing (up)
                assert!(p.target.approx_eq(Vec2::new(0.0, 5.0), 1e-5));
            }
            other => panic!("expected projectile, got {:?}", other),
        }
    }

    #[test]
    fn test_neutral_steers_facing_without_snapping() {
        let mut h = Harness::new();
        h.handle(ActorEvent::Aim(Vec2::new(10.0, 0.0)));
        for _ in 0..10 {
            h.tick(0.016);
        }
        assert!(h.body.facing.x > 0.5);
        assert!(h.body.facing.x < 1.0);
        assert!((h.body.facing.length() - 1.0).abs() < 1e-5);
    }
}
