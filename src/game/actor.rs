//! Player Actor
//!
//! The actor owns its spatial body, its clock, its blackboard and exactly one
//! [`ActionState`]. Every call is forwarded to the current state, which hands
//! back its successor; the swap happens before the call returns.

use std::sync::Arc;

use tracing::trace;

use crate::config::TuningConfig;
use crate::core::blackboard::Blackboard;
use crate::core::timer::Clock;
use crate::core::vec2::Vec2;
use crate::game::action::{ActionKind, Slot, SlotKey};
use crate::game::events::EventSink;
use crate::game::input::{derive_events, ActorEvent, Controls, FrameInput};
use crate::game::scene::{ObjectId, SceneHandle};
use crate::game::state::{ActionState, StateContext};

/// Spatial data the states read and write.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorBody {
    /// World position
    pub position: Vec2,
    /// Unit facing
    pub facing: Vec2,
    /// Direction the facing is steered toward
    pub target_facing: Option<Vec2>,
}

impl ActorBody {
    /// Body at `position` facing up.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            facing: Vec2::UP,
            target_facing: None,
        }
    }

    /// Steer toward a world-space point. Aiming at our own position is ignored.
    pub fn aim_at(&mut self, point: Vec2) {
        let direction = (point - self.position).normalize();
        if !direction.is_zero() {
            self.target_facing = Some(direction);
        }
    }
}

/// An input-driven actor running the charge action state machine.
#[derive(Clone, Debug)]
pub struct Actor {
    id: ObjectId,
    body: ActorBody,
    clock: Clock,
    blackboard: Blackboard<SlotKey>,
    state: ActionState,
    previous_controls: Controls,
    tuning: Arc<TuningConfig>,
}

impl Actor {
    /// Create an actor in the Neutral state.
    pub fn new(id: ObjectId, position: Vec2, tuning: Arc<TuningConfig>) -> Self {
        Self {
            id,
            body: ActorBody::new(position),
            clock: Clock::new(),
            blackboard: Blackboard::new(),
            state: ActionState::Neutral,
            previous_controls: Controls::default(),
            tuning,
        }
    }

    /// Scene identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// World position.
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Unit facing.
    pub fn facing(&self) -> Vec2 {
        self.body.facing
    }

    /// Spatial body.
    pub fn body(&self) -> &ActorBody {
        &self.body
    }

    /// Current state.
    pub fn state(&self) -> &ActionState {
        &self.state
    }

    /// Seconds this actor has been simulated.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Charge level committed to the running effect of `kind` (0 otherwise).
    pub fn charge_level(&self, kind: ActionKind) -> u8 {
        self.blackboard.get_or(&(kind, Slot::CommittedLevel), 0.0) as u8
    }

    /// Clock reading of the last commit of `kind`.
    pub fn last_committed(&self, kind: ActionKind) -> Option<f64> {
        self.blackboard.get(&(kind, Slot::LastCommitted))
    }

    /// Deliver one discrete event to the current state.
    pub fn handle(&mut self, event: ActorEvent, events: &mut dyn EventSink) {
        let mut ctx = StateContext {
            id: self.id,
            now: self.clock.now(),
            body: &mut self.body,
            blackboard: &mut self.blackboard,
            tuning: &self.tuning,
        };
        let state = std::mem::take(&mut self.state);
        let before = state.name();
        self.state = state.handle(event, &mut ctx, events);
        if before != self.state.name() {
            trace!(actor = self.id.0, from = before, to = self.state.name(), "state swapped");
        }
    }

    /// Advance the clock and the current state by `dt` seconds.
    pub fn tick(
        &mut self,
        dt: f32,
        walk: Vec2,
        scene: &mut dyn SceneHandle,
        events: &mut dyn EventSink,
    ) {
        let dt = self.clock.advance(dt);
        let mut ctx = StateContext {
            id: self.id,
            now: self.clock.now(),
            body: &mut self.body,
            blackboard: &mut self.blackboard,
            tuning: &self.tuning,
        };
        let state = std::mem::take(&mut self.state);
        let before = state.name();
        self.state = state.tick(dt, walk, &mut ctx, scene, events);
        if before != self.state.name() {
            trace!(actor = self.id.0, from = before, to = self.state.name(), "state swapped");
        }
    }

    /// Run one frame: derive events from the sampled controls, deliver them,
    /// then tick.
    pub fn update(
        &mut self,
        input: &FrameInput,
        scene: &mut dyn SceneHandle,
        events: &mut dyn EventSink,
    ) {
        let derived = derive_events(
            &self.previous_controls,
            &input.controls,
            self.state.charging(),
            input.aim,
        );
        for event in derived {
            self.handle(event, events);
        }
        self.tick(input.dt, input.controls.walk_direction(), scene, events);
        self.previous_controls = input.controls;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::{GameEvent, GameEventData};
    use crate::game::scene::SceneObject;

    #[derive(Default)]
    struct NullScene(Vec<SceneObject>);

    impl SceneHandle for NullScene {
        fn add(&mut self, object: SceneObject) {
            self.0.push(object);
        }

        fn remove(&mut self, _id: ObjectId) {}
    }

    fn actor() -> Actor {
        Actor::new(ObjectId(1), Vec2::ZERO, Arc::new(TuningConfig::default()))
    }

    #[test]
    fn test_walks_in_neutral() {
        let mut actor = actor();
        let mut scene = NullScene::default();
        let mut events: Vec<GameEvent> = Vec::new();

        let input = FrameInput::new(0.5, Controls::walking(Vec2::RIGHT));
        actor.update(&input, &mut scene, &mut events);

        // speed 3 for half a second
        assert!(actor.position().approx_eq(Vec2::new(1.5, 0.0), 1e-6));
    }

    #[test]
    fn test_does_not_walk_while_charging() {
        let mut actor = actor();
        let mut scene = NullScene::default();
        let mut events: Vec<GameEvent> = Vec::new();

        let mut controls = Controls::holding(ActionKind::Slash);
        controls.walk = Vec2::RIGHT;
        actor.update(&FrameInput::new(0.5, controls), &mut scene, &mut events);

        assert_eq!(actor.state().name(), "SwordCharge");
        assert_eq!(actor.position(), Vec2::ZERO);
    }

    #[test]
    fn test_release_commits_charge() {
        let mut actor = actor();
        let mut scene = NullScene::default();
        let mut events: Vec<GameEvent> = Vec::new();

        let held = FrameInput::new(0.5, Controls::holding(ActionKind::Dash));
        actor.update(&held, &mut scene, &mut events);
        actor.update(&FrameInput::idle(0.05), &mut scene, &mut events);

        assert_eq!(actor.state().name(), "Dash");
        assert_eq!(actor.charge_level(ActionKind::Dash), 1);
        assert_eq!(actor.last_committed(ActionKind::Dash), Some(0.5));
        assert!(events.iter().any(|e| e.data
            == GameEventData::ChargeEnded { kind: ActionKind::Dash, level: 1 }));
    }

    #[test]
    fn test_negative_dt_makes_no_progress() {
        let mut actor = actor();
        let mut scene = NullScene::default();
        let mut events: Vec<GameEvent> = Vec::new();

        actor.handle(ActorEvent::ChargeRequested(ActionKind::Shoot), &mut events);
        actor.tick(-1.0, Vec2::ZERO, &mut scene, &mut events);

        assert_eq!(actor.now(), 0.0);
        match actor.state() {
            ActionState::Charging(charge) => assert_eq!(charge.elapsed, 0.0),
            other => panic!("expected charging, got {:?}", other),
        }
    }

    #[test]
    fn test_aim_turns_target_facing() {
        let mut actor = actor();
        let mut events: Vec<GameEvent> = Vec::new();
        actor.handle(ActorEvent::Aim(Vec2::new(-4.0, 0.0)), &mut events);
        assert_eq!(actor.body().target_facing, Some(Vec2::new(-1.0, 0.0)));

        // Aiming at ourselves keeps the old target
        actor.handle(ActorEvent::Aim(Vec2::ZERO), &mut events);
        assert_eq!(actor.body().target_facing, Some(Vec2::new(-1.0, 0.0)));
    }
}
