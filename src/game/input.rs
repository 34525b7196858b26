//! Frame Input
//!
//! Controls are sampled once per frame into a plain value and handed to the
//! simulation. Discrete actor events (press, release, aim) are derived by
//! comparing the current sample with the previous one, so there is no
//! ambient input state and nothing goes stale across frames.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::action::ActionKind;

/// Held state of every control for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// Movement direction, components in [-1, 1]
    pub walk: Vec2,
    /// Slash button held
    pub slash: bool,
    /// Shoot button held
    pub shoot: bool,
    /// Dash button held
    pub dash: bool,
}

impl Controls {
    /// Controls with only movement.
    pub fn walking(walk: Vec2) -> Self {
        Self {
            walk,
            ..Self::default()
        }
    }

    /// Controls holding the button for `kind`.
    pub fn holding(kind: ActionKind) -> Self {
        let mut controls = Self::default();
        controls.set_held(kind, true);
        controls
    }

    /// Is the button for `kind` held?
    #[inline]
    pub fn held(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Dash => self.dash,
            ActionKind::Slash => self.slash,
            ActionKind::Shoot => self.shoot,
        }
    }

    /// Set the held flag for `kind`.
    pub fn set_held(&mut self, kind: ActionKind, held: bool) {
        match kind {
            ActionKind::Dash => self.dash = held,
            ActionKind::Slash => self.slash = held,
            ActionKind::Shoot => self.shoot = held,
        }
    }

    /// Movement direction with diagonal input capped to unit length.
    pub fn walk_direction(&self) -> Vec2 {
        if self.walk.length_squared() > 1.0 {
            self.walk.normalize()
        } else {
            self.walk
        }
    }
}

/// Everything the simulation needs from the outside for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Sampled controls
    pub controls: Controls,
    /// World-space aim point, if the pointer moved
    pub aim: Option<Vec2>,
}

impl FrameInput {
    /// Frame with the given delta and controls.
    pub fn new(dt: f32, controls: Controls) -> Self {
        Self {
            dt,
            controls,
            aim: None,
        }
    }

    /// Frame with nothing pressed.
    pub fn idle(dt: f32) -> Self {
        Self::new(dt, Controls::default())
    }

    /// Attach an aim point.
    pub fn with_aim(mut self, aim: Vec2) -> Self {
        self.aim = Some(aim);
        self
    }
}

/// Discrete requests delivered to an actor's current state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActorEvent {
    /// Start charging `kind`
    ChargeRequested(ActionKind),
    /// Commit the active charge of `kind`
    CommitRequested(ActionKind),
    /// Turn toward a world-space point
    Aim(Vec2),
}

/// Derive this frame's actor events from two consecutive samples.
///
/// Commits come first so a release and a new press in the same frame never
/// overlap. `charging` is the kind currently charging, if any: it is
/// committed whenever its button is no longer held, which also covers a
/// press and release that both happened between samples.
pub fn derive_events(
    previous: &Controls,
    current: &Controls,
    charging: Option<ActionKind>,
    aim: Option<Vec2>,
) -> Vec<ActorEvent> {
    let mut events = Vec::new();

    if let Some(point) = aim {
        events.push(ActorEvent::Aim(point));
    }

    if let Some(kind) = charging {
        if !current.held(kind) {
            events.push(ActorEvent::CommitRequested(kind));
        }
    }

    for kind in ActionKind::ALL {
        if current.held(kind) && !previous.held(kind) {
            events.push(ActorEvent::ChargeRequested(kind));
        }
    }

    events
}
