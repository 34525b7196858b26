//! Game Events
//!
//! Domain events broadcast by actors. Consumers (HUD, audio, the charge
//! meter) live outside the simulation core and only ever read them.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::action::ActionKind;
use crate::game::scene::ObjectId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Actor began charging an action
    ChargeStarted {
        /// Kind being charged
        kind: ActionKind,
    },

    /// Charge crossed the next threshold
    IncreasedChargeLevel {
        /// Kind being charged
        kind: ActionKind,
        /// New level, 1..=4
        level: u8,
    },

    /// Charge was committed
    ChargeEnded {
        /// Kind that was charged
        kind: ActionKind,
        /// Level reached, 0..=4
        level: u8,
    },

    /// Enemy died and left a body behind
    Defeated {
        /// Where the body was placed
        position: Vec2,
    },
}

/// A game event with its source and time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Source clock reading when the event occurred
    pub time: f64,

    /// Object that produced the event
    pub actor: ObjectId,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(time: f64, actor: ObjectId, data: GameEventData) -> Self {
        Self { time, actor, data }
    }

    /// Create charge started event.
    pub fn charge_started(time: f64, actor: ObjectId, kind: ActionKind) -> Self {
        Self::new(time, actor, GameEventData::ChargeStarted { kind })
    }

    /// Create charge level event.
    pub fn increased_charge_level(time: f64, actor: ObjectId, kind: ActionKind, level: u8) -> Self {
        Self::new(time, actor, GameEventData::IncreasedChargeLevel { kind, level })
    }

    /// Create charge ended event.
    pub fn charge_ended(time: f64, actor: ObjectId, kind: ActionKind, level: u8) -> Self {
        Self::new(time, actor, GameEventData::ChargeEnded { kind, level })
    }

    /// Create defeated event.
    pub fn defeated(time: f64, actor: ObjectId, position: Vec2) -> Self {
        Self::new(time, actor, GameEventData::Defeated { position })
    }
}

/// Broadcast target for domain events.
pub trait EventSink {
    /// Publish one event.
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Lit/unlit state of the four charge pips shown behind an actor.
///
/// Driven purely by the event stream, so it can sit in any consumer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargeMeter {
    owner: Option<ObjectId>,
    lit: [bool; 4],
}

impl ChargeMeter {
    /// Meter tracking a single actor.
    pub fn for_actor(owner: ObjectId) -> Self {
        Self {
            owner: Some(owner),
            lit: [false; 4],
        }
    }

    /// Apply one event. Events from other actors are ignored.
    pub fn observe(&mut self, event: &GameEvent) {
        if self.owner.is_some_and(|owner| owner != event.actor) {
            return;
        }
        match event.data {
            GameEventData::IncreasedChargeLevel { level, .. } => {
                for (index, pip) in self.lit.iter_mut().enumerate() {
                    if level as usize > index {
                        *pip = true;
                    }
                }
            }
            GameEventData::ChargeEnded { .. } => self.lit = [false; 4],
            _ => {}
        }
    }

    /// Whether pip `value` (1..=4) is lit.
    pub fn is_lit(&self, value: u8) -> bool {
        match value {
            1..=4 => self.lit[value as usize - 1],
            _ => false,
        }
    }

    /// Number of lit pips.
    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|p| **p).count()
    }
}
