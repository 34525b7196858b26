//! Charge Action Templates
//!
//! Per-kind data for the charge → commit → timed effect cycle. A template is
//! built once and shared by every actor, so it only holds tuning. Per-actor
//! progress lives in the actor's blackboard under [`SlotKey`].

use serde::{Serialize, Deserialize};

use crate::error::ConfigError;

/// Highest reachable charge level.
pub const MAX_CHARGE_LEVEL: u8 = 4;

/// A labelled family of charge/commit/effect behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Charged glide in the facing direction
    Dash,
    /// Charged sword arc
    Slash,
    /// Charged bow shot
    Shoot,
}

impl ActionKind {
    /// Every kind, in input-priority order.
    pub const ALL: [ActionKind; 3] = [ActionKind::Dash, ActionKind::Slash, ActionKind::Shoot];
}

/// What happens once a charge is committed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Ease-out glide to `position + normalize(facing) · lengths[level]`.
    Dash {
        /// Travel distance indexed by charge level 0..=4
        lengths: [f32; 5],
    },
    /// Ease-in sweep of hurt boxes around the actor.
    Slash {
        /// Arc start, degrees relative to facing
        initial_degrees: f32,
        /// Arc sweep, degrees
        change_in_degrees: f32,
        /// Distance of each hurt box from the actor
        distance: f32,
    },
    /// Single projectile fired along the facing.
    Release {
        /// Range at charge level 0
        base_range: f32,
        /// Extra range per charge level
        range_per_level: f32,
    },
}

/// Tuning for one action kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    /// Seconds of charging needed for levels 1..=4, strictly ascending
    pub thresholds: [f32; 4],
    /// Minimum seconds between two commits of this kind
    pub cooldown: f32,
    /// Length of the timed effect in seconds (0 = resolves on the next tick)
    pub duration: f32,
    /// Effect applied by the timed state
    pub effect: Effect,
}

const DEFAULT_THRESHOLDS: [f32; 4] = [0.4, 0.8, 1.2, 1.6];

impl ActionTemplate {
    /// Default dash tuning.
    pub fn dash() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS,
            cooldown: 0.75,
            duration: 0.25,
            effect: Effect::Dash {
                lengths: [2.0, 3.0, 4.0, 5.0, 6.0],
            },
        }
    }

    /// Default slash tuning.
    pub fn slash() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS,
            cooldown: 0.5,
            duration: 0.18,
            effect: Effect::Slash {
                initial_degrees: 60.0,
                change_in_degrees: -80.0,
                distance: 1.0,
            },
        }
    }

    /// Default bow tuning.
    pub fn shoot() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS,
            cooldown: 1.0,
            duration: 0.0,
            effect: Effect::Release {
                base_range: 2.0,
                range_per_level: 1.5,
            },
        }
    }

    /// Level reached after `elapsed` seconds of charging.
    pub fn level_at(&self, elapsed: f32) -> u8 {
        self.thresholds.iter().filter(|t| elapsed >= **t).count() as u8
    }

    /// Reject tables the state machine cannot run.
    pub fn validate(&self, kind: ActionKind) -> Result<(), ConfigError> {
        let ascending = self.thresholds.windows(2).all(|w| w[0] < w[1]);
        if !ascending || self.thresholds[0] <= 0.0 {
            return Err(ConfigError::InvalidThresholds {
                kind,
                thresholds: self.thresholds,
            });
        }
        non_negative("cooldown", self.cooldown)?;
        non_negative("duration", self.duration)?;
        self.effect.validate()
    }
}

impl Effect {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Effect::Dash { lengths } => {
                for length in lengths {
                    non_negative("lengths", *length)?;
                }
            }
            Effect::Slash {
                initial_degrees,
                change_in_degrees,
                distance,
            } => {
                finite("initial_degrees", *initial_degrees)?;
                finite("change_in_degrees", *change_in_degrees)?;
                non_negative("distance", *distance)?;
            }
            Effect::Release {
                base_range,
                range_per_level,
            } => {
                non_negative("base_range", *base_range)?;
                non_negative("range_per_level", *range_per_level)?;
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

/// Strictly positive and finite.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

/// One template per action kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTable {
    /// Dash template
    pub dash: ActionTemplate,
    /// Slash template
    pub slash: ActionTemplate,
    /// Shoot template
    pub shoot: ActionTemplate,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            dash: ActionTemplate::dash(),
            slash: ActionTemplate::slash(),
            shoot: ActionTemplate::shoot(),
        }
    }
}

impl ActionTable {
    /// Template for `kind`.
    pub fn get(&self, kind: ActionKind) -> &ActionTemplate {
        match kind {
            ActionKind::Dash => &self.dash,
            ActionKind::Slash => &self.slash,
            ActionKind::Shoot => &self.shoot,
        }
    }

    /// Validate every template.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ActionKind::ALL {
            self.get(kind).validate(kind)?;
        }
        Ok(())
    }
}

/// Blackboard slots an action keeps between states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Clock reading of the last commit (cooldown origin)
    LastCommitted,
    /// Charge level carried from the commit into the effect
    CommittedLevel,
}

/// Blackboard key: slot scoped to an action kind.
pub type SlotKey = (ActionKind, Slot);
