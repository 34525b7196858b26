//! Tuning and Scene Configuration
//!
//! Every gameplay constant lives here with its shipped default. Tuning is
//! loaded once (JSON, any missing field falls back to the default),
//! validated, and then shared read-only behind an `Arc` by every actor.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::ease::{smooth, Smoothing};
use crate::error::ConfigError;
use crate::game::action::{non_negative, positive, ActionTable};
use crate::game::collision::CollisionRule;

/// Free-movement tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed, units per second
    pub walk_speed: f32,
    /// Share of the aim direction blended into the facing each tick (percent)
    pub facing_smoothing: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            facing_smoothing: 12.0,
        }
    }
}

impl MovementConfig {
    /// Facing smoother for this tuning.
    pub fn smoothing(&self) -> Smoothing {
        smooth(self.facing_smoothing)
    }
}

/// Hit, knockback and collision-shape tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Seconds a hurt box stays in the scene
    pub hurt_box_lifespan: f32,
    /// Projectile travel speed, units per second
    pub projectile_speed: f32,
    /// Knockback speed is `intensity ^ exponent`
    pub knockback_exponent: f32,
    /// Fraction of knockback speed left after one second
    pub knockback_damping: f32,
    /// Knockback below this speed ends the stun
    pub knockback_epsilon: f32,
    /// Player collision radius
    pub player_radius: f32,
    /// Enemy collision radius
    pub enemy_radius: f32,
    /// Hurt box collision radius
    pub hurt_box_radius: f32,
    /// Projectile collision radius
    pub projectile_radius: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            hurt_box_lifespan: 0.20,
            projectile_speed: 12.0,
            knockback_exponent: 1.75,
            knockback_damping: 0.01,
            knockback_epsilon: 0.05,
            player_radius: 0.5,
            enemy_radius: 0.5,
            hurt_box_radius: 0.5,
            projectile_radius: 0.25,
        }
    }
}

impl CombatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("hurt_box_lifespan", self.hurt_box_lifespan)?;
        positive("projectile_speed", self.projectile_speed)?;
        non_negative("knockback_exponent", self.knockback_exponent)?;
        positive("knockback_epsilon", self.knockback_epsilon)?;
        non_negative("player_radius", self.player_radius)?;
        non_negative("enemy_radius", self.enemy_radius)?;
        non_negative("hurt_box_radius", self.hurt_box_radius)?;
        non_negative("projectile_radius", self.projectile_radius)?;
        if !(self.knockback_damping > 0.0 && self.knockback_damping < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "knockback_damping",
                value: self.knockback_damping,
            });
        }
        Ok(())
    }
}

/// All gameplay tuning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Charge action templates
    pub actions: ActionTable,
    /// Free movement
    pub movement: MovementConfig,
    /// Hits and knockback
    pub combat: CombatConfig,
}

impl TuningConfig {
    /// Parse and validate tuning from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let tuning: TuningConfig = serde_json::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&text)?;
        info!(path = %path.display(), "tuning loaded");
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.actions.validate()?;
        non_negative("walk_speed", self.movement.walk_speed)?;
        if !(0.0..=100.0).contains(&self.movement.facing_smoothing) {
            return Err(ConfigError::InvalidValue {
                field: "facing_smoothing",
                value: self.movement.facing_smoothing,
            });
        }
        self.combat.validate()
    }
}

/// Per-scene collision settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Run the collider while this scene is active
    pub provide_collision: bool,
    /// Group pairs by name, e.g. `["hurt_box", "enemy"]`; empty means
    /// everything against everything
    pub collision_rules: Vec<[String; 2]>,
}

impl SceneConfig {
    /// Parse scene settings from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.rules()?;
        Ok(config)
    }

    /// Resolve the named rules, failing on any unknown kind.
    pub fn rules(&self) -> Result<Vec<CollisionRule>, ConfigError> {
        self.collision_rules
            .iter()
            .map(|[left, right]| CollisionRule::parse(left, right))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::{ActionKind, Effect};
    use crate::game::collision::CollisionGroup;
    use crate::game::scene::ObjectKind;

    #[test]
    fn test_defaults_validate() {
        let tuning = TuningConfig::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.actions.get(ActionKind::Dash).cooldown, 0.75);
        assert_eq!(tuning.combat.hurt_box_lifespan, 0.20);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = TuningConfig::from_json_str(r#"{"movement": {"walk_speed": 5.0}}"#)
            .expect("valid tuning");
        assert_eq!(tuning.movement.walk_speed, 5.0);
        assert_eq!(tuning.movement.facing_smoothing, 12.0);
        assert_eq!(tuning.actions, ActionTable::default());
    }

    #[test]
    fn test_effect_overrides_parse() {
        let text = r#"{
            "actions": {
                "dash": {
                    "thresholds": [0.2, 0.4, 0.6, 0.8],
                    "cooldown": 0.5,
                    "duration": 0.25,
                    "effect": {"type": "dash", "lengths": [1, 2, 3, 4, 5]}
                }
            }
        }"#;
        let tuning = TuningConfig::from_json_str(text).expect("valid tuning");
        assert_eq!(
            tuning.actions.dash.effect,
            Effect::Dash { lengths: [1.0, 2.0, 3.0, 4.0, 5.0] }
        );
        assert_eq!(tuning.actions.slash, ActionTable::default().slash);
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let mut tuning = TuningConfig::default();
        tuning.actions.shoot.thresholds = [0.4, 0.4, 1.2, 1.6];
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidThresholds { kind: ActionKind::Shoot, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_damping() {
        let mut tuning = TuningConfig::default();
        tuning.combat.knockback_damping = 1.5;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidValue { field: "knockback_damping", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_projectile_speed_and_epsilon() {
        assert!(matches!(
            TuningConfig::from_json_str(r#"{"combat": {"projectile_speed": 0.0}}"#),
            Err(ConfigError::InvalidValue { field: "projectile_speed", .. })
        ));
        assert!(matches!(
            TuningConfig::from_json_str(r#"{"combat": {"knockback_epsilon": 0.0}}"#),
            Err(ConfigError::InvalidValue { field: "knockback_epsilon", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_dash_length_in_json() {
        let text = r#"{
            "actions": {
                "dash": {
                    "thresholds": [0.2, 0.4, 0.6, 0.8],
                    "cooldown": 0.5,
                    "duration": 0.25,
                    "effect": {"type": "dash", "lengths": [1, 2, -3, 4, 5]}
                }
            }
        }"#;
        assert!(matches!(
            TuningConfig::from_json_str(text),
            Err(ConfigError::InvalidValue { field: "lengths", .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            TuningConfig::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = TuningConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_scene_rules() {
        let config = SceneConfig::from_json_str(
            r#"{
                "provide_collision": true,
                "collision_rules": [["hurt_box", "enemy"], ["enemy", "enemy"]]
            }"#,
        )
        .expect("valid scene");
        let rules = config.rules().expect("known kinds");
        assert_eq!(rules[0].left, CollisionGroup::Kind(ObjectKind::HurtBox));
        assert_eq!(rules[1], CollisionRule::kinds(ObjectKind::Enemy, ObjectKind::Enemy));

        assert!(matches!(
            SceneConfig::from_json_str(r#"{"collision_rules": [["enemy", "ghost"]]}"#),
            Err(ConfigError::UnknownObjectKind(_))
        ));
    }
}
