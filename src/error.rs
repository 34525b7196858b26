//! Configuration Errors
//!
//! The per-frame path never fails; everything that can go wrong is caught
//! when tuning data or scene rules are loaded.

use std::path::PathBuf;

use crate::game::action::ActionKind;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid JSON for the expected shape.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A collision rule names an object kind that does not exist.
    #[error("Unknown object kind in collision rule: {0:?}")]
    UnknownObjectKind(String),

    /// Charge thresholds must be positive and strictly ascending.
    #[error("Invalid charge thresholds for {kind:?}: {thresholds:?}")]
    InvalidThresholds {
        /// Offending action kind
        kind: ActionKind,
        /// The rejected table
        thresholds: [f32; 4],
    },

    /// A scalar tuning value is out of range.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: f32,
    },
}
