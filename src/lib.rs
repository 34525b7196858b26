//! # Survival Core
//!
//! Frame-driven combat simulation: charge actions, transient hit markers
//! and deferred collision resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SURVIVAL CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Leaf primitives                           │
//! │  ├── vec2.rs     - 2D vector                                 │
//! │  ├── ease.rs     - Ease-in / ease-out / smoothing            │
//! │  ├── timer.rs    - Per-actor clock                           │
//! │  └── blackboard.rs - Keyed per-actor scratch values          │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── input.rs    - Frame input sampling                      │
//! │  ├── action.rs   - Charge action templates                   │
//! │  ├── state.rs    - Action state machine                      │
//! │  ├── actor.rs    - Input-driven actor                        │
//! │  ├── hitbox.rs   - Hurt boxes and projectiles                │
//! │  ├── enemy.rs    - Knockback, stun, bodies                   │
//! │  ├── scene.rs    - Object store, deferred add/remove         │
//! │  ├── collision.rs- Deferred pairwise collision               │
//! │  └── tick.rs     - Frame loop                                │
//! │                                                              │
//! │  config.rs       - Tuning and scene settings (JSON)          │
//! │  error.rs        - Configuration errors                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Order
//!
//! Every frame primes the collider, updates each object with the same
//! sampled input, flushes buffered additions and removals, and then runs
//! exactly one collision pass over the settled scene.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod game;

// Re-export commonly used types
pub use config::{SceneConfig, TuningConfig};
pub use core::vec2::Vec2;
pub use error::ConfigError;
pub use game::actor::Actor;
pub use game::collision::Collider;
pub use game::input::{Controls, FrameInput};
pub use game::scene::{Scene, SceneId};
pub use game::tick::{tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame rate the sandbox drives the simulation at (Hz)
pub const FRAME_RATE: u32 = 60;
