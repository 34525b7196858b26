//! Game Logic Module
//!
//! All frame-driven simulation code. Nothing here reads the system clock
//! or a live input device.
//!
//! ## Module Structure
//!
//! - `action`: Charge action templates and blackboard slots
//! - `input`: Per-frame input sampling and event derivation
//! - `state`: Action state machine (Neutral / Charging / Effect)
//! - `actor`: Input-driven actor owning one state
//! - `hitbox`: Hurt boxes and projectiles
//! - `enemy`: Knockable enemies and their bodies
//! - `scene`: Object store with deferred add/remove
//! - `collision`: Deferred pairwise collision resolution
//! - `tick`: Frame loop
//! - `events`: Domain events and the charge meter

pub mod action;
pub mod input;
pub mod state;
pub mod actor;
pub mod hitbox;
pub mod enemy;
pub mod scene;
pub mod collision;
pub mod tick;
pub mod events;

// Re-export key types
pub use action::{ActionKind, ActionTemplate, ActionTable, Effect};
pub use input::{Controls, FrameInput, ActorEvent};
pub use state::ActionState;
pub use actor::Actor;
pub use hitbox::{HurtBox, Projectile, Origin};
pub use enemy::{Enemy, Body};
pub use scene::{Scene, SceneObject, ObjectId, ObjectKind, SceneId};
pub use collision::{Collider, CollisionGroup, CollisionRule};
pub use tick::TickResult;
pub use events::{GameEvent, GameEventData, ChargeMeter};
