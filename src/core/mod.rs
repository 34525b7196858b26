//! Core primitives.
//!
//! Leaf types with no knowledge of actors, scenes or collisions.

pub mod vec2;
pub mod ease;
pub mod timer;
pub mod blackboard;

// Re-export core types
pub use vec2::Vec2;
pub use ease::{ease_in, ease_out, smooth, Interpolate, Smoothing};
pub use timer::Clock;
pub use blackboard::Blackboard;
