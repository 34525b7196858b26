//! Frame Loop
//!
//! One call per rendered frame. The order is fixed:
//!
//! 1. prime the collider
//! 2. update every object with the sampled input (mutations buffered)
//! 3. flush the buffered additions and removals
//! 4. resolve collisions once over the settled scene
//! 5. hand the frame's events to the caller

use tracing::debug;

use crate::game::collision::{Collider, ResolveReport};
use crate::game::events::GameEvent;
use crate::game::input::FrameInput;
use crate::game::scene::Scene;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Collision pass counters, if a pass ran
    pub collisions: Option<ResolveReport>,
}

/// Run one frame.
pub fn tick(scene: &mut Scene, collider: &mut Collider<Scene>, input: &FrameInput) -> TickResult {
    collider.on_update();
    scene.update(input);
    scene.flush();
    let collisions = collider.on_idle(scene);

    let events = scene.drain_events();
    if !events.is_empty() {
        debug!(now = scene.now(), count = events.len(), "frame events");
    }
    TickResult { events, collisions }
}

/// Run a sequence of frames, collecting every event in order.
pub fn run(
    scene: &mut Scene,
    collider: &mut Collider<Scene>,
    frames: &[FrameInput],
) -> Vec<GameEvent> {
    frames
        .iter()
        .flat_map(|input| tick(scene, collider, input).events)
        .collect()
}
