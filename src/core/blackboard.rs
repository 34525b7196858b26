//! Per-Actor Blackboard
//!
//! Named scalar slots for progress that has to survive state swaps:
//! commit timestamps and committed charge levels. Action templates are
//! shared between actors, so anything an action needs to remember lives here
//! on the actor instead of on the template.

use std::collections::BTreeMap;

/// Slack allowed when comparing elapsed time against an interval (seconds).
pub const TIME_EPSILON: f64 = 1e-6;

/// Scalar slot storage keyed by `K`.
///
/// Uses BTreeMap so debug dumps list slots in a stable order.
#[derive(Clone, Debug)]
pub struct Blackboard<K: Ord> {
    slots: BTreeMap<K, f64>,
}

impl<K: Ord> Default for Blackboard<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Blackboard<K> {
    /// Empty blackboard.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Read a slot.
    pub fn get(&self, key: &K) -> Option<f64> {
        self.slots.get(key).copied()
    }

    /// Read a slot, falling back to `default` when unset.
    pub fn get_or(&self, key: &K, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Write a slot.
    pub fn set(&mut self, key: K, value: f64) {
        self.slots.insert(key, value);
    }

    /// Clear a slot, returning its previous value.
    pub fn clear(&mut self, key: &K) -> Option<f64> {
        self.slots.remove(key)
    }

    /// Seconds since the timestamp stored in `key`, or `None` if never set.
    pub fn elapsed_since(&self, key: &K, now: f64) -> Option<f64> {
        self.get(key).map(|stamp| now - stamp)
    }

    /// True when `key` is unset or at least `interval` seconds old.
    ///
    /// Intervals come from `f32` tuning and timestamps from summed `f32`
    /// deltas, so an interval reached to within [`TIME_EPSILON`] counts.
    pub fn has_elapsed(&self, key: &K, now: f64, interval: f32) -> bool {
        match self.elapsed_since(key, now) {
            None => true,
            Some(elapsed) => elapsed + TIME_EPSILON >= f64::from(interval),
        }
    }
}
