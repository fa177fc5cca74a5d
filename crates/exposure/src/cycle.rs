//! Playlist cycle durations.
//!
//! Every media item scoped to the same campaign or location plays in one
//! rotating loop. The cycle duration of that loop is the sum of the
//! effective durations of its members, and it is what turns a single
//! item's length into an exposure frequency.

use std::collections::HashMap;

use screenreach_core::inventory::{InventorySnapshot, PlaybackScope};

/// Cycle duration per playlist scope, computed once per snapshot.
#[derive(Debug, Clone)]
pub struct CycleIndex {
    cycles: HashMap<PlaybackScope, f64>,
}

impl CycleIndex {
    pub fn build(snapshot: &InventorySnapshot, default_duration_secs: f64) -> Self {
        let mut cycles: HashMap<PlaybackScope, f64> = HashMap::new();
        for item in snapshot.active_media() {
            if let Some(scope) = item.playback_scope() {
                *cycles.entry(scope).or_insert(0.0) +=
                    item.effective_duration(default_duration_secs);
            }
        }
        Self { cycles }
    }

    /// Total loop length for a scope, in seconds. Unknown scopes are zero.
    pub fn cycle_duration(&self, scope: PlaybackScope) -> f64 {
        self.cycles.get(&scope).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}
