//! Named timers for diagnostics.

use std::time::Duration;

use bevy::platform::collections::HashMap;
use bevy::platform::time::Instant;
use bevy::prelude::*;

/// Start/stop timers keyed by label. Purely diagnostic.
#[derive(Debug, Default)]
pub struct Clock {
    running: HashMap<String, Instant>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the timer `label`.
    pub fn begin(&mut self, label: &str) {
        self.running.insert(label.to_string(), Instant::now());
    }

    /// Stops the timer `label` and returns its elapsed time, logging it at
    /// debug level. Returns `None` if the timer was never started.
    pub fn end(&mut self, label: &str) -> Option<Duration> {
        let elapsed = self.running.remove(label)?.elapsed();
        debug!("{} took {:?}", label, elapsed);
        Some(elapsed)
    }

    pub fn is_running(&self, label: &str) -> bool {
        self.running.contains_key(label)
    }
}
