// src/exec/activity.rs

//! Last-activity cell shared between the output reader and the inactivity
//! monitor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic "last output seen" timestamp.
///
/// Stored as milliseconds since a fixed `Instant` origin so it fits in an
/// atomic. The output reader is the only writer; the inactivity monitor is
/// the only reader.
#[derive(Debug)]
pub struct ActivityClock {
    origin: Instant,
    last_ms: AtomicU64,
}

impl ActivityClock {
    /// A clock whose last activity is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_ms: AtomicU64::new(0),
        }
    }

    /// Record activity at the current instant.
    pub fn touch(&self) {
        // fetch_max keeps the stored value non-decreasing.
        self.last_ms.fetch_max(self.elapsed_ms(), Ordering::Relaxed);
    }

    /// Time since the last recorded activity.
    pub fn idle_for(&self) -> Duration {
        let last = self.last_ms.load(Ordering::Relaxed);
        Duration::from_millis(self.elapsed_ms().saturating_sub(last))
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}
