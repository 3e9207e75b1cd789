//! Primitive metrics types.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A serializable snapshot of a primitive's handle accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveMetrics {
    /// Total number of handles created.
    pub handles_created: u64,

    /// Total number of handles released.
    pub handles_released: u64,

    /// Total number of refused creation attempts.
    pub handles_refused: u64,

    /// Number of handles currently live.
    pub live_handles: u64,
}

/// A lock-free structure for handle accounting updates.
#[derive(Debug, Default)]
pub struct AtomicPrimitiveMetrics {
    /// Handles created (atomic counter).
    pub handles_created: AtomicU64,

    /// Handles released (atomic counter).
    pub handles_released: AtomicU64,

    /// Refused creation attempts (atomic counter).
    pub handles_refused: AtomicU64,
}

impl AtomicPrimitiveMetrics {
    /// Creates a new instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful creation.
    pub fn record_created(&self) {
        self.handles_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a release.
    pub fn record_released(&self) {
        self.handles_released.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a refused creation attempt.
    pub fn record_refused(&self) {
        self.handles_refused.fetch_add(1, Ordering::Relaxed);
    }

    /// Creates a serializable snapshot from the current atomic values.
    pub fn snapshot(&self) -> PrimitiveMetrics {
        let created = self.handles_created.load(Ordering::Relaxed);
        let released = self.handles_released.load(Ordering::Relaxed);
        PrimitiveMetrics {
            handles_created: created,
            handles_released: released,
            handles_refused: self.handles_refused.load(Ordering::Relaxed),
            live_handles: created.saturating_sub(released),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.handles_created.store(0, Ordering::Relaxed);
        self.handles_released.store(0, Ordering::Relaxed);
        self.handles_refused.store(0, Ordering::Relaxed);
    }
}
