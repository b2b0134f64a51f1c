//! Liveness and readiness state.
//!
//! # States
//! - healthy: the process works and must not be restarted
//! - ready: the process should receive traffic
//! - down: shutdown began; latched forever
//!
//! # State Transitions
//! ```text
//! (false, false) → (true, true): listener started (unless suppressed)
//! ready ←→ not ready:            operator toggles, before shutdown only
//! any → down:                    close signal, both flags cleared
//! ```
//!
//! All three bits share one atomic word so a toggle racing with shutdown
//! can never re-raise a flag after `mark_down`.

use std::sync::atomic::{AtomicU8, Ordering};

const HEALTHY: u8 = 0b001;
const READY: u8 = 0b010;
const DOWN: u8 = 0b100;

/// Healthy/ready flags owned by one server instance.
#[derive(Debug, Default)]
pub struct LifecycleState {
    bits: AtomicU8,
}

impl LifecycleState {
    /// Both flags start false.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.set(HEALTHY, healthy);
    }

    pub fn set_ready(&self, ready: bool) {
        self.set(READY, ready);
    }

    pub fn is_healthy(&self) -> bool {
        self.bits.load(Ordering::Acquire) & HEALTHY != 0
    }

    pub fn is_ready(&self) -> bool {
        self.bits.load(Ordering::Acquire) & READY != 0
    }

    /// Whether shutdown has begun.
    pub fn is_down(&self) -> bool {
        self.bits.load(Ordering::Acquire) & DOWN != 0
    }

    /// Clear both flags and latch them off for the rest of the process.
    ///
    /// Returns `false` if the state was already down.
    pub fn mark_down(&self) -> bool {
        self.bits.swap(DOWN, Ordering::AcqRel) & DOWN == 0
    }

    fn set(&self, flag: u8, on: bool) {
        // Err means a raise was refused after shutdown.
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                if !on {
                    Some(bits & !flag)
                } else if bits & DOWN != 0 {
                    None
                } else {
                    Some(bits | flag)
                }
            });
    }
}
