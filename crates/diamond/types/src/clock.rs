//! Time source for the timelock gate.
//!
//! Timestamps are UNIX seconds. The registry never reads the wall clock
//! directly; it asks the injected [`Clock`], so simulations can advance time
//! deterministically.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Monotonic source of "now" in UNIX seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall-clock time via chrono.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Pre-epoch wall clocks clamp to zero.
        Utc::now().timestamp().max(0) as u64
    }
}

/// Manually driven clock for simulations and tests.
///
/// Only moves forward: `set` to an earlier instant is ignored.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Advance by `secs` and return the new time.
    pub fn advance(&self, secs: u64) -> u64 {
        self.now.fetch_add(secs, Ordering::AcqRel) + secs
    }

    pub fn advance_days(&self, days: u64) -> u64 {
        self.advance(days * SECONDS_PER_DAY)
    }

    pub fn set(&self, at: u64) {
        self.now.fetch_max(at, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}
