use diamond_types::SECONDS_PER_DAY;
use serde::{Deserialize, Serialize};

/// Replace operations can be reverted for 30 days after commit.
pub const DEFAULT_REVERT_WINDOW_SECS: u64 = 30 * SECONDS_PER_DAY;

/// Finished queue entries kept for inspection before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Process-wide timelock settings.
///
/// Applies to cuts queued after the change; already queued cuts keep the
/// `eligible_at` computed when they were queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockConfig {
    pub enabled: bool,
    pub delay_secs: u64,
}

impl TimelockConfig {
    pub fn new(enabled: bool, delay_secs: u64) -> Self {
        Self {
            enabled,
            delay_secs,
        }
    }

    /// Timelock off: commits may follow their queue immediately.
    pub fn disabled() -> Self {
        Self::new(false, 0)
    }

    /// Delay actually applied to new queue entries.
    pub fn effective_delay(&self) -> u64 {
        if self.enabled {
            self.delay_secs
        } else {
            0
        }
    }
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self::new(true, SECONDS_PER_DAY)
    }
}
