//! Replace history that backs the revert window.

use diamond_types::FacetAddress;
use serde::{Deserialize, Serialize};

use crate::pending::QueueId;

/// The binding a committed Replace displaced, kept per selector.
///
/// A later Replace of the same selector overwrites the record, so a revert
/// restores the facet displaced by the most recently committed Replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRecord {
    pub previous_facet: FacetAddress,
    pub replaced_by: FacetAddress,
    pub committed_at: u64,
    /// Queue entry of the Replace that produced this record.
    pub source: QueueId,
    pub reverted_at: Option<u64>,
}

impl ReplaceRecord {
    /// First instant at which the record can no longer be reverted.
    pub fn window_closes_at(&self, window_secs: u64) -> u64 {
        self.committed_at.saturating_add(window_secs)
    }

    pub fn is_within_window(&self, now: u64, window_secs: u64) -> bool {
        now < self.window_closes_at(window_secs)
    }

    pub fn is_live(&self) -> bool {
        self.reverted_at.is_none()
    }
}
