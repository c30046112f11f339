//! Append-only log of successful registry mutations.

use diamond_cut::SelectorChange;
use diamond_timelock::{PendingKind, QueueId, TimelockConfig};
use diamond_types::{FacetAddress, Selector};
use serde::{Deserialize, Serialize};

/// One successful mutation, stamped with the clock reading it ran at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiamondEvent {
    CutQueued {
        id: QueueId,
        kind: PendingKind,
        facet: FacetAddress,
        selectors: Vec<Selector>,
        eligible_at: u64,
        at: u64,
    },
    CutCommitted {
        changes: Vec<SelectorChange>,
        initializer: Option<FacetAddress>,
        at: u64,
    },
    CutReverted {
        facet: FacetAddress,
        selectors: Vec<Selector>,
        at: u64,
    },
    TimelockChanged {
        previous: TimelockConfig,
        current: TimelockConfig,
        at: u64,
    },
    GovernanceTransferred {
        previous: FacetAddress,
        current: FacetAddress,
        at: u64,
    },
}

impl DiamondEvent {
    pub fn at(&self) -> u64 {
        match self {
            Self::CutQueued { at, .. }
            | Self::CutCommitted { at, .. }
            | Self::CutReverted { at, .. }
            | Self::TimelockChanged { at, .. }
            | Self::GovernanceTransferred { at, .. } => *at,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CutQueued { .. } => "cut_queued",
            Self::CutCommitted { .. } => "cut_committed",
            Self::CutReverted { .. } => "cut_reverted",
            Self::TimelockChanged { .. } => "timelock_changed",
            Self::GovernanceTransferred { .. } => "governance_transferred",
        }
    }
}
