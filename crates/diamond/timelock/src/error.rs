use diamond_cut::CutError;
use diamond_types::{FacetAddress, Selector};

use crate::pending::PendingKind;

/// Errors from the timelock gate. Cut engine errors pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelockError {
    #[error("caller {0} is not the governor")]
    Unauthorized(FacetAddress),

    #[error("governor cannot be the zero address")]
    InvalidGovernor,

    #[error("cut not eligible until {eligible_at} (now {now})")]
    TooEarly { eligible_at: u64, now: u64 },

    #[error("no queued {kind} entry matches facet {facet}")]
    NoMatchingQueuedEntry {
        kind: PendingKind,
        facet: FacetAddress,
    },

    #[error("revert window for selector {selector} closed at {closed_at}")]
    RevertWindowExpired { selector: Selector, closed_at: u64 },

    #[error("selector {0} has no committed replace to revert")]
    NothingToRevert(Selector),

    #[error("selector {selector} was replaced from {recorded}, not {requested}")]
    RevertTargetMismatch {
        selector: Selector,
        recorded: FacetAddress,
        requested: FacetAddress,
    },

    #[error(transparent)]
    Cut(#[from] CutError),
}
