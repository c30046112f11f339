use std::collections::BTreeSet;
use std::fmt;

use diamond_types::{CutEntry, CutKind, FacetAddress, Selector};
use serde::{Deserialize, Serialize};

/// Kind of a queued operation: the three cut kinds plus revert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PendingKind {
    Add,
    Replace,
    Remove,
    Revert,
}

impl From<CutKind> for PendingKind {
    fn from(kind: CutKind) -> Self {
        match kind {
            CutKind::Add => Self::Add,
            CutKind::Replace => Self::Replace,
            CutKind::Remove => Self::Remove,
        }
    }
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Replace => write!(f, "replace"),
            Self::Remove => write!(f, "remove"),
            Self::Revert => write!(f, "revert"),
        }
    }
}

/// Stable identity of a queued operation: kind, facet and selector set.
///
/// Selector order and duplicates do not matter for matching a commit to
/// its queue entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CutKey {
    pub kind: PendingKind,
    pub facet: FacetAddress,
    pub selectors: BTreeSet<Selector>,
}

impl CutKey {
    pub fn new(
        kind: PendingKind,
        facet: FacetAddress,
        selectors: impl IntoIterator<Item = Selector>,
    ) -> Self {
        Self {
            kind,
            facet,
            selectors: selectors.into_iter().collect(),
        }
    }

    pub fn for_entry(entry: &CutEntry) -> Self {
        Self::new(entry.kind.into(), entry.facet, entry.selectors.iter().copied())
    }

    pub fn for_revert(facet: FacetAddress, selectors: &[Selector]) -> Self {
        Self::new(PendingKind::Revert, facet, selectors.iter().copied())
    }
}

/// Monotonic queue entry identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueId(pub u64);

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q-{}", self.0)
    }
}

/// Lifecycle of a queue entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingState {
    Queued,
    Committed { at: u64 },
    /// A committed Replace whose previous bindings were restored.
    Reverted { committed_at: u64, at: u64 },
    /// A Queued entry displaced by re-queuing the same key.
    Superseded { by: QueueId },
}

/// One queued operation and its timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCut {
    pub id: QueueId,
    pub key: CutKey,
    pub queued_at: u64,
    pub eligible_at: u64,
    pub state: PendingState,
}

impl PendingCut {
    pub fn is_queued(&self) -> bool {
        self.state == PendingState::Queued
    }

    /// Queued and past its delay.
    pub fn is_eligible(&self, now: u64) -> bool {
        self.is_queued() && now >= self.eligible_at
    }

    pub fn committed_at(&self) -> Option<u64> {
        match self.state {
            PendingState::Committed { at } => Some(at),
            PendingState::Reverted { committed_at, .. } => Some(committed_at),
            _ => None,
        }
    }
}
