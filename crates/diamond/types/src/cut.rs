use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{FacetAddress, Selector};
use crate::error::ParseError;

/// What a committed cut entry does to its selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CutKind {
    Add,
    Replace,
    Remove,
}

impl fmt::Display for CutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Replace => write!(f, "replace"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Which half of the two-phase protocol an action belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Queue,
    Commit,
}

/// Action code carried by every entry of a `diamond_cut` call.
///
/// Codes match the deployed contract ABI: even codes queue, odd codes commit.
/// Serialized as the bare code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum FacetCutAction {
    AddQueued = 0,
    Add = 1,
    RemoveQueued = 2,
    Remove = 3,
    ReplaceQueued = 4,
    Replace = 5,
    RevertQueued = 6,
    Revert = 7,
}

impl FacetCutAction {
    pub fn phase(self) -> Phase {
        if (self as u8) % 2 == 0 {
            Phase::Queue
        } else {
            Phase::Commit
        }
    }

    /// The cut kind, or `None` for the revert pair.
    pub fn kind(self) -> Option<CutKind> {
        match self {
            Self::AddQueued | Self::Add => Some(CutKind::Add),
            Self::RemoveQueued | Self::Remove => Some(CutKind::Remove),
            Self::ReplaceQueued | Self::Replace => Some(CutKind::Replace),
            Self::RevertQueued | Self::Revert => None,
        }
    }

    pub fn is_revert(self) -> bool {
        self.kind().is_none()
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FacetCutAction {
    type Error = ParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::AddQueued,
            1 => Self::Add,
            2 => Self::RemoveQueued,
            3 => Self::Remove,
            4 => Self::ReplaceQueued,
            5 => Self::Replace,
            6 => Self::RevertQueued,
            7 => Self::Revert,
            other => return Err(ParseError::UnknownAction(other)),
        })
    }
}

impl From<FacetCutAction> for u8 {
    fn from(action: FacetCutAction) -> Self {
        action.code()
    }
}

/// One entry of a cut batch, as the cut engine and timelock gate see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutEntry {
    pub kind: CutKind,
    pub facet: FacetAddress,
    pub selectors: Vec<Selector>,
}

impl CutEntry {
    pub fn add(facet: FacetAddress, selectors: impl Into<Vec<Selector>>) -> Self {
        Self {
            kind: CutKind::Add,
            facet,
            selectors: selectors.into(),
        }
    }

    pub fn replace(facet: FacetAddress, selectors: impl Into<Vec<Selector>>) -> Self {
        Self {
            kind: CutKind::Replace,
            facet,
            selectors: selectors.into(),
        }
    }

    /// Remove entries always carry the zero facet.
    pub fn remove(selectors: impl Into<Vec<Selector>>) -> Self {
        Self {
            kind: CutKind::Remove,
            facet: FacetAddress::ZERO,
            selectors: selectors.into(),
        }
    }
}

/// One entry of a `diamond_cut` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
    pub facet: FacetAddress,
    pub action: FacetCutAction,
    pub selectors: Vec<Selector>,
}

impl FacetCut {
    pub fn new(
        facet: FacetAddress,
        action: FacetCutAction,
        selectors: impl Into<Vec<Selector>>,
    ) -> Self {
        Self {
            facet,
            action,
            selectors: selectors.into(),
        }
    }

    /// The engine-level entry, or `None` for revert actions.
    pub fn to_entry(&self) -> Option<CutEntry> {
        self.action.kind().map(|kind| CutEntry {
            kind,
            facet: self.facet,
            selectors: self.selectors.clone(),
        })
    }
}

/// One-time initializer invoked after a committed batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitCall {
    pub target: FacetAddress,
    pub payload: Vec<u8>,
}

impl InitCall {
    pub fn new(target: FacetAddress, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            target,
            payload: payload.into(),
        }
    }
}
