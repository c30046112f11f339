use diamond_index::IndexError;
use diamond_types::{CutKind, FacetAddress, Selector};

/// Errors from applying a cut batch. Any of them aborts the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CutError {
    #[error("cut has no entries and no initializer")]
    EmptyCut,

    #[error("{kind} entry for facet {facet} lists no selectors")]
    EmptySelectorList { kind: CutKind, facet: FacetAddress },

    #[error("{0} entry requires a non-zero facet address")]
    ZeroFacet(CutKind),

    #[error("remove entry must use the zero facet, got {0}")]
    RemoveFacetNotZero(FacetAddress),

    #[error("initializer selector {0} cannot be added as a dispatch entry")]
    InitSelectorRejected(Selector),

    #[error("selector {selector} already assigned to facet {facet}")]
    AlreadyAssigned {
        selector: Selector,
        facet: FacetAddress,
    },

    #[error("selector {0} is not assigned")]
    Unassigned(Selector),

    #[error("selector {selector} already points at facet {facet}")]
    NoOpReplace {
        selector: Selector,
        facet: FacetAddress,
    },

    #[error("invalid initializer: {0}")]
    InvalidInitializer(String),

    #[error("initializer {target} failed: {reason}")]
    InitializerFailed {
        target: FacetAddress,
        reason: String,
    },

    #[error(transparent)]
    Index(IndexError),
}

impl From<IndexError> for CutError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::AlreadyAssigned { selector, facet } => {
                Self::AlreadyAssigned { selector, facet }
            }
            IndexError::NotAssigned(selector) => Self::Unassigned(selector),
            IndexError::SameFacet { selector, facet } => Self::NoOpReplace { selector, facet },
            other => Self::Index(other),
        }
    }
}
