use diamond_types::{FacetAddress, Selector};

/// Errors from selector index mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("selector {selector} already assigned to facet {facet}")]
    AlreadyAssigned {
        selector: Selector,
        facet: FacetAddress,
    },

    #[error("selector {0} is not assigned")]
    NotAssigned(Selector),

    #[error("selector {selector} already belongs to facet {facet}")]
    SameFacet {
        selector: Selector,
        facet: FacetAddress,
    },

    #[error("selector {0} cannot be bound to the zero facet")]
    ZeroFacet(Selector),

    #[error("index corrupted: {0}")]
    Corrupted(String),
}
