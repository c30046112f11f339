//! Read-only loupe over the selector index.

use diamond_types::{FacetAddress, Selector};
use serde::{Deserialize, Serialize};

use crate::index::SelectorIndex;

/// A facet together with the selectors it implements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetView {
    pub facet: FacetAddress,
    pub selectors: Vec<Selector>,
}

/// Borrowed introspection view. Holding a `Loupe` freezes the index, so every
/// answer comes from the same committed state.
#[derive(Clone, Copy)]
pub struct Loupe<'a> {
    index: &'a SelectorIndex,
}

impl<'a> Loupe<'a> {
    pub fn new(index: &'a SelectorIndex) -> Self {
        Self { index }
    }

    /// All facets and their selectors.
    pub fn facets(&self) -> Vec<FacetView> {
        self.index
            .facets()
            .iter()
            .map(|facet| FacetView {
                facet: *facet,
                selectors: self.index.selectors_of(facet),
            })
            .collect()
    }

    pub fn facet_function_selectors(&self, facet: &FacetAddress) -> Vec<Selector> {
        self.index.selectors_of(facet)
    }

    pub fn facet_addresses(&self) -> Vec<FacetAddress> {
        self.index.facets().to_vec()
    }

    pub fn facet_address(&self, selector: &Selector) -> Option<FacetAddress> {
        self.index.lookup(selector)
    }

    pub fn all_selectors(&self) -> Vec<Selector> {
        self.index.all_selectors()
    }
}
