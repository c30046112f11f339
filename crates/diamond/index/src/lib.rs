#![deny(unsafe_code)]
//! # diamond-index
//!
//! Packed bidirectional selector index.
//!
//! - selector → (facet, slot, position) through [`SelectorRecord`]
//! - facet → ordered selectors, packed eight per slot
//!
//! Slots live in an arena keyed by `(facet, slot number)`; each facet keeps a
//! selector count, so a facet with N selectors always owns exactly
//! `ceil(N / 8)` slots with no gaps. [`Loupe`] provides the read-only views.

pub mod error;
pub mod index;
pub mod loupe;

pub use error::IndexError;
pub use index::{SelectorIndex, SelectorRecord, SlotKey};
pub use loupe::{FacetView, Loupe};
