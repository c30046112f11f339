#![deny(unsafe_code)]
//! # diamond-types
//!
//! Shared vocabulary for the diamond dispatch registry.
//!
//! - **Selector**: 4-byte dispatch key
//! - **FacetAddress**: 20-byte implementation address; all-zero means "none"
//! - **FacetCut / FacetCutAction**: the batch entries submitted by the governor
//! - **Clock**: the single source of time for timelock and revert windows

pub mod address;
pub mod clock;
pub mod cut;
pub mod error;

pub use address::{FacetAddress, Selector};
pub use clock::{Clock, ManualClock, SystemClock, SECONDS_PER_DAY};
pub use cut::{CutEntry, CutKind, FacetCut, FacetCutAction, InitCall, Phase};
pub use error::ParseError;

/// Selector of `init(bytes)`. Initializer entry points never become dispatch entries.
pub const INIT_SELECTOR: Selector = Selector::new([0x4d, 0xdf, 0x47, 0xd4]);

/// Number of selectors packed into one slot.
pub const SLOT_CAPACITY: usize = 8;
