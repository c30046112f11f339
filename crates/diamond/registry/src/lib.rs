#![deny(unsafe_code)]
//! # diamond-registry
//!
//! The timelocked diamond dispatch registry: a [`Diamond`] owns the
//! selector index, the timelock gate and the governor, and exposes the
//! queue/commit/revert protocol plus the loupe reads.
//!
//! ```text
//! caller ─► Diamond ─► TimelockGate ─► CutEngine ─► SelectorIndex ─► Loupe
//!              │            (auth, timing)   (atomic batch)
//!              └─► DiamondEvent log
//! ```
//!
//! All mutations take `&mut self` and are all-or-nothing; reads borrow
//! `&self` and see committed state only. Finished queue entries and events
//! are retained up to configurable limits.

pub mod config;
pub mod diamond;
pub mod error;
pub mod events;

pub use config::{ConfigError, RegistryConfig, DEFAULT_EVENT_CAPACITY};
pub use diamond::{CutOutcome, Diamond};
pub use error::DiamondError;
pub use events::DiamondEvent;

pub use diamond_cut::{
    CutEngine, CutError, CutReceipt, InitExecutor, NoopInitExecutor, SelectorChange,
    SimulatedInitExecutor,
};
pub use diamond_index::{FacetView, IndexError, Loupe, SelectorIndex};
pub use diamond_timelock::{
    CutKey, PendingCut, PendingKind, PendingState, QueueId, ReplaceRecord, TimelockConfig,
    TimelockError, DEFAULT_HISTORY_LIMIT, DEFAULT_REVERT_WINDOW_SECS,
};
pub use diamond_types::{
    Clock, CutEntry, CutKind, FacetAddress, FacetCut, FacetCutAction, InitCall, ManualClock,
    Selector, SystemClock, INIT_SELECTOR, SECONDS_PER_DAY,
};
