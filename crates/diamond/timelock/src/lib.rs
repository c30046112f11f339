#![deny(unsafe_code)]
//! # diamond-timelock
//!
//! The queue/commit state machine wrapping every cut.
//!
//! ```text
//! queue ──► Queued ──(now ≥ eligible_at)──► commit ──► Committed
//!                                                         │ Replace only,
//!                                                         │ within the revert window
//!                                                         ▼
//!                                                      Reverted
//! ```
//!
//! Eligibility is derived from `eligible_at`, never stored. Every mutating
//! operation is restricted to the single governor held by the gate.
//! Finished entries are retained up to a history limit; Queued entries and
//! Replace entries that still back a live replace record are never dropped.

pub mod config;
pub mod error;
pub mod gate;
pub mod pending;
pub mod revert;

pub use config::{TimelockConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_REVERT_WINDOW_SECS};
pub use error::TimelockError;
pub use gate::TimelockGate;
pub use pending::{CutKey, PendingCut, PendingKind, PendingState, QueueId};
pub use revert::ReplaceRecord;
