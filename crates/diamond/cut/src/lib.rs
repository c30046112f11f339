#![deny(unsafe_code)]
//! # diamond-cut
//!
//! Cut Engine: applies a batch of Add/Replace/Remove entries to a
//! [`SelectorIndex`](diamond_index::SelectorIndex) all-or-nothing, then
//! optionally runs a one-time initializer.
//!
//! The batch is staged on a copy of the index; the copy replaces the live
//! index only after every entry and the initializer succeed.

pub mod engine;
pub mod error;
pub mod init;

pub use engine::{CutEngine, CutReceipt, SelectorChange};
pub use error::CutError;
pub use init::{InitExecutor, NoopInitExecutor, SimulatedInitExecutor};
