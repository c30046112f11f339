//! Initializer execution: trait definition and simulated implementations.

use std::sync::{Arc, Mutex, MutexGuard};

use diamond_index::SelectorIndex;
use diamond_types::InitCall;

/// Runs the one-time initializer attached to a committed cut.
///
/// The executor sees the staged index (all entries of the batch already
/// applied). Returning `Err` rolls the whole batch back.
pub trait InitExecutor: Send + Sync {
    fn execute(&self, call: &InitCall, staged: &SelectorIndex) -> Result<(), String>;
}

impl<E: InitExecutor + ?Sized> InitExecutor for Arc<E> {
    fn execute(&self, call: &InitCall, staged: &SelectorIndex) -> Result<(), String> {
        (**self).execute(call, staged)
    }
}

/// Executor that accepts every initializer without doing anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopInitExecutor;

impl InitExecutor for NoopInitExecutor {
    fn execute(&self, _call: &InitCall, _staged: &SelectorIndex) -> Result<(), String> {
        Ok(())
    }
}

/// A simulated executor for testing and development.
///
/// Records every call it receives and either accepts all of them or fails
/// all of them with a fixed reason.
#[derive(Debug, Default)]
pub struct SimulatedInitExecutor {
    calls: Mutex<Vec<InitCall>>,
    fail_with: Option<String>,
}

impl SimulatedInitExecutor {
    pub fn passing() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<InitCall> {
        self.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<InitCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InitExecutor for SimulatedInitExecutor {
    fn execute(&self, call: &InitCall, _staged: &SelectorIndex) -> Result<(), String> {
        self.lock().push(call.clone());
        match &self.fail_with {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}
