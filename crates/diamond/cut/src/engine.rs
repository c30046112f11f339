use diamond_index::SelectorIndex;
use diamond_types::{CutEntry, CutKind, FacetAddress, InitCall, Selector, INIT_SELECTOR};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CutError;
use crate::init::InitExecutor;

/// One selector binding changed by a cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorChange {
    pub selector: Selector,
    pub before: Option<FacetAddress>,
    pub after: Option<FacetAddress>,
}

/// What a successful cut did, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutReceipt {
    pub changes: Vec<SelectorChange>,
    /// Initializer target, when one ran.
    pub initializer: Option<FacetAddress>,
}

impl CutReceipt {
    /// `(selector, previous facet, new facet)` for every replaced binding.
    pub fn replaced(&self) -> impl Iterator<Item = (Selector, FacetAddress, FacetAddress)> + '_ {
        self.changes.iter().filter_map(|c| match (c.before, c.after) {
            (Some(before), Some(after)) => Some((c.selector, before, after)),
            _ => None,
        })
    }

    pub fn added(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.before.is_none() && c.after.is_some())
            .count()
    }

    pub fn removed(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.before.is_some() && c.after.is_none())
            .count()
    }
}

/// Applies cut batches atomically.
#[derive(Clone, Debug)]
pub struct CutEngine {
    init_selector: Selector,
}

impl CutEngine {
    pub fn new() -> Self {
        Self {
            init_selector: INIT_SELECTOR,
        }
    }

    /// Reject a different selector as the initializer entry point.
    pub fn with_init_selector(mut self, selector: Selector) -> Self {
        self.init_selector = selector;
        self
    }

    pub fn init_selector(&self) -> Selector {
        self.init_selector
    }

    /// Shape checks that do not depend on index state.
    ///
    /// Run again for every entry at apply time; the timelock gate also runs
    /// them at queue time so malformed cuts never wait out a delay.
    pub fn check_entry(&self, entry: &CutEntry) -> Result<(), CutError> {
        if entry.selectors.is_empty() {
            return Err(CutError::EmptySelectorList {
                kind: entry.kind,
                facet: entry.facet,
            });
        }
        match entry.kind {
            CutKind::Add | CutKind::Replace if entry.facet.is_zero() => {
                Err(CutError::ZeroFacet(entry.kind))
            }
            CutKind::Remove if !entry.facet.is_zero() => {
                Err(CutError::RemoveFacetNotZero(entry.facet))
            }
            CutKind::Add => match entry.selectors.iter().find(|s| **s == self.init_selector) {
                Some(selector) => Err(CutError::InitSelectorRejected(*selector)),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Apply `batch` in order, then run `init` once. All-or-nothing.
    pub fn apply(
        &self,
        index: &mut SelectorIndex,
        batch: &[CutEntry],
        init: Option<&InitCall>,
        executor: &dyn InitExecutor,
    ) -> Result<CutReceipt, CutError> {
        if batch.is_empty() && init.is_none() {
            return Err(CutError::EmptyCut);
        }

        let mut staged = index.clone();
        let mut receipt = CutReceipt::default();

        for entry in batch {
            self.check_entry(entry)?;
            self.apply_entry(&mut staged, entry, &mut receipt)?;
            debug!(
                kind = %entry.kind,
                facet = %entry.facet,
                selectors = entry.selectors.len(),
                "Cut entry staged"
            );
        }

        if let Some(call) = init {
            if call.target.is_zero() {
                return Err(CutError::InvalidInitializer(
                    "initializer target is the zero address".into(),
                ));
            }
            if let Err(reason) = executor.execute(call, &staged) {
                warn!(initializer = %call.target, reason = %reason, "Initializer failed, cut rolled back");
                return Err(CutError::InitializerFailed {
                    target: call.target,
                    reason,
                });
            }
            receipt.initializer = Some(call.target);
        }

        *index = staged;
        info!(
            entries = batch.len(),
            added = receipt.added(),
            replaced = receipt.replaced().count(),
            removed = receipt.removed(),
            "Cut applied"
        );
        Ok(receipt)
    }

    fn apply_entry(
        &self,
        staged: &mut SelectorIndex,
        entry: &CutEntry,
        receipt: &mut CutReceipt,
    ) -> Result<(), CutError> {
        for selector in &entry.selectors {
            let change = match entry.kind {
                CutKind::Add => {
                    staged.assign(*selector, entry.facet)?;
                    SelectorChange {
                        selector: *selector,
                        before: None,
                        after: Some(entry.facet),
                    }
                }
                CutKind::Replace => {
                    let previous = staged.reassign(*selector, entry.facet)?;
                    SelectorChange {
                        selector: *selector,
                        before: Some(previous),
                        after: Some(entry.facet),
                    }
                }
                CutKind::Remove => {
                    let previous = staged.unassign(*selector)?;
                    SelectorChange {
                        selector: *selector,
                        before: Some(previous),
                        after: None,
                    }
                }
            };
            receipt.changes.push(change);
        }
        Ok(())
    }
}

impl Default for CutEngine {
    fn default() -> Self {
        Self::new()
    }
}
