use std::collections::{BTreeMap, HashMap, HashSet};

use diamond_cut::{CutEngine, CutError, CutReceipt, InitExecutor, NoopInitExecutor};
use diamond_index::SelectorIndex;
use diamond_types::{CutEntry, CutKind, FacetAddress, InitCall, Selector};
use tracing::{debug, info, warn};

use crate::config::{TimelockConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_REVERT_WINDOW_SECS};
use crate::error::TimelockError;
use crate::pending::{CutKey, PendingCut, PendingState, QueueId};
use crate::revert::ReplaceRecord;

/// Governs when cuts reach the index: queue, wait out the delay, commit.
/// Committed Replace entries stay revertible for the revert window.
///
/// Each operation validates everything before its first write, so a
/// rejected call leaves the gate and the index untouched.
#[derive(Clone, Debug)]
pub struct TimelockGate {
    governor: FacetAddress,
    config: TimelockConfig,
    revert_window_secs: u64,
    entries: BTreeMap<QueueId, PendingCut>,
    /// Latest queue entry per key.
    latest: HashMap<CutKey, QueueId>,
    replacements: HashMap<Selector, ReplaceRecord>,
    /// Finished entries retained before the oldest are pruned.
    history_limit: usize,
    next_id: u64,
}

impl TimelockGate {
    pub fn new(governor: FacetAddress, config: TimelockConfig) -> Self {
        Self {
            governor,
            config,
            revert_window_secs: DEFAULT_REVERT_WINDOW_SECS,
            entries: BTreeMap::new(),
            latest: HashMap::new(),
            replacements: HashMap::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            next_id: 1,
        }
    }

    pub fn with_revert_window(mut self, secs: u64) -> Self {
        self.revert_window_secs = secs;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn governor(&self) -> FacetAddress {
        self.governor
    }

    pub fn config(&self) -> TimelockConfig {
        self.config
    }

    pub fn revert_window_secs(&self) -> u64 {
        self.revert_window_secs
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn authorize(&self, caller: FacetAddress) -> Result<(), TimelockError> {
        if caller != self.governor || caller.is_zero() {
            warn!(caller = %caller, "Unauthorized registry mutation rejected");
            return Err(TimelockError::Unauthorized(caller));
        }
        Ok(())
    }

    /// Hand the governor role to `new_governor`. Returns the previous governor.
    pub fn transfer_governance(
        &mut self,
        caller: FacetAddress,
        new_governor: FacetAddress,
    ) -> Result<FacetAddress, TimelockError> {
        self.authorize(caller)?;
        if new_governor.is_zero() {
            return Err(TimelockError::InvalidGovernor);
        }
        let previous = std::mem::replace(&mut self.governor, new_governor);
        info!(from = %previous, to = %new_governor, "Governance transferred");
        Ok(previous)
    }

    /// Replace the timelock settings. Returns the previous settings.
    pub fn set_timelock(
        &mut self,
        caller: FacetAddress,
        config: TimelockConfig,
    ) -> Result<TimelockConfig, TimelockError> {
        self.authorize(caller)?;
        let previous = std::mem::replace(&mut self.config, config);
        info!(
            enabled = config.enabled,
            delay_secs = config.delay_secs,
            "Timelock configuration changed"
        );
        Ok(previous)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn pending(&self, id: QueueId) -> Option<&PendingCut> {
        self.entries.get(&id)
    }

    /// Retained queue entries, oldest first.
    pub fn pending_cuts(&self) -> impl Iterator<Item = &PendingCut> {
        self.entries.values()
    }

    /// Entries still waiting for their commit.
    pub fn queued(&self) -> impl Iterator<Item = &PendingCut> {
        self.entries.values().filter(|p| p.is_queued())
    }

    /// The live Queued entry for `key`, if any.
    pub fn find_queued(&self, key: &CutKey) -> Option<&PendingCut> {
        self.latest
            .get(key)
            .and_then(|id| self.entries.get(id))
            .filter(|p| p.is_queued())
    }

    pub fn replace_record(&self, selector: &Selector) -> Option<&ReplaceRecord> {
        self.replacements.get(selector)
    }

    // ── Cuts ────────────────────────────────────────────────────────────

    /// Queue every entry of `batch`. Returns one queue id per entry.
    pub fn queue_cut(
        &mut self,
        caller: FacetAddress,
        engine: &CutEngine,
        batch: &[CutEntry],
        now: u64,
    ) -> Result<Vec<QueueId>, TimelockError> {
        self.authorize(caller)?;
        if batch.is_empty() {
            return Err(CutError::EmptyCut.into());
        }
        for entry in batch {
            engine.check_entry(entry)?;
        }
        Ok(batch
            .iter()
            .map(|entry| self.enqueue(CutKey::for_entry(entry), now))
            .collect())
    }

    /// Commit `batch` once every entry has an eligible queue entry.
    #[allow(clippy::too_many_arguments)]
    pub fn commit_cut(
        &mut self,
        caller: FacetAddress,
        engine: &CutEngine,
        index: &mut SelectorIndex,
        batch: &[CutEntry],
        init: Option<&InitCall>,
        executor: &dyn InitExecutor,
        now: u64,
    ) -> Result<CutReceipt, TimelockError> {
        self.authorize(caller)?;
        if batch.is_empty() {
            return Err(CutError::EmptyCut.into());
        }

        let mut claimed = HashSet::new();
        let mut ids = Vec::with_capacity(batch.len());
        for entry in batch {
            let id = self.ready_entry(&CutKey::for_entry(entry), now, &claimed)?;
            claimed.insert(id);
            ids.push(id);
        }

        let receipt = engine.apply(index, batch, init, executor)?;

        for id in &ids {
            self.mark_committed(*id, now);
        }
        self.record_history(batch, &ids, &receipt, now);
        self.prune();

        info!(
            entries = batch.len(),
            changes = receipt.changes.len(),
            initializer = receipt.initializer.is_some(),
            "Cut committed"
        );
        Ok(receipt)
    }

    // ── Revert ──────────────────────────────────────────────────────────

    /// Queue restoration of `facet` for selectors a committed Replace moved away from it.
    pub fn queue_revert(
        &mut self,
        caller: FacetAddress,
        facet: FacetAddress,
        selectors: &[Selector],
        now: u64,
    ) -> Result<QueueId, TimelockError> {
        self.authorize(caller)?;
        self.check_revertible(facet, selectors, now)?;
        Ok(self.enqueue(CutKey::for_revert(facet, selectors), now))
    }

    /// Restore `facet` for `selectors`.
    ///
    /// The revert window is checked before the queue: once it has closed the
    /// revert fails with `RevertWindowExpired` whatever the queue holds.
    pub fn commit_revert(
        &mut self,
        caller: FacetAddress,
        engine: &CutEngine,
        index: &mut SelectorIndex,
        facet: FacetAddress,
        selectors: &[Selector],
        now: u64,
    ) -> Result<CutReceipt, TimelockError> {
        self.authorize(caller)?;
        self.check_revertible(facet, selectors, now)?;
        let id = self.ready_entry(&CutKey::for_revert(facet, selectors), now, &HashSet::new())?;

        let restore = [CutEntry::replace(facet, selectors.to_vec())];
        let receipt = engine.apply(index, &restore, None, &NoopInitExecutor)?;

        self.mark_committed(id, now);
        let mut sources = HashSet::new();
        for selector in selectors {
            if let Some(record) = self.replacements.get_mut(selector) {
                record.reverted_at = Some(now);
                sources.insert(record.source);
            }
        }
        // A Replace is reverted once none of its records is live.
        for source in sources {
            let partial = self
                .replacements
                .values()
                .any(|r| r.source == source && r.is_live());
            if partial {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(&source) {
                if let PendingState::Committed { at } = entry.state {
                    entry.state = PendingState::Reverted {
                        committed_at: at,
                        at: now,
                    };
                }
            }
        }

        self.prune();
        info!(facet = %facet, selectors = selectors.len(), "Replace reverted");
        Ok(receipt)
    }

    fn check_revertible(
        &self,
        facet: FacetAddress,
        selectors: &[Selector],
        now: u64,
    ) -> Result<(), TimelockError> {
        if selectors.is_empty() {
            return Err(CutError::EmptySelectorList {
                kind: CutKind::Replace,
                facet,
            }
            .into());
        }
        for selector in selectors {
            let record = self
                .replacements
                .get(selector)
                .filter(|r| r.is_live())
                .ok_or(TimelockError::NothingToRevert(*selector))?;
            if record.previous_facet != facet {
                return Err(TimelockError::RevertTargetMismatch {
                    selector: *selector,
                    recorded: record.previous_facet,
                    requested: facet,
                });
            }
            if !record.is_within_window(now, self.revert_window_secs) {
                warn!(selector = %selector, "Revert attempted after window closed");
                return Err(TimelockError::RevertWindowExpired {
                    selector: *selector,
                    closed_at: record.window_closes_at(self.revert_window_secs),
                });
            }
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn enqueue(&mut self, key: CutKey, now: u64) -> QueueId {
        let id = QueueId(self.next_id);
        self.next_id += 1;

        if let Some(previous) = self.latest.get(&key).and_then(|p| self.entries.get_mut(p)) {
            if previous.is_queued() {
                previous.state = PendingState::Superseded { by: id };
            }
        }

        let eligible_at = now.saturating_add(self.config.effective_delay());
        info!(
            id = %id,
            kind = %key.kind,
            facet = %key.facet,
            selectors = key.selectors.len(),
            eligible_at,
            "Cut queued"
        );
        self.latest.insert(key.clone(), id);
        self.entries.insert(
            id,
            PendingCut {
                id,
                key,
                queued_at: now,
                eligible_at,
                state: PendingState::Queued,
            },
        );
        self.prune();
        id
    }

    fn ready_entry(
        &self,
        key: &CutKey,
        now: u64,
        claimed: &HashSet<QueueId>,
    ) -> Result<QueueId, TimelockError> {
        let pending = self
            .find_queued(key)
            .filter(|p| !claimed.contains(&p.id))
            .ok_or(TimelockError::NoMatchingQueuedEntry {
                kind: key.kind,
                facet: key.facet,
            })?;
        if now < pending.eligible_at {
            warn!(id = %pending.id, eligible_at = pending.eligible_at, now, "Commit attempted too early");
            return Err(TimelockError::TooEarly {
                eligible_at: pending.eligible_at,
                now,
            });
        }
        Ok(pending.id)
    }

    /// Drop the oldest finished entries beyond the history limit.
    ///
    /// Queued entries and Replace entries backing a live record are kept
    /// whatever their age. The key map only tracks Queued entries.
    fn prune(&mut self) {
        let backing: HashSet<QueueId> = self
            .replacements
            .values()
            .filter(|r| r.is_live())
            .map(|r| r.source)
            .collect();
        let finished: Vec<QueueId> = self
            .entries
            .values()
            .filter(|p| !p.is_queued() && !backing.contains(&p.id))
            .map(|p| p.id)
            .collect();
        let excess = finished.len().saturating_sub(self.history_limit);
        for id in &finished[..excess] {
            self.entries.remove(id);
        }
        if excess > 0 {
            debug!(pruned = excess, retained = self.entries.len(), "Queue history pruned");
        }
        self.latest
            .retain(|_, id| self.entries.get(id).is_some_and(PendingCut::is_queued));
    }

    fn mark_committed(&mut self, id: QueueId, now: u64) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.state = PendingState::Committed { at: now };
        }
    }

    /// Update replace history from a committed batch. Receipt changes are in
    /// batch order, one per listed selector.
    fn record_history(
        &mut self,
        batch: &[CutEntry],
        ids: &[QueueId],
        receipt: &CutReceipt,
        now: u64,
    ) {
        let mut changes = receipt.changes.iter();
        for (entry, id) in batch.iter().zip(ids) {
            for _ in &entry.selectors {
                let Some(change) = changes.next() else {
                    return;
                };
                match (entry.kind, change.before, change.after) {
                    (CutKind::Replace, Some(previous), Some(replaced_by)) => {
                        self.replacements.insert(
                            change.selector,
                            ReplaceRecord {
                                previous_facet: previous,
                                replaced_by,
                                committed_at: now,
                                source: *id,
                                reverted_at: None,
                            },
                        );
                    }
                    (CutKind::Remove, _, _) => {
                        self.replacements.remove(&change.selector);
                    }
                    _ => {}
                }
            }
        }
    }
}
