use std::fmt;

use diamond_cut::{CutEngine, CutError, CutReceipt, InitExecutor, NoopInitExecutor};
use diamond_index::{Loupe, SelectorIndex};
use diamond_timelock::{
    CutKey, PendingCut, QueueId, ReplaceRecord, TimelockConfig, TimelockGate,
};
use diamond_types::{
    Clock, CutEntry, FacetAddress, FacetCut, InitCall, Phase, Selector, SystemClock,
};
use tracing::info;

use crate::config::RegistryConfig;
use crate::error::DiamondError;
use crate::events::DiamondEvent;

/// Result of a [`Diamond::diamond_cut`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CutOutcome {
    /// Queue entries created by queue-phase actions, in call order.
    pub queued: Vec<QueueId>,
    /// Bindings changed by commit-phase actions, in call order.
    pub receipt: CutReceipt,
}

/// Index and gate: the state a cut mutates.
#[derive(Clone, Debug)]
struct RegistryState {
    index: SelectorIndex,
    gate: TimelockGate,
}

/// Per-call context. Events collect here and reach the log only on success.
struct Env<'a> {
    engine: &'a CutEngine,
    executor: &'a dyn InitExecutor,
    now: u64,
    emitted: Vec<DiamondEvent>,
}

impl RegistryState {
    fn queue_cut(
        &mut self,
        env: &mut Env<'_>,
        caller: FacetAddress,
        batch: &[CutEntry],
    ) -> Result<Vec<QueueId>, DiamondError> {
        let ids = self.gate.queue_cut(caller, env.engine, batch, env.now)?;
        for id in &ids {
            self.record_queued(env, *id);
        }
        Ok(ids)
    }

    fn commit_cut(
        &mut self,
        env: &mut Env<'_>,
        caller: FacetAddress,
        batch: &[CutEntry],
        init: Option<&InitCall>,
    ) -> Result<CutReceipt, DiamondError> {
        let receipt = self.gate.commit_cut(
            caller,
            env.engine,
            &mut self.index,
            batch,
            init,
            env.executor,
            env.now,
        )?;
        env.emitted.push(DiamondEvent::CutCommitted {
            changes: receipt.changes.clone(),
            initializer: receipt.initializer,
            at: env.now,
        });
        Ok(receipt)
    }

    fn queue_revert(
        &mut self,
        env: &mut Env<'_>,
        caller: FacetAddress,
        facet: FacetAddress,
        selectors: &[Selector],
    ) -> Result<QueueId, DiamondError> {
        let id = self.gate.queue_revert(caller, facet, selectors, env.now)?;
        self.record_queued(env, id);
        Ok(id)
    }

    fn commit_revert(
        &mut self,
        env: &mut Env<'_>,
        caller: FacetAddress,
        facet: FacetAddress,
        selectors: &[Selector],
    ) -> Result<CutReceipt, DiamondError> {
        let receipt = self.gate.commit_revert(
            caller,
            env.engine,
            &mut self.index,
            facet,
            selectors,
            env.now,
        )?;
        env.emitted.push(DiamondEvent::CutReverted {
            facet,
            selectors: selectors.to_vec(),
            at: env.now,
        });
        Ok(receipt)
    }

    fn record_queued(&self, env: &mut Env<'_>, id: QueueId) {
        if let Some(pending) = self.gate.pending(id) {
            env.emitted.push(DiamondEvent::CutQueued {
                id,
                kind: pending.key.kind,
                facet: pending.key.facet,
                selectors: pending.key.selectors.iter().copied().collect(),
                eligible_at: pending.eligible_at,
                at: env.now,
            });
        }
    }

    /// Route each cut by phase and action. Stops at the first failure with
    /// earlier cuts applied; callers stage when that matters.
    fn run_cuts(
        &mut self,
        env: &mut Env<'_>,
        caller: FacetAddress,
        cuts: &[FacetCut],
        init: Option<&InitCall>,
        init_at: Option<usize>,
    ) -> Result<CutOutcome, DiamondError> {
        let mut outcome = CutOutcome::default();
        for (i, cut) in cuts.iter().enumerate() {
            match (cut.action.phase(), cut.to_entry()) {
                (Phase::Queue, Some(entry)) => {
                    outcome.queued.extend(self.queue_cut(env, caller, &[entry])?);
                }
                (Phase::Queue, None) => {
                    outcome
                        .queued
                        .push(self.queue_revert(env, caller, cut.facet, &cut.selectors)?);
                }
                (Phase::Commit, Some(entry)) => {
                    let call = init.filter(|_| init_at == Some(i));
                    let receipt = self.commit_cut(env, caller, &[entry], call)?;
                    outcome.receipt.changes.extend(receipt.changes);
                    if receipt.initializer.is_some() {
                        outcome.receipt.initializer = receipt.initializer;
                    }
                }
                (Phase::Commit, None) => {
                    let receipt = self.commit_revert(env, caller, cut.facet, &cut.selectors)?;
                    outcome.receipt.changes.extend(receipt.changes);
                }
            }
        }
        Ok(outcome)
    }
}

/// The timelocked dispatch registry.
///
/// Owns the selector index, the timelock gate and the event log. A failed
/// call changes nothing, not even the event log: the gate and the engine
/// reject an operation before their first write, and a multi-cut
/// `diamond_cut` runs against a staged copy swapped in on success.
pub struct Diamond {
    state: RegistryState,
    events: Vec<DiamondEvent>,
    event_capacity: usize,
    engine: CutEngine,
    clock: Box<dyn Clock>,
    executor: Box<dyn InitExecutor>,
}

impl Diamond {
    /// Create an empty registry. Uses wall-clock time and a no-op initializer
    /// executor until replaced with [`with_clock`](Self::with_clock) and
    /// [`with_executor`](Self::with_executor).
    pub fn new(config: RegistryConfig) -> Result<Self, DiamondError> {
        config.validate()?;
        let gate = TimelockGate::new(config.governor, config.timelock)
            .with_revert_window(config.revert_window_secs)
            .with_history_limit(config.history_limit);
        info!(
            governor = %config.governor,
            timelock_enabled = config.timelock.enabled,
            delay_secs = config.timelock.delay_secs,
            revert_window_secs = config.revert_window_secs,
            "Diamond registry created"
        );
        Ok(Self {
            state: RegistryState {
                index: SelectorIndex::new(),
                gate,
            },
            events: Vec::new(),
            event_capacity: config.event_capacity,
            engine: CutEngine::new().with_init_selector(config.init_selector),
            clock: Box::new(SystemClock),
            executor: Box::new(NoopInitExecutor),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_executor(mut self, executor: impl InitExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Run one operation against the live state, then log its events.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut RegistryState, &mut Env<'_>) -> Result<T, DiamondError>,
    ) -> Result<T, DiamondError> {
        let mut env = Env {
            engine: &self.engine,
            executor: &*self.executor,
            now: self.clock.now(),
            emitted: Vec::new(),
        };
        let out = op(&mut self.state, &mut env)?;
        let emitted = env.emitted;
        self.record(emitted);
        Ok(out)
    }

    /// Append to the event log, dropping the oldest events past capacity.
    fn record(&mut self, emitted: Vec<DiamondEvent>) {
        self.events.extend(emitted);
        let excess = self.events.len().saturating_sub(self.event_capacity);
        if excess > 0 {
            self.events.drain(..excess);
        }
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Queue every entry of `batch`; each becomes committable after the delay.
    pub fn queue_cut(
        &mut self,
        caller: FacetAddress,
        batch: &[CutEntry],
    ) -> Result<Vec<QueueId>, DiamondError> {
        self.transact(|state, env| state.queue_cut(env, caller, batch))
    }

    /// Apply `batch` once every entry is queued and eligible, then run `init`.
    pub fn commit_cut(
        &mut self,
        caller: FacetAddress,
        batch: &[CutEntry],
        init: Option<&InitCall>,
    ) -> Result<CutReceipt, DiamondError> {
        self.transact(|state, env| state.commit_cut(env, caller, batch, init))
    }

    pub fn queue_revert(
        &mut self,
        caller: FacetAddress,
        facet: FacetAddress,
        selectors: &[Selector],
    ) -> Result<QueueId, DiamondError> {
        self.transact(|state, env| state.queue_revert(env, caller, facet, selectors))
    }

    pub fn commit_revert(
        &mut self,
        caller: FacetAddress,
        facet: FacetAddress,
        selectors: &[Selector],
    ) -> Result<CutReceipt, DiamondError> {
        self.transact(|state, env| state.commit_revert(env, caller, facet, selectors))
    }

    /// The single-entry-point form: each cut's action code picks the operation.
    ///
    /// Cuts run in order and the whole call is atomic. An initializer with a
    /// zero target and empty payload means "none"; otherwise it runs once,
    /// right after the last Add/Replace/Remove commit in the call, and a call
    /// with no such commit cannot carry one.
    pub fn diamond_cut(
        &mut self,
        caller: FacetAddress,
        cuts: &[FacetCut],
        init: Option<InitCall>,
    ) -> Result<CutOutcome, DiamondError> {
        let init = init.filter(|call| !(call.target.is_zero() && call.payload.is_empty()));
        self.transact(|state, env| {
            state.gate.authorize(caller)?;
            if cuts.is_empty() && init.is_none() {
                return Err(CutError::EmptyCut.into());
            }
            let init_at = cuts
                .iter()
                .rposition(|c| c.action.phase() == Phase::Commit && !c.action.is_revert());
            if init.is_some() && init_at.is_none() {
                return Err(DiamondError::OrphanInitializer);
            }
            if cuts.len() == 1 {
                return state.run_cuts(env, caller, cuts, init.as_ref(), init_at);
            }
            let mut staged = state.clone();
            let outcome = staged.run_cuts(env, caller, cuts, init.as_ref(), init_at)?;
            *state = staged;
            Ok(outcome)
        })
    }

    /// Change the timelock for cuts queued from now on. Returns the previous setting.
    pub fn set_timelock(
        &mut self,
        caller: FacetAddress,
        enabled: bool,
        delay_secs: u64,
    ) -> Result<TimelockConfig, DiamondError> {
        self.transact(|state, env| {
            let current = TimelockConfig::new(enabled, delay_secs);
            let previous = state.gate.set_timelock(caller, current)?;
            env.emitted.push(DiamondEvent::TimelockChanged {
                previous,
                current,
                at: env.now,
            });
            Ok(previous)
        })
    }

    /// Hand governance to `new_governor`. Returns the previous governor.
    pub fn transfer_governance(
        &mut self,
        caller: FacetAddress,
        new_governor: FacetAddress,
    ) -> Result<FacetAddress, DiamondError> {
        self.transact(|state, env| {
            let previous = state.gate.transfer_governance(caller, new_governor)?;
            env.emitted.push(DiamondEvent::GovernanceTransferred {
                previous,
                current: new_governor,
                at: env.now,
            });
            Ok(previous)
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn facet_of(&self, selector: &Selector) -> Option<FacetAddress> {
        self.state.index.lookup(selector)
    }

    pub fn selectors_of(&self, facet: &FacetAddress) -> Vec<Selector> {
        self.state.index.selectors_of(facet)
    }

    pub fn all_facets(&self) -> Vec<FacetAddress> {
        self.state.index.facets().to_vec()
    }

    pub fn all_selectors(&self) -> Vec<Selector> {
        self.state.index.all_selectors()
    }

    pub fn loupe(&self) -> Loupe<'_> {
        Loupe::new(&self.state.index)
    }

    pub fn index(&self) -> &SelectorIndex {
        &self.state.index
    }

    /// Every queue entry in any state, oldest first.
    pub fn pending_cuts(&self) -> impl Iterator<Item = &PendingCut> {
        self.state.gate.pending_cuts()
    }

    pub fn queued_cuts(&self) -> impl Iterator<Item = &PendingCut> {
        self.state.gate.queued()
    }

    pub fn pending(&self, id: QueueId) -> Option<&PendingCut> {
        self.state.gate.pending(id)
    }

    pub fn find_queued(&self, key: &CutKey) -> Option<&PendingCut> {
        self.state.gate.find_queued(key)
    }

    pub fn replace_record(&self, selector: &Selector) -> Option<&ReplaceRecord> {
        self.state.gate.replace_record(selector)
    }

    pub fn timelock(&self) -> TimelockConfig {
        self.state.gate.config()
    }

    pub fn revert_window_secs(&self) -> u64 {
        self.state.gate.revert_window_secs()
    }

    pub fn governor(&self) -> FacetAddress {
        self.state.gate.governor()
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> &[DiamondEvent] {
        &self.events
    }

    /// Current reading of the registry's clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }
}

impl fmt::Debug for Diamond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diamond")
            .field("governor", &self.governor())
            .field("timelock", &self.timelock())
            .field("facets", &self.state.index.facets().len())
            .field("selectors", &self.state.index.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}
