//! Adversarial test: only the governor can mutate the registry.
//!
//! Every mutating entry point is tried with a stranger's address and with
//! a governor that has handed over control. None may change state.

use diamond_registry::{
    CutEntry, DiamondError, FacetAddress, FacetCut, FacetCutAction, InitCall, TimelockError,
};
use diamond_tests::{facet, family, Harness};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn intruder() -> FacetAddress {
    facet(0xbad)
}

fn unauthorized(caller: FacetAddress) -> DiamondError {
    DiamondError::Timelock(TimelockError::Unauthorized(caller))
}

/// A registry with one committed Replace, so reverts are possible.
fn prepared() -> Harness {
    let mut h = Harness::production();
    h.cut(&[CutEntry::add(facet(1), family(1, 3))]).unwrap();
    h.cut(&[CutEntry::replace(facet(2), family(1, 3))]).unwrap();
    h
}

fn attempt_everything(h: &mut Harness, caller: FacetAddress) {
    let batch = [CutEntry::add(facet(3), family(3, 2))];
    let selectors = family(1, 3);
    let d = &mut h.diamond;

    assert_eq!(d.queue_cut(caller, &batch).unwrap_err(), unauthorized(caller));
    assert_eq!(d.commit_cut(caller, &batch, None).unwrap_err(), unauthorized(caller));
    assert_eq!(
        d.queue_revert(caller, facet(1), &selectors).unwrap_err(),
        unauthorized(caller)
    );
    assert_eq!(
        d.commit_revert(caller, facet(1), &selectors).unwrap_err(),
        unauthorized(caller)
    );
    assert_eq!(
        d.diamond_cut(
            caller,
            &[FacetCut::new(facet(3), FacetCutAction::AddQueued, family(3, 2))],
            None
        )
        .unwrap_err(),
        unauthorized(caller)
    );
    assert_eq!(
        d.diamond_cut(caller, &[], Some(InitCall::new(facet(9), vec![1])))
            .unwrap_err(),
        unauthorized(caller)
    );
    assert_eq!(d.set_timelock(caller, false, 0).unwrap_err(), unauthorized(caller));
    assert_eq!(
        d.transfer_governance(caller, caller).unwrap_err(),
        unauthorized(caller)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn stranger_cannot_mutate() {
    let mut h = prepared();
    let facets = h.diamond.loupe().facets();
    let events = h.diamond.events().len();
    let pending = h.diamond.pending_cuts().count();

    attempt_everything(&mut h, intruder());

    assert_eq!(h.diamond.loupe().facets(), facets);
    assert_eq!(h.diamond.events().len(), events);
    assert_eq!(h.diamond.pending_cuts().count(), pending);
    assert!(h.diamond.timelock().enabled);
}

#[test]
fn zero_address_cannot_mutate() {
    let mut h = prepared();
    attempt_everything(&mut h, FacetAddress::ZERO);
}

#[test]
fn former_governor_loses_control() {
    let mut h = prepared();
    let old = h.governor;
    let successor = facet(0x5ecc);
    h.diamond.transfer_governance(old, successor).unwrap();
    attempt_everything(&mut h, old);

    h.governor = successor;
    h.cut(&[CutEntry::add(facet(3), family(3, 1))]).unwrap();
}

#[test]
fn governance_cannot_go_to_zero() {
    let mut h = prepared();
    assert_eq!(
        h.diamond
            .transfer_governance(h.governor, FacetAddress::ZERO)
            .unwrap_err(),
        DiamondError::Timelock(TimelockError::InvalidGovernor)
    );
}

#[test]
fn queue_by_governor_cannot_be_committed_by_stranger() {
    let mut h = Harness::production();
    let batch = [CutEntry::add(facet(1), family(1, 1))];
    h.queue(&batch).unwrap();
    h.wait_delay();
    assert_eq!(
        h.diamond.commit_cut(intruder(), &batch, None).unwrap_err(),
        unauthorized(intruder())
    );
    h.commit(&batch).unwrap();
}
