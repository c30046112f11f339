//! Adversarial test: malformed cuts are refused before they reach the queue.

use diamond_registry::{
    CutEntry, CutError, CutKind, DiamondError, FacetAddress, FacetCut, FacetCutAction, InitCall,
    Selector, INIT_SELECTOR,
};
use diamond_tests::{facet, family, Harness};

fn cut_error(err: DiamondError) -> CutError {
    err.as_cut_error()
        .cloned()
        .unwrap_or_else(|| panic!("expected a cut error, got {err}"))
}

#[test]
fn malformed_entries_never_queue() {
    let mut h = Harness::production();
    let mut remove_with_facet = CutEntry::remove(family(1, 1));
    remove_with_facet.facet = facet(1);

    let cases = [
        (
            CutEntry::add(FacetAddress::ZERO, family(1, 1)),
            CutError::ZeroFacet(CutKind::Add),
        ),
        (
            CutEntry::replace(FacetAddress::ZERO, family(1, 1)),
            CutError::ZeroFacet(CutKind::Replace),
        ),
        (remove_with_facet, CutError::RemoveFacetNotZero(facet(1))),
        (
            CutEntry::add(facet(1), Vec::<Selector>::new()),
            CutError::EmptySelectorList {
                kind: CutKind::Add,
                facet: facet(1),
            },
        ),
        (
            CutEntry::add(facet(1), vec![INIT_SELECTOR]),
            CutError::InitSelectorRejected(INIT_SELECTOR),
        ),
    ];
    for (entry, expected) in cases {
        assert_eq!(cut_error(h.queue(&[entry]).unwrap_err()), expected);
    }
    assert_eq!(h.diamond.pending_cuts().count(), 0);
}

#[test]
fn empty_batches_are_refused() {
    let mut h = Harness::production();
    assert_eq!(cut_error(h.queue(&[]).unwrap_err()), CutError::EmptyCut);
    assert_eq!(cut_error(h.commit(&[]).unwrap_err()), CutError::EmptyCut);
    assert_eq!(
        cut_error(h.diamond_cut(&[], None).unwrap_err()),
        CutError::EmptyCut
    );
}

#[test]
fn initializer_cannot_ride_without_a_commit() {
    let mut h = Harness::production();
    assert_eq!(
        h.diamond_cut(&[], Some(InitCall::new(facet(9), vec![1]))).unwrap_err(),
        DiamondError::OrphanInitializer
    );
    assert_eq!(
        h.diamond
            .commit_cut(h.governor, &[], Some(&InitCall::new(facet(9), vec![1])))
            .unwrap_err(),
        DiamondError::from(CutError::EmptyCut)
    );
}

#[test]
fn zero_initializer_with_payload_is_invalid() {
    let mut h = Harness::production();
    let batch = [CutEntry::add(facet(1), family(1, 1))];
    h.queue(&batch).unwrap();
    h.wait_delay();
    let err = h
        .diamond_cut(
            &[FacetCut::new(facet(1), FacetCutAction::Add, family(1, 1))],
            Some(InitCall::new(FacetAddress::ZERO, vec![0xe1])),
        )
        .unwrap_err();
    assert!(matches!(cut_error(err), CutError::InvalidInitializer(_)));
    assert!(h.diamond.all_selectors().is_empty());
}

#[test]
fn reverting_unreplaced_selectors_is_refused() {
    let mut h = Harness::production();
    h.cut(&[CutEntry::add(facet(1), family(1, 1))]).unwrap();
    assert!(matches!(
        h.diamond.queue_revert(h.governor, facet(1), &[]),
        Err(err) if matches!(err.as_cut_error(), Some(CutError::EmptySelectorList { .. }))
    ));
}
