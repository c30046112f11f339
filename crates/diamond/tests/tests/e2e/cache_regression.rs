//! E2E test: removing entries from a facet's final slot keeps every other
//! selector reachable.
//!
//! Eleven selectors fill one slot and spill three into a second one. A
//! single Remove entry then takes out a selector of another facet, one from
//! the middle of the first slot and the very last one.

use diamond_registry::{FacetAddress, FacetCut, FacetCutAction, Selector};
use diamond_tests::{base, facet, hex_sel, sel, BaseFacets, Harness};

const SELECTORS: [&str; 11] = [
    "0x19e3b533",
    "0x0716c2ae",
    "0x11046047",
    "0xcf3bbe18",
    "0x24c1d5a7",
    "0xcbb835f6",
    "0xcbb835f7",
    "0xcbb835f8",
    "0xcbb835f9",
    "0xcbb835fa",
    "0xcbb835fb",
];

fn selectors() -> Vec<Selector> {
    SELECTORS.iter().map(|s| hex_sel(s)).collect()
}

fn fixture() -> (Harness, FacetAddress) {
    let mut h = Harness::development();
    h.deploy_base().unwrap();
    let test1 = facet(0x7e51);

    h.diamond_cut(
        &[FacetCut::new(test1, FacetCutAction::AddQueued, selectors())],
        None,
    )
    .unwrap();
    h.diamond_cut(&[FacetCut::new(test1, FacetCutAction::Add, selectors())], None)
        .unwrap();
    assert_eq!(h.diamond.index().slot_count(&test1), 2);

    let s = selectors();
    let removed = vec![sel(base::OWNER), s[5], s[10]];
    h.diamond_cut(
        &[FacetCut::new(
            FacetAddress::ZERO,
            FacetCutAction::RemoveQueued,
            removed.clone(),
        )],
        None,
    )
    .unwrap();
    h.diamond_cut(
        &[FacetCut::new(
            FacetAddress::ZERO,
            FacetCutAction::Remove,
            removed,
        )],
        None,
    )
    .unwrap();
    (h, test1)
}

#[test]
fn remaining_selectors_are_exactly_the_survivors() {
    let (h, test1) = fixture();
    let s = selectors();
    let mut remaining = h.diamond.loupe().facet_function_selectors(&test1);
    remaining.sort();

    let mut expected: Vec<_> = s
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 5 && *i != 10)
        .map(|(_, s)| *s)
        .collect();
    expected.sort();
    assert_eq!(remaining, expected);
}

#[test]
fn removed_selectors_are_gone_everywhere() {
    let (h, test1) = fixture();
    let s = selectors();
    for gone in [sel(base::OWNER), s[5], s[10]] {
        assert_eq!(h.diamond.facet_of(&gone), None);
        assert!(!h.diamond.all_selectors().contains(&gone));
    }
    assert!(!h.diamond.selectors_of(&test1).contains(&sel(base::OWNER)));
}

#[test]
fn survivors_still_resolve_and_slots_shrink() {
    let (h, test1) = fixture();
    for (i, s) in selectors().into_iter().enumerate() {
        if i != 5 && i != 10 {
            assert_eq!(h.diamond.facet_of(&s), Some(test1), "selector #{i}");
        }
    }
    // 9 selectors need two slots.
    assert_eq!(h.diamond.index().slot_count(&test1), 2);
    h.diamond.index().verify_integrity().unwrap();
}

#[test]
fn ownership_facet_keeps_its_other_selector() {
    let (h, _) = fixture();
    let base_facets = BaseFacets::default();
    assert_eq!(
        h.diamond.selectors_of(&base_facets.ownership),
        vec![sel(base::TRANSFER_OWNERSHIP)]
    );
}
