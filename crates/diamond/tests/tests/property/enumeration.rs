//! Property tests: the loupe enumerates every binding exactly once.

use std::collections::BTreeSet;

use diamond_registry::{CutEntry, FacetAddress, Selector};
use diamond_tests::{facet, Harness};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Up to five facets, each with a disjoint run of selectors.
fn arb_layout() -> impl Strategy<Value = Vec<(FacetAddress, Vec<Selector>)>> {
    proptest::collection::vec(1usize..30, 1..=5).prop_map(|sizes| {
        let mut next = 0u32;
        sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| {
                let selectors = (0..size)
                    .map(|_| {
                        next += 1;
                        Selector::from(0x4000_0000 | next)
                    })
                    .collect();
                (facet(i as u64 + 1), selectors)
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn loupe_views_are_complete_and_disjoint(
        layout in arb_layout(),
        removals in proptest::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut h = Harness::development();
        let batch: Vec<_> = layout
            .iter()
            .map(|(f, s)| CutEntry::add(*f, s.clone()))
            .collect();
        h.cut(&batch).unwrap();

        let all: Vec<_> = layout.iter().flat_map(|(_, s)| s.iter().copied()).collect();
        let doomed: BTreeSet<_> = removals.iter().map(|i| *i.get(&all)).collect();
        if !doomed.is_empty() {
            h.cut(&[CutEntry::remove(doomed.iter().copied().collect::<Vec<_>>())]).unwrap();
        }

        let loupe = h.diamond.loupe();
        let views = loupe.facets();
        let mut seen = BTreeSet::new();
        for view in &views {
            prop_assert!(!view.selectors.is_empty());
            for s in &view.selectors {
                prop_assert!(seen.insert(*s), "selector {} listed twice", s);
                prop_assert_eq!(loupe.facet_address(s), Some(view.facet));
            }
        }

        let expected: BTreeSet<_> = all.iter().copied().filter(|s| !doomed.contains(s)).collect();
        prop_assert_eq!(&seen, &expected);
        let listed: BTreeSet<_> = loupe.all_selectors().into_iter().collect();
        prop_assert_eq!(&listed, &expected);
        prop_assert_eq!(
            loupe.facet_addresses(),
            views.iter().map(|v| v.facet).collect::<Vec<_>>()
        );
    }
}
