//! Property tests: any sequence of index operations agrees with a plain
//! map model and keeps the packed slot layout intact.

use std::collections::{BTreeMap, BTreeSet};

use diamond_index::{IndexError, SelectorIndex};
use diamond_types::{FacetAddress, Selector, SLOT_CAPACITY};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    Assign(u32, u64),
    Reassign(u32, u64),
    Unassign(u32),
}

/// Small key spaces so operations collide often.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u32..40, 1u64..5).prop_map(|(s, f)| Op::Assign(s, f)),
        1 => (0u32..40, 1u64..5).prop_map(|(s, f)| Op::Reassign(s, f)),
        2 => (0u32..40).prop_map(Op::Unassign),
    ]
}

fn facet(n: u64) -> FacetAddress {
    FacetAddress::from_low_u64(n)
}

fn check_against_model(index: &SelectorIndex, model: &BTreeMap<Selector, FacetAddress>) {
    index.verify_integrity().unwrap();
    assert_eq!(index.len(), model.len());

    let mut by_facet: BTreeMap<FacetAddress, BTreeSet<Selector>> = BTreeMap::new();
    for (s, f) in model {
        assert_eq!(index.lookup(s), Some(*f));
        by_facet.entry(*f).or_default().insert(*s);
    }

    let listed: BTreeSet<_> = index.facets().iter().copied().collect();
    assert_eq!(listed, by_facet.keys().copied().collect());

    for (f, expected) in &by_facet {
        let actual: BTreeSet<_> = index.selectors_of(f).into_iter().collect();
        assert_eq!(&actual, expected);
        assert_eq!(index.slot_count(f), expected.len().div_ceil(SLOT_CAPACITY));
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Successful operations match the model; failed ones change nothing.
    #[test]
    fn index_agrees_with_model(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let mut index = SelectorIndex::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Assign(s, f) => {
                    let (s, f) = (Selector::from(s), facet(f));
                    match index.assign(s, f) {
                        Ok(()) => {
                            prop_assert!(model.insert(s, f).is_none());
                        }
                        Err(IndexError::AlreadyAssigned { .. }) => {
                            prop_assert!(model.contains_key(&s));
                        }
                        Err(e) => prop_assert!(false, "unexpected {e}"),
                    }
                }
                Op::Reassign(s, f) => {
                    let (s, f) = (Selector::from(s), facet(f));
                    match index.reassign(s, f) {
                        Ok(previous) => {
                            prop_assert_eq!(model.insert(s, f), Some(previous));
                        }
                        Err(IndexError::NotAssigned(_)) => prop_assert!(!model.contains_key(&s)),
                        Err(IndexError::SameFacet { .. }) => prop_assert_eq!(model.get(&s), Some(&f)),
                        Err(e) => prop_assert!(false, "unexpected {e}"),
                    }
                }
                Op::Unassign(s) => {
                    let s = Selector::from(s);
                    match index.unassign(s) {
                        Ok(previous) => prop_assert_eq!(model.remove(&s), Some(previous)),
                        Err(IndexError::NotAssigned(_)) => prop_assert!(!model.contains_key(&s)),
                        Err(e) => prop_assert!(false, "unexpected {e}"),
                    }
                }
            }
            check_against_model(&index, &model);
        }
    }

    /// Removing any subset from one facet leaves exactly the complement.
    #[test]
    fn removal_leaves_complement(
        n in 1u32..40,
        mask in proptest::collection::vec(any::<bool>(), 40),
    ) {
        let f = facet(1);
        let mut index = SelectorIndex::new();
        for i in 0..n {
            index.assign(Selector::from(i), f).unwrap();
        }

        let mut kept = BTreeSet::new();
        for i in 0..n {
            if mask[i as usize] {
                index.unassign(Selector::from(i)).unwrap();
            } else {
                kept.insert(Selector::from(i));
            }
        }

        let remaining: BTreeSet<_> = index.selectors_of(&f).into_iter().collect();
        prop_assert_eq!(&remaining, &kept);
        prop_assert_eq!(index.slot_count(&f), kept.len().div_ceil(SLOT_CAPACITY));
        prop_assert_eq!(index.facets().is_empty(), kept.is_empty());
        index.verify_integrity().unwrap();
    }
}
