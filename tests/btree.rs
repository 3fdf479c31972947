use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tree_query::{BTree, Error, Natural, Reversed};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 1_500;

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Add(u16),
    Remove(u16),
    Take(u16),
    Contains(u16),
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    let key = 0u16..400;
    prop_oneof![
        5 => key.clone().prop_map(SetOp::Add),
        3 => key.clone().prop_map(SetOp::Remove),
        1 => key.clone().prop_map(SetOp::Take),
        1 => key.prop_map(SetOp::Contains),
    ]
}

// ─── Invariants under random operations ─────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays random operations on a `BTree` and a `BTreeSet`, validating every B-tree
    /// invariant after each step.
    #[test]
    fn tree_matches_btree_set(
        degree in 2usize..7,
        ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        let mut model = BTreeSet::new();

        for op in &ops {
            match *op {
                SetOp::Add(k) => prop_assert_eq!(tree.add(k), model.insert(k), "add({})", k),
                SetOp::Remove(k) => prop_assert_eq!(tree.remove(&k), model.remove(&k), "remove({})", k),
                SetOp::Take(k) => prop_assert_eq!(tree.take(&k), model.take(&k), "take({})", k),
                SetOp::Contains(k) => prop_assert_eq!(tree.contains(&k), model.contains(&k)),
            }
            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert_eq!(tree.to_vec(), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(tree.first().ok(), model.first());
        prop_assert_eq!(tree.last().ok(), model.last());
    }

    /// Draining a tree in random order empties it cleanly at every degree.
    #[test]
    fn drain_to_empty(degree in 2usize..6, keys in proptest::collection::hash_set(any::<i32>(), 1..500)) {
        let mut tree = BTree::from_items(degree, Natural, keys.iter().copied()).unwrap();
        prop_assert_eq!(tree.len(), keys.len());
        for key in &keys {
            prop_assert!(tree.remove(key));
            prop_assert!(tree.validate().is_ok());
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 0);
    }
}

// ─── Deterministic scenarios ────────────────────────────────────────────────

#[test]
fn split_keeps_sorted_order() {
    let mut tree = BTree::new(2).unwrap();
    for n in [10, 20, 30, 15] {
        assert!(tree.add(n));
    }
    assert_eq!(tree.to_vec(), vec![10, 15, 20, 30]);
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn remove_from_small_tree() {
    let mut tree = BTree::new(2).unwrap();
    for n in [20, 10, 30] {
        tree.add(n);
    }
    assert!(tree.remove(&10));
    assert_eq!(tree.to_vec(), vec![20, 30]);
    assert_eq!(tree.len(), 2);
    assert!(!tree.remove(&10));
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn duplicates_are_rejected() {
    let mut tree = BTree::new(3).unwrap();
    assert!(tree.add("pear"));
    assert!(!tree.add("pear"));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.search(&"pear"), Some(&"pear"));
    assert_eq!(tree.search(&"plum"), None);
}

#[test]
fn degree_below_two_is_rejected() {
    assert!(matches!(BTree::<u8>::new(0), Err(Error::InvalidArgument(_))));
    assert!(matches!(BTree::<u8>::new(1), Err(Error::InvalidArgument(_))));
    assert!(BTree::<u8>::new(2).is_ok());
}

#[test]
fn empty_tree_edges() {
    let mut tree: BTree<i32> = BTree::default();
    assert_eq!(tree.first(), Err(Error::NoElements));
    assert_eq!(tree.last(), Err(Error::NoElements));
    assert!(!tree.remove(&3));
    assert_eq!(tree.take(&3), None);
    assert_eq!(tree.iter().next(), None);
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn large_ascending_build_and_teardown() {
    let mut tree = BTree::new(4).unwrap();
    tree.extend(0..5_000);
    assert_eq!(tree.len(), 5_000);
    assert_eq!(tree.validate(), Ok(()));
    assert!(tree.height() <= 7);
    for n in (0..5_000).step_by(2) {
        assert!(tree.remove(&n));
    }
    assert_eq!(tree.validate(), Ok(()));
    assert_eq!(tree.iter().copied().take(3).collect::<Vec<_>>(), vec![1, 3, 5]);
    assert_eq!(tree.iter().len(), 2_500);
}

#[test]
fn reversed_comparator() {
    let tree = BTree::from_items(2, Reversed(Natural), [3, 9, 1, 7, 5]).unwrap();
    assert_eq!(tree.to_vec(), vec![9, 7, 5, 3, 1]);
    assert_eq!(tree.first(), Ok(&9));
    assert_eq!(tree.last(), Ok(&1));
    assert_eq!(format!("{tree:?}"), "{9, 7, 5, 3, 1}");
}

#[test]
fn queries_over_a_btree() {
    let tree = BTree::from_items(2, Natural, 1..=10).unwrap();
    let evens = tree.enumerable().filter(|n| n % 2 == 0);
    assert_eq!(evens.to_vec().unwrap(), vec![2, 4, 6, 8, 10]);
    assert_eq!(evens.sum().unwrap(), 30);
    let mut tally = 0;
    for n in &tree {
        tally += n;
    }
    assert_eq!(tally, 55);
}
