use std::collections::{BTreeMap, BTreeSet};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tree_query::comparator::by_key;
use tree_query::{Error, Lookup, Natural, Reversed, SortedDictionary, SortedSet};

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Add(u8, u32),
    Insert(u8, u32),
    Update(u8, u32),
    Remove(u8),
    Get(u8),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        3 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| MapOp::Add(k, v)),
        2 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| MapOp::Update(k, v)),
        3 => any::<u8>().prop_map(MapOp::Remove),
        1 => any::<u8>().prop_map(MapOp::Get),
    ]
}

// ─── Model-based properties ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// `SortedDictionary` behaves like `BTreeMap`, except that `add` refuses duplicates
    /// and `update` refuses missing keys.
    #[test]
    fn dictionary_matches_btree_map(ops in proptest::collection::vec(map_op_strategy(), 0..600)) {
        let mut dictionary = SortedDictionary::new();
        let mut model = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Add(k, v) => {
                    let expected = if model.contains_key(&k) {
                        Err(Error::KeyAlreadyExists)
                    } else {
                        model.insert(k, v);
                        Ok(())
                    };
                    prop_assert_eq!(dictionary.add(k, v), expected);
                }
                MapOp::Insert(k, v) => prop_assert_eq!(dictionary.insert(k, v), model.insert(k, v)),
                MapOp::Update(k, v) => {
                    let expected = match model.get_mut(&k) {
                        Some(slot) => Ok(std::mem::replace(slot, v)),
                        None => Err(Error::KeyNotFound),
                    };
                    prop_assert_eq!(dictionary.update(&k, v), expected);
                }
                MapOp::Remove(k) => prop_assert_eq!(dictionary.remove(&k), model.remove(&k)),
                MapOp::Get(k) => prop_assert_eq!(dictionary.get(&k), model.get(&k)),
            }
            prop_assert_eq!(dictionary.len(), model.len());
        }

        let entries: Vec<(u8, u32)> = dictionary.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u8, u32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// `SortedSet` behaves like `BTreeSet`.
    #[test]
    fn set_matches_btree_set(adds in proptest::collection::vec(any::<i16>(), 0..300), removes in proptest::collection::vec(any::<i16>(), 0..300)) {
        let mut set = SortedSet::new();
        let mut model = BTreeSet::new();
        for v in adds {
            prop_assert_eq!(set.add(v), model.insert(v));
        }
        for v in removes {
            prop_assert_eq!(set.remove(&v), model.remove(&v));
        }
        prop_assert_eq!(set.into_iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }
}

// ─── SortedDictionary ───────────────────────────────────────────────────────

#[test]
fn dictionary_basics() {
    let mut dictionary = SortedDictionary::from_pairs([("b", 2), ("c", 3), ("a", 1)]).unwrap();
    assert_eq!(dictionary.len(), 3);
    assert_eq!(dictionary.first(), Ok((&"a", &1)));
    assert_eq!(dictionary.last(), Ok((&"c", &3)));
    assert_eq!(dictionary.add("a", 9), Err(Error::KeyAlreadyExists));
    assert_eq!(dictionary.get(&"a"), Some(&1));

    if let Some(value) = dictionary.get_mut(&"b") {
        *value *= 10;
    }
    assert_eq!(dictionary.update(&"z", 0), Err(Error::KeyNotFound));
    assert_eq!(dictionary.insert("d", 4), None);
    assert_eq!(dictionary.insert("d", 5), Some(4));
    assert_eq!(format!("{dictionary:?}"), r#"{"a": 1, "b": 20, "c": 3, "d": 5}"#);

    assert_eq!(dictionary.remove(&"a"), Some(1));
    assert!(!dictionary.contains_key(&"a"));
    assert_eq!(dictionary.values().rev().copied().collect::<Vec<_>>(), vec![5, 3, 20]);
}

#[test]
fn dictionary_from_duplicate_pairs() {
    assert_eq!(
        SortedDictionary::from_pairs([(1, 'x'), (1, 'y')]).map(|d| d.len()),
        Err(Error::KeyAlreadyExists)
    );
    let last_wins: SortedDictionary<i32, char> = [(1, 'x'), (1, 'y')].into_iter().collect();
    assert_eq!(last_wins.get(&1), Some(&'y'));
}

#[test]
fn dictionary_custom_comparator() {
    let mut dictionary = SortedDictionary::with_comparator(Reversed(Natural));
    dictionary.extend([(1, "one"), (3, "three"), (2, "two")]);
    assert_eq!(dictionary.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);

    let mut folded = SortedDictionary::with_comparator(by_key(|s: &String| s.to_lowercase()));
    folded.add("Key".to_string(), 1).unwrap();
    assert_eq!(folded.add("KEY".to_string(), 2), Err(Error::KeyAlreadyExists));
    assert_eq!(folded.get(&"key".to_string()), Some(&1));
}

#[test]
fn empty_dictionary() {
    let mut dictionary: SortedDictionary<u8, u8> = SortedDictionary::default();
    assert!(dictionary.is_empty());
    assert_eq!(dictionary.first(), Err(Error::NoElements));
    assert_eq!(dictionary.remove(&0), None);
    assert_eq!(dictionary.enumerable().count(), Ok(0));
    dictionary.add(1, 1).unwrap();
    dictionary.clear();
    assert_eq!(dictionary.iter().len(), 0);
}

// ─── SortedSet ──────────────────────────────────────────────────────────────

#[test]
fn set_queries() {
    let set: SortedSet<u32> = [5, 1, 4, 1, 5, 9, 2, 6].into_iter().collect();
    assert_eq!(set.len(), 6);
    assert_eq!(format!("{set:?}"), "{1, 2, 4, 5, 6, 9}");
    let odd_squares = set.enumerable().filter(|n| n % 2 == 1).select(|n| n * n).to_vec().unwrap();
    assert_eq!(odd_squares, vec![1, 25, 81]);
    assert_eq!(set.get(&4), Some(&4));
    assert!(!set.contains(&3));
}

// ─── Lookup ─────────────────────────────────────────────────────────────────

#[test]
fn lookup_groups() {
    let lookup: Lookup<bool, i32> = (1..=6).map(|n| (n % 3 == 0, n)).collect();
    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.elements(&true), &[3, 6]);
    assert_eq!(lookup.elements(&false), &[1, 2, 4, 5]);

    let sizes: Vec<(bool, usize)> = lookup.iter().map(|g| (*g.key(), g.len())).collect();
    assert_eq!(sizes, vec![(false, 4), (true, 2)]);

    let group = lookup.get(&true).unwrap();
    assert_eq!(group.enumerable().sum().unwrap(), 9);
    assert_eq!(group.iter().copied().collect::<Vec<_>>(), vec![3, 6]);
}

#[test]
fn missing_lookup_key_is_empty() {
    let lookup: Lookup<&str, u8> = Lookup::new();
    assert!(lookup.is_empty());
    assert!(lookup.get(&"x").is_none());
    assert!(lookup.elements(&"x").is_empty());
}
