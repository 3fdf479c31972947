//! Eager conversions. Each drives the pipeline exactly once.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::Enumerable;
use crate::btree::BTree;
use crate::comparator::{Comparator, Natural};
use crate::error::{Error, Result};
use crate::lookup::Lookup;
use crate::sorted_dictionary::SortedDictionary;
use crate::sorted_set::SortedSet;

impl<'a, T: 'a> Enumerable<'a, T> {
    pub fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.iter()?.collect())
    }

    pub fn to_hash_set(&self) -> Result<HashSet<T>>
    where
        T: Hash + Eq,
    {
        Ok(self.iter()?.collect())
    }

    /// Builds a map from `key(element)` to `value(element)`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyAlreadyExists`] if two elements produce the same key.
    pub fn to_hash_map<K, V, FK, FV>(&self, mut key: FK, mut value: FV) -> Result<HashMap<K, V>>
    where
        K: Hash + Eq,
        FK: FnMut(&T) -> K,
        FV: FnMut(T) -> V,
    {
        let mut map = HashMap::new();
        for item in self.iter()? {
            let k = key(&item);
            if map.contains_key(&k) {
                return Err(Error::KeyAlreadyExists);
            }
            map.insert(k, value(item));
        }
        Ok(map)
    }

    /// # Errors
    ///
    /// [`Error::KeyAlreadyExists`] if two elements produce the same key.
    pub fn to_sorted_dictionary<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<SortedDictionary<K, V>>
    where
        K: Ord,
        FK: FnMut(&T) -> K,
        FV: FnMut(T) -> V,
    {
        self.to_sorted_dictionary_with(key, value, Natural)
    }

    pub fn to_sorted_dictionary_with<K, V, C, FK, FV>(
        &self,
        mut key: FK,
        mut value: FV,
        comparator: C,
    ) -> Result<SortedDictionary<K, V, C>>
    where
        C: Comparator<K>,
        FK: FnMut(&T) -> K,
        FV: FnMut(T) -> V,
    {
        let mut dictionary = SortedDictionary::with_comparator(comparator);
        for item in self.iter()? {
            let k = key(&item);
            dictionary.add(k, value(item))?;
        }
        Ok(dictionary)
    }

    /// Collects the distinct elements into a [`SortedSet`]; later duplicates are dropped.
    pub fn to_sorted_set(&self) -> Result<SortedSet<T>>
    where
        T: Ord,
    {
        self.to_sorted_set_with(Natural)
    }

    pub fn to_sorted_set_with<C>(&self, comparator: C) -> Result<SortedSet<T, C>>
    where
        C: Comparator<T>,
    {
        let mut set = SortedSet::with_comparator(comparator);
        set.extend(self.iter()?);
        Ok(set)
    }

    /// Groups the elements by `key` into a [`Lookup`].
    pub fn to_lookup<K, F>(&self, key: F) -> Result<Lookup<K, T>>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.to_lookup_with(key, Natural)
    }

    pub fn to_lookup_with<K, C, F>(&self, mut key: F, comparator: C) -> Result<Lookup<K, T, C>>
    where
        C: Comparator<K>,
        F: FnMut(&T) -> K,
    {
        let mut lookup = Lookup::with_comparator(comparator);
        for item in self.iter()? {
            lookup.push(key(&item), item);
        }
        Ok(lookup)
    }

    /// Collects the distinct elements into a [`BTree`] of minimum degree `degree`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `degree < 2`.
    pub fn to_btree(&self, degree: usize) -> Result<BTree<T>>
    where
        T: Ord,
    {
        BTree::from_items(degree, Natural, self.iter()?)
    }
}

#[cfg(test)]
mod tests {
    use crate::comparator::Reversed;
    use crate::{Enumerable, Error, Natural};

    #[test]
    fn hash_collections() {
        let words = Enumerable::from_vec(vec!["one", "two", "three"]);
        let lengths = words.to_hash_map(|w| *w, |w| w.len()).unwrap();
        assert_eq!(lengths["three"], 5);
        assert_eq!(words.to_hash_map(|w| w.len(), |w| w), Err(Error::KeyAlreadyExists));
        assert_eq!(words.select(|w| w.len()).to_hash_set().unwrap().len(), 2);
    }

    #[test]
    fn sorted_containers() {
        let numbers = Enumerable::from_vec(vec![4, 1, 4, 3]);
        let set = numbers.to_sorted_set().unwrap();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
        let reversed = numbers.to_sorted_set_with(Reversed(Natural)).unwrap();
        assert_eq!(reversed.first(), Ok(&4));

        assert_eq!(numbers.to_sorted_dictionary(|n| *n, |n| n * 2).map(|d| d.len()), Err(Error::KeyAlreadyExists));
        let squares = numbers.distinct().to_sorted_dictionary(|n| *n, |n| n * n).unwrap();
        assert_eq!(squares.values().copied().collect::<Vec<_>>(), vec![1, 9, 16]);
        let descending = numbers
            .distinct()
            .to_sorted_dictionary_with(|n| *n, |n| n, Reversed(Natural))
            .unwrap();
        assert_eq!(descending.keys().copied().collect::<Vec<_>>(), vec![4, 3, 1]);
    }

    #[test]
    fn lookups() {
        let numbers = Enumerable::from_vec(vec![10, 3, 7, 4]);
        let parity = numbers.to_lookup(|n| n % 2).unwrap();
        assert_eq!(parity.elements(&0), &[10, 4]);
        assert_eq!(parity.elements(&1), &[3, 7]);
        let reversed = numbers.to_lookup_with(|n| n % 2, Reversed(Natural)).unwrap();
        assert_eq!(reversed.iter().map(|g| *g.key()).collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn btree_conversion() {
        let tree = Enumerable::from_vec(vec![5, 2, 5, 9]).to_btree(2).unwrap();
        assert_eq!(tree.to_vec(), vec![2, 5, 9]);
        assert!(Enumerable::from_vec(vec![1]).to_btree(1).is_err());
    }
}
