//! A key-ordered map with unique keys, layered on [`RbTree`].

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::comparator::{Comparator, Natural};
use crate::enumerable::Enumerable;
use crate::error::{Error, Result};
use crate::rb_tree::RbTree;

/// Orders `(key, value)` entries by key alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyOrder<C>(pub C);

impl<K, V, C: Comparator<K>> Comparator<(K, V)> for KeyOrder<C> {
    #[inline]
    fn compare(&self, a: &(K, V), b: &(K, V)) -> Ordering {
        self.0.compare(&a.0, &b.0)
    }
}

/// A map from unique keys to values, iterated in key order.
///
/// # Examples
///
/// ```
/// use tree_query::{Error, SortedDictionary};
///
/// let mut stock = SortedDictionary::new();
/// stock.add("pears", 4)?;
/// stock.add("apples", 7)?;
/// assert_eq!(stock.add("pears", 1), Err(Error::KeyAlreadyExists));
///
/// stock.update(&"pears", 5)?;
/// assert_eq!(stock.get(&"pears"), Some(&5));
/// assert_eq!(stock.keys().copied().collect::<Vec<_>>(), vec!["apples", "pears"]);
///
/// let low: Vec<_> = stock.enumerable().filter(|(_, n)| *n < 6).select(|(k, _)| k).to_vec()?;
/// assert_eq!(low, vec!["pears"]);
/// # Ok::<(), tree_query::Error>(())
/// ```
#[derive(Clone)]
pub struct SortedDictionary<K, V, C = Natural> {
    tree: RbTree<(K, V), KeyOrder<C>>,
}

impl<K, V> SortedDictionary<K, V, Natural> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Builds a dictionary from `pairs`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyAlreadyExists`] if two pairs share a key.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        K: Ord,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut dictionary = Self::new();
        for (key, value) in pairs {
            dictionary.add(key, value)?;
        }
        Ok(dictionary)
    }
}

impl<K, V, C> SortedDictionary<K, V, C> {
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            tree: RbTree::with_comparator(KeyOrder(comparator)),
        }
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// The entry with the smallest key, or [`Error::NoElements`].
    pub fn first(&self) -> Result<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    /// The entry with the largest key, or [`Error::NoElements`].
    pub fn last(&self) -> Result<(&K, &V)> {
        self.tree.last().map(|(k, v)| (k, v))
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(_, v)| v)
    }

    /// The entries as a lazy sequence of owned pairs.
    pub fn enumerable(&self) -> Enumerable<'_, (K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.tree.enumerable()
    }
}

impl<K, V, C: Comparator<K>> SortedDictionary<K, V, C> {
    fn locator<'k>(&'k self, key: &'k K) -> impl Fn(&(K, V)) -> Ordering + 'k {
        let order = &self.tree.comparator().0;
        move |(stored, _): &(K, V)| order.compare(stored, key)
    }

    /// Adds a new entry.
    ///
    /// # Errors
    ///
    /// [`Error::KeyAlreadyExists`] if `key` is present; the dictionary is unchanged.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.contains_key(&key) {
            return Err(Error::KeyAlreadyExists);
        }
        self.tree.insert((key, value));
        Ok(())
    }

    /// Adds or replaces the entry for `key`, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(mem::replace(slot, value));
        }
        self.tree.insert((key, value));
        None
    }

    /// Replaces the value of an existing entry, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` is absent.
    pub fn update(&mut self, key: &K, value: V) -> Result<V> {
        let slot = self.get_mut(key).ok_or(Error::KeyNotFound)?;
        Ok(mem::replace(slot, value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.search_by(self.locator(key)).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.tree.locate(self.locator(key))?;
        Some(&mut self.tree.item_mut(handle).1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let handle = self.tree.locate(self.locator(key))?;
        Some(self.tree.remove_at(handle).1)
    }
}

impl<K, V> Default for SortedDictionary<K, V, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SortedDictionary<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Later pairs replace earlier ones with the same key.
impl<K: Ord, V> FromIterator<(K, V)> for SortedDictionary<K, V, Natural> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        dictionary.extend(iter);
        dictionary
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for SortedDictionary<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for SortedDictionary<K, V, C> {
    type Item = (K, V);
    type IntoIter = crate::rb_tree::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Reversed;

    #[test]
    fn keys_are_unique_and_ordered() {
        let mut dictionary = SortedDictionary::new();
        dictionary.add(3, "c").unwrap();
        dictionary.add(1, "a").unwrap();
        assert_eq!(dictionary.add(3, "x"), Err(Error::KeyAlreadyExists));
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.get(&3), Some(&"c"));
        assert_eq!(dictionary.first(), Ok((&1, &"a")));
        assert_eq!(dictionary.last(), Ok((&3, &"c")));
    }

    #[test]
    fn insert_update_remove() {
        let mut dictionary = SortedDictionary::new();
        assert_eq!(dictionary.insert("k", 1), None);
        assert_eq!(dictionary.insert("k", 2), Some(1));
        assert_eq!(dictionary.update(&"k", 3), Ok(2));
        assert_eq!(dictionary.update(&"missing", 0), Err(Error::KeyNotFound));
        if let Some(value) = dictionary.get_mut(&"k") {
            *value += 10;
        }
        assert_eq!(dictionary.get(&"k"), Some(&13));
        assert_eq!(dictionary.remove(&"k"), Some(13));
        assert_eq!(dictionary.remove(&"k"), None);
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.first(), Err(Error::NoElements));
    }

    #[test]
    fn custom_order() {
        let mut dictionary = SortedDictionary::with_comparator(Reversed(Natural));
        dictionary.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
        assert_eq!(dictionary.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(dictionary.values().rev().copied().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        assert!(dictionary.contains_key(&2));
    }

    #[test]
    fn from_pairs_rejects_duplicates() {
        assert_eq!(
            SortedDictionary::from_pairs([(1, 'a'), (1, 'b')]).map(|d| d.len()),
            Err(Error::KeyAlreadyExists)
        );
        let dictionary: SortedDictionary<_, _> = [(2, 'b'), (2, 'z')].into_iter().collect();
        assert_eq!(dictionary.get(&2), Some(&'z'));
        assert_eq!(format!("{dictionary:?}"), "{2: 'z'}");
    }
}
