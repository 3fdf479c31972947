//! A one-to-many index from keys to groups of elements.

use std::cmp::Ordering;
use std::fmt;

use crate::comparator::{Comparator, Natural};
use crate::enumerable::{Enumerable, Grouping};
use crate::rb_tree::{self, RbTree};

/// Orders groups by key alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupOrder<C>(pub C);

impl<K, T, C: Comparator<K>> Comparator<Grouping<K, T>> for GroupOrder<C> {
    #[inline]
    fn compare(&self, a: &Grouping<K, T>, b: &Grouping<K, T>) -> Ordering {
        self.0.compare(a.key(), b.key())
    }
}

/// Groups of elements keyed by `K`. Keys iterate in comparator order; the elements of a
/// group keep the order they were added in.
///
/// Usually built with [`Enumerable::to_lookup`].
///
/// ```
/// use tree_query::Enumerable;
///
/// let words = Enumerable::from_vec(vec!["bee", "ant", "bat", "ape", "cow"]);
/// let by_initial = words.to_lookup(|w| w.as_bytes()[0])?;
/// assert_eq!(by_initial.len(), 3);
/// assert_eq!(by_initial.elements(&b'a'), &["ant", "ape"]);
/// assert_eq!(by_initial.elements(&b'z'), &[] as &[&str]);
/// # Ok::<(), tree_query::Error>(())
/// ```
#[derive(Clone)]
pub struct Lookup<K, T, C = Natural> {
    groups: RbTree<Grouping<K, T>, GroupOrder<C>>,
}

impl<K, T> Lookup<K, T, Natural> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, T, C> Lookup<K, T, C> {
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            groups: RbTree::with_comparator(GroupOrder(comparator)),
        }
    }

    /// Number of distinct keys.
    pub const fn len(&self) -> usize {
        self.groups.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> rb_tree::Iter<'_, Grouping<K, T>> {
        self.groups.iter()
    }

    pub fn enumerable(&self) -> Enumerable<'_, Grouping<K, T>>
    where
        K: Clone,
        T: Clone,
    {
        self.groups.enumerable()
    }
}

impl<K, T, C: Comparator<K>> Lookup<K, T, C> {
    fn locator<'k>(&'k self, key: &'k K) -> impl Fn(&Grouping<K, T>) -> Ordering + 'k {
        let order = &self.groups.comparator().0;
        move |group: &Grouping<K, T>| order.compare(group.key(), key)
    }

    /// Appends `element` to the group for `key`, creating the group if needed.
    pub fn push(&mut self, key: K, element: T) {
        match self.groups.locate(self.locator(&key)) {
            Some(handle) => self.groups.item_mut(handle).push(element),
            None => self.groups.insert(Grouping::new(key, element)),
        }
    }

    pub fn get(&self, key: &K) -> Option<&Grouping<K, T>> {
        self.groups.search_by(self.locator(key))
    }

    /// The elements grouped under `key`; empty when the key is absent.
    pub fn elements(&self, key: &K) -> &[T] {
        match self.get(key) {
            Some(group) => group.elements(),
            None => &[],
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, T> Default for Lookup<K, T, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, T: fmt::Debug, C> fmt::Debug for Lookup<K, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|group| (group.key(), group.elements())))
            .finish()
    }
}

impl<K: Ord, T> FromIterator<(K, T)> for Lookup<K, T, Natural> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for (key, element) in iter {
            lookup.push(key, element);
        }
        lookup
    }
}

impl<'a, K, T, C> IntoIterator for &'a Lookup<K, T, C> {
    type Item = &'a Grouping<K, T>;
    type IntoIter = rb_tree::Iter<'a, Grouping<K, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
