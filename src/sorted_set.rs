//! An ordered set layered on [`RbTree`].

use std::fmt;

use crate::comparator::{Comparator, Natural};
use crate::enumerable::Enumerable;
use crate::error::Result;
use crate::rb_tree::{self, RbTree};

/// A set of unique items iterated in comparator order.
///
/// ```
/// use tree_query::SortedSet;
///
/// let mut tags: SortedSet<&str> = ["rust", "tree", "query"].into_iter().collect();
/// assert!(!tags.add("tree"));
/// assert!(tags.remove(&"query"));
/// assert_eq!(tags.iter().copied().collect::<Vec<_>>(), vec!["rust", "tree"]);
/// ```
#[derive(Clone)]
pub struct SortedSet<T, C = Natural> {
    tree: RbTree<T, C>,
}

impl<T> SortedSet<T, Natural> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> SortedSet<T, C> {
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            tree: RbTree::with_comparator(comparator),
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

    /// The smallest item, or [`Error::NoElements`](crate::Error::NoElements).
    pub fn first(&self) -> Result<&T> {
        self.tree.first()
    }

    /// The largest item, or [`Error::NoElements`](crate::Error::NoElements).
    pub fn last(&self) -> Result<&T> {
        self.tree.last()
    }

    pub fn iter(&self) -> rb_tree::Iter<'_, T> {
        self.tree.iter()
    }

    pub fn enumerable(&self) -> Enumerable<'_, T>
    where
        T: Clone,
    {
        self.tree.enumerable()
    }
}

impl<T, C: Comparator<T>> SortedSet<T, C> {
    /// Adds `item`; returns false, leaving the set unchanged, if an equal item exists.
    pub fn add(&mut self, item: T) -> bool {
        if self.tree.contains(&item) {
            return false;
        }
        self.tree.insert(item);
        true
    }

    pub fn remove(&mut self, item: &T) -> bool {
        self.tree.remove(item).is_some()
    }

    /// Removes and returns the stored item equal to `item`.
    pub fn take(&mut self, item: &T) -> Option<T> {
        self.tree.remove(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.tree.contains(item)
    }

    /// The stored item equal to `item`.
    pub fn get(&self, item: &T) -> Option<&T> {
        self.tree.search(item)
    }
}

impl<T> Default for SortedSet<T, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for SortedSet<T, Natural> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for SortedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a SortedSet<T, C> {
    type Item = &'a T;
    type IntoIter = rb_tree::Iter<'a, T>;

    fn into_iter(self) -> rb_tree::Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for SortedSet<T, C> {
    type Item = T;
    type IntoIter = rb_tree::IntoIter<T>;

    fn into_iter(self) -> rb_tree::IntoIter<T> {
        self.tree.into_iter()
    }
}
