use std::cmp::Ordering;

use crate::comparator::Comparator;
use crate::raw::Handle;

/// A B-tree node. Internal nodes hold `keys.len() + 1` children; leaves hold none.
#[derive(Clone)]
pub(crate) struct BNode<T> {
    pub(crate) keys: Vec<T>,
    pub(crate) children: Vec<Handle>,
    pub(crate) leaf: bool,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is the child to descend into (or the insertion point in a leaf).
    NotFound(usize),
}

impl<T> BNode<T> {
    /// Creates a new empty leaf node.
    pub(crate) fn new_leaf(degree: usize) -> Self {
        Self {
            keys: Vec::with_capacity(2 * degree - 1),
            children: Vec::new(),
            leaf: true,
        }
    }

    /// Creates a new empty internal node.
    pub(crate) fn new_internal(degree: usize) -> Self {
        Self {
            keys: Vec::with_capacity(2 * degree - 1),
            children: Vec::with_capacity(2 * degree),
            leaf: false,
        }
    }

    /// Returns the number of occupied key slots.
    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn search<C>(&self, key: &T, comparator: &C) -> SearchResult
    where
        C: Comparator<T>,
    {
        match self.keys.binary_search_by(|k| comparator.compare(k, key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Splits a full node (`2·degree − 1` keys) around its median.
    /// Returns (`median`, `right`); `self` keeps the lower `degree − 1` keys.
    pub(crate) fn split(&mut self, degree: usize) -> (T, BNode<T>) {
        let mut right = if self.leaf {
            BNode::new_leaf(degree)
        } else {
            BNode::new_internal(degree)
        };
        right.keys.extend(self.keys.drain(degree..));
        if !self.leaf {
            right.children.extend(self.children.drain(degree..));
        }
        let median = match self.keys.pop() {
            Some(median) => median,
            None => crate::error::corrupted("split of an empty node"),
        };
        (median, right)
    }

    /// Absorbs the separator from the parent and every key and child of `right`.
    pub(crate) fn merge_with_right(&mut self, separator: T, mut right: BNode<T>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }

    /// True when every key of the node is strictly ascending under `comparator`.
    pub(crate) fn keys_ascending<C>(&self, comparator: &C) -> bool
    where
        C: Comparator<T>,
    {
        self.keys
            .windows(2)
            .all(|pair| comparator.compare(&pair[0], &pair[1]) == Ordering::Less)
    }
}
