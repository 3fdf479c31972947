//! The B-tree core: a multi-key ordered set with top-down split, borrow and merge.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::comparator::{Comparator, Natural};
use crate::enumerable::Enumerable;
use crate::error::{Error, Result, corrupted};
use crate::raw::{Arena, Handle};

mod iter;
mod node;

pub use iter::Iter;
use node::{BNode, SearchResult};

/// Minimum degree used by [`BTree::default`].
#[cfg(test)]
pub const DEFAULT_DEGREE: usize = 2;
/// Minimum degree used by [`BTree::default`].
#[cfg(not(test))]
pub const DEFAULT_DEGREE: usize = 8;

/// An ordered set stored as a B-tree of minimum degree `t`.
///
/// Every node holds at most `2t − 1` keys and every node but the root at least `t − 1`.
/// Both insertion and removal run in a single top-down pass: full nodes are split before
/// the descent enters them, and minimal nodes are topped up (borrowing from a sibling or
/// merging with one) before the descent enters them, so no fix-up ever travels back up.
///
/// Unlike [`RbTree`](crate::RbTree), a `BTree` has set semantics: adding an item that
/// compares equal to a stored one is rejected.
///
/// # Examples
///
/// ```
/// use tree_query::BTree;
///
/// let mut tree = BTree::new(2)?;
/// for n in [10, 20, 30, 15] {
///     tree.add(n);
/// }
/// assert_eq!(tree.to_vec(), vec![10, 15, 20, 30]);
/// assert!(!tree.add(15));
/// assert!(tree.remove(&10));
/// assert_eq!(tree.len(), 3);
/// # Ok::<(), tree_query::Error>(())
/// ```
#[derive(Clone)]
pub struct BTree<T, C = Natural> {
    nodes: Arena<BNode<T>>,
    root: Option<Handle>,
    degree: usize,
    len: usize,
    comparator: C,
}

impl<T> BTree<T, Natural> {
    /// Makes a new, empty tree of minimum degree `degree` ordered by [`Ord`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `degree < 2`.
    pub fn new(degree: usize) -> Result<Self> {
        Self::with_comparator(degree, Natural)
    }
}

impl<T, C> BTree<T, C> {
    /// Makes a new, empty tree of minimum degree `degree` ordered by `comparator`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `degree < 2`.
    pub fn with_comparator(degree: usize, comparator: C) -> Result<Self> {
        if degree < 2 {
            return Err(Error::InvalidArgument(format!("B-tree degree must be at least 2, got {degree}")));
        }
        Ok(Self {
            nodes: Arena::new(),
            root: None,
            degree,
            len: 0,
            comparator,
        })
    }

    /// Returns the minimum degree `t`.
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the number of items in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no items.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels; 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            height += 1;
            let node = self.node(handle);
            current = if node.leaf { None } else { Some(self.child(handle, 0)) };
        }
        height
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the smallest item, or [`Error::NoElements`] when the tree is empty.
    pub fn first(&self) -> Result<&T> {
        let mut handle = self.root.ok_or(Error::NoElements)?;
        while !self.node(handle).leaf {
            handle = self.child(handle, 0);
        }
        self.node(handle).keys.first().ok_or(Error::NoElements)
    }

    /// Returns the largest item, or [`Error::NoElements`] when the tree is empty.
    pub fn last(&self) -> Result<&T> {
        let mut handle = self.root.ok_or(Error::NoElements)?;
        while !self.node(handle).leaf {
            handle = self.child(handle, self.node(handle).key_count());
        }
        self.node(handle).keys.last().ok_or(Error::NoElements)
    }

    /// Returns an ascending iterator over the items.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root, self.len)
    }

    /// Collects the items in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Wraps an in-order traversal as a lazy [`Enumerable`].
    pub fn enumerable(&self) -> Enumerable<'_, T>
    where
        T: Clone,
    {
        Enumerable::new(move || self.iter().cloned())
    }

    #[inline]
    fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    #[inline]
    fn node(&self, handle: Handle) -> &BNode<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut BNode<T> {
        self.nodes.get_mut(handle)
    }

    /// The `index`-th child of an internal node, which must exist.
    fn child(&self, handle: Handle, index: usize) -> Handle {
        match self.node(handle).children.get(index) {
            Some(&child) => child,
            None => corrupted("internal node is missing a child"),
        }
    }

    //--------- insertion ----------------

    /// Splits the full `index`-th child of `parent`, promoting its median into `parent`.
    fn split_child(&mut self, parent: Handle, index: usize) {
        let degree = self.degree;
        let child = self.child(parent, index);
        let (median, right) = self.node_mut(child).split(degree);
        let right = self.nodes.alloc(right);
        let parent = self.node_mut(parent);
        parent.keys.insert(index, median);
        parent.children.insert(index + 1, right);
    }

    //--------- removal ----------------

    /// Makes sure the `index`-th child of `parent` holds at least `degree` keys before the
    /// descent enters it. Returns the index of the child that now covers the same key
    /// range (a merge with the left sibling shifts it by one).
    fn ensure_spare(&mut self, parent: Handle, index: usize) -> usize {
        let degree = self.degree;
        if self.node(self.child(parent, index)).key_count() >= degree {
            return index;
        }
        let key_count = self.node(parent).key_count();
        if key_count == 0 {
            corrupted("internal node without keys");
        }
        if index > 0 && self.node(self.child(parent, index - 1)).key_count() >= degree {
            self.borrow_from_left(parent, index);
            index
        } else if index < key_count && self.node(self.child(parent, index + 1)).key_count() >= degree {
            self.borrow_from_right(parent, index);
            index
        } else if index < key_count {
            self.merge_children(parent, index);
            index
        } else {
            self.merge_children(parent, index - 1);
            index - 1
        }
    }

    //        parent: [.. s ..]                 parent: [.. l ..]
    //               /       \        ==>              /       \
    //     left: [.. l]    child: [..]       left: [..]    child: [s ..]
    fn borrow_from_left(&mut self, parent: Handle, index: usize) {
        let left = self.child(parent, index - 1);
        let child = self.child(parent, index);

        let left_node = self.node_mut(left);
        let Some(key) = left_node.keys.pop() else {
            corrupted("borrowing from an empty sibling")
        };
        let grandchild = if left_node.leaf {
            None
        } else {
            match left_node.children.pop() {
                Some(grandchild) => Some(grandchild),
                None => corrupted("internal sibling without children"),
            }
        };

        let separator = mem::replace(&mut self.node_mut(parent).keys[index - 1], key);
        let child_node = self.node_mut(child);
        child_node.keys.insert(0, separator);
        if let Some(grandchild) = grandchild {
            child_node.children.insert(0, grandchild);
        }
    }

    fn borrow_from_right(&mut self, parent: Handle, index: usize) {
        let right = self.child(parent, index + 1);
        let child = self.child(parent, index);

        let right_node = self.node_mut(right);
        if right_node.keys.is_empty() || (!right_node.leaf && right_node.children.is_empty()) {
            corrupted("borrowing from an empty sibling");
        }
        let key = right_node.keys.remove(0);
        let grandchild = if right_node.leaf {
            None
        } else {
            Some(right_node.children.remove(0))
        };

        let separator = mem::replace(&mut self.node_mut(parent).keys[index], key);
        let child_node = self.node_mut(child);
        child_node.keys.push(separator);
        if let Some(grandchild) = grandchild {
            child_node.children.push(grandchild);
        }
    }

    /// Merges the `index`-th and `index + 1`-th children of `parent` around their separator.
    fn merge_children(&mut self, parent: Handle, index: usize) {
        let left = self.child(parent, index);
        let right = self.child(parent, index + 1);
        let parent_node = self.node_mut(parent);
        let separator = parent_node.keys.remove(index);
        parent_node.children.remove(index + 1);
        let right_node = self.nodes.take(right);
        self.node_mut(left).merge_with_right(separator, right_node);
    }

    /// Removes the largest key of the subtree at `handle`, which must hold a spare key.
    fn pop_max(&mut self, mut handle: Handle) -> T {
        loop {
            let node = self.node(handle);
            if node.leaf {
                return match self.node_mut(handle).keys.pop() {
                    Some(key) => key,
                    None => corrupted("empty leaf below a spare node"),
                };
            }
            let last = node.key_count();
            let index = self.ensure_spare(handle, last);
            handle = self.child(handle, index);
        }
    }

    /// Removes the smallest key of the subtree at `handle`, which must hold a spare key.
    fn pop_min(&mut self, mut handle: Handle) -> T {
        loop {
            if self.node(handle).leaf {
                let node = self.node_mut(handle);
                if node.keys.is_empty() {
                    corrupted("empty leaf below a spare node");
                }
                return node.keys.remove(0);
            }
            let index = self.ensure_spare(handle, 0);
            handle = self.child(handle, index);
        }
    }

    /// Replaces an emptied root by its only child (or by nothing), shrinking the height.
    fn collapse_root(&mut self) {
        let Some(root) = self.root else { return };
        let node = self.node(root);
        if !node.keys.is_empty() {
            return;
        }
        self.root = if node.leaf { None } else { Some(self.child(root, 0)) };
        self.nodes.free(root);
    }
}

impl<T, C: Comparator<T>> BTree<T, C> {
    /// Builds a tree of minimum degree `degree` from `items`; equal duplicates are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `degree < 2`.
    pub fn from_items<I>(degree: usize, comparator: C, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_comparator(degree, comparator)?;
        for item in items {
            tree.add(item);
        }
        Ok(tree)
    }

    /// Adds `item`. Returns false, leaving the tree unchanged in content, when an equal
    /// item is already stored.
    ///
    /// # Complexity
    ///
    /// O(t · log_t n)
    pub fn add(&mut self, item: T) -> bool {
        let Some(mut current) = self.root else {
            let mut leaf = BNode::new_leaf(self.degree);
            leaf.keys.push(item);
            self.root = Some(self.nodes.alloc(leaf));
            self.len = 1;
            return true;
        };

        if self.node(current).key_count() == self.max_keys() {
            let mut new_root = BNode::new_internal(self.degree);
            new_root.children.push(current);
            current = self.nodes.alloc(new_root);
            self.root = Some(current);
            self.split_child(current, 0);
        }

        loop {
            let node = self.node(current);
            let mut index = match node.search(&item, &self.comparator) {
                SearchResult::Found(_) => return false,
                SearchResult::NotFound(index) => index,
            };
            if node.leaf {
                self.node_mut(current).keys.insert(index, item);
                self.len += 1;
                return true;
            }

            let child = self.child(current, index);
            if self.node(child).key_count() == self.max_keys() {
                self.split_child(current, index);
                match self.comparator.compare(&item, &self.node(current).keys[index]) {
                    Ordering::Less => {}
                    Ordering::Equal => return false,
                    Ordering::Greater => index += 1,
                }
            }
            current = self.child(current, index);
        }
    }

    /// Removes the item comparing equal to `item`. Returns false if there is none.
    pub fn remove(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }

    /// Removes and returns the item comparing equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(t · log_t n)
    pub fn take(&mut self, item: &T) -> Option<T> {
        let root = self.root?;
        let removed = self.remove_from(root, item);
        // Fills on the way down may have merged the root's last two children.
        self.collapse_root();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn remove_from(&mut self, mut current: Handle, item: &T) -> Option<T> {
        let degree = self.degree;
        loop {
            let node = self.node(current);
            match node.search(item, &self.comparator) {
                SearchResult::Found(index) if node.leaf => {
                    return Some(self.node_mut(current).keys.remove(index));
                }
                SearchResult::Found(index) => {
                    let left = self.child(current, index);
                    let right = self.child(current, index + 1);
                    if self.node(left).key_count() >= degree {
                        let predecessor = self.pop_max(left);
                        return Some(mem::replace(&mut self.node_mut(current).keys[index], predecessor));
                    }
                    if self.node(right).key_count() >= degree {
                        let successor = self.pop_min(right);
                        return Some(mem::replace(&mut self.node_mut(current).keys[index], successor));
                    }
                    // Both neighbours are minimal: fold the key down into a merged child.
                    self.merge_children(current, index);
                    current = left;
                }
                SearchResult::NotFound(_) if node.leaf => return None,
                SearchResult::NotFound(index) => {
                    let index = self.ensure_spare(current, index);
                    current = self.child(current, index);
                }
            }
        }
    }

    /// Returns the stored item comparing equal to `item`.
    pub fn search(&self, item: &T) -> Option<&T> {
        let mut current = self.root?;
        loop {
            let node = self.node(current);
            match node.search(item, &self.comparator) {
                SearchResult::Found(index) => return Some(&node.keys[index]),
                SearchResult::NotFound(_) if node.leaf => return None,
                SearchResult::NotFound(index) => current = self.child(current, index),
            }
        }
    }

    /// Returns true if an item comparing equal to `item` is stored.
    pub fn contains(&self, item: &T) -> bool {
        self.search(item).is_some()
    }

    /// Checks every B-tree invariant: key-count bounds, `keys + 1` children per internal
    /// node, strictly ascending keys, separator ranges, equal leaf depth and `len`.
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(Error::internal(format!("empty tree reports len {}", self.len)))
            };
        };
        let mut leaf_depth = None;
        let mut count = 0;
        self.validate_node(root, (None, None), 0, &mut leaf_depth, &mut count)?;
        if count != self.len {
            return Err(Error::internal(format!("len {} but {count} keys reachable", self.len)));
        }
        Ok(())
    }

    fn validate_node(
        &self,
        handle: Handle,
        bounds: (Option<&T>, Option<&T>),
        depth: usize,
        leaf_depth: &mut Option<usize>,
        count: &mut usize,
    ) -> Result<()> {
        let node = self.node(handle);
        let keys = node.key_count();
        let is_root = Some(handle) == self.root;
        if keys == 0 || keys > self.max_keys() || (!is_root && keys < self.degree - 1) {
            return Err(Error::internal(format!("node at depth {depth} holds {keys} keys")));
        }
        if !node.keys_ascending(&self.comparator) {
            return Err(Error::internal(format!("keys out of order at depth {depth}")));
        }
        let (low, high) = bounds;
        let below_low = low.is_some_and(|low| self.comparator.compare(&node.keys[0], low).is_le());
        let above_high = high.is_some_and(|high| self.comparator.compare(&node.keys[keys - 1], high).is_ge());
        if below_low || above_high {
            return Err(Error::internal(format!("keys escape their separators at depth {depth}")));
        }
        *count += keys;

        if node.leaf {
            if !node.children.is_empty() {
                return Err(Error::internal("leaf with children"));
            }
            return match *leaf_depth {
                None => {
                    *leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(Error::internal(format!("leaf at depth {depth}, expected {expected}"))),
            };
        }

        if node.children.len() != keys + 1 {
            return Err(Error::internal(format!(
                "internal node with {keys} keys has {} children",
                node.children.len()
            )));
        }
        for (index, &child) in node.children.iter().enumerate() {
            let low = if index == 0 { low } else { Some(&node.keys[index - 1]) };
            let high = if index == keys { high } else { Some(&node.keys[index]) };
            self.validate_node(child, (low, high), depth + 1, leaf_depth, count)?;
        }
        Ok(())
    }
}

impl<T> Default for BTree<T, Natural> {
    fn default() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            degree: DEFAULT_DEGREE,
            len: 0,
            comparator: Natural,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a BTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C: Comparator<T>> Extend<T> for BTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}
