//! The ordered tree core: an arena-allocated red-black tree.

use std::cmp::Ordering;
use std::fmt;

use crate::comparator::{Comparator, Natural};
use crate::enumerable::Enumerable;
use crate::error::{Error, Result, corrupted};
use crate::raw::{Arena, Handle};

mod iter;
mod node;

pub use iter::{IntoIter, Iter};
pub use node::Color;
use node::{RbNode, Side, extreme, neighbour};

/// A red-black binary search tree ordered by a [`Comparator`].
///
/// The tree is a multiset: [`insert`](RbTree::insert) always adds the item, and items
/// comparing equal are kept in insertion order. Containers that need uniqueness
/// ([`SortedSet`](crate::SortedSet), [`SortedDictionary`](crate::SortedDictionary)) check
/// for an equal item before inserting.
///
/// Nodes live in an arena and refer to their parent by handle, so rotations and
/// in-order walks need neither raw pointers nor reference counting.
///
/// # Examples
///
/// ```
/// use tree_query::RbTree;
///
/// let mut tree = RbTree::new();
/// for n in [5, 1, 4, 1, 3] {
///     tree.insert(n);
/// }
/// assert_eq!(tree.to_vec(), vec![1, 1, 3, 4, 5]);
/// assert_eq!(tree.remove(&1), Some(1));
/// assert_eq!(tree.first(), Ok(&1));
/// assert!(tree.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct RbTree<T, C = Natural> {
    nodes: Arena<RbNode<T>>,
    root: Option<Handle>,
    len: usize,
    comparator: C,
}

impl<T> RbTree<T, Natural> {
    /// Makes a new, empty tree ordered by [`Ord`].
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> RbTree<T, C> {
    /// Makes a new, empty tree ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            comparator,
        }
    }

    /// Returns the number of items in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no items.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the comparator the tree is ordered by.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the smallest item, or [`Error::NoElements`] when the tree is empty.
    pub fn first(&self) -> Result<&T> {
        self.root
            .map(|root| &self.nodes.get(extreme(&self.nodes, root, Side::Left)).item)
            .ok_or(Error::NoElements)
    }

    /// Returns the largest item, or [`Error::NoElements`] when the tree is empty.
    pub fn last(&self) -> Result<&T> {
        self.root
            .map(|root| &self.nodes.get(extreme(&self.nodes, root, Side::Right)).item)
            .ok_or(Error::NoElements)
    }

    /// Removes and returns the smallest item.
    pub fn pop_first(&mut self) -> Option<T> {
        let root = self.root?;
        let handle = extreme(&self.nodes, root, Side::Left);
        Some(self.remove_node(handle))
    }

    /// Removes and returns the largest item.
    pub fn pop_last(&mut self) -> Option<T> {
        let root = self.root?;
        let handle = extreme(&self.nodes, root, Side::Right);
        Some(self.remove_node(handle))
    }

    /// Returns an ascending, double-ended iterator over the items.
    pub fn iter(&self) -> Iter<'_, T> {
        let front = self.root.map(|root| extreme(&self.nodes, root, Side::Left));
        let back = self.root.map(|root| extreme(&self.nodes, root, Side::Right));
        Iter::new(&self.nodes, front, back, self.len)
    }

    /// Returns the first item, in ascending order, matching `predicate`.
    ///
    /// # Complexity
    ///
    /// O(n): an arbitrary predicate cannot use the ordering.
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|item| predicate(item))
    }

    /// Searches with a locator that reports how a stored item orders relative to the
    /// target (`Less`: the item sorts before the target).
    pub fn search_by<F>(&self, locator: F) -> Option<&T>
    where
        F: Fn(&T) -> Ordering,
    {
        self.locate(locator).map(|handle| &self.nodes.get(handle).item)
    }

    /// Removes one item matched by `locator`; see [`search_by`](RbTree::search_by).
    pub fn remove_by<F>(&mut self, locator: F) -> Option<T>
    where
        F: Fn(&T) -> Ordering,
    {
        let handle = self.locate(locator)?;
        Some(self.remove_node(handle))
    }

    /// Mutable access to the item at `handle`, as found by [`locate`](RbTree::locate).
    /// The caller must not change how the item orders.
    pub(crate) fn item_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.nodes.get_mut(handle).item
    }

    pub(crate) fn remove_at(&mut self, handle: Handle) -> T {
        self.remove_node(handle)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn depth<T>(nodes: &Arena<RbNode<T>>, handle: Option<Handle>) -> usize {
            handle.map_or(0, |h| {
                let node = nodes.get(h);
                1 + depth(nodes, node.left).max(depth(nodes, node.right))
            })
        }
        depth(&self.nodes, self.root)
    }

    /// Collects the items in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Wraps an in-order traversal as a lazy [`Enumerable`]. Each enumeration walks the
    /// live tree; the shared borrow keeps the tree from being mutated meanwhile.
    pub fn enumerable(&self) -> Enumerable<'_, T>
    where
        T: Clone,
    {
        Enumerable::new(move || self.iter().cloned())
    }

    pub(crate) fn locate<F>(&self, locator: F) -> Option<Handle>
    where
        F: Fn(&T) -> Ordering,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match locator(&node.item) {
                Ordering::Less => node.right,
                Ordering::Greater => node.left,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    //--------- structural helpers ----------------

    #[inline]
    fn node(&self, handle: Handle) -> &RbNode<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut RbNode<T> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).parent
    }

    #[inline]
    fn child(&self, handle: Handle, side: Side) -> Option<Handle> {
        self.node(handle).child(side)
    }

    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.node(h).is_red())
    }

    #[inline]
    fn paint(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        let node = self.node(parent);
        if node.left == Some(child) {
            Side::Left
        } else if node.right == Some(child) {
            Side::Right
        } else {
            corrupted("child is not linked from its parent")
        }
    }

    /// Points whatever referenced `old` (its parent, or the root) at `new`.
    fn relink(&mut self, old: Handle, parent: Option<Handle>, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(old, p);
                self.node_mut(p).set_child(side, new);
            }
        }
    }

    //              (p)                       (p)
    //               |                         |
    //              node                     pivot
    //              /  \                      / \
    //             a   pivot      ==>      node  c
    //                  / \                / \
    //                 b   c              a   b
    //
    // `rotate(node, Side::Left)` as drawn; `Side::Right` is the mirror image.
    fn rotate(&mut self, node: Handle, direction: Side) {
        let other = direction.opposite();
        let Some(pivot) = self.child(node, other) else {
            corrupted("rotation without a pivot child")
        };
        let inner = self.child(pivot, direction);
        self.node_mut(node).set_child(other, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(node);
        }
        let parent = self.parent(node);
        self.relink(node, parent, Some(pivot));
        self.node_mut(pivot).parent = parent;
        self.node_mut(pivot).set_child(direction, Some(node));
        self.node_mut(node).parent = Some(pivot);
    }

    //--------- removal ----------------

    fn remove_node(&mut self, handle: Handle) -> T {
        let node = self.node(handle);
        // A node with two children trades payloads with its in-order successor, which
        // has at most one child and is spliced out instead.
        let target = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = extreme(&self.nodes, right, Side::Left);
                let (a, b) = self.nodes.pair_mut(handle, successor);
                std::mem::swap(&mut a.item, &mut b.item);
                successor
            }
            _ => handle,
        };

        let node = self.node(target);
        let child = node.left.or(node.right);
        let parent = node.parent;
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }
        self.relink(target, parent, child);

        let removed = self.nodes.take(target);
        self.len -= 1;
        if removed.color == Color::Black {
            self.remove_fixup(child, parent);
        }
        removed.item
    }

    /// Restores the black-height after a black node was spliced out. `node` carries the
    /// extra black and may be nil, hence the separate `parent`.
    fn remove_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && !self.is_red(node) {
            let Some(p) = parent else {
                corrupted("double-black node without a parent")
            };
            let side = if self.node(p).left == node { Side::Left } else { Side::Right };
            let other = side.opposite();

            let Some(mut sibling) = self.child(p, other) else {
                corrupted("double-black node without a sibling")
            };
            if self.is_red(Some(sibling)) {
                // Red sibling: rotate so the sibling is black.
                self.paint(sibling, Color::Black);
                self.paint(p, Color::Red);
                self.rotate(p, side);
                sibling = match self.child(p, other) {
                    Some(s) => s,
                    None => corrupted("double-black node without a sibling"),
                };
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, other);
            if !self.is_red(near) && !self.is_red(far) {
                // Black sibling with black children: push the deficiency up.
                self.paint(sibling, Color::Red);
                node = Some(p);
                parent = self.parent(p);
                continue;
            }

            if !self.is_red(far) {
                // Near child red: rotate it into the far position.
                if let Some(near) = near {
                    self.paint(near, Color::Black);
                }
                self.paint(sibling, Color::Red);
                self.rotate(sibling, other);
                sibling = match self.child(p, other) {
                    Some(s) => s,
                    None => corrupted("double-black node without a sibling"),
                };
            }

            // Far child red: one rotation at the parent absorbs the extra black.
            let parent_color = self.node(p).color;
            self.paint(sibling, parent_color);
            self.paint(p, Color::Black);
            if let Some(far) = self.child(sibling, other) {
                self.paint(far, Color::Black);
            }
            self.rotate(p, side);
            node = self.root;
            parent = None;
        }

        if let Some(node) = node {
            self.paint(node, Color::Black);
        }
    }

    fn drain_in_order(&mut self) -> Vec<T> {
        let mut handles = Vec::with_capacity(self.len);
        let mut current = self.root.map(|root| extreme(&self.nodes, root, Side::Left));
        while let Some(handle) = current {
            handles.push(handle);
            current = neighbour(&self.nodes, handle, Side::Right);
        }
        let items = handles.into_iter().map(|h| self.nodes.take(h).item).collect();
        self.clear();
        items
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Builds a tree from `items` using `comparator`.
    pub fn from_items<I>(comparator: C, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_comparator(comparator);
        tree.extend(items);
        tree
    }

    /// Inserts `item`. Items comparing equal to an existing one are placed after it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, item: T) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(handle) = current {
            parent = Some(handle);
            side = match self.comparator.compare(&item, &self.node(handle).item) {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => Side::Right,
            };
            current = self.child(handle, side);
        }

        let handle = self.nodes.alloc(RbNode::new(item, parent));
        match parent {
            None => self.root = Some(handle),
            Some(p) => self.node_mut(p).set_child(side, Some(handle)),
        }
        self.len += 1;
        self.insert_fixup(handle);
    }

    /// Removes and returns one item comparing equal to `item`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let handle = self.locate(|stored| self.comparator.compare(stored, item))?;
        Some(self.remove_node(handle))
    }

    /// Returns a stored item comparing equal to `item`.
    pub fn search(&self, item: &T) -> Option<&T> {
        self.search_by(|stored| self.comparator.compare(stored, item))
    }

    /// Returns true if an item comparing equal to `item` is stored.
    pub fn contains(&self, item: &T) -> bool {
        self.search(item).is_some()
    }

    /// Checks every red-black invariant and returns the black-height of the tree.
    ///
    /// Verified: the root is black, no red node has a red child, every root-to-nil path
    /// has the same number of black nodes, parent links mirror child links, the in-order
    /// sequence is non-decreasing and the item count matches [`len`](RbTree::len).
    pub fn validate(&self) -> Result<usize> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(0)
            } else {
                Err(Error::internal(format!("empty tree reports len {}", self.len)))
            };
        };
        if self.node(root).is_red() {
            return Err(Error::internal("root is red"));
        }
        if self.node(root).parent.is_some() {
            return Err(Error::internal("root has a parent"));
        }
        let mut count = 0;
        let blacks = self.validate_node(root, &mut count)?;
        if count != self.len {
            return Err(Error::internal(format!("len {} but {count} nodes reachable", self.len)));
        }
        if self.nodes.len() != self.len {
            return Err(Error::internal(format!("len {} but {} arena slots live", self.len, self.nodes.len())));
        }

        let mut previous: Option<&T> = None;
        for item in self.iter() {
            if previous.is_some_and(|p| self.comparator.compare(p, item) == Ordering::Greater) {
                return Err(Error::internal("in-order traversal is not sorted"));
            }
            previous = Some(item);
        }
        Ok(blacks)
    }

    fn validate_node(&self, handle: Handle, count: &mut usize) -> Result<usize> {
        *count += 1;
        let node = self.node(handle);
        let mut heights = [0usize; 2];
        for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            heights[slot] = match node.child(side) {
                None => 0,
                Some(child) => {
                    let child_node = self.node(child);
                    if child_node.parent != Some(handle) {
                        return Err(Error::internal("parent link does not match child link"));
                    }
                    if node.is_red() && child_node.is_red() {
                        return Err(Error::internal("red node has a red child"));
                    }
                    self.validate_node(child, count)?
                }
            };
        }
        if heights[0] != heights[1] {
            return Err(Error::internal(format!(
                "unbalanced blacks: left {} right {}",
                heights[0], heights[1]
            )));
        }
        Ok(heights[0] + usize::from(!node.is_red()))
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.parent(node).filter(|&p| self.is_red(Some(p))) {
            // The root is black, so a red parent always has a parent of its own.
            let Some(grand) = self.parent(parent) else {
                corrupted("red node at the root")
            };
            let side = self.side_of(parent, grand);
            let uncle = self.child(grand, side.opposite());

            if self.is_red(uncle) {
                self.paint(parent, Color::Black);
                if let Some(uncle) = uncle {
                    self.paint(uncle, Color::Black);
                }
                self.paint(grand, Color::Red);
                node = grand;
                continue;
            }

            let mut parent = parent;
            if self.child(parent, side.opposite()) == Some(node) {
                // Inner grandchild: rotate it to the outside first.
                self.rotate(parent, side);
                node = parent;
                parent = match self.parent(node) {
                    Some(p) => p,
                    None => corrupted("rotated node lost its parent"),
                };
            }
            self.paint(parent, Color::Black);
            self.paint(grand, Color::Red);
            self.rotate(grand, side.opposite());
        }

        if let Some(root) = self.root {
            self.paint(root, Color::Black);
        }
    }
}

impl<T> Default for RbTree<T, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for RbTree<T, Natural> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(Natural, iter)
    }
}

impl<T, C: Comparator<T>> Extend<T> for RbTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for RbTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter::new(self.drain_in_order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn colors<T: Clone, C>(tree: &RbTree<T, C>) -> Vec<(T, Color)> {
        let mut out = Vec::new();
        let mut current = tree.root.map(|root| extreme(&tree.nodes, root, Side::Left));
        while let Some(handle) = current {
            let node = tree.nodes.get(handle);
            out.push((node.item.clone(), node.color));
            current = neighbour(&tree.nodes, handle, Side::Right);
        }
        out
    }

    #[test]
    fn first_insert_is_black_root() {
        let mut tree = RbTree::new();
        tree.insert(10);
        assert_eq!(colors(&tree), vec![(10, Color::Black)]);
        assert_eq!(tree.validate(), Ok(1));
    }

    #[test]
    fn ascending_inserts_rotate() {
        let mut tree = RbTree::new();
        tree.extend([1, 2, 3]);
        // A right-leaning chain rotates to a black 2 with two red children.
        let root = tree.root.unwrap();
        assert_eq!(tree.nodes.get(root).item, 2);
        assert_eq!(
            colors(&tree),
            vec![(1, Color::Red), (2, Color::Black), (3, Color::Red)]
        );
    }

    #[test]
    fn red_uncle_recolors() {
        let mut tree = RbTree::new();
        tree.extend([10, 5, 15, 1]);
        assert_eq!(
            colors(&tree),
            vec![(1, Color::Red), (5, Color::Black), (10, Color::Black), (15, Color::Black)]
        );
        assert_eq!(tree.validate(), Ok(2));
    }

    #[test]
    fn inner_grandchild_double_rotation() {
        let mut tree = RbTree::new();
        tree.extend([10, 5, 7]);
        assert_eq!(tree.nodes.get(tree.root.unwrap()).item, 7);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn removal_of_node_with_two_children_uses_successor() {
        let mut tree: RbTree<i32> = (1..=7).collect();
        assert_eq!(tree.remove(&4), Some(4));
        assert_eq!(tree.to_vec(), vec![1, 2, 3, 5, 6, 7]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn removing_every_item_leaves_empty_tree() {
        let mut tree: RbTree<i32> = (0..64).collect();
        for n in (0..64).rev().step_by(3).chain((0..64).step_by(2)) {
            tree.remove(&n);
            tree.validate().unwrap();
        }
        while tree.pop_first().is_some() {
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
        assert_eq!(tree.first(), Err(Error::NoElements));
    }

    #[test]
    fn validate_detects_red_root() {
        let mut tree: RbTree<i32> = (0..3).collect();
        let root = tree.root.unwrap();
        tree.paint(root, Color::Red);
        assert_eq!(tree.validate(), Err(Error::internal("root is red")));
    }

    #[test]
    fn validate_detects_unbalanced_blacks() {
        let mut tree: RbTree<i32> = (0..3).collect();
        let root = tree.root.unwrap();
        let left = tree.nodes.get(root).left.unwrap();
        tree.paint(left, Color::Black);
        assert!(matches!(tree.validate(), Err(Error::Internal(message)) if message.starts_with("unbalanced blacks")));
    }

    #[test]
    #[should_panic(expected = "internal invariant violated: rotation without a pivot child")]
    fn rotating_without_pivot_panics() {
        let mut tree = RbTree::new();
        tree.insert(1);
        let root = tree.root.unwrap();
        tree.rotate(root, Side::Left);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i16),
        Remove(i16),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i16..200).prop_map(Op::Insert),
            2 => (0i16..200).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree = RbTree::new();
            let mut model: Vec<i16> = Vec::new();
            for op in ops {
                match op {
                    Op::Insert(n) => {
                        tree.insert(n);
                        let at = model.partition_point(|&m| m <= n);
                        model.insert(at, n);
                    }
                    Op::Remove(n) => {
                        let expected = model.iter().position(|&m| m == n).map(|at| model.remove(at));
                        prop_assert_eq!(tree.remove(&n), expected);
                    }
                }
                prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
                prop_assert_eq!(tree.len(), model.len());
            }
            prop_assert_eq!(tree.to_vec(), model);
        }
    }
}
