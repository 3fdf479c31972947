use std::fmt;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::node::BNode;
use crate::raw::{Arena, Handle};

/// An ascending iterator over the items of a [`BTree`](super::BTree).
///
/// This `struct` is created by [`BTree::iter`](super::BTree::iter).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    nodes: &'a Arena<BNode<T>>,
    // (node, index of the next key to yield); the top frame is the current leaf.
    stack: SmallVec<[(Handle, usize); 16]>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(nodes: &'a Arena<BNode<T>>, root: Option<Handle>, len: usize) -> Self {
        let mut iter = Self {
            nodes,
            stack: SmallVec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    /// Pushes the leftmost path of the subtree at `handle`.
    fn descend(&mut self, mut handle: Handle) {
        loop {
            self.stack.push((handle, 0));
            let node = self.nodes.get(handle);
            match node.children.first() {
                Some(&child) if !node.leaf => handle = child,
                _ => return,
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let (handle, index) = *self.stack.last()?;
            let nodes = self.nodes;
            let node = nodes.get(handle);
            if index >= node.key_count() {
                self.stack.pop();
                continue;
            }
            if let Some(top) = self.stack.last_mut() {
                top.1 += 1;
            }
            if !node.leaf {
                if let Some(&child) = node.children.get(index + 1) {
                    self.descend(child);
                }
            }
            self.remaining -= 1;
            return Some(&node.keys[index]);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::btree::BTree;

    #[test]
    fn walks_every_level_in_order() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend((0..50).rev());
        assert!(tree.height() > 2);
        let items: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(items, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn reports_exact_length() {
        let mut tree = BTree::new(3).unwrap();
        tree.extend([5, 1, 4]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.size_hint(), (2, Some(2)));
        assert_eq!(format!("{iter:?}"), "[4, 5]");
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: BTree<u8> = BTree::new(4).unwrap();
        assert_eq!(tree.iter().next(), None);
    }
}
