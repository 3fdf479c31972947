use crate::raw::{Arena, Handle};

/// Color of a red-black node. Absent (nil) children count as black.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Which child link of a node. Lets the fix-up code handle both mirror cases at once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone)]
pub(crate) struct RbNode<T> {
    pub(crate) item: T,
    pub(crate) color: Color,
    // Back-reference only; ownership flows root to children through the arena.
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<T> RbNode<T> {
    /// New nodes start red and detached; the insert fix-up recolors as needed.
    pub(crate) fn new(item: T, parent: Option<Handle>) -> Self {
        Self {
            item,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Follows `side` links from `handle` as far as they go.
pub(crate) fn extreme<T>(nodes: &Arena<RbNode<T>>, mut handle: Handle, side: Side) -> Handle {
    while let Some(next) = nodes.get(handle).child(side) {
        handle = next;
    }
    handle
}

/// In-order neighbour of `handle` in direction `side` (`Right` = successor,
/// `Left` = predecessor), found through parent links without a stack.
pub(crate) fn neighbour<T>(nodes: &Arena<RbNode<T>>, handle: Handle, side: Side) -> Option<Handle> {
    if let Some(child) = nodes.get(handle).child(side) {
        return Some(extreme(nodes, child, side.opposite()));
    }
    let mut current = handle;
    let mut parent = nodes.get(current).parent;
    while let Some(p) = parent {
        if nodes.get(p).child(side) != Some(current) {
            return Some(p);
        }
        current = p;
        parent = nodes.get(p).parent;
    }
    None
}
