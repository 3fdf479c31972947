//! Order and equality contracts shared by the trees, the containers and the query engine.
//!
//! Any `Fn(&T, &T) -> Ordering` closure is a [`Comparator`] and any `Fn(&T, &T) -> bool`
//! closure is an [`EqualityComparator`], so call sites can pass plain closures:
//!
//! ```
//! use tree_query::RbTree;
//!
//! let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
//! tree.insert(1);
//! tree.insert(3);
//! tree.insert(2);
//! assert_eq!(tree.to_vec(), vec![3, 2, 1]);
//! ```

use std::cmp::Ordering;

/// A three-way comparison imposing a total order on `T`.
///
/// Implementations must be consistent: `compare(a, b)` is `Less` exactly when
/// `compare(b, a)` is `Greater`, and `Equal` must be transitive. The trees rely on this to
/// place items; an inconsistent comparator will not cause memory unsafety but will make
/// lookups miss.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// A boolean equivalence on `T`.
pub trait EqualityComparator<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> EqualityComparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// The default order: whatever [`Ord`] says.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// The default equivalence: whatever [`PartialEq`] says.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Structural;

impl<T: PartialEq + ?Sized> EqualityComparator<T> for Structural {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Inverts the wrapped comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// A type-erased comparator, used where a comparator has to be stored behind a
/// shared handle (for example inside a lazily built tree).
pub type DynComparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Builds a comparator that orders items by the natural order of a projected key.
///
/// ```
/// use tree_query::comparator::{by_key, Comparator};
/// use std::cmp::Ordering;
///
/// let by_len = by_key(|s: &&str| s.len());
/// assert_eq!(by_len.compare(&"abc", &"z"), Ordering::Greater);
/// ```
pub fn by_key<T: ?Sized, K: Ord, F>(key: F) -> impl Fn(&T, &T) -> Ordering
where
    F: Fn(&T) -> K,
{
    move |a: &T, b: &T| key(a).cmp(&key(b))
}
