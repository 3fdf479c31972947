//! Set algebra. Every operator yields elements in first-occurrence order; the three
//! flavours differ only in how membership is decided.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use super::{Enumerable, Enumerator};
use crate::comparator::{Comparator, DynComparator, EqualityComparator};
use crate::rb_tree::RbTree;

/// A growing set of already-seen elements.
trait Membership<T> {
    /// Records `item`; false if an equivalent element was already present.
    fn insert(&mut self, item: &T) -> bool;

    fn contains(&self, item: &T) -> bool;
}

struct HashMembership<T>(HashSet<T>);

impl<T: Hash + Eq + Clone> Membership<T> for HashMembership<T> {
    fn insert(&mut self, item: &T) -> bool {
        !self.0.contains(item) && self.0.insert(item.clone())
    }

    fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }
}

/// Linear scan; the only option when all we have is an equivalence.
struct EqualityMembership<T, E> {
    items: Vec<T>,
    equality: Rc<E>,
}

impl<T: Clone, E: EqualityComparator<T>> Membership<T> for EqualityMembership<T, E> {
    fn insert(&mut self, item: &T) -> bool {
        if self.contains(item) {
            return false;
        }
        self.items.push(item.clone());
        true
    }

    fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|seen| self.equality.equals(seen, item))
    }
}

struct OrderedMembership<'a, T> {
    tree: RbTree<T, DynComparator<'a, T>>,
}

impl<'a, T: Clone> OrderedMembership<'a, T> {
    fn new<C: Comparator<T> + 'a>(comparator: Rc<C>) -> Self {
        let compare: DynComparator<'a, T> = Box::new(move |a: &T, b: &T| comparator.compare(a, b));
        Self {
            tree: RbTree::with_comparator(compare),
        }
    }
}

impl<T: Clone> Membership<T> for OrderedMembership<'_, T> {
    fn insert(&mut self, item: &T) -> bool {
        if self.tree.contains(item) {
            return false;
        }
        self.tree.insert(item.clone());
        true
    }

    fn contains(&self, item: &T) -> bool {
        self.tree.contains(item)
    }
}

/// Filters `items` against the membership of a second sequence, loaded on the first pull.
struct SetFilter<'a, T, M> {
    items: Enumerator<'a, T>,
    pending: Option<Enumerator<'a, T>>,
    others: M,
    seen: M,
    keep_members: bool,
}

impl<T, M: Membership<T>> Iterator for SetFilter<'_, T, M> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let Some(pending) = self.pending.take() {
            for other in pending {
                self.others.insert(&other);
            }
        }
        loop {
            let item = self.items.next()?;
            if self.others.contains(&item) == self.keep_members && self.seen.insert(&item) {
                return Some(item);
            }
        }
    }
}

impl<'a, T: Clone + 'a> Enumerable<'a, T> {
    fn distinct_in<M, F>(&self, membership: F) -> Self
    where
        M: Membership<T> + 'a,
        F: Fn() -> M + 'a,
    {
        self.pipe(move |items| {
            let mut seen = membership();
            Enumerator::new(items.filter(move |item| seen.insert(item)))
        })
    }

    fn filter_against<M, F>(&self, other: &Self, keep_members: bool, membership: F) -> Self
    where
        M: Membership<T> + 'a,
        F: Fn() -> M + 'a,
    {
        let (source, other) = (self.clone(), other.clone());
        Enumerable::from_factory(move || {
            Ok(Enumerator::new(SetFilter {
                items: source.iter()?,
                pending: Some(other.iter()?),
                others: membership(),
                seen: membership(),
                keep_members,
            }))
        })
    }

    /// Drops repeated elements, keeping each first occurrence.
    ///
    /// ```
    /// use tree_query::Enumerable;
    ///
    /// let numbers = Enumerable::from_vec(vec![3, 1, 3, 2, 1]);
    /// assert_eq!(numbers.distinct().to_vec()?, vec![3, 1, 2]);
    /// # Ok::<(), tree_query::Error>(())
    /// ```
    pub fn distinct(&self) -> Self
    where
        T: Hash + Eq,
    {
        self.distinct_in(|| HashMembership(HashSet::new()))
    }

    pub fn distinct_with<E>(&self, equality: E) -> Self
    where
        E: EqualityComparator<T> + 'a,
    {
        let equality = Rc::new(equality);
        self.distinct_in(move || EqualityMembership {
            items: Vec::new(),
            equality: Rc::clone(&equality),
        })
    }

    /// Like [`distinct`](Enumerable::distinct), deciding equivalence with `comparator`
    /// (`Equal` means duplicate) in O(log n) per element.
    pub fn distinct_ordered<C>(&self, comparator: C) -> Self
    where
        C: Comparator<T> + 'a,
    {
        let comparator = Rc::new(comparator);
        self.distinct_in(move || OrderedMembership::new(Rc::clone(&comparator)))
    }

    /// Distinct elements of `self` followed by those of `other` not seen yet.
    pub fn union(&self, other: &Self) -> Self
    where
        T: Hash + Eq,
    {
        self.concat(other).distinct()
    }

    pub fn union_with<E>(&self, other: &Self, equality: E) -> Self
    where
        E: EqualityComparator<T> + 'a,
    {
        self.concat(other).distinct_with(equality)
    }

    pub fn union_ordered<C>(&self, other: &Self, comparator: C) -> Self
    where
        C: Comparator<T> + 'a,
    {
        self.concat(other).distinct_ordered(comparator)
    }

    /// Distinct elements of `self` that also occur in `other`.
    pub fn intersect(&self, other: &Self) -> Self
    where
        T: Hash + Eq,
    {
        self.filter_against(other, true, || HashMembership(HashSet::new()))
    }

    pub fn intersect_with<E>(&self, other: &Self, equality: E) -> Self
    where
        E: EqualityComparator<T> + 'a,
    {
        let equality = Rc::new(equality);
        self.filter_against(other, true, move || EqualityMembership {
            items: Vec::new(),
            equality: Rc::clone(&equality),
        })
    }

    pub fn intersect_ordered<C>(&self, other: &Self, comparator: C) -> Self
    where
        C: Comparator<T> + 'a,
    {
        let comparator = Rc::new(comparator);
        self.filter_against(other, true, move || OrderedMembership::new(Rc::clone(&comparator)))
    }

    /// Distinct elements of `self` that do not occur in `other`.
    pub fn except(&self, other: &Self) -> Self
    where
        T: Hash + Eq,
    {
        self.filter_against(other, false, || HashMembership(HashSet::new()))
    }

    pub fn except_with<E>(&self, other: &Self, equality: E) -> Self
    where
        E: EqualityComparator<T> + 'a,
    {
        let equality = Rc::new(equality);
        self.filter_against(other, false, move || EqualityMembership {
            items: Vec::new(),
            equality: Rc::clone(&equality),
        })
    }

    pub fn except_ordered<C>(&self, other: &Self, comparator: C) -> Self
    where
        C: Comparator<T> + 'a,
    {
        let comparator = Rc::new(comparator);
        self.filter_against(other, false, move || OrderedMembership::new(Rc::clone(&comparator)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Enumerable;
    use crate::comparator::Natural;

    fn case_insensitive(a: &&str, b: &&str) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    #[test]
    fn distinct_flavours_agree() {
        let numbers = Enumerable::from_vec(vec![3, 1, 3, 2, 1]);
        let expected = vec![3, 1, 2];
        assert_eq!(numbers.distinct().to_vec().unwrap(), expected);
        assert_eq!(numbers.distinct_with(|a: &i32, b: &i32| a == b).to_vec().unwrap(), expected);
        assert_eq!(numbers.distinct_ordered(Natural).to_vec().unwrap(), expected);
    }

    #[test]
    fn custom_equivalence_keeps_first_spelling() {
        let words = Enumerable::from_vec(vec!["Apple", "apple", "Pear", "APPLE"]);
        assert_eq!(words.distinct_with(case_insensitive).to_vec().unwrap(), vec!["Apple", "Pear"]);
        let by_lowercase = |a: &&str, b: &&str| a.to_lowercase().cmp(&b.to_lowercase());
        assert_eq!(words.distinct_ordered(by_lowercase).to_vec().unwrap(), vec!["Apple", "Pear"]);
    }

    #[test]
    fn union_intersect_except() {
        let left = Enumerable::from_vec(vec![5, 3, 9, 3, 7]);
        let right = Enumerable::from_vec(vec![8, 3, 6, 5, 4]);
        assert_eq!(left.union(&right).to_vec().unwrap(), vec![5, 3, 9, 7, 8, 6, 4]);
        assert_eq!(left.intersect(&right).to_vec().unwrap(), vec![5, 3]);
        assert_eq!(left.except(&right).to_vec().unwrap(), vec![9, 7]);

        assert_eq!(left.union_ordered(&right, Natural).to_vec().unwrap(), vec![5, 3, 9, 7, 8, 6, 4]);
        assert_eq!(left.intersect_ordered(&right, Natural).to_vec().unwrap(), vec![5, 3]);
        assert_eq!(left.except_ordered(&right, Natural).to_vec().unwrap(), vec![9, 7]);

        let eq = |a: &i32, b: &i32| a == b;
        assert_eq!(left.union_with(&right, eq).to_vec().unwrap(), vec![5, 3, 9, 7, 8, 6, 4]);
        assert_eq!(left.intersect_with(&right, eq).to_vec().unwrap(), vec![5, 3]);
        assert_eq!(left.except_with(&right, eq).to_vec().unwrap(), vec![9, 7]);
    }

    #[test]
    fn single_use_operand_is_read_once() {
        let right = Enumerable::once(vec![1]);
        let query = Enumerable::from_vec(vec![1, 2]).except(&right);
        let mut items = query.iter().unwrap();
        assert_eq!(items.next(), Some(2));
        assert_eq!(items.next(), None);
    }
}
