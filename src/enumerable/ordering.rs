use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::vec;

use super::{Enumerable, Enumerator};
use crate::comparator::Comparator;

type Comparer<'a, T> = Rc<dyn Fn(&T, &T) -> Ordering + 'a>;

/// A sorted view produced by [`Enumerable::order_by`] and friends.
///
/// Adds the `then_by` family to break ties; [`as_enumerable`](Self::as_enumerable) and
/// [`into_enumerable`](Self::into_enumerable) hand the sorted sequence to every other
/// operator. Sorting is stable and happens on the first pull of each traversal.
///
/// ```
/// use tree_query::Enumerable;
///
/// let people = Enumerable::from_vec(vec![("Ann", 31), ("Bob", 25), ("Cid", 31), ("Dee", 25)]);
/// let sorted = people
///     .order_by_descending(|(_, age)| *age)
///     .then_by(|(name, _)| *name);
/// let names = sorted.as_enumerable().select(|(name, _)| name);
/// assert_eq!(names.to_vec()?, vec!["Ann", "Cid", "Bob", "Dee"]);
/// # Ok::<(), tree_query::Error>(())
/// ```
pub struct OrderedEnumerable<'a, T> {
    source: Enumerable<'a, T>,
    comparer: Comparer<'a, T>,
    sorted: Enumerable<'a, T>,
}

enum SortState<'a, T> {
    Pending(Enumerator<'a, T>),
    Draining(vec::IntoIter<T>),
}

/// Buffers its source on the first pull, stable-sorts it, then drains the buffer.
struct Sorted<'a, T> {
    state: SortState<'a, T>,
    comparer: Comparer<'a, T>,
}

impl<T> Iterator for Sorted<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let SortState::Pending(items) = &mut self.state {
            let mut buffer: Vec<T> = items.collect();
            let comparer = &self.comparer;
            buffer.sort_by(|a, b| comparer(a, b));
            self.state = SortState::Draining(buffer.into_iter());
        }
        match &mut self.state {
            SortState::Draining(items) => items.next(),
            SortState::Pending(_) => None,
        }
    }
}

impl<'a, T: 'a> OrderedEnumerable<'a, T> {
    fn new(source: Enumerable<'a, T>, comparer: Comparer<'a, T>) -> Self {
        let sort_by = Rc::clone(&comparer);
        let sorted = source.pipe(move |items| {
            Enumerator::new(Sorted {
                state: SortState::Pending(items),
                comparer: Rc::clone(&sort_by),
            })
        });
        Self {
            source,
            comparer,
            sorted,
        }
    }

    fn then(&self, secondary: Comparer<'a, T>) -> Self {
        let primary = Rc::clone(&self.comparer);
        let composite: Comparer<'a, T> = Rc::new(move |a: &T, b: &T| primary(a, b).then_with(|| secondary(a, b)));
        Self::new(self.source.clone(), composite)
    }

    /// Breaks ties of the current order by ascending `key`.
    pub fn then_by<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.then(Rc::new(move |a: &T, b: &T| key(a).cmp(&key(b))))
    }

    pub fn then_by_with<K, F, C>(&self, key: F, comparator: C) -> Self
    where
        F: Fn(&T) -> K + 'a,
        C: Comparator<K> + 'a,
    {
        self.then(Rc::new(move |a: &T, b: &T| comparator.compare(&key(a), &key(b))))
    }

    pub fn then_by_descending<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.then(Rc::new(move |a: &T, b: &T| key(b).cmp(&key(a))))
    }

    pub fn then_by_descending_with<K, F, C>(&self, key: F, comparator: C) -> Self
    where
        F: Fn(&T) -> K + 'a,
        C: Comparator<K> + 'a,
    {
        self.then(Rc::new(move |a: &T, b: &T| comparator.compare(&key(b), &key(a))))
    }

    /// Borrows the sorted sequence; tie-breakers added later do not affect it.
    pub fn as_enumerable(&self) -> &Enumerable<'a, T> {
        &self.sorted
    }

    /// The sorted sequence as a plain [`Enumerable`].
    pub fn into_enumerable(self) -> Enumerable<'a, T> {
        self.sorted
    }
}

impl<'a, T: 'a> From<OrderedEnumerable<'a, T>> for Enumerable<'a, T> {
    fn from(ordered: OrderedEnumerable<'a, T>) -> Self {
        ordered.into_enumerable()
    }
}

impl<T> Clone for OrderedEnumerable<'_, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            comparer: Rc::clone(&self.comparer),
            sorted: self.sorted.clone(),
        }
    }
}

impl<T> fmt::Debug for OrderedEnumerable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedEnumerable").finish_non_exhaustive()
    }
}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Stable ascending sort by `key`.
    pub fn order_by<K, F>(&self, key: F) -> OrderedEnumerable<'a, T>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        OrderedEnumerable::new(self.clone(), Rc::new(move |a: &T, b: &T| key(a).cmp(&key(b))))
    }

    pub fn order_by_with<K, F, C>(&self, key: F, comparator: C) -> OrderedEnumerable<'a, T>
    where
        F: Fn(&T) -> K + 'a,
        C: Comparator<K> + 'a,
    {
        OrderedEnumerable::new(
            self.clone(),
            Rc::new(move |a: &T, b: &T| comparator.compare(&key(a), &key(b))),
        )
    }

    /// Stable descending sort by `key`; equal keys keep their input order.
    pub fn order_by_descending<K, F>(&self, key: F) -> OrderedEnumerable<'a, T>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        OrderedEnumerable::new(self.clone(), Rc::new(move |a: &T, b: &T| key(b).cmp(&key(a))))
    }

    pub fn order_by_descending_with<K, F, C>(&self, key: F, comparator: C) -> OrderedEnumerable<'a, T>
    where
        F: Fn(&T) -> K + 'a,
        C: Comparator<K> + 'a,
    {
        OrderedEnumerable::new(
            self.clone(),
            Rc::new(move |a: &T, b: &T| comparator.compare(&key(b), &key(a))),
        )
    }

    /// Stable ascending sort of the elements themselves.
    pub fn order(&self) -> OrderedEnumerable<'a, T>
    where
        T: Ord,
    {
        OrderedEnumerable::new(self.clone(), Rc::new(|a: &T, b: &T| a.cmp(b)))
    }

    pub fn order_descending(&self) -> OrderedEnumerable<'a, T>
    where
        T: Ord,
    {
        OrderedEnumerable::new(self.clone(), Rc::new(|a: &T, b: &T| b.cmp(a)))
    }
}
