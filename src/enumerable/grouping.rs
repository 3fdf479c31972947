use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use std::{slice, vec};

use super::{Enumerable, Enumerator};
use crate::comparator::EqualityComparator;

type KeyFn<'a, T, K> = Rc<dyn Fn(&T) -> K + 'a>;

/// A key together with the elements that produced it, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping<K, T> {
    key: K,
    elements: Vec<T>,
}

impl<K, T> Grouping<K, T> {
    pub(crate) fn new(key: K, first: T) -> Self {
        Self {
            key,
            elements: vec![first],
        }
    }

    pub(crate) fn push(&mut self, element: T) {
        self.elements.push(element);
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false for groups built by this crate; a group exists because an element did.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.elements)
    }

    /// The elements as a lazy sequence.
    pub fn enumerable(&self) -> Enumerable<'_, T>
    where
        T: Clone,
    {
        Enumerable::from_slice(&self.elements)
    }
}

impl<'g, K, T> IntoIterator for &'g Grouping<K, T> {
    type Item = &'g T;
    type IntoIter = slice::Iter<'g, T>;

    fn into_iter(self) -> slice::Iter<'g, T> {
        self.iter()
    }
}

impl<K, T> IntoIterator for Grouping<K, T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> vec::IntoIter<T> {
        self.elements.into_iter()
    }
}

/// Builds every group on the first pull, then hands them out in order of first appearance.
struct Groups<'a, T, K, B> {
    pending: Option<Enumerator<'a, T>>,
    build: Rc<B>,
    groups: vec::IntoIter<Grouping<K, T>>,
}

impl<'a, T, K, B> Iterator for Groups<'a, T, K, B>
where
    B: Fn(Enumerator<'a, T>) -> Vec<Grouping<K, T>>,
{
    type Item = Grouping<K, T>;

    fn next(&mut self) -> Option<Grouping<K, T>> {
        if let Some(items) = self.pending.take() {
            self.groups = (self.build)(items).into_iter();
        }
        self.groups.next()
    }
}

/// Outer rows paired with each matching inner row; with `keep_unmatched`, an outer row
/// without matches is emitted once paired with `None`.
struct JoinRows<'a, T, I, K> {
    outer: Enumerator<'a, T>,
    inner: Option<Enumerator<'a, I>>,
    table: HashMap<K, Vec<I>>,
    outer_key: KeyFn<'a, T, K>,
    inner_key: KeyFn<'a, I, K>,
    current: Option<(T, K, usize)>,
    keep_unmatched: bool,
}

impl<T: Clone, I: Clone, K: Hash + Eq> Iterator for JoinRows<'_, T, I, K> {
    type Item = (T, Option<I>);

    fn next(&mut self) -> Option<(T, Option<I>)> {
        if let Some(inner) = self.inner.take() {
            self.table = index_by(inner, &*self.inner_key);
        }
        loop {
            if let Some((outer, key, position)) = &mut self.current {
                if let Some(matched) = self.table.get(key).and_then(|rows| rows.get(*position)) {
                    *position += 1;
                    return Some((outer.clone(), Some(matched.clone())));
                }
                self.current = None;
            }
            let outer = self.outer.next()?;
            let key = (self.outer_key)(&outer);
            if self.table.contains_key(&key) {
                self.current = Some((outer, key, 0));
            } else if self.keep_unmatched {
                return Some((outer, None));
            }
        }
    }
}

struct GroupJoinRows<'a, T, I, K> {
    outer: Enumerator<'a, T>,
    inner: Option<Enumerator<'a, I>>,
    table: HashMap<K, Vec<I>>,
    outer_key: KeyFn<'a, T, K>,
    inner_key: KeyFn<'a, I, K>,
}

impl<T, I: Clone, K: Hash + Eq> Iterator for GroupJoinRows<'_, T, I, K> {
    type Item = (T, Vec<I>);

    fn next(&mut self) -> Option<(T, Vec<I>)> {
        if let Some(inner) = self.inner.take() {
            self.table = index_by(inner, &*self.inner_key);
        }
        let outer = self.outer.next()?;
        let matches = self.table.get(&(self.outer_key)(&outer)).cloned().unwrap_or_default();
        Some((outer, matches))
    }
}

fn index_by<I, K: Hash + Eq>(items: impl Iterator<Item = I>, key: &dyn Fn(&I) -> K) -> HashMap<K, Vec<I>> {
    let mut table: HashMap<K, Vec<I>> = HashMap::new();
    for item in items {
        table.entry(key(&item)).or_default().push(item);
    }
    table
}

impl<'a, T: 'a> Enumerable<'a, T> {
    fn grouped<K, B>(&self, build: B) -> Enumerable<'a, Grouping<K, T>>
    where
        K: 'a,
        B: Fn(Enumerator<'a, T>) -> Vec<Grouping<K, T>> + 'a,
    {
        let build = Rc::new(build);
        self.pipe(move |items| {
            Enumerator::new(Groups {
                pending: Some(items),
                build: Rc::clone(&build),
                groups: Vec::new().into_iter(),
            })
        })
    }

    /// Groups elements by `key`. Groups appear in order of their first element and keep
    /// their elements in input order.
    ///
    /// ```
    /// use tree_query::Enumerable;
    ///
    /// let words = Enumerable::from_vec(vec!["apple", "bean", "avocado", "beet", "corn"]);
    /// let groups = words.group_by(|w| w.chars().next());
    /// let summary: Vec<_> = groups.select(|g| (*g.key(), g.len())).to_vec()?;
    /// assert_eq!(summary, vec![(Some('a'), 2), (Some('b'), 2), (Some('c'), 1)]);
    /// # Ok::<(), tree_query::Error>(())
    /// ```
    pub fn group_by<K, F>(&self, key: F) -> Enumerable<'a, Grouping<K, T>>
    where
        K: Hash + Eq + Clone + 'a,
        F: Fn(&T) -> K + 'a,
    {
        self.grouped(move |items| {
            let mut groups: Vec<Grouping<K, T>> = Vec::new();
            let mut positions: HashMap<K, usize> = HashMap::new();
            for item in items {
                let k = key(&item);
                match positions.get(&k) {
                    Some(&position) => groups[position].push(item),
                    None => {
                        positions.insert(k.clone(), groups.len());
                        groups.push(Grouping::new(k, item));
                    }
                }
            }
            groups
        })
    }

    /// Like [`group_by`](Enumerable::group_by), matching keys with `equality`.
    pub fn group_by_with<K, F, E>(&self, key: F, equality: E) -> Enumerable<'a, Grouping<K, T>>
    where
        K: 'a,
        F: Fn(&T) -> K + 'a,
        E: EqualityComparator<K> + 'a,
    {
        self.grouped(move |items| {
            let mut groups: Vec<Grouping<K, T>> = Vec::new();
            for item in items {
                let k = key(&item);
                match groups.iter_mut().find(|group| equality.equals(group.key(), &k)) {
                    Some(group) => group.push(item),
                    None => groups.push(Grouping::new(k, item)),
                }
            }
            groups
        })
    }

    fn join_rows<I, K>(
        &self,
        inner: &Enumerable<'a, I>,
        outer_key: KeyFn<'a, T, K>,
        inner_key: KeyFn<'a, I, K>,
        keep_unmatched: bool,
    ) -> Enumerable<'a, (T, Option<I>)>
    where
        T: Clone,
        I: Clone + 'a,
        K: Hash + Eq + 'a,
    {
        let (outer, inner) = (self.clone(), inner.clone());
        Enumerable::from_factory(move || {
            Ok(Enumerator::new(JoinRows {
                outer: outer.iter()?,
                inner: Some(inner.iter()?),
                table: HashMap::new(),
                outer_key: Rc::clone(&outer_key),
                inner_key: Rc::clone(&inner_key),
                current: None,
                keep_unmatched,
            }))
        })
    }

    /// Inner equi-join. The inner sequence is hashed by key on the first pull; outer rows
    /// stream, each paired with its matches in inner order.
    pub fn join<I, K, R, FO, FI, FR>(
        &self,
        inner: &Enumerable<'a, I>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
    ) -> Enumerable<'a, R>
    where
        T: Clone,
        I: Clone + 'a,
        K: Hash + Eq + 'a,
        R: 'a,
        FO: Fn(&T) -> K + 'a,
        FI: Fn(&I) -> K + 'a,
        FR: Fn(T, I) -> R + 'a,
    {
        self.join_rows(inner, Rc::new(outer_key), Rc::new(inner_key), false)
            .of_type(move |(outer, matched)| matched.map(|matched| result(outer, matched)))
    }

    /// Left outer equi-join: like [`join`](Enumerable::join), but an outer row without
    /// matches is kept once, paired with `None`.
    pub fn left_join<I, K, R, FO, FI, FR>(
        &self,
        inner: &Enumerable<'a, I>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
    ) -> Enumerable<'a, R>
    where
        T: Clone,
        I: Clone + 'a,
        K: Hash + Eq + 'a,
        R: 'a,
        FO: Fn(&T) -> K + 'a,
        FI: Fn(&I) -> K + 'a,
        FR: Fn(T, Option<I>) -> R + 'a,
    {
        self.join_rows(inner, Rc::new(outer_key), Rc::new(inner_key), true)
            .select(move |(outer, matched)| result(outer, matched))
    }

    /// Pairs every outer row with the (possibly empty) sequence of its inner matches.
    pub fn group_join<I, K, R, FO, FI, FR>(
        &self,
        inner: &Enumerable<'a, I>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
    ) -> Enumerable<'a, R>
    where
        I: Clone + 'a,
        K: Hash + Eq + 'a,
        R: 'a,
        FO: Fn(&T) -> K + 'a,
        FI: Fn(&I) -> K + 'a,
        FR: Fn(T, Enumerable<'a, I>) -> R + 'a,
    {
        let (outer, inner) = (self.clone(), inner.clone());
        let outer_key: KeyFn<'a, T, K> = Rc::new(outer_key);
        let inner_key: KeyFn<'a, I, K> = Rc::new(inner_key);
        let rows = Enumerable::from_factory(move || {
            Ok(Enumerator::new(GroupJoinRows {
                outer: outer.iter()?,
                inner: Some(inner.iter()?),
                table: HashMap::new(),
                outer_key: Rc::clone(&outer_key),
                inner_key: Rc::clone(&inner_key),
            }))
        });
        rows.select(move |(outer, matches)| result(outer, Enumerable::from_vec(matches)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Enumerable;
    use std::cell::Cell;

    #[test]
    fn groups_keep_first_appearance_order() {
        let numbers = Enumerable::from_vec(vec![5, 2, 8, 3, 6, 1]);
        let groups = numbers.group_by(|n| n % 3).to_vec().unwrap();
        let keys: Vec<i32> = groups.iter().map(|g| *g.key()).collect();
        assert_eq!(keys, vec![2, 0, 1]);
        assert_eq!(groups[0].elements(), &[5, 2, 8]);
        assert_eq!(groups[1].iter().copied().collect::<Vec<_>>(), vec![3, 6]);
        assert_eq!(groups[2].clone().into_parts(), (1, vec![1]));
    }

    #[test]
    fn group_by_with_custom_equivalence() {
        let words = Enumerable::from_vec(vec!["A", "b", "a", "B", "c"]);
        let groups = words
            .group_by_with(|w| w.to_string(), |a: &String, b: &String| a.eq_ignore_ascii_case(b))
            .to_vec()
            .unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key(), "A");
        assert_eq!(groups[0].elements(), &["A", "a"]);
        assert_eq!(groups[1].elements(), &["b", "B"]);
    }

    #[test]
    fn grouping_waits_for_first_pull() {
        let counter = Cell::new(0);
        let pulled = &counter;
        let source = Enumerable::new(move || (0..4).inspect(move |_| pulled.set(pulled.get() + 1)));
        let groups = source.group_by(|n| n % 2);
        let mut iter = groups.iter().unwrap();
        assert_eq!(counter.get(), 0);
        assert!(iter.next().is_some());
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn join_and_left_join() {
        let outer = Enumerable::from_vec(vec![1, 2, 3]);
        let inner = Enumerable::from_vec(vec![(1, "a"), (1, "b"), (2, "c")]);

        let inner_rows = outer.join(&inner, |o| *o, |(k, _)| *k, |o, (k, s)| (o, k, s));
        assert_eq!(inner_rows.to_vec().unwrap(), vec![(1, 1, "a"), (1, 1, "b"), (2, 2, "c")]);

        let outer_rows = outer.left_join(&inner, |o| *o, |(k, _)| *k, |o, row| (o, row.map(|(_, s)| s)));
        assert_eq!(
            outer_rows.to_vec().unwrap(),
            vec![(1, Some("a")), (1, Some("b")), (2, Some("c")), (3, None)]
        );
    }

    #[test]
    fn group_join_yields_every_outer_row() {
        let outer = Enumerable::from_vec(vec![1, 2, 3]);
        let inner = Enumerable::from_vec(vec![(1, "a"), (1, "b"), (2, "c")]);
        let rows = outer.group_join(&inner, |o| *o, |(k, _)| *k, |o, matches| (o, matches.count().unwrap()));
        assert_eq!(rows.to_vec().unwrap(), vec![(1, 2), (2, 1), (3, 0)]);
    }
}
