use std::iter;
use std::rc::Rc;

use super::{Enumerable, Enumerator};

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Maps every element through `selector`.
    pub fn select<U, F>(&self, selector: F) -> Enumerable<'a, U>
    where
        U: 'a,
        F: Fn(T) -> U + 'a,
    {
        let selector = Rc::new(selector);
        self.pipe(move |items| {
            let selector = Rc::clone(&selector);
            Enumerator::new(items.map(move |item| selector(item)))
        })
    }

    /// Maps every element and its zero-based position through `selector`.
    pub fn select_indexed<U, F>(&self, selector: F) -> Enumerable<'a, U>
    where
        U: 'a,
        F: Fn(T, usize) -> U + 'a,
    {
        let selector = Rc::new(selector);
        self.pipe(move |items| {
            let selector = Rc::clone(&selector);
            Enumerator::new(items.enumerate().map(move |(index, item)| selector(item, index)))
        })
    }

    /// Keeps the elements satisfying `predicate` (LINQ `where`).
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'a,
    {
        let predicate = Rc::new(predicate);
        self.pipe(move |items| {
            let predicate = Rc::clone(&predicate);
            Enumerator::new(items.filter(move |item| predicate(item)))
        })
    }

    /// Keeps the elements for which `predicate(element, position)` holds.
    pub fn filter_indexed<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'a,
    {
        let predicate = Rc::new(predicate);
        self.pipe(move |items| {
            let predicate = Rc::clone(&predicate);
            Enumerator::new(
                items
                    .enumerate()
                    .filter(move |(index, item)| predicate(item, *index))
                    .map(|(_, item)| item),
            )
        })
    }

    /// Maps every element to a sequence and flattens the results.
    pub fn select_many<U, I, F>(&self, selector: F) -> Enumerable<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: Fn(T) -> I + 'a,
    {
        let selector = Rc::new(selector);
        self.pipe(move |items| {
            let selector = Rc::clone(&selector);
            Enumerator::new(items.flat_map(move |item| selector(item)))
        })
    }

    /// Keeps the elements `discriminator` recognises, converted to `U`.
    ///
    /// ```
    /// use tree_query::Enumerable;
    ///
    /// #[derive(Clone)]
    /// enum Shape { Circle(f64), Square(f64) }
    ///
    /// let shapes = Enumerable::from_vec(vec![Shape::Circle(1.0), Shape::Square(2.0), Shape::Circle(3.0)]);
    /// let radii = shapes.of_type(|shape| match shape {
    ///     Shape::Circle(radius) => Some(radius),
    ///     Shape::Square(_) => None,
    /// });
    /// assert_eq!(radii.to_vec()?, vec![1.0, 3.0]);
    /// # Ok::<(), tree_query::Error>(())
    /// ```
    pub fn of_type<U, F>(&self, discriminator: F) -> Enumerable<'a, U>
    where
        U: 'a,
        F: Fn(T) -> Option<U> + 'a,
    {
        let discriminator = Rc::new(discriminator);
        self.pipe(move |items| {
            let discriminator = Rc::clone(&discriminator);
            Enumerator::new(items.filter_map(move |item| discriminator(item)))
        })
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: &Enumerable<'a, T>) -> Self {
        let (first, second) = (self.clone(), other.clone());
        Enumerable::from_factory(move || Ok(Enumerator::new(first.iter()?.chain(second.iter()?))))
    }

    /// `self` followed by `item`.
    pub fn append(&self, item: T) -> Self
    where
        T: Clone,
    {
        self.pipe(move |items| Enumerator::new(items.chain(iter::once(item.clone()))))
    }

    /// `item` followed by `self`.
    pub fn prepend(&self, item: T) -> Self
    where
        T: Clone,
    {
        self.pipe(move |items| Enumerator::new(iter::once(item.clone()).chain(items)))
    }

    /// `self`, or the single element `default` when `self` is empty.
    pub fn default_if_empty(&self, default: T) -> Self
    where
        T: Clone,
    {
        self.pipe(move |mut items| {
            let mut fallback = Some(default.clone());
            Enumerator::new(iter::from_fn(move || match items.next() {
                Some(item) => {
                    fallback = None;
                    Some(item)
                }
                None => fallback.take(),
            }))
        })
    }

    /// The elements in reverse order. Buffers the whole source on the first pull.
    pub fn reverse(&self) -> Self {
        self.pipe(|items| {
            let mut buffered: Option<Vec<T>> = None;
            let mut items = Some(items);
            Enumerator::new(iter::from_fn(move || {
                if let Some(items) = items.take() {
                    buffered = Some(items.collect());
                }
                buffered.as_mut()?.pop()
            }))
        })
    }

    /// Pairs elements positionally; stops at the end of the shorter sequence.
    pub fn zip<U: 'a>(&self, other: &Enumerable<'a, U>) -> Enumerable<'a, (T, U)> {
        let (first, second) = (self.clone(), other.clone());
        Enumerable::from_factory(move || Ok(Enumerator::new(first.iter()?.zip(second.iter()?))))
    }
}
