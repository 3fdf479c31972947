//! A lazy, pull-based query engine.
//!
//! An [`Enumerable`] is a *recipe* for a sequence: it holds a factory that produces a
//! fresh [`Enumerator`] every time the sequence is iterated. Operators such as
//! [`select`](Enumerable::select), [`filter`](Enumerable::filter) or
//! [`order_by`](Enumerable::order_by) wrap that factory in another one and do no work
//! until an element is pulled. Terminal operations such as [`to_vec`](Enumerable::to_vec)
//! or [`first`](Enumerable::first) drive the pipeline once.
//!
//! ```
//! use tree_query::Enumerable;
//!
//! let query = Enumerable::range(0, 10)?
//!     .filter(|n| n % 2 == 1)
//!     .select(|n| n * n);
//!
//! assert_eq!(query.to_vec()?, vec![1, 9, 25, 49, 81]);
//! // A replayable source can be iterated again.
//! assert_eq!(query.count()?, 5);
//! # Ok::<(), tree_query::Error>(())
//! ```
//!
//! Sources built with [`Enumerable::once`] can be iterated a single time; asking for a
//! second enumerator reports [`Error::AlreadyEnumerated`](crate::Error::AlreadyEnumerated).

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

mod aggregate;
mod conversion;
mod element;
mod grouping;
mod ordering;
mod partition;
mod projection;
mod set_ops;
mod source;

pub use grouping::Grouping;
pub use ordering::OrderedEnumerable;

type Factory<'a, T> = dyn Fn() -> Result<Enumerator<'a, T>> + 'a;

/// A replayable lazy sequence of `T`.
///
/// Cloning an `Enumerable` is cheap and shares the underlying factory. The lifetime `'a`
/// bounds everything the pipeline borrows, e.g. the tree behind
/// [`RbTree::enumerable`](crate::RbTree::enumerable).
pub struct Enumerable<'a, T> {
    factory: Rc<Factory<'a, T>>,
}

/// One in-progress traversal of an [`Enumerable`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Enumerator<'a, T> {
    inner: Box<dyn Iterator<Item = T> + 'a>,
}

impl<'a, T> Enumerator<'a, T> {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'a,
    {
        Self { inner: Box::new(iter) }
    }
}

impl<T> Iterator for Enumerator<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> fmt::Debug for Enumerator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator").finish_non_exhaustive()
    }
}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Builds a sequence from a factory. The factory runs once per iteration, so a
    /// factory that rebuilds its iterator yields independent traversals.
    ///
    /// ```
    /// use tree_query::Enumerable;
    ///
    /// let letters = Enumerable::new(|| "abc".chars());
    /// assert_eq!(letters.to_vec()?, vec!['a', 'b', 'c']);
    /// assert_eq!(letters.to_vec()?, vec!['a', 'b', 'c']);
    /// # Ok::<(), tree_query::Error>(())
    /// ```
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_factory(move || Ok(Enumerator::new(factory().into_iter())))
    }

    pub(crate) fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Enumerator<'a, T>> + 'a,
    {
        Self {
            factory: Rc::new(factory),
        }
    }

    /// Starts a new traversal.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyEnumerated`](crate::Error::AlreadyEnumerated) when a single-use
    /// source in the pipeline has already been consumed.
    pub fn iter(&self) -> Result<Enumerator<'a, T>> {
        (self.factory)()
    }

    /// Derives a sequence whose traversals are `stage` applied to a traversal of `self`.
    pub(crate) fn pipe<U, F>(&self, stage: F) -> Enumerable<'a, U>
    where
        U: 'a,
        F: Fn(Enumerator<'a, T>) -> Enumerator<'a, U> + 'a,
    {
        let source = self.clone();
        Enumerable::from_factory(move || source.iter().map(&stage))
    }
}

impl<T> Clone for Enumerable<'_, T> {
    fn clone(&self) -> Self {
        Self {
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Enumerable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerable").finish_non_exhaustive()
    }
}

impl<'a, T: 'a> IntoIterator for &Enumerable<'a, T> {
    type Item = T;
    type IntoIter = Enumerator<'a, T>;

    /// # Panics
    ///
    /// Panics if a single-use source in the pipeline has already been consumed. Use
    /// [`Enumerable::iter`] to handle that case.
    fn into_iter(self) -> Enumerator<'a, T> {
        match self.iter() {
            Ok(enumerator) => enumerator,
            Err(error) => panic!("{error}"),
        }
    }
}
