use std::ops::Add;

use super::Enumerable;
use crate::comparator::{Comparator, EqualityComparator};
use crate::error::{Error, Result};

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Folds the sequence using its first element as the seed.
    ///
    /// ```
    /// use tree_query::Enumerable;
    ///
    /// let words = Enumerable::from_vec(vec!["pull", "based", "query"]);
    /// let longest = words.aggregate(|best, word| if word.len() > best.len() { word } else { best })?;
    /// assert_eq!(longest, "based");
    /// # Ok::<(), tree_query::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::NoElements`] on an empty sequence.
    pub fn aggregate<F>(&self, f: F) -> Result<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.iter()?.reduce(f).ok_or(Error::NoElements)
    }

    /// Folds the sequence starting from `seed`; an empty sequence yields `seed`.
    pub fn aggregate_seed<A, F>(&self, seed: A, f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        Ok(self.iter()?.fold(seed, f))
    }

    /// [`aggregate_seed`](Enumerable::aggregate_seed) followed by a final projection.
    pub fn aggregate_select<A, R, F, S>(&self, seed: A, f: F, result: S) -> Result<R>
    where
        F: FnMut(A, T) -> A,
        S: FnOnce(A) -> R,
    {
        self.aggregate_seed(seed, f).map(result)
    }

    /// # Errors
    ///
    /// [`Error::NoElements`] on an empty sequence.
    pub fn sum(&self) -> Result<T>
    where
        T: Add<Output = T>,
    {
        self.aggregate(|total, item| total + item)
    }

    pub fn sum_by<N, F>(&self, mut selector: F) -> Result<N>
    where
        N: Add<Output = N>,
        F: FnMut(T) -> N,
    {
        self.iter()?
            .map(|item| selector(item))
            .reduce(|total, item| total + item)
            .ok_or(Error::NoElements)
    }

    /// Arithmetic mean using plain `f64` summation.
    ///
    /// # Errors
    ///
    /// [`Error::NoElements`] on an empty sequence.
    pub fn average(&self) -> Result<f64>
    where
        T: Into<f64>,
    {
        self.average_by(Into::into)
    }

    pub fn average_by<F>(&self, mut selector: F) -> Result<f64>
    where
        F: FnMut(T) -> f64,
    {
        let (total, count) = self
            .iter()?
            .fold((0.0, 0usize), |(total, count), item| (total + selector(item), count + 1));
        if count == 0 {
            return Err(Error::NoElements);
        }
        Ok(total / count as f64)
    }

    pub fn min(&self) -> Result<T>
    where
        T: Ord,
    {
        self.iter()?.min().ok_or(Error::NoElements)
    }

    pub fn max(&self) -> Result<T>
    where
        T: Ord,
    {
        self.iter()?.max().ok_or(Error::NoElements)
    }

    /// Smallest element under `comparator`; the first of several equal minima.
    pub fn min_by<C>(&self, comparator: C) -> Result<T>
    where
        C: Comparator<T>,
    {
        self.iter()?
            .min_by(|a, b| comparator.compare(a, b))
            .ok_or(Error::NoElements)
    }

    /// Largest element under `comparator`; the last of several equal maxima.
    pub fn max_by<C>(&self, comparator: C) -> Result<T>
    where
        C: Comparator<T>,
    {
        self.iter()?
            .max_by(|a, b| comparator.compare(a, b))
            .ok_or(Error::NoElements)
    }

    pub fn min_by_key<K, F>(&self, key: F) -> Result<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.iter()?.min_by_key(key).ok_or(Error::NoElements)
    }

    pub fn max_by_key<K, F>(&self, key: F) -> Result<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.iter()?.max_by_key(key).ok_or(Error::NoElements)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.iter()?.count())
    }

    pub fn count_by<P>(&self, mut predicate: P) -> Result<usize>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self.iter()?.filter(|item| predicate(item)).count())
    }

    /// True if the sequence has at least one element. Pulls at most one.
    pub fn any(&self) -> Result<bool> {
        Ok(self.iter()?.next().is_some())
    }

    pub fn any_by<P>(&self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self.iter()?.any(|item| predicate(&item)))
    }

    /// True if every element satisfies `predicate`; vacuously true when empty.
    pub fn all<P>(&self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self.iter()?.all(|item| predicate(&item)))
    }

    pub fn contains(&self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.iter()?.any(|item| item == *value))
    }

    pub fn contains_with<E>(&self, value: &T, equality: E) -> Result<bool>
    where
        E: EqualityComparator<T>,
    {
        Ok(self.iter()?.any(|item| equality.equals(&item, value)))
    }

    /// True if both sequences have the same length and pairwise-equal elements.
    pub fn sequence_equal(&self, other: &Self) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.iter()?.eq(other.iter()?))
    }

    pub fn sequence_equal_with<E>(&self, other: &Self, equality: E) -> Result<bool>
    where
        E: EqualityComparator<T>,
    {
        let (mut left, mut right) = (self.iter()?, other.iter()?);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ok(true),
                (Some(a), Some(b)) if equality.equals(&a, &b) => {}
                _ => return Ok(false),
            }
        }
    }
}
