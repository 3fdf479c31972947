use std::cell::RefCell;
use std::iter;

use super::{Enumerable, Enumerator};
use crate::error::{Error, Result};

impl<'a, T: 'a> Enumerable<'a, T> {
    /// A sequence that yields clones of `items` on every iteration.
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Self::new(move || items.clone())
    }

    /// A sequence that yields clones of the borrowed `items`.
    pub fn from_slice(items: &'a [T]) -> Self
    where
        T: Clone,
    {
        Self::new(move || items.iter().cloned())
    }

    pub fn empty() -> Self {
        Self::new(iter::empty)
    }

    /// `count` clones of `item`.
    pub fn repeat(item: T, count: usize) -> Self
    where
        T: Clone,
    {
        Self::new(move || iter::repeat_n(item.clone(), count))
    }

    /// A single-use sequence over `items`. The first traversal consumes the source; every
    /// later one fails with [`Error::AlreadyEnumerated`] rather than silently yielding
    /// nothing.
    ///
    /// ```
    /// use tree_query::{Enumerable, Error};
    ///
    /// let lines = Enumerable::once(vec!["a", "b"]);
    /// assert_eq!(lines.count()?, 2);
    /// assert_eq!(lines.count(), Err(Error::AlreadyEnumerated));
    /// # Ok::<(), tree_query::Error>(())
    /// ```
    pub fn once<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        let slot = RefCell::new(Some(items.into_iter()));
        Self::from_factory(move || match slot.borrow_mut().take() {
            Some(items) => Ok(Enumerator::new(items)),
            None => Err(Error::AlreadyEnumerated),
        })
    }
}

impl Enumerable<'_, i64> {
    /// `count` consecutive integers starting at `start`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the last value would overflow `i64`.
    pub fn range(start: i64, count: usize) -> Result<Self> {
        let fits = match i64::try_from(count) {
            Ok(0) => true,
            Ok(count) => start.checked_add(count - 1).is_some(),
            Err(_) => false,
        };
        if !fits {
            return Err(Error::InvalidArgument(format!("range of {count} from {start} overflows")));
        }
        Ok(Self::new(move || (0..count).map(move |offset| start + offset as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replayable_sources_repeat() {
        let words = Enumerable::from_vec(vec!["x", "y"]);
        assert_eq!(words.to_vec().unwrap(), words.to_vec().unwrap());

        let backing = [1, 2, 3];
        let borrowed = Enumerable::from_slice(&backing);
        assert_eq!(borrowed.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn generators() {
        assert_eq!(Enumerable::<u8>::empty().to_vec().unwrap(), Vec::<u8>::new());
        assert_eq!(Enumerable::repeat('z', 3).to_vec().unwrap(), vec!['z', 'z', 'z']);
        assert_eq!(Enumerable::range(-2, 4).unwrap().to_vec().unwrap(), vec![-2, -1, 0, 1]);
        assert_eq!(Enumerable::range(5, 0).unwrap().count().unwrap(), 0);
    }

    #[test]
    fn range_rejects_overflow() {
        assert!(Enumerable::range(i64::MAX, 1).is_ok());
        assert!(matches!(Enumerable::range(i64::MAX, 2), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn once_fails_on_second_acquisition() {
        let numbers = Enumerable::once(1..=3);
        assert_eq!(numbers.iter().unwrap().sum::<i32>(), 6);
        assert!(matches!(numbers.iter(), Err(Error::AlreadyEnumerated)));
    }
}
