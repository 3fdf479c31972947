//! Element access. Every method here drives the pipeline once.
//!
//! The `*_or_default` forms turn "wrong number of elements" into `Ok(None)`; only a
//! failure to start the traversal is still reported as an error.

use super::Enumerable;
use crate::error::{Error, Result};

fn or_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(item) => Ok(Some(item)),
        Err(error) if error.is_cardinality() || matches!(error, Error::IndexOutOfRange { .. }) => Ok(None),
        Err(error) => Err(error),
    }
}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// The first element, or [`Error::NoElements`].
    pub fn first(&self) -> Result<T> {
        self.iter()?.next().ok_or(Error::NoElements)
    }

    /// The first element matching `predicate`.
    ///
    /// # Errors
    ///
    /// [`Error::NoElements`] when the sequence is empty, [`Error::NoMatchingElement`]
    /// when it is not but nothing matches.
    pub fn first_by<P>(&self, mut predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut items = self.iter()?;
        let head = items.next().ok_or(Error::NoElements)?;
        if predicate(&head) {
            return Ok(head);
        }
        items.find(|item| predicate(item)).ok_or(Error::NoMatchingElement)
    }

    pub fn last(&self) -> Result<T> {
        self.iter()?.last().ok_or(Error::NoElements)
    }

    /// The last element matching `predicate`; errors as for [`first_by`](Enumerable::first_by).
    pub fn last_by<P>(&self, mut predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut seen = false;
        let mut found = None;
        for item in self.iter()? {
            seen = true;
            if predicate(&item) {
                found = Some(item);
            }
        }
        match found {
            Some(item) => Ok(item),
            None if seen => Err(Error::NoMatchingElement),
            None => Err(Error::NoElements),
        }
    }

    /// The only element.
    ///
    /// # Errors
    ///
    /// [`Error::NoElements`] or [`Error::MoreThanOneElement`].
    pub fn single(&self) -> Result<T> {
        let mut items = self.iter()?;
        let only = items.next().ok_or(Error::NoElements)?;
        match items.next() {
            Some(_) => Err(Error::MoreThanOneElement),
            None => Ok(only),
        }
    }

    /// The only element matching `predicate`. Reads the whole sequence to prove there is
    /// no second match.
    ///
    /// # Errors
    ///
    /// [`Error::NoElements`], [`Error::NoMatchingElement`] or
    /// [`Error::MoreThanOneMatchingElement`].
    pub fn single_by<P>(&self, mut predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut seen = false;
        let mut found = None;
        for item in self.iter()? {
            seen = true;
            if predicate(&item) {
                if found.is_some() {
                    return Err(Error::MoreThanOneMatchingElement);
                }
                found = Some(item);
            }
        }
        match found {
            Some(item) => Ok(item),
            None if seen => Err(Error::NoMatchingElement),
            None => Err(Error::NoElements),
        }
    }

    /// The element at zero-based `index`, or [`Error::IndexOutOfRange`].
    pub fn element_at(&self, index: usize) -> Result<T> {
        let mut len = 0;
        for item in self.iter()? {
            if len == index {
                return Ok(item);
            }
            len += 1;
        }
        Err(Error::IndexOutOfRange { index, len })
    }

    pub fn first_or_default(&self) -> Result<Option<T>> {
        or_none(self.first())
    }

    pub fn first_by_or_default<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        or_none(self.first_by(predicate))
    }

    pub fn last_or_default(&self) -> Result<Option<T>> {
        or_none(self.last())
    }

    pub fn last_by_or_default<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        or_none(self.last_by(predicate))
    }

    /// Like [`single`](Enumerable::single), but `Ok(None)` for zero or several elements.
    pub fn single_or_default(&self) -> Result<Option<T>> {
        or_none(self.single())
    }

    pub fn single_by_or_default<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        or_none(self.single_by(predicate))
    }

    pub fn element_at_or_default(&self, index: usize) -> Result<Option<T>> {
        or_none(self.element_at(index))
    }
}
