use std::collections::VecDeque;
use std::collections::vec_deque;
use std::iter::Fuse;
use std::rc::Rc;

use super::{Enumerable, Enumerator};
use crate::error::{Error, Result};

/// Holds back the last `count` elements; they are dropped when the source ends.
struct SkipLast<'a, T> {
    items: Fuse<Enumerator<'a, T>>,
    held: VecDeque<T>,
    count: usize,
}

impl<T> Iterator for SkipLast<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            self.held.push_back(self.items.next()?);
            if self.held.len() > self.count {
                return self.held.pop_front();
            }
        }
    }
}

enum TakeLast<'a, T> {
    Pending(Enumerator<'a, T>, usize),
    Draining(vec_deque::IntoIter<T>),
}

impl<T> Iterator for TakeLast<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let TakeLast::Pending(items, count) = self {
            let count = *count;
            let mut kept = VecDeque::new();
            if count > 0 {
                for item in items {
                    if kept.len() == count {
                        kept.pop_front();
                    }
                    kept.push_back(item);
                }
            }
            *self = TakeLast::Draining(kept.into_iter());
        }
        match self {
            TakeLast::Draining(kept) => kept.next(),
            TakeLast::Pending(..) => None,
        }
    }
}

struct Chunks<'a, T> {
    items: Fuse<Enumerator<'a, T>>,
    size: usize,
}

impl<T> Iterator for Chunks<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        let chunk: Vec<T> = self.items.by_ref().take(self.size).collect();
        (!chunk.is_empty()).then_some(chunk)
    }
}

struct Windows<'a, T> {
    items: Fuse<Enumerator<'a, T>>,
    window: VecDeque<T>,
    size: usize,
}

impl<T: Clone> Iterator for Windows<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.window.len() == self.size {
            self.window.pop_front();
        }
        while self.window.len() < self.size {
            self.window.push_back(self.items.next()?);
        }
        Some(self.window.iter().cloned().collect())
    }
}

struct Pairwise<'a, T> {
    items: Fuse<Enumerator<'a, T>>,
    previous: Option<T>,
}

impl<T: Clone> Iterator for Pairwise<'_, T> {
    type Item = (T, T);

    fn next(&mut self) -> Option<(T, T)> {
        if self.previous.is_none() {
            self.previous = Some(self.items.next()?);
        }
        let current = self.items.next()?;
        let previous = self.previous.replace(current.clone())?;
        Some((previous, current))
    }
}

impl<'a, T: 'a> Enumerable<'a, T> {
    /// Bypasses the first `count` elements.
    pub fn skip(&self, count: usize) -> Self {
        self.pipe(move |items| Enumerator::new(items.skip(count)))
    }

    /// Yields at most the first `count` elements; the source is not pulled further.
    pub fn take(&self, count: usize) -> Self {
        self.pipe(move |items| Enumerator::new(items.take(count)))
    }

    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'a,
    {
        let predicate = Rc::new(predicate);
        self.pipe(move |items| {
            let predicate = Rc::clone(&predicate);
            Enumerator::new(items.skip_while(move |item| predicate(item)))
        })
    }

    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'a,
    {
        let predicate = Rc::new(predicate);
        self.pipe(move |items| {
            let predicate = Rc::clone(&predicate);
            Enumerator::new(items.take_while(move |item| predicate(item)))
        })
    }

    /// Drops the last `count` elements, buffering no more than `count` at a time.
    pub fn skip_last(&self, count: usize) -> Self {
        self.pipe(move |items| {
            Enumerator::new(SkipLast {
                items: items.fuse(),
                held: VecDeque::new(),
                count,
            })
        })
    }

    /// Keeps only the last `count` elements. The whole source is read on the first pull,
    /// buffering no more than `count` elements.
    pub fn take_last(&self, count: usize) -> Self {
        self.pipe(move |items| Enumerator::new(TakeLast::Pending(items, count)))
    }

    /// Splits the sequence into consecutive chunks of `size`; the last may be shorter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `size` is 0.
    pub fn chunk(&self, size: usize) -> Result<Enumerable<'a, Vec<T>>> {
        if size == 0 {
            return Err(Error::InvalidArgument("chunk size must be positive".into()));
        }
        Ok(self.pipe(move |items| Enumerator::new(Chunks { items: items.fuse(), size })))
    }

    /// Every run of `size` consecutive elements, sliding by one. A source shorter than
    /// `size` yields nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `size` is 0.
    pub fn windows(&self, size: usize) -> Result<Enumerable<'a, Vec<T>>>
    where
        T: Clone,
    {
        if size == 0 {
            return Err(Error::InvalidArgument("window size must be positive".into()));
        }
        Ok(self.pipe(move |items| {
            Enumerator::new(Windows {
                items: items.fuse(),
                window: VecDeque::new(),
                size,
            })
        }))
    }

    /// Each element paired with its successor.
    pub fn pairwise(&self) -> Enumerable<'a, (T, T)>
    where
        T: Clone,
    {
        self.pipe(|items| Enumerator::new(Pairwise {
                items: items.fuse(),
                previous: None,
            }))
    }
}
