//! Ordered collections and a lazy query engine for Rust.
//!
//! This crate provides two self-balancing search trees and a pull-based, LINQ-style
//! sequence algebra that runs over them (or over any other iterable source):
//!
//! - [`RbTree`] - a red-black binary search tree with arena-allocated nodes
//! - [`BTree`] - a B-tree of configurable minimum degree with top-down split and merge
//! - [`Enumerable`] - a replayable lazy sequence with projection, filtering, set algebra,
//!   joins, grouping, stable ordering, windowing and aggregation
//! - [`SortedDictionary`], [`SortedSet`] and [`Lookup`] - containers layered on the
//!   red-black tree
//!
//! # Example
//!
//! ```
//! use tree_query::{Enumerable, SortedDictionary};
//!
//! let mut scores = SortedDictionary::new();
//! scores.add("Carol", 92)?;
//! scores.add("Alice", 100)?;
//! scores.add("Bob", 85)?;
//!
//! // Entries come out in key order, and queries are evaluated lazily.
//! let passing = scores
//!     .enumerable()
//!     .filter(|(_, score)| *score >= 90)
//!     .select(|(name, _)| name);
//! assert_eq!(passing.to_vec()?, vec!["Alice", "Carol"]);
//!
//! // Stable multi-key ordering.
//! let runs = Enumerable::from_vec(vec![("b", 2), ("a", 2), ("c", 1)]);
//! let ordered = runs.order_by(|(_, n)| *n).then_by(|(s, _)| *s);
//! assert_eq!(ordered.as_enumerable().to_vec()?, vec![("c", 1), ("a", 2), ("b", 2)]);
//! # Ok::<(), tree_query::Error>(())
//! ```
//!
//! # Ordering and equality
//!
//! Every ordered structure is parameterised by a [`Comparator`], defaulting to
//! [`Natural`] (the type's [`Ord`]). Any `Fn(&T, &T) -> Ordering` closure is a comparator,
//! and any `Fn(&T, &T) -> bool` closure is an [`EqualityComparator`].
//!
//! # Errors
//!
//! Fallible operations return [`Result`] with the crate's [`Error`]. A tree that detects
//! its own structural corruption while mutating panics; `validate()` reports the same
//! conditions as [`Error::Internal`] without panicking.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod error;
mod raw;

pub mod btree;
pub mod comparator;
pub mod enumerable;
pub mod lookup;
pub mod rb_tree;
pub mod sorted_dictionary;
pub mod sorted_set;

pub use btree::BTree;
pub use comparator::{Comparator, EqualityComparator, Natural, Reversed, Structural};
pub use enumerable::{Enumerable, Enumerator, Grouping, OrderedEnumerable};
pub use error::{Error, Result};
pub use lookup::Lookup;
pub use rb_tree::RbTree;
pub use sorted_dictionary::SortedDictionary;
pub use sorted_set::SortedSet;
