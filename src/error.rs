use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the collections and the query engine report to their caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A constructor or operator received a parameter it cannot work with,
    /// e.g. a B-tree degree below 2 or a chunk size of zero.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A uniqueness-enforcing add found the key already present.
    #[error("key already exists")]
    KeyAlreadyExists,
    /// An update-by-key did not find the key.
    #[error("key not found")]
    KeyNotFound,
    /// Positional access past the end of a sequence.
    #[error("index {index} is out of range for a sequence of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
    /// A single-use sequence was asked for a second enumeration.
    #[error("single-use sequence has already been enumerated")]
    AlreadyEnumerated,
    #[error("sequence contains no elements")]
    NoElements,
    #[error("sequence contains no matching element")]
    NoMatchingElement,
    #[error("sequence contains more than one element")]
    MoreThanOneElement,
    #[error("sequence contains more than one matching element")]
    MoreThanOneMatchingElement,
    /// Structural corruption of a tree. Always a bug in this crate.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    /// Returns true for the four "expected exactly one / at least one" failures.
    pub fn is_cardinality(&self) -> bool {
        matches!(
            self,
            Error::NoElements | Error::NoMatchingElement | Error::MoreThanOneElement | Error::MoreThanOneMatchingElement
        )
    }
}

/// Aborts the current mutation after detecting structural corruption.
#[cold]
#[track_caller]
pub(crate) fn corrupted(message: &str) -> ! {
    panic!("{}", Error::internal(message))
}
