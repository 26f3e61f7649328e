//! Errors returned by tree operations.
//!
//! Most lookups signal absence with `None`. Only [`Tree::remove`] treats a missing item as a
//! failure, and only when the tree is non-empty.
//!
//! [`Tree::remove`]: crate::linked::Tree::remove

use thiserror::Error;

/// The ways an operation on a [`Tree`](crate::linked::Tree) can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The item asked for is not in the tree.
    #[error("item not in tree")]
    NotFound,
}

/// Shorthand for results whose error is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
