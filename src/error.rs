//! Error types for library operations.

use thiserror::Error;

use crate::ids::{BookId, UserId};

/// The entity an identifier failed to resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Missing {
    /// No book with this identifier
    #[error("no book with id={0}")]
    Book(BookId),
    /// No user with this identifier
    #[error("no user with id={0}")]
    User(UserId),
}

/// A transition refused because it would break a lending rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOperation {
    /// The book is already on loan
    #[error("book id={0} is not available for borrowing")]
    BookUnavailable(BookId),
    /// A borrowed book cannot leave the catalog
    #[error("cannot remove book id={0} while it is borrowed")]
    BookInUse(BookId),
    /// A user holding books cannot be removed
    #[error("cannot remove user id={user} while they hold {loans} book(s)")]
    UserHasLoans { user: UserId, loans: usize },
    /// The user does not hold the book being returned
    #[error("user id={user} has not borrowed book id={book}")]
    LoanNotHeld { user: UserId, book: BookId },
    /// The user already holds this book
    #[error("user id={user} already holds book id={book}")]
    DuplicateLoan { user: UserId, book: BookId },
    /// Status text other than `available` or `borrowed`
    #[error("invalid status {0:?}, expected \"available\" or \"borrowed\"")]
    InvalidStatus(String),
}

/// Error returned by every fallible `Library` operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// An identifier does not resolve to an existing entity
    #[error("not found: {0}")]
    NotFound(#[from] Missing),
    /// The entity exists but the requested transition is not allowed
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] InvalidOperation),
}

impl LibraryError {
    /// True for [`LibraryError::NotFound`]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for [`LibraryError::InvalidOperation`]
    #[must_use]
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }
}

/// Shorthand for results of library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
