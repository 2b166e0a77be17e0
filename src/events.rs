use serde::Serialize;

use crate::{
    book::BookStatus,
    ids::{BookId, UserId},
};

/// State changes published by the library after they have been applied
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum LibraryEvent {
    /// A book entered the catalog
    BookAdded { book: BookId, title: String },
    /// A book left the catalog
    BookRemoved { book: BookId },
    /// A book's status was overwritten administratively
    StatusOverridden { book: BookId, from: BookStatus, to: BookStatus },
    /// A user was registered
    UserCreated { user: UserId, name: String },
    /// A user was removed
    UserRemoved { user: UserId },
    /// A user borrowed a book
    Borrowed { user: UserId, book: BookId },
    /// A user returned a book
    Returned { user: UserId, book: BookId },
}
