use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{error::InvalidOperation, ids::BookId};

/// Lending status of a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    /// Book is on the shelf and can be borrowed
    #[default]
    Available,
    /// Book is on loan to a user
    Borrowed,
}

impl BookStatus {
    /// Get a human-readable description of the status
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Available => "Book is available for borrowing",
            Self::Borrowed => "Book is on loan",
        }
    }

    /// Lowercase name used in text input and listings
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Borrowed => "borrowed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = InvalidOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "borrowed" => Ok(Self::Borrowed),
            _ => Err(InvalidOperation::InvalidStatus(s.to_string())),
        }
    }
}

/// A catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Identifier assigned by the owning library
    id: BookId,
    /// Title as entered
    title: String,
    /// Author as entered
    author: String,
    /// Current lending status
    status: BookStatus,
}

impl Book {
    /// Create an available book
    pub(crate) fn new(id: BookId, title: String, author: String) -> Self {
        Self { id, title, author, status: BookStatus::Available }
    }

    /// Identifier assigned by the owning library
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Title as entered
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author as entered
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Current lending status
    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Whether the book can be borrowed right now
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Move the book from available to borrowed
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation::BookUnavailable` if the book is already borrowed.
    pub(crate) fn borrow(&mut self) -> Result<(), InvalidOperation> {
        if !self.is_available() {
            return Err(InvalidOperation::BookUnavailable(self.id));
        }
        self.status = BookStatus::Borrowed;
        Ok(())
    }

    /// Put the book back on the shelf. Returning an available book is a no-op.
    pub(crate) fn return_book(&mut self) {
        self.status = BookStatus::Available;
    }

    /// Overwrite the status without any transition check
    pub(crate) fn force_status(&mut self, status: BookStatus) {
        self.status = status;
    }

    /// Case-insensitive substring match on the title
    pub(crate) fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }

    /// Case-insensitive substring match on the author
    pub(crate) fn author_contains(&self, needle_lower: &str) -> bool {
        self.author.to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Book id={} title={:?} author={:?} status={}>",
            self.id, self.title, self.author, self.status
        )
    }
}
