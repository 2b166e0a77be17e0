use std::fmt;

use serde::Serialize;

use crate::{
    error::InvalidOperation,
    ids::{BookId, UserId},
};

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Identifier assigned by the owning library
    id: UserId,
    /// Display name
    name: String,
    /// Books currently held, in the order they were borrowed, no duplicates
    borrowed: Vec<BookId>,
}

impl User {
    /// Create a user holding no books
    pub(crate) fn new(id: UserId, name: String) -> Self {
        Self { id, name, borrowed: Vec::new() }
    }

    /// Identifier assigned by the owning library
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books currently held, oldest loan first
    #[must_use]
    pub fn borrowed_books(&self) -> &[BookId] {
        &self.borrowed
    }

    /// Whether this user currently holds `book_id`
    #[must_use]
    pub fn holds(&self, book_id: BookId) -> bool {
        self.borrowed.contains(&book_id)
    }

    /// Number of books currently held
    #[must_use]
    pub fn loan_count(&self) -> usize {
        self.borrowed.len()
    }

    /// Record a new loan
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation::DuplicateLoan` if the user already holds the book.
    pub(crate) fn borrow_book(&mut self, book_id: BookId) -> Result<(), InvalidOperation> {
        if self.holds(book_id) {
            return Err(InvalidOperation::DuplicateLoan { user: self.id, book: book_id });
        }
        self.borrowed.push(book_id);
        Ok(())
    }

    /// Drop a loan
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation::LoanNotHeld` if the user does not hold the book.
    pub(crate) fn return_book(&mut self, book_id: BookId) -> Result<(), InvalidOperation> {
        let Some(pos) = self.borrowed.iter().position(|held| *held == book_id) else {
            return Err(InvalidOperation::LoanNotHeld { user: self.id, book: book_id });
        };
        self.borrowed.remove(pos);
        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loans: Vec<String> = self.borrowed.iter().map(ToString::to_string).collect();
        write!(f, "<User id={} name={:?} loans=[{}]>", self.id, self.name, loans.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new(UserId::new(1), "Alice".to_string())
    }

    #[test]
    fn test_borrow_book() {
        let mut user = alice();
        assert!(user.borrow_book(BookId::new(1)).is_ok());
        assert!(user.borrow_book(BookId::new(2)).is_ok());

        assert_eq!(user.borrowed_books(), &[BookId::new(1), BookId::new(2)]);
        assert_eq!(user.loan_count(), 2);
    }

    #[test]
    fn test_borrow_same_book_twice_fails() {
        let mut user = alice();
        assert!(user.borrow_book(BookId::new(1)).is_ok());

        let result = user.borrow_book(BookId::new(1));
        assert_eq!(
            result,
            Err(InvalidOperation::DuplicateLoan { user: UserId::new(1), book: BookId::new(1) })
        );
        assert_eq!(user.loan_count(), 1);
    }

    #[test]
    fn test_return_book_keeps_order() {
        let mut user = alice();
        for raw in 1..=3 {
            assert!(user.borrow_book(BookId::new(raw)).is_ok());
        }

        assert!(user.return_book(BookId::new(2)).is_ok());
        assert_eq!(user.borrowed_books(), &[BookId::new(1), BookId::new(3)]);
    }

    #[test]
    fn test_return_book_not_held_fails() {
        let mut user = alice();
        let result = user.return_book(BookId::new(9));
        assert_eq!(
            result,
            Err(InvalidOperation::LoanNotHeld { user: UserId::new(1), book: BookId::new(9) })
        );
    }

    #[test]
    fn test_display() {
        let mut user = alice();
        assert_eq!(user.to_string(), "<User id=1 name=\"Alice\" loans=[]>");

        assert!(user.borrow_book(BookId::new(4)).is_ok());
        assert!(user.borrow_book(BookId::new(2)).is_ok());
        assert_eq!(user.to_string(), "<User id=1 name=\"Alice\" loans=[4, 2]>");
    }
}
