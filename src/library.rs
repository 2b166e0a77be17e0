use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{
    book::{Book, BookStatus},
    error::{InvalidOperation, Missing, Result},
    events::LibraryEvent,
    ids::{BookId, IdSequence, UserId},
    observers::LibraryObserver,
    user::User,
};

/// Owned copy of the library state, for inspection and JSON export
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySnapshot {
    /// Every book, ascending by id
    pub books: Vec<Book>,
    /// Every user, ascending by id
    pub users: Vec<User>,
    /// Number of books held by each user
    pub loans_per_user: BTreeMap<UserId, usize>,
    /// Number of users per loan count
    pub loan_histogram: BTreeMap<usize, usize>,
}

/// Catalog, user registry and lending rules.
///
/// Every state change goes through a `&mut self` method here, so a book's
/// status and the holder's borrowed set are always updated together.
/// Failed operations leave the state untouched.
///
/// Not synchronized: callers sharing a `Library` must serialize access.
pub struct Library {
    /// Catalog keyed by book id
    books: BTreeMap<BookId, Book>,
    /// Registered users keyed by user id
    users: BTreeMap<UserId, User>,
    /// Source of fresh book ids
    book_ids: IdSequence<BookId>,
    /// Source of fresh user ids
    user_ids: IdSequence<UserId>,
    /// Registered state change observers
    observers: Vec<Box<dyn LibraryObserver>>,
}

// Manual implementation of Debug for Library
impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("books", &self.books)
            .field("users", &self.users)
            .field("book_ids", &self.book_ids)
            .field("user_ids", &self.user_ids)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self {
            books: BTreeMap::new(),
            users: BTreeMap::new(),
            book_ids: IdSequence::new(),
            user_ids: IdSequence::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of state changes
    pub fn register_observer(&mut self, observer: Box<dyn LibraryObserver>) {
        self.observers.push(observer);
    }

    /// Send an event to every observer
    fn dispatch(observers: &[Box<dyn LibraryObserver>], event: &LibraryEvent) {
        for observer in observers {
            observer.on_event(event);
        }
    }

    /// Look up a user or report it missing
    fn require_user(&self, user_id: UserId) -> Result<&User> {
        Ok(self.users.get(&user_id).ok_or(Missing::User(user_id))?)
    }

    /// Look up a book or report it missing
    fn require_book(&self, book_id: BookId) -> Result<&Book> {
        Ok(self.books.get(&book_id).ok_or(Missing::Book(book_id))?)
    }

    // ---------- Books ----------

    /// Add a new available book to the catalog
    pub fn add_book(&mut self, title: impl Into<String>, author: impl Into<String>) -> &Book {
        let id = self.book_ids.next_id();
        let book = self.books.entry(id).or_insert(Book::new(id, title.into(), author.into()));
        Self::dispatch(
            &self.observers,
            &LibraryEvent::BookAdded { book: id, title: book.title().to_string() },
        );
        book
    }

    /// Remove a book from the catalog. Only available books can be removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such book exists, then `InvalidOperation` if
    /// the book is currently borrowed.
    pub fn remove_book(&mut self, book_id: BookId) -> Result<bool> {
        if !self.require_book(book_id)?.is_available() {
            return Err(InvalidOperation::BookInUse(book_id).into());
        }
        self.books.remove(&book_id);
        Self::dispatch(&self.observers, &LibraryEvent::BookRemoved { book: book_id });
        Ok(true)
    }

    /// Administrative override of a book's status.
    ///
    /// This bypasses the borrow and return rules and does not touch any
    /// user's borrowed set. Forcing a held book to available (or an unheld
    /// book to borrowed) leaves the book and the users out of sync until
    /// the status is set back.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such book exists.
    pub fn set_book_status(&mut self, book_id: BookId, status: BookStatus) -> Result<()> {
        let book = self.books.get_mut(&book_id).ok_or(Missing::Book(book_id))?;
        let from = book.status();
        book.force_status(status);
        Self::dispatch(
            &self.observers,
            &LibraryEvent::StatusOverridden { book: book_id, from, to: status },
        );
        Ok(())
    }

    /// Textual form of [`Library::set_book_status`]. The status text is
    /// validated before the book is looked up.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for anything other than `available` or
    /// `borrowed`, then `NotFound` if no such book exists.
    pub fn set_book_status_str(&mut self, book_id: BookId, status: &str) -> Result<()> {
        let status: BookStatus = status.parse()?;
        self.set_book_status(book_id, status)
    }

    /// Look up a book by id
    #[must_use]
    pub fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.get(&book_id)
    }

    /// All books, ascending by id
    #[must_use]
    pub fn list_books(&self) -> Vec<&Book> {
        self.books.values().collect()
    }

    /// Books that can be borrowed right now
    #[must_use]
    pub fn list_available_books(&self) -> Vec<&Book> {
        self.books.values().filter(|book| book.is_available()).collect()
    }

    /// Books matching `query`, compared case-insensitively
    fn search(&self, query: &str, matches: impl Fn(&Book, &str) -> bool) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books.values().filter(|&book| matches(book, needle.as_str())).collect()
    }

    /// Books whose title contains `query`, ignoring case
    #[must_use]
    pub fn search_by_title(&self, query: &str) -> Vec<&Book> {
        self.search(query, Book::title_contains)
    }

    /// Books whose author contains `query`, ignoring case
    #[must_use]
    pub fn search_by_author(&self, query: &str) -> Vec<&Book> {
        self.search(query, Book::author_contains)
    }

    /// Books whose title or author contains `query`, ignoring case
    #[must_use]
    pub fn search_by_keyword(&self, query: &str) -> Vec<&Book> {
        self.search(query, |book, needle| book.title_contains(needle) || book.author_contains(needle))
    }

    // ---------- Users ----------

    /// Register a new user with no loans
    pub fn create_user(&mut self, name: impl Into<String>) -> &User {
        let id = self.user_ids.next_id();
        let user = self.users.entry(id).or_insert(User::new(id, name.into()));
        Self::dispatch(
            &self.observers,
            &LibraryEvent::UserCreated { user: id, name: user.name().to_string() },
        );
        user
    }

    /// Remove a user. Only users holding no books can be removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists, then `InvalidOperation` if
    /// the user still holds books.
    pub fn remove_user(&mut self, user_id: UserId) -> Result<bool> {
        let loans = self.require_user(user_id)?.loan_count();
        if loans > 0 {
            return Err(InvalidOperation::UserHasLoans { user: user_id, loans }.into());
        }
        self.users.remove(&user_id);
        Self::dispatch(&self.observers, &LibraryEvent::UserRemoved { user: user_id });
        Ok(true)
    }

    /// Look up a user by id
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    /// All users, ascending by id
    #[must_use]
    pub fn list_users(&self) -> Vec<&User> {
        self.users.values().collect()
    }

    // ---------- Loans ----------

    /// Lend a book to a user
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user, then the book, does not exist.
    /// Returns `InvalidOperation` if the book is not available or the user
    /// already holds it. Nothing is modified on error.
    pub fn borrow(&mut self, user_id: UserId, book_id: BookId) -> Result<()> {
        let user = self.users.get_mut(&user_id).ok_or(Missing::User(user_id))?;
        let book = self.books.get_mut(&book_id).ok_or(Missing::Book(book_id))?;

        // Both checks run before either side is touched
        if !book.is_available() {
            return Err(InvalidOperation::BookUnavailable(book_id).into());
        }
        if user.holds(book_id) {
            return Err(InvalidOperation::DuplicateLoan { user: user_id, book: book_id }.into());
        }

        book.borrow()?;
        user.borrow_book(book_id)?;
        Self::dispatch(&self.observers, &LibraryEvent::Borrowed { user: user_id, book: book_id });
        Ok(())
    }

    /// Take a book back from the user holding it
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user, then the book, does not exist.
    /// Returns `InvalidOperation` if the user does not hold the book.
    /// Nothing is modified on error.
    pub fn return_loan(&mut self, user_id: UserId, book_id: BookId) -> Result<()> {
        let user = self.users.get_mut(&user_id).ok_or(Missing::User(user_id))?;
        let book = self.books.get_mut(&book_id).ok_or(Missing::Book(book_id))?;

        user.return_book(book_id)?;
        book.return_book();
        Self::dispatch(&self.observers, &LibraryEvent::Returned { user: user_id, book: book_id });
        Ok(())
    }

    // ---------- Statistics ----------

    /// Number of books in the catalog
    #[must_use]
    pub fn total_books(&self) -> usize {
        self.books.len()
    }

    /// Number of registered users
    #[must_use]
    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    /// Number of books held by every registered user, zero included
    #[must_use]
    pub fn loans_per_user(&self) -> BTreeMap<UserId, usize> {
        self.users.values().map(|user| (user.id(), user.loan_count())).collect()
    }

    /// Number of users holding exactly `n` books, keyed by `n`
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn loan_histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for count in self.loans_per_user().into_values() {
            *histogram.entry(count).or_insert(0) += 1;
        }
        histogram
    }

    /// Copy the current state out of the library
    #[must_use]
    pub fn snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            books: self.books.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
            loans_per_user: self.loans_per_user(),
            loan_histogram: self.loan_histogram(),
        }
    }
}

#[cfg(test)]
mod tests;
