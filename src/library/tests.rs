use std::{cell::RefCell, rc::Rc};

use crate::{
    book::BookStatus,
    error::{InvalidOperation, LibraryError, Missing},
    events::LibraryEvent,
    ids::{BookId, UserId},
    library::Library,
    observers::LibraryObserver,
};

/// Observer that keeps every event it sees
#[derive(Debug, Default)]
struct RecordingObserver {
    /// Events in the order they were published
    events: Rc<RefCell<Vec<LibraryEvent>>>,
}

impl LibraryObserver for RecordingObserver {
    fn on_event(&self, event: &LibraryEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Helper function to set up a library with two books and two users
fn setup_test_library() -> (Library, [BookId; 2], [UserId; 2]) {
    let mut library = Library::new();
    let petit_prince = library.add_book("Le Petit Prince", "Antoine de Saint-Exupery").id();
    let orwell = library.add_book("1984", "George Orwell").id();
    let alice = library.create_user("Alice").id();
    let bob = library.create_user("Bob").id();
    (library, [petit_prince, orwell], [alice, bob])
}

#[test]
fn test_add_book() {
    let mut library = Library::new();
    let book = library.add_book("1984", "George Orwell");

    assert_eq!(book.id(), BookId::new(1));
    assert_eq!(book.title(), "1984");
    assert_eq!(book.author(), "George Orwell");
    assert!(book.is_available());
    assert_eq!(library.total_books(), 1);
}

#[test]
fn test_ids_are_scoped_to_each_library() {
    let mut first = Library::new();
    let mut second = Library::new();

    assert_eq!(first.add_book("A", "X").id(), BookId::new(1));
    assert_eq!(first.add_book("B", "Y").id(), BookId::new(2));
    assert_eq!(second.add_book("C", "Z").id(), BookId::new(1));
    assert_eq!(first.create_user("Alice").id(), UserId::new(1));
    assert_eq!(second.create_user("Bob").id(), UserId::new(1));
}

#[test]
fn test_removed_ids_are_not_reused() {
    let mut library = Library::new();
    let first = library.add_book("A", "X").id();
    assert_eq!(library.remove_book(first), Ok(true));

    assert_eq!(library.add_book("B", "Y").id(), BookId::new(2));
}

#[test]
fn test_remove_available_book() {
    let (mut library, [petit_prince, _], _) = setup_test_library();

    assert_eq!(library.remove_book(petit_prince), Ok(true));
    assert!(library.book(petit_prince).is_none());
    assert_eq!(library.total_books(), 1);
}

#[test]
fn test_remove_borrowed_book_fails() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    let result = library.remove_book(petit_prince);
    assert_eq!(result, Err(LibraryError::InvalidOperation(InvalidOperation::BookInUse(petit_prince))));
    assert!(library.book(petit_prince).is_some());
}

#[test]
fn test_remove_missing_book_fails() {
    let (mut library, _, _) = setup_test_library();

    let result = library.remove_book(BookId::new(99));
    assert_eq!(result, Err(LibraryError::NotFound(Missing::Book(BookId::new(99)))));
}

#[test]
fn test_set_book_status() {
    let (mut library, [petit_prince, _], _) = setup_test_library();

    assert!(library.set_book_status(petit_prince, BookStatus::Borrowed).is_ok());
    assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Borrowed));

    assert!(library.set_book_status_str(petit_prince, "available").is_ok());
    assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Available));
}

#[test]
fn test_set_book_status_invalid_value() {
    let (mut library, [petit_prince, _], _) = setup_test_library();

    let result = library.set_book_status_str(petit_prince, "lost");
    assert!(result.as_ref().is_err_and(LibraryError::is_invalid_operation));
    assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Available));
}

#[test]
fn test_set_book_status_rejects_padded_or_mixed_case() {
    let (mut library, [petit_prince, _], _) = setup_test_library();

    for text in [" borrowed\n", "BoRrOwEd", "\tAVAILABLE "] {
        let result = library.set_book_status_str(petit_prince, text);
        assert_eq!(
            result,
            Err(LibraryError::InvalidOperation(InvalidOperation::InvalidStatus(text.to_string())))
        );
        assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Available));
    }
}

#[test]
fn test_set_book_status_checks_value_before_book() {
    let (mut library, _, _) = setup_test_library();

    let result = library.set_book_status_str(BookId::new(99), "lost");
    assert!(result.as_ref().is_err_and(LibraryError::is_invalid_operation));

    let result = library.set_book_status_str(BookId::new(99), "borrowed");
    assert_eq!(result, Err(LibraryError::NotFound(Missing::Book(BookId::new(99)))));
}

#[test]
fn test_status_override_leaves_loans_alone() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    assert!(library.set_book_status(petit_prince, BookStatus::Available).is_ok());

    // Book says available, yet Alice still holds it
    assert!(library.book(petit_prince).is_some_and(|b| b.is_available()));
    assert!(library.user(alice).is_some_and(|u| u.holds(petit_prince)));
}

#[test]
fn test_borrow_after_override_does_not_duplicate() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());
    assert!(library.set_book_status(petit_prince, BookStatus::Available).is_ok());

    let result = library.borrow(alice, petit_prince);
    assert_eq!(
        result,
        Err(LibraryError::InvalidOperation(InvalidOperation::DuplicateLoan {
            user: alice,
            book: petit_prince
        }))
    );
    // Neither side moved
    assert!(library.book(petit_prince).is_some_and(|b| b.is_available()));
    assert_eq!(library.user(alice).map(|u| u.loan_count()), Some(1));
}

#[test]
fn test_list_books() {
    let (mut library, [petit_prince, orwell], _) = setup_test_library();
    let ids: Vec<BookId> = library.list_books().iter().map(|b| b.id()).collect();
    assert_eq!(ids, vec![petit_prince, orwell]);

    assert_eq!(library.remove_book(petit_prince), Ok(true));
    let ids: Vec<BookId> = library.list_books().iter().map(|b| b.id()).collect();
    assert_eq!(ids, vec![orwell]);
}

#[test]
fn test_list_available_books() {
    let (mut library, [petit_prince, orwell], [alice, _]) = setup_test_library();
    assert!(library.borrow(alice, orwell).is_ok());

    let ids: Vec<BookId> = library.list_available_books().iter().map(|b| b.id()).collect();
    assert_eq!(ids, vec![petit_prince]);
}

#[test]
fn test_search_by_title() {
    let (library, [petit_prince, _], _) = setup_test_library();

    let found: Vec<BookId> = library.search_by_title("petit").iter().map(|b| b.id()).collect();
    assert_eq!(found, vec![petit_prince]);
    assert!(library.search_by_title("inexistant").is_empty());
}

#[test]
fn test_search_by_author() {
    let (library, [_, orwell], _) = setup_test_library();

    let found: Vec<BookId> = library.search_by_author("ORWELL").iter().map(|b| b.id()).collect();
    assert_eq!(found, vec![orwell]);
    assert!(library.search_by_author("tolkien").is_empty());
}

#[test]
fn test_search_by_keyword() {
    let (mut library, [petit_prince, orwell], _) = setup_test_library();
    let prince = library.add_book("The Prince", "Niccolo Machiavelli").id();

    let found: Vec<BookId> = library.search_by_keyword("prince").iter().map(|b| b.id()).collect();
    assert_eq!(found, vec![petit_prince, prince]);

    // "george" only appears in an author name
    let found: Vec<BookId> = library.search_by_keyword("george").iter().map(|b| b.id()).collect();
    assert_eq!(found, vec![orwell]);
}

#[test]
fn test_create_user() {
    let mut library = Library::new();
    let user = library.create_user("Alice");

    assert_eq!(user.id(), UserId::new(1));
    assert_eq!(user.name(), "Alice");
    assert_eq!(user.loan_count(), 0);
    assert_eq!(library.total_users(), 1);
}

#[test]
fn test_remove_user() {
    let (mut library, [petit_prince, _], [alice, bob]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    let result = library.remove_user(alice);
    assert_eq!(
        result,
        Err(LibraryError::InvalidOperation(InvalidOperation::UserHasLoans { user: alice, loans: 1 }))
    );

    assert_eq!(library.remove_user(bob), Ok(true));
    assert!(library.user(bob).is_none());

    let result = library.remove_user(bob);
    assert_eq!(result, Err(LibraryError::NotFound(Missing::User(bob))));
}

#[test]
fn test_list_users() {
    let (library, _, [alice, bob]) = setup_test_library();
    let names: Vec<&str> = library.list_users().iter().map(|u| u.name()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(library.list_users().iter().map(|u| u.id()).collect::<Vec<_>>(), vec![alice, bob]);
}

#[test]
fn test_borrow() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();

    assert!(library.borrow(alice, petit_prince).is_ok());
    assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Borrowed));
    assert_eq!(library.user(alice).map(|u| u.borrowed_books().to_vec()), Some(vec![petit_prince]));
}

#[test]
fn test_borrow_unavailable_book_changes_nothing() {
    let (mut library, [petit_prince, _], [alice, bob]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    let result = library.borrow(bob, petit_prince);
    assert_eq!(
        result,
        Err(LibraryError::InvalidOperation(InvalidOperation::BookUnavailable(petit_prince)))
    );
    assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Borrowed));
    assert_eq!(library.user(bob).map(|u| u.loan_count()), Some(0));
    assert_eq!(library.user(alice).map(|u| u.loan_count()), Some(1));
}

#[test]
fn test_borrow_reports_missing_user_first() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();

    let result = library.borrow(UserId::new(99), BookId::new(99));
    assert_eq!(result, Err(LibraryError::NotFound(Missing::User(UserId::new(99)))));

    let result = library.borrow(alice, BookId::new(99));
    assert_eq!(result, Err(LibraryError::NotFound(Missing::Book(BookId::new(99)))));

    let result = library.borrow(UserId::new(99), petit_prince);
    assert_eq!(result, Err(LibraryError::NotFound(Missing::User(UserId::new(99)))));
}

#[test]
fn test_return_loan() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    assert!(library.return_loan(alice, petit_prince).is_ok());
    assert!(library.book(petit_prince).is_some_and(|b| b.is_available()));
    assert_eq!(library.user(alice).map(|u| u.loan_count()), Some(0));
}

#[test]
fn test_return_loan_not_held_changes_nothing() {
    let (mut library, [petit_prince, _], [alice, bob]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    let result = library.return_loan(bob, petit_prince);
    assert_eq!(
        result,
        Err(LibraryError::InvalidOperation(InvalidOperation::LoanNotHeld {
            user: bob,
            book: petit_prince
        }))
    );
    assert_eq!(library.book(petit_prince).map(|b| b.status()), Some(BookStatus::Borrowed));
    assert!(library.user(alice).is_some_and(|u| u.holds(petit_prince)));
}

#[test]
fn test_return_loan_missing_ids() {
    let (mut library, _, [alice, _]) = setup_test_library();

    let result = library.return_loan(UserId::new(42), BookId::new(1));
    assert!(result.as_ref().is_err_and(LibraryError::is_not_found));

    let result = library.return_loan(alice, BookId::new(42));
    assert_eq!(result, Err(LibraryError::NotFound(Missing::Book(BookId::new(42)))));
}

#[test]
fn test_loans_per_user() {
    let (mut library, [petit_prince, orwell], [alice, bob]) = setup_test_library();
    let carol = library.create_user("Carol").id();
    assert!(library.borrow(alice, petit_prince).is_ok());
    assert!(library.borrow(alice, orwell).is_ok());

    let loans = library.loans_per_user();
    assert_eq!(loans.len(), 3);
    assert_eq!(loans.get(&alice), Some(&2));
    assert_eq!(loans.get(&bob), Some(&0));
    assert_eq!(loans.get(&carol), Some(&0));
}

#[test]
fn test_loan_histogram() {
    let mut library = Library::new();
    let books: Vec<BookId> = (1..=3).map(|i| library.add_book(format!("Book {i}"), "Author").id()).collect();
    let _idle = library.create_user("Idle").id();
    let one = library.create_user("One").id();
    let two = library.create_user("Two").id();

    for (user, book) in [one, two, two].into_iter().zip(books) {
        assert!(library.borrow(user, book).is_ok());
    }

    let histogram = library.loan_histogram();
    assert_eq!(histogram.into_iter().collect::<Vec<_>>(), vec![(0, 1), (1, 1), (2, 1)]);
}

#[test]
fn test_empty_statistics() {
    let library = Library::new();
    assert_eq!(library.total_books(), 0);
    assert_eq!(library.total_users(), 0);
    assert!(library.loans_per_user().is_empty());
    assert!(library.loan_histogram().is_empty());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let (mut library, [petit_prince, _], [alice, _]) = setup_test_library();
    assert!(library.borrow(alice, petit_prince).is_ok());

    let snapshot = library.snapshot();
    assert_eq!(snapshot.books.len(), 2);
    assert_eq!(snapshot.users.len(), 2);

    let json = serde_json::to_value(&snapshot).unwrap_or_default();
    assert_eq!(json["books"][0]["status"], "borrowed");
    assert_eq!(json["users"][0]["borrowed"][0], 1);
    assert_eq!(json["loans_per_user"]["1"], 1);
    assert_eq!(json["loan_histogram"]["0"], 1);
}

#[test]
fn test_observers_see_successful_changes_only() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut library = Library::new();
    library.register_observer(Box::new(RecordingObserver { events: Rc::clone(&events) }));

    let book = library.add_book("1984", "George Orwell").id();
    let user = library.create_user("Alice").id();
    assert!(library.borrow(user, book).is_ok());
    assert!(library.remove_book(book).is_err());
    assert!(library.return_loan(user, book).is_ok());
    assert!(library.set_book_status(book, BookStatus::Borrowed).is_ok());

    assert_eq!(
        *events.borrow(),
        vec![
            LibraryEvent::BookAdded { book, title: "1984".to_string() },
            LibraryEvent::UserCreated { user, name: "Alice".to_string() },
            LibraryEvent::Borrowed { user, book },
            LibraryEvent::Returned { user, book },
            LibraryEvent::StatusOverridden {
                book,
                from: BookStatus::Available,
                to: BookStatus::Borrowed
            },
        ]
    );
}
