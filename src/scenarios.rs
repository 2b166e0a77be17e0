//! Demonstration scenarios driving a `Library` through its success and
//! failure paths.

use std::fmt::Debug;

use colored::Colorize;
use library_lending::{
    BookId, BookStatus, Library, LibraryDisplay, Result, TracingObserver, UserId,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Sizes and seed for the generated scenarios
#[derive(Debug, Clone, Copy)]
pub struct DemoConfig {
    /// Number of books to generate
    pub books: usize,
    /// Number of users to generate
    pub users: usize,
    /// Upper bound of loans drawn per user
    pub max_loans: usize,
    /// Seed of the random loan draw
    pub seed: u64,
}

/// Identifier no scenario ever hands out
const UNKNOWN_ID: u64 = 99_999;

/// Print a section header
pub fn section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title.cyan().bold());
    println!("{}\n", "=".repeat(60));
}

/// Report an operation that should succeed
fn expect_ok<T: Debug>(what: &str, result: Result<T>) {
    match result {
        Ok(value) => println!("{} {what} -> {value:?}", "ok:".green()),
        Err(err) => {
            tracing::error!(error = %err, "{what} failed");
            println!("{} {what}: {err}", "unexpected error:".red().bold());
        }
    }
}

/// Report an operation that should be refused
fn expect_err<T: Debug>(what: &str, result: Result<T>) {
    match result {
        Ok(value) => println!("{} {what} -> {value:?}", "unexpected success:".red().bold()),
        Err(err) => {
            tracing::warn!(error = %err, "{what} refused");
            println!("{} {what}: {err}", "refused:".yellow());
        }
    }
}

/// Print the available books, or a notice when none are left
fn print_available(library: &Library) {
    println!("Available books:");
    print!("{}", LibraryDisplay::books_listing(&library.list_available_books()));
}

/// Library with the tracing observer attached
fn new_library() -> Library {
    let mut library = Library::new();
    library.register_observer(Box::new(TracingObserver));
    library
}

/// Add `count` books titled "Sample Book n", authors cycling from A to Z
fn generate_books(library: &mut Library, count: usize) -> Vec<BookId> {
    (0..count)
        .map(|i| {
            let letter = u8::try_from(i % 26).map_or('?', |offset| char::from(b'A'.saturating_add(offset)));
            let title = format!("Sample Book {}", i.saturating_add(1));
            library.add_book(title, format!("Author {letter}")).id()
        })
        .collect()
}

/// Register `count` users named "User_n"
fn generate_users(library: &mut Library, count: usize) -> Vec<UserId> {
    (1..=count).map(|i| library.create_user(format!("User_{i}")).id()).collect()
}

/// Run every operation once on a three-book catalog
pub fn small() -> Library {
    let mut library = new_library();

    section("1. Adding books");
    let petit_prince = library.add_book("Le Petit Prince", "Antoine de Saint-Exupery").id();
    let orwell = library.add_book("1984", "George Orwell").id();
    let clean_code = library.add_book("Clean Code", "Robert C. Martin").id();
    LibraryDisplay::print_books(&library);

    section("2. Creating users");
    let alice = library.create_user("Alice").id();
    let bob = library.create_user("Bob").id();
    LibraryDisplay::print_users(&library);

    section("3. Borrowing");
    print_available(&library);
    expect_ok("Alice borrows Le Petit Prince", library.borrow(alice, petit_prince));
    LibraryDisplay::print_books(&library);
    LibraryDisplay::print_users(&library);
    print_available(&library);

    section("4. Borrowing a book already on loan");
    expect_err("Bob borrows Le Petit Prince", library.borrow(bob, petit_prince));

    section("5. Borrowing with unknown ids");
    expect_err("unknown user borrows 1984", library.borrow(UserId::new(UNKNOWN_ID), orwell));
    expect_err("Bob borrows an unknown book", library.borrow(bob, BookId::new(UNKNOWN_ID)));

    section("6. Returning");
    expect_ok("Alice returns Le Petit Prince", library.return_loan(alice, petit_prince));
    expect_err("Bob returns 1984 without holding it", library.return_loan(bob, orwell));

    section("7. Removing a borrowed book");
    expect_ok("Bob borrows 1984", library.borrow(bob, orwell));
    expect_err("remove 1984 while on loan", library.remove_book(orwell));
    expect_ok("Bob returns 1984", library.return_loan(bob, orwell));
    expect_ok("remove 1984 after return", library.remove_book(orwell));

    section("8. Removing a user with loans");
    expect_ok("Alice borrows Clean Code", library.borrow(alice, clean_code));
    expect_err("remove Alice while holding a book", library.remove_user(alice));
    expect_ok("Alice returns Clean Code", library.return_loan(alice, clean_code));
    expect_ok("remove Alice after return", library.remove_user(alice));

    section("9. Searching");
    library.add_book("The Prince", "Niccolo Machiavelli");
    library.add_book("Princess Maleficent", "Author X");
    println!("Title contains 'prince':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_title("prince")));
    println!("Author contains 'martin':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_author("martin")));
    println!("Title or author contains 'prin':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_keyword("prin")));

    section("10. Status override");
    override_available_book(&mut library);

    library
}

/// Force the first available book to borrowed and back, then try an
/// unknown status. A lent book is never picked, so no loan gets out of sync.
fn override_available_book(library: &mut Library) {
    let Some(first) = library.list_available_books().first().map(|book| book.id()) else {
        println!("No available book to override.");
        return;
    };

    show_book(library, first);
    expect_ok("force status to borrowed", library.set_book_status(first, BookStatus::Borrowed));
    show_book(library, first);
    expect_ok("force status to available", library.set_book_status_str(first, "available"));
    show_book(library, first);
    expect_err("force status to lost", library.set_book_status_str(first, "lost"));
}

/// Print one book on its own line
fn show_book(library: &Library, book: BookId) {
    if let Some(book) = library.book(book) {
        println!("  {}", LibraryDisplay::book_detail(book));
    }
}

/// Fixed loans for the catalog scenario, as (user index, book indexes)
const LOAN_PLAN: &[(usize, &[usize])] = &[
    (0, &[0, 1, 2]),
    (1, &[3, 4]),
    (2, &[5]),
    (3, &[6, 7, 8, 9]),
    (5, &[10]),
    (6, &[11, 12]),
    (8, &[13, 14, 15]),
    (9, &[16]),
];

/// Generated catalog with hand-picked loans
pub fn catalog(config: &DemoConfig) -> Library {
    let mut library = new_library();

    section("1. Generating books and users");
    let books = generate_books(&mut library, config.books);
    let users = generate_users(&mut library, config.users);
    LibraryDisplay::print_books(&library);
    LibraryDisplay::print_users(&library);

    section("2. Planned loans");
    for (user_idx, book_idxs) in LOAN_PLAN {
        let Some(&user) = users.get(*user_idx) else { continue };
        for &book in book_idxs.iter().filter_map(|idx| books.get(*idx)) {
            expect_ok(&format!("user {user} borrows book {book}"), library.borrow(user, book));
        }
    }
    LibraryDisplay::print_users(&library);
    print_available(&library);

    section("3. Refused operations");
    if let (Some(&first_book), Some(&second_book)) = (books.first(), books.get(1)) {
        if let Some(&idle) = users.get(4) {
            expect_err("idle user borrows a lent book", library.borrow(idle, first_book));
        }
        expect_err("unknown user borrows", library.borrow(UserId::new(UNKNOWN_ID), first_book));
        expect_err("remove a lent book", library.remove_book(second_book));
    }
    if let Some(&first_user) = users.first() {
        expect_err("borrow an unknown book", library.borrow(first_user, BookId::new(UNKNOWN_ID)));
        expect_err("return an unknown book", library.return_loan(first_user, BookId::new(UNKNOWN_ID)));
        if let Some(&first_book) = books.first() {
            expect_ok("first user returns first book", library.return_loan(first_user, first_book));
        }
    }
    if let Some(&second_user) = users.get(1) {
        expect_err("remove a user holding books", library.remove_user(second_user));
    }

    section("4. Searching");
    println!("Title contains 'Sample Book 1':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_title("Sample Book 1")));
    println!("Author contains 'Author A':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_author("Author A")));

    section("5. Status override");
    if let Some(&book) = books.get(20) {
        expect_ok("force book 21 to borrowed", library.set_book_status(book, BookStatus::Borrowed));
        expect_ok("force book 21 to available", library.set_book_status(book, BookStatus::Available));
    }

    library
}

/// Lend up to `max_loans` random available books to every user
fn random_loans(library: &mut Library, users: &[UserId], books: &[BookId], config: &DemoConfig) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    for &user in users {
        let mut wanted = rng.random_range(0..=config.max_loans);
        let mut candidates = books.to_vec();
        candidates.shuffle(&mut rng);

        for book in candidates {
            if wanted == 0 {
                break;
            }
            if library.book(book).is_some_and(|b| b.is_available()) && library.borrow(user, book).is_ok() {
                wanted = wanted.saturating_sub(1);
            }
        }
    }
}

/// Generated catalog with seeded random loans
pub fn random(config: &DemoConfig) -> Library {
    let mut library = new_library();

    section("1. Generating books and users");
    let books = generate_books(&mut library, config.books);
    let users = generate_users(&mut library, config.users);
    LibraryDisplay::print_books(&library);

    section("2. Random loans");
    println!("Seed: {}", config.seed);
    random_loans(&mut library, &users, &books, config);
    LibraryDisplay::print_users(&library);

    let lent = library.list_books().iter().find(|b| !b.is_available()).map(|b| b.id());
    let on_shelf = library.list_available_books().first().map(|b| b.id());

    section("3. Removing books");
    match lent {
        Some(book) => expect_err("remove a lent book", library.remove_book(book)),
        None => println!("No lent book to try."),
    }
    match on_shelf {
        Some(book) => expect_ok("remove an available book", library.remove_book(book)),
        None => println!("No available book to try."),
    }

    section("4. Removing a user with loans");
    let holder = library
        .list_users()
        .iter()
        .find(|u| u.loan_count() > 0)
        .map(|u| (u.id(), u.borrowed_books().to_vec()));
    if let Some((user, held)) = holder {
        expect_err("remove a user holding books", library.remove_user(user));
        for book in held {
            expect_ok(&format!("user {user} returns book {book}"), library.return_loan(user, book));
        }
        expect_ok("remove the user after returns", library.remove_user(user));
    } else {
        println!("No user holds a book.");
    }

    section("5. Unknown ids");
    if let (Some(&user), Some(&book)) = (users.last(), books.last()) {
        expect_err("unknown user borrows", library.borrow(UserId::new(UNKNOWN_ID), book));
        expect_err("borrow an unknown book", library.borrow(user, BookId::new(UNKNOWN_ID)));
    }

    section("6. Status override");
    override_available_book(&mut library);

    section("7. Searching");
    println!("Title contains 'Sample Book 1':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_title("Sample Book 1")));
    println!("Author contains 'Author A':");
    print!("{}", LibraryDisplay::books_listing(&library.search_by_author("Author A")));

    library
}
