use std::collections::BTreeMap;

use crate::{book::Book, library::Library, user::User};

/// Widest bar drawn by [`LibraryDisplay::histogram_chart`]
const MAX_BAR_WIDTH: usize = 40;

/// Console rendering for library contents and statistics
#[derive(Debug)]
pub struct LibraryDisplay;

impl LibraryDisplay {
    /// One line per book, ascending by id
    #[must_use]
    pub fn books_listing(books: &[&Book]) -> String {
        if books.is_empty() {
            return "No books in the catalog.\n".to_string();
        }

        let mut sorted = books.to_vec();
        sorted.sort_by_key(|book| book.id());

        let mut out = String::new();
        for book in sorted {
            out.push_str(&format!(
                "ID : {} | Title : {} | Author : {} | Status : {}\n",
                book.id(),
                book.title(),
                book.author(),
                book.status()
            ));
        }
        out
    }

    /// One line per user, ascending by id
    #[must_use]
    pub fn users_listing(users: &[&User]) -> String {
        if users.is_empty() {
            return "No registered users.\n".to_string();
        }

        let mut sorted = users.to_vec();
        sorted.sort_by_key(|user| user.id());

        let mut out = String::new();
        for user in sorted {
            let loans: Vec<String> = user.borrowed_books().iter().map(ToString::to_string).collect();
            out.push_str(&format!(
                "ID : {} | Name : {} | Loans : [{}]\n",
                user.id(),
                user.name(),
                loans.join(", ")
            ));
        }
        out
    }

    /// Horizontal bar chart of a loan histogram.
    ///
    /// One bar per distinct loan count, labeled with that count; bar length
    /// is the number of users, scaled down when it exceeds the chart width.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::integer_division)]
    pub fn histogram_chart(histogram: &BTreeMap<usize, usize>) -> String {
        if histogram.is_empty() {
            return "No users to plot the loan histogram.\n".to_string();
        }

        let widest = histogram.values().copied().max().unwrap_or(0);
        let label_width = histogram.keys().map(|loans| loans.to_string().len()).max().unwrap_or(1);

        let mut out = String::from("Loans per user (x: number of loans, bar: number of users)\n");
        for (loans, users) in histogram {
            let width = if widest <= MAX_BAR_WIDTH {
                *users
            } else {
                (*users * MAX_BAR_WIDTH / widest).max(usize::from(*users > 0))
            };
            out.push_str(&format!("{loans:>label_width$} | {} {users}\n", "#".repeat(width)));
        }
        out
    }

    /// One book with its status spelled out
    #[must_use]
    pub fn book_detail(book: &Book) -> String {
        format!("{book} {}", book.status().description())
    }

    /// Totals, per-user loans and histogram as plain text
    #[must_use]
    pub fn stats_summary(library: &Library) -> String {
        let per_user: Vec<String> = library
            .loans_per_user()
            .iter()
            .map(|(user, loans)| format!("{user}: {loans}"))
            .collect();
        let histogram: Vec<String> = library
            .loan_histogram()
            .iter()
            .map(|(loans, users)| format!("{loans}: {users}"))
            .collect();

        let mut out = String::new();
        out.push_str(&format!("Total books: {}\n", library.total_books()));
        out.push_str(&format!("Total users: {}\n", library.total_users()));
        out.push_str(&format!("Loans per user: {{{}}}\n", per_user.join(", ")));
        out.push_str(&format!("Loan histogram: {{{}}}\n", histogram.join(", ")));
        out
    }

    /// Print every book to stdout
    pub fn print_books(library: &Library) {
        print!("{}", Self::books_listing(&library.list_books()));
    }

    /// Print every user to stdout
    pub fn print_users(library: &Library) {
        print!("{}", Self::users_listing(&library.list_users()));
    }

    /// Print the loan histogram chart to stdout
    pub fn print_histogram(library: &Library) {
        print!("{}", Self::histogram_chart(&library.loan_histogram()));
    }
}
