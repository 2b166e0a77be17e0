use crate::events::LibraryEvent;

/// Trait for observing library state changes
pub trait LibraryObserver {
    /// Called once for every change the library applied
    fn on_event(&self, event: &LibraryEvent);
}

/// Logs every change through `tracing` at debug level
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LibraryObserver for TracingObserver {
    fn on_event(&self, event: &LibraryEvent) {
        match event {
            LibraryEvent::BookAdded { book, title } => {
                tracing::debug!(book_id = %book, title = %title, "book added");
            }
            LibraryEvent::BookRemoved { book } => {
                tracing::debug!(book_id = %book, "book removed");
            }
            LibraryEvent::StatusOverridden { book, from, to } => {
                tracing::debug!(book_id = %book, from = %from, to = %to, "book status overridden");
            }
            LibraryEvent::UserCreated { user, name } => {
                tracing::debug!(user_id = %user, name = %name, "user created");
            }
            LibraryEvent::UserRemoved { user } => {
                tracing::debug!(user_id = %user, "user removed");
            }
            LibraryEvent::Borrowed { user, book } => {
                tracing::debug!(user_id = %user, book_id = %book, "book borrowed");
            }
            LibraryEvent::Returned { user, book } => {
                tracing::debug!(user_id = %user, book_id = %book, "book returned");
            }
        }
    }
}
