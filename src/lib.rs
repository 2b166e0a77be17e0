//! In-memory library catalog with a lending state machine.
//!
//! A [`Library`] owns every [`Book`] and [`User`] and is the only way to
//! change them: books move between available and borrowed, users collect
//! and give back loans, and the library refuses any transition that would
//! break the link between the two.

pub mod book;
pub mod display;
pub mod error;
pub mod events;
pub mod ids;
pub mod library;
pub mod observers;
pub mod user;

pub use book::{Book, BookStatus};
pub use display::LibraryDisplay;
pub use error::{InvalidOperation, LibraryError, Missing, Result};
pub use events::LibraryEvent;
pub use ids::{BookId, UserId};
pub use library::{Library, LibrarySnapshot};
pub use observers::{LibraryObserver, TracingObserver};
pub use user::User;
