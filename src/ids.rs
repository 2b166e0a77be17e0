use std::{fmt, marker::PhantomData};

use serde::Serialize;

/// Identifier of a book in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(u64);

/// Identifier of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl BookId {
    /// Wrap a raw identifier value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl UserId {
    /// Wrap a raw identifier value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BookId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<u64> for UserId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic identifier source, scoped to whoever owns it.
///
/// Each `Library` keeps one sequence per entity type, so two libraries never
/// share counters. Identifiers start at 1 and are never handed out twice.
pub(crate) struct IdSequence<T> {
    /// The value the next call to `next_id` returns
    next: u64,
    /// Ties the sequence to the identifier type it produces
    _id: PhantomData<T>,
}

impl<T> fmt::Debug for IdSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdSequence").field("next", &self.next).finish()
    }
}

impl<T: From<u64>> IdSequence<T> {
    /// Create a sequence whose first identifier is 1
    pub(crate) const fn new() -> Self {
        Self { next: 1, _id: PhantomData }
    }

    /// Hand out the next identifier
    pub(crate) fn next_id(&mut self) -> T {
        let id = self.next;
        // u64 cannot be exhausted by an in-memory catalog
        self.next = self.next.saturating_add(1);
        T::from(id)
    }
}
