//! Stampbook Store
//!
//! Read and append access to the per-user document tree:
//!
//! ```text
//! users/{uid}                          -> UserProfile
//! users/{uid}/books/{book_id}          -> Book { cover, city, state, pages? }
//! users/{uid}/books/{book_id}/pages    -> PageIndex { "A".."Z": [...], "#"? }
//! ```
//!
//! # Implementations
//!
//! - **`memory`** - `MemoryStore`, an in-process tree behind a `RwLock`
//! - **`postgres`** - `PgStore`, one row per book with a JSONB page index
//!
//! # Appending stamps
//!
//! `append_stamp` is the only mutation of an existing book. Both stores
//! perform it as one atomic step scoped to the target bucket, so two
//! overlapping appends to the same book both survive. Callers never read the
//! page index, modify it and write it back themselves.

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::{Book, BookId, BookSummary, PageIndex, PageKey, ProfileUpdate, SharedError, Stamp, UserProfile};

/// In-memory store
pub mod memory;

/// PostgreSQL store
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book {book_id} not found for user {user_id}")]
    BookNotFound { user_id: String, book_id: BookId },

    #[error("profile not found for user {0}")]
    ProfileNotFound(String),

    /// The entry could not be addressed (e.g. blank location name)
    #[error(transparent)]
    Invalid(#[from] SharedError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode document: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Access to users' books, pages and profiles
#[async_trait]
pub trait StampbookStore: Send + Sync {
    /// Add `book` under the user's books and return its fresh id
    async fn create_book(&self, user_id: &str, book: &Book) -> Result<BookId, StoreError>;

    /// Every book the user owns, oldest first, without page contents
    ///
    /// Unknown users simply have no books.
    async fn get_books(&self, user_id: &str) -> Result<Vec<BookSummary>, StoreError>;

    async fn get_book(&self, user_id: &str, book_id: BookId) -> Result<Book, StoreError>;

    /// The book's page index, or `None` if it was never materialized
    async fn get_pages(&self, user_id: &str, book_id: BookId) -> Result<Option<PageIndex>, StoreError>;

    /// Atomically append `stamp` to the end of its bucket
    ///
    /// Materializes the 26 empty buckets first when the book has no page
    /// index yet. Returns the bucket the stamp was written to.
    async fn append_stamp(&self, user_id: &str, book_id: BookId, stamp: &Stamp) -> Result<PageKey, StoreError>;

    /// Create or replace the profile document
    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError>;

    /// Merge the provided fields into an existing profile
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError>;
}
