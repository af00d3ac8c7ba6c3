/**
 * Book Lifecycle
 *
 * Creation and stamping of books on top of a [`StampbookStore`].
 *
 * Validation runs before anything else so that a bad request never costs
 * a collaborator call: handlers call [`BookService::validate_request`]
 * before generating a cover, and `create_book` validates again before
 * writing.
 */

use std::sync::Arc;

use crate::backend::store::{StampbookStore, StoreError};
use crate::shared::{
    require_text, Book, BookId, BookSummary, Location, PageIndex, PageKey, SeedPolicy, SharedError, Stamp,
};

/// Creates books and appends stamps
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn StampbookStore>,
    seed_policy: SeedPolicy,
}

impl BookService {
    pub fn new(store: Arc<dyn StampbookStore>, seed_policy: SeedPolicy) -> Self {
        Self { store, seed_policy }
    }

    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed_policy
    }

    /// Check a create-book request before any collaborator is called
    pub fn validate_request(user_id: &str, city: &str, state: &str, seeds: &[Location]) -> Result<(), SharedError> {
        require_text("uid", user_id)?;
        require_text("city", city)?;
        require_text("state", state)?;
        for (i, seed) in seeds.iter().enumerate() {
            seed.validate(&format!("attractions[{i}]"))?;
        }
        Ok(())
    }

    /// Write a new book with the given cover
    ///
    /// No seeds leaves `pages` unset; otherwise every bucket is materialized
    /// and each seed becomes a placeholder.
    pub async fn create_book(
        &self,
        user_id: &str,
        city: &str,
        state: &str,
        cover_url: &str,
        seeds: &[Location],
    ) -> Result<(BookId, Book), StoreError> {
        Self::validate_request(user_id, city, state, seeds)?;
        let cover = require_text("cover", cover_url)?;

        let pages = if seeds.is_empty() {
            None
        } else {
            Some(PageIndex::seeded(seeds, self.seed_policy)?)
        };
        let book = Book {
            cover: cover.to_string(),
            pages,
            city: city.trim().to_string(),
            state: state.trim().to_string(),
        };

        let book_id = self.store.create_book(user_id.trim(), &book).await?;
        tracing::info!(user_id, %book_id, city = %book.city, seeds = seeds.len(), "book created");
        Ok((book_id, book))
    }

    /// Append a stamp to its bucket; returns the bucket and the stamp unchanged
    pub async fn add_stamp(&self, user_id: &str, book_id: BookId, stamp: Stamp) -> Result<(PageKey, Stamp), StoreError> {
        let user_id = require_text("uid", user_id)?;
        stamp.validate()?;

        let page = self.store.append_stamp(user_id, book_id, &stamp).await?;
        tracing::info!(user_id, %book_id, %page, location = %stamp.location.name, "stamp added");
        Ok((page, stamp))
    }

    pub async fn list_books(&self, user_id: &str) -> Result<Vec<BookSummary>, StoreError> {
        let user_id = require_text("uid", user_id)?;
        self.store.get_books(user_id).await
    }

    pub async fn get_book(&self, user_id: &str, book_id: BookId) -> Result<Book, StoreError> {
        self.store.get_book(require_text("uid", user_id)?, book_id).await
    }

    /// The book's page index; `None` for a book that was never seeded or stamped
    pub async fn pages(&self, user_id: &str, book_id: BookId) -> Result<Option<PageIndex>, StoreError> {
        self.store.get_pages(require_text("uid", user_id)?, book_id).await
    }
}
