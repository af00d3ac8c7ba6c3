/**
 * In-Memory Stampbook Store
 *
 * Holds the whole user tree in a `HashMap` behind a tokio `RwLock`.
 * Used when no `DATABASE_URL` is configured and throughout the tests.
 *
 * # Thread Safety
 *
 * Reads share the lock. Every mutation, including the full
 * read-append-write of `append_stamp`, runs under a single write guard,
 * so concurrent appends to the same book are applied one after another.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StampbookStore, StoreError};
use crate::shared::{
    bucket_for, Book, BookId, BookSummary, PageEntry, PageIndex, PageKey, ProfileUpdate, Stamp, UserProfile,
};

#[derive(Debug, Default)]
struct UserNode {
    profile: Option<UserProfile>,
    /// Insertion order is creation order
    books: Vec<(BookId, Book)>,
}

impl UserNode {
    fn book_mut(&mut self, book_id: BookId) -> Option<&mut Book> {
        self.books
            .iter_mut()
            .find(|(id, _)| *id == book_id)
            .map(|(_, book)| book)
    }

    fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.iter().find(|(id, _)| *id == book_id).map(|(_, book)| book)
    }
}

/// Stampbook store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserNode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(user_id: &str, book_id: BookId) -> StoreError {
        StoreError::BookNotFound {
            user_id: user_id.to_string(),
            book_id,
        }
    }
}

#[async_trait]
impl StampbookStore for MemoryStore {
    async fn create_book(&self, user_id: &str, book: &Book) -> Result<BookId, StoreError> {
        let book_id = Uuid::new_v4();
        let mut users = self.users.write().await;
        users
            .entry(user_id.to_string())
            .or_default()
            .books
            .push((book_id, book.clone()));
        tracing::debug!(user_id, %book_id, "book created in memory store");
        Ok(book_id)
    }

    async fn get_books(&self, user_id: &str) -> Result<Vec<BookSummary>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|node| node.books.iter().map(|(id, book)| BookSummary::of(*id, book)).collect())
            .unwrap_or_default())
    }

    async fn get_book(&self, user_id: &str, book_id: BookId) -> Result<Book, StoreError> {
        let users = self.users.read().await;
        users
            .get(user_id)
            .and_then(|node| node.book(book_id))
            .cloned()
            .ok_or_else(|| Self::not_found(user_id, book_id))
    }

    async fn get_pages(&self, user_id: &str, book_id: BookId) -> Result<Option<PageIndex>, StoreError> {
        self.get_book(user_id, book_id).await.map(|book| book.pages)
    }

    async fn append_stamp(&self, user_id: &str, book_id: BookId, stamp: &Stamp) -> Result<PageKey, StoreError> {
        let key = bucket_for(&stamp.location.name)?;

        let mut users = self.users.write().await;
        let book = users
            .get_mut(user_id)
            .and_then(|node| node.book_mut(book_id))
            .ok_or_else(|| Self::not_found(user_id, book_id))?;

        book.pages
            .get_or_insert_with(PageIndex::empty)
            .push(key, PageEntry::from(stamp.clone()));

        tracing::debug!(user_id, %book_id, page = %key, "stamp appended in memory store");
        Ok(key)
    }

    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().profile = Some(profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        let users = self.users.read().await;
        users
            .get(user_id)
            .and_then(|node| node.profile.clone())
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        let mut users = self.users.write().await;
        let profile = users
            .get_mut(user_id)
            .and_then(|node| node.profile.as_mut())
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))?;
        update.apply_to(profile);
        Ok(profile.clone())
    }
}
