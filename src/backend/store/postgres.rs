/**
 * PostgreSQL Stampbook Store
 *
 * Each book is one row of the `books` table; its page index is a JSONB
 * column that stays NULL until the book is seeded or stamped. Profiles live
 * in `profiles`. The schema is created by the migrations in `migrations/`.
 *
 * # Atomic appends
 *
 * `append_stamp` is a single `UPDATE` that splices the new entry onto the
 * end of one bucket with `jsonb_set`. The row lock taken by the update
 * serializes concurrent appends to the same book, and each waiting update
 * re-evaluates against the latest row, so no append overwrites another.
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StampbookStore, StoreError};
use crate::shared::{
    bucket_for, Book, BookId, BookSummary, PageEntry, PageIndex, PageKey, ProfileUpdate, Stamp, UserProfile,
};

/// Appends `$5` to bucket `$4` of book `$1`, seeding the index with `$3`
/// when the book has none.
const APPEND_ENTRY_SQL: &str = r#"
    UPDATE books
    SET pages = jsonb_set(
            COALESCE(pages, $3),
            ARRAY[$4::text],
            COALESCE(COALESCE(pages, $3) -> $4::text, '[]'::jsonb) || jsonb_build_array($5::jsonb),
            true
        )
    WHERE id = $1 AND user_id = $2
"#;

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    cover: String,
    city: String,
    state: String,
    pages: Option<Json<PageIndex>>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            cover: row.cover,
            pages: row.pages.map(|pages| pages.0),
            city: row.city,
            state: row.state,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    city: String,
    state: String,
    cover: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    email: String,
    display_name: Option<String>,
    bio: Option<String>,
    profile_photo: Option<String>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            email: row.email,
            display_name: row.display_name,
            bio: row.bio,
            profile_photo: row.profile_photo,
        }
    }
}

/// Stampbook store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StampbookStore for PgStore {
    async fn create_book(&self, user_id: &str, book: &Book) -> Result<BookId, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO books (id, user_id, cover, city, state, pages, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&book.cover)
        .bind(&book.city)
        .bind(&book.state)
        .bind(book.pages.as_ref().map(Json))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_books(&self, user_id: &str) -> Result<Vec<BookSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, city, state, cover
            FROM books
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| BookSummary {
                id: row.id,
                city: row.city,
                state: row.state,
                cover: row.cover,
            })
            .collect())
    }

    async fn get_book(&self, user_id: &str, book_id: BookId) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT cover, city, state, pages
            FROM books
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::from).ok_or_else(|| StoreError::BookNotFound {
            user_id: user_id.to_string(),
            book_id,
        })
    }

    async fn get_pages(&self, user_id: &str, book_id: BookId) -> Result<Option<PageIndex>, StoreError> {
        let row: Option<(Option<Json<PageIndex>>,)> =
            sqlx::query_as("SELECT pages FROM books WHERE id = $1 AND user_id = $2")
                .bind(book_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((pages,)) => Ok(pages.map(|pages| pages.0)),
            None => Err(StoreError::BookNotFound {
                user_id: user_id.to_string(),
                book_id,
            }),
        }
    }

    async fn append_stamp(&self, user_id: &str, book_id: BookId, stamp: &Stamp) -> Result<PageKey, StoreError> {
        let key = bucket_for(&stamp.location.name)?;
        let entry = serde_json::to_value(PageEntry::from(stamp.clone()))?;
        let empty = serde_json::to_value(PageIndex::empty())?;

        let result = sqlx::query(APPEND_ENTRY_SQL)
            .bind(book_id)
            .bind(user_id)
            .bind(Json(empty))
            .bind(key.to_string())
            .bind(Json(entry))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::BookNotFound {
                user_id: user_id.to_string(),
                book_id,
            });
        }

        tracing::debug!(user_id, %book_id, page = %key, "stamp appended");
        Ok(key)
    }

    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, email, display_name, bio, profile_photo, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                bio = EXCLUDED.bio,
                profile_photo = EXCLUDED.profile_photo,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .bind(&profile.profile_photo)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT email, display_name, bio, profile_photo
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserProfile::from)
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET bio = COALESCE($2, bio),
                profile_photo = COALESCE($3, profile_photo),
                updated_at = $4
            WHERE user_id = $1
            RETURNING email, display_name, bio, profile_photo
            "#,
        )
        .bind(user_id)
        .bind(&update.bio)
        .bind(&update.profile_photo)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserProfile::from)
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }
}
