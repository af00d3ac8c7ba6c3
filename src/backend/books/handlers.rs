/**
 * Book Handlers
 *
 * - `POST /stampbook/create` - generate a cover, then write the book
 * - `POST /stampbook/create-stamp` - append a stamp to a book
 * - `GET /users/{uid}/books` - list a user's books
 * - `GET /users/{uid}/books/{book_id}` - one book with its pages
 * - `GET /users/{uid}/books/{book_id}/pages` - the page index only
 *
 * # Create Book Process
 *
 * 1. Validate uid, city, state and every seed attraction
 * 2. Generate and upload the cover illustration
 * 3. Write the book record in a single store call
 * 4. If the write fails or the request is dropped, delete the uploaded cover
 */

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::service::BookService;
use super::types::{
    BookCreateRequest, BookCreateResponse, BookListResponse, BookResponse, PagesResponse, StampCreateRequest,
    StampCreateResponse, STAMP_DATE_FORMAT,
};
use crate::backend::assets::AssetPipeline;
use crate::backend::error::BackendError;
use crate::shared::BookId;

/// Parse a book id from a path or body
///
/// An id that is not a UUID cannot name an existing book, so it is
/// reported as not found rather than as a validation failure.
pub fn parse_book_id(raw: &str) -> Result<BookId, BackendError> {
    raw.trim()
        .parse()
        .map_err(|_| BackendError::not_found(format!("book {raw}")))
}

/// Create book handler
///
/// # Example Request
///
/// ```http
/// POST /stampbook/create HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "uid": "3f2b0c9e8d7a4b6c",
///   "city": "Austin",
///   "state": "TX",
///   "attractions": [{ "name": "Zilker Park", "geocode": { "lat": 30.2669, "lng": -97.7729 } }]
/// }
/// ```
pub async fn create_book(
    State(books): State<BookService>,
    State(assets): State<AssetPipeline>,
    Json(request): Json<BookCreateRequest>,
) -> Result<Json<BookCreateResponse>, BackendError> {
    tracing::info!("Create book request: {}, {} for {}", request.city, request.state, request.uid);

    BookService::validate_request(&request.uid, &request.city, &request.state, request.seeds())?;

    let cover = assets.generate_cover(request.city.trim(), request.state.trim()).await?;
    let cover_url = cover.url.clone();
    let pending = assets.pending(cover);

    let created = books
        .create_book(&request.uid, &request.city, &request.state, &cover_url, request.seeds())
        .await;
    let (book_id, book) = match created {
        Ok(created) => {
            pending.keep();
            created
        }
        Err(e) => {
            tracing::error!("Failed to write book, discarding cover {}: {}", cover_url, e);
            pending.discard().await;
            return Err(e.into());
        }
    };

    Ok(Json(BookCreateResponse {
        message: "Book created successfully".to_string(),
        book_id,
        book_data: book,
    }))
}

/// Create stamp handler
///
/// The stamp's `date` is the server's local time when the request arrives.
pub async fn create_stamp(
    State(books): State<BookService>,
    Json(request): Json<StampCreateRequest>,
) -> Result<Json<StampCreateResponse>, BackendError> {
    let book_id = parse_book_id(&request.book_id)?;
    let uid = request.uid.clone();
    tracing::info!("Create stamp request: {} in book {} for {}", request.location_name, book_id, uid);

    let date = chrono::Local::now().format(STAMP_DATE_FORMAT).to_string();
    let (page, stamp) = books.add_stamp(&uid, book_id, request.into_stamp(date)).await?;

    Ok(Json(StampCreateResponse {
        message: "Stamp created successfully".to_string(),
        book_id,
        page,
        stamp,
    }))
}

pub async fn list_books(
    State(books): State<BookService>,
    Path(uid): Path<String>,
) -> Result<Json<BookListResponse>, BackendError> {
    let books = books.list_books(&uid).await?;
    Ok(Json(BookListResponse { books }))
}

pub async fn get_book(
    State(books): State<BookService>,
    Path((uid, book_id)): Path<(String, String)>,
) -> Result<Json<BookResponse>, BackendError> {
    let book_id = parse_book_id(&book_id)?;
    let book = books.get_book(&uid, book_id).await?;
    Ok(Json(BookResponse { book_id, book }))
}

pub async fn get_pages(
    State(books): State<BookService>,
    Path((uid, book_id)): Path<(String, String)>,
) -> Result<Json<PagesResponse>, BackendError> {
    let book_id = parse_book_id(&book_id)?;
    let pages = books.pages(&uid, book_id).await?;
    Ok(Json(PagesResponse { book_id, pages }))
}
