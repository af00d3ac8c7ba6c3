/**
 * API Routes
 *
 * ## Accounts
 * - `POST /auth/create` - create account and profile
 * - `POST /auth/login` - check credentials
 * - `GET /account/{uid}` - profile
 * - `POST /account/update?uid=` - merge profile fields
 *
 * ## Assets
 * - `POST /upload-photo` - multipart `file`
 * - `POST /stampbook/generate-stamp-image` - multipart `reference_image`
 *
 * ## Books
 * - `POST /stampbook/create`
 * - `POST /stampbook/create-stamp`
 * - `GET /users/{uid}/books`
 * - `GET /users/{uid}/books/{book_id}`
 * - `GET /users/{uid}/books/{book_id}/pages`
 *
 * ## Recommendations
 * - `GET /travel/rec?city=&state=&keywords=`
 */

use axum::routing::{get, post};
use axum::Router;

use crate::backend::assets::{generate_stamp_image, upload_photo};
use crate::backend::auth::{create_account, get_account, login, update_account};
use crate::backend::books::{create_book, create_stamp, get_book, get_pages, list_books};
use crate::backend::places::travel_rec;
use crate::backend::server::state::AppState;

pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Accounts
        .route("/auth/create", post(create_account))
        .route("/auth/login", post(login))
        .route("/account/{uid}", get(get_account))
        .route("/account/update", post(update_account))
        // Assets
        .route("/upload-photo", post(upload_photo))
        .route("/stampbook/generate-stamp-image", post(generate_stamp_image))
        // Books
        .route("/stampbook/create", post(create_book))
        .route("/stampbook/create-stamp", post(create_stamp))
        .route("/users/{uid}/books", get(list_books))
        .route("/users/{uid}/books/{book_id}", get(get_book))
        .route("/users/{uid}/books/{book_id}/pages", get(get_pages))
        // Recommendations
        .route("/travel/rec", get(travel_rec))
}
