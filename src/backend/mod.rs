//! Backend Module
//!
//! The axum HTTP server and everything it talks to. Only compiled with the
//! `server` feature.
//!
//! # Architecture
//!
//! - **`server`** - state, collaborator construction, app initialization
//! - **`routes`** - router assembly
//! - **`store`** - `StampbookStore` trait, in-memory and PostgreSQL stores
//! - **`books`** - book lifecycle and handlers
//! - **`assets`** - object storage, image generation, upload handlers
//! - **`places`** - attraction suggestions, place search, recommendations
//! - **`auth`** - identity providers and account handlers
//! - **`error`** - `BackendError` and conversions
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs     - server binary
//! ├── server/
//! ├── routes/
//! ├── store/
//! ├── books/
//! ├── assets/
//! ├── places/
//! ├── auth/
//! └── error/
//! ```
//!
//! # Data Flow
//!
//! - create-book: validate → generate cover → upload → one store write
//!   (the cover is deleted again if the write fails)
//! - create-stamp: validate → atomic bucket append in the store
//! - browse: reads straight through the store

/// Server setup and state
pub mod server;

/// Route configuration
pub mod routes;

/// Stampbook document store
pub mod store;

/// Book lifecycle
pub mod books;

/// Covers, photos and stamp images
pub mod assets;

/// Attraction recommendations
pub mod places;

/// Accounts and profiles
pub mod auth;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, AppState, Collaborators};
