//! Books Module
//!
//! Book creation, stamping and browsing.
//!
//! - **`service`** - `BookService`, validation and store calls
//! - **`types`** - request/response bodies
//! - **`handlers`** - HTTP handlers

/// Book lifecycle
pub mod service;

/// Request and response types
pub mod types;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_book, create_stamp, get_book, get_pages, list_books};
pub use service::BookService;
