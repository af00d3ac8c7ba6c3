//! Stampbook - Travel Stampbook Backend
//!
//! Users create illustrated trip books for a city, seed them with
//! attractions, and stamp pages as they visit places. Each book's pages are
//! alphabetical buckets keyed by the first letter of a location's name.
//!
//! # Module Structure
//!
//! - **`shared`** - data model, page index, configuration and shared errors.
//!   Always compiled; clients can depend on the crate with
//!   `default-features = false` to reuse the wire types.
//! - **`backend`** - axum server, stores and collaborator clients
//!   (`server` feature, on by default)
//!
//! # Usage
//!
//! ```rust,no_run
//! use stampbook::backend::create_app;
//! use stampbook::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(config).await?;
//! // serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Page Index
//!
//! ```rust
//! use stampbook::shared::{bucket_for, empty_index};
//!
//! assert_eq!(bucket_for("Zilker Park").unwrap().to_string(), "Z");
//! assert_eq!(bucket_for("123 Main St").unwrap().to_string(), "#");
//! assert_eq!(empty_index().bucket_count(), 26);
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "server")]
pub mod backend;
