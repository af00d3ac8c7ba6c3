//! Shared Module
//!
//! This module contains the stampbook data model: value types, page
//! entries, the page index and the records stored per user. These types
//! compile without the `server` feature so that clients and tools can reuse
//! the exact JSON shapes the backend reads and writes.
//!
//! # Overview
//!
//! - **`geo`** - Coordinates, named locations, sticker placement
//! - **`stamp`** - Stamps and placeholders (page entries)
//! - **`pages`** - Name → page bucket mapping and the page index
//! - **`book`** - Books, summaries, profiles and recommended places
//! - **`config`** - Layered application configuration
//! - **`error`** - Validation and serialization errors

/// Coordinates, locations and placement types
pub mod geo;

/// Stamp and placeholder entries
pub mod stamp;

/// Page bucketing and the page index
pub mod pages;

/// Book, profile and place records
pub mod book;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use book::{Book, BookId, BookSummary, Place, ProfileUpdate, UserId, UserProfile};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{require_text, SharedError};
pub use geo::{Geocode, Location, Position, Size, Transform};
pub use pages::{bucket_for, empty_index, PageIndex, PageKey, SeedPolicy};
pub use stamp::{PageEntry, Placeholder, Stamp};
