//! Route Configuration Module
//!
//! - **`router`** - router assembly, media serving, fallback
//! - **`api_routes`** - account, asset, book and recommendation routes

/// Main router creation
pub mod router;

/// API routes
pub mod api_routes;

pub use router::create_router;
