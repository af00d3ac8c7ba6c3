//! Server Module
//!
//! - **`state`** - `AppState`, `Collaborators` and `FromRef` implementations
//! - **`config`** - database bootstrap and collaborator construction
//! - **`init`** - `create_app`
//!
//! # Initialization Flow
//!
//! 1. `AppConfig::load()` (done by the binary)
//! 2. `load_database` - connect and migrate, or fall back to memory
//! 3. `build_collaborators` - stores, object storage, API clients
//! 4. `create_router` - routes, media serving, tracing

/// Application state management
pub mod state;

/// Collaborator construction
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::{AppState, Collaborators, SharedIdentity, SharedStore};
