//! Backend Error Module
//!
//! - **`types`** - `BackendError` and its status/kind mapping
//! - **`conversion`** - `IntoResponse` and `From` impls for collaborator errors
//!
//! # Error Kinds
//!
//! | kind | status |
//! |---|---|
//! | `validation` | 400 |
//! | `bad_request` | 400 (or the handler's status) |
//! | `not_found` | 404 |
//! | `conflict` | 409 |
//! | `collaborator_unavailable` | 503 |
//! | `internal` | 500 |

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
