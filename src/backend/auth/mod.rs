//! Accounts Module
//!
//! Account creation, login and the user profile document.
//!
//! # Architecture
//!
//! - **`identity`** - `IdentityProvider` trait and the in-memory provider
//! - **`accounts`** - PostgreSQL identity provider (`accounts` table)
//! - **`handlers`** - HTTP handlers for the account endpoints
//!
//! # Signup Flow
//!
//! 1. Identity provider creates the account and issues its id
//! 2. The profile is written to the store under that id
//! 3. A failed profile write deletes the account again
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt and never returned
//! - Invalid credentials return 401 without saying which part was wrong

/// Identity provider trait and in-memory provider
pub mod identity;

/// PostgreSQL identity provider
pub mod accounts;

/// HTTP handlers for account endpoints
pub mod handlers;

pub use accounts::PgIdentity;
pub use handlers::{create_account, get_account, login, update_account};
pub use identity::{IdentityError, IdentityProvider, MemoryIdentity, NewAccount};
