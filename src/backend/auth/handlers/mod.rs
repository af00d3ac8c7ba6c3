//! Account Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Handler exports
//! ├── types.rs    - Request/response types
//! ├── signup.rs   - Account creation
//! ├── login.rs    - Credential check
//! └── account.rs  - Profile read/update
//! ```
//!
//! # Handlers
//!
//! - **`create_account`** - POST /auth/create
//! - **`login`** - POST /auth/login
//! - **`get_account`** - GET /account/{uid}
//! - **`update_account`** - POST /account/update?uid=

/// Request and response types
pub mod types;

/// Account creation handler
pub mod signup;

/// Login handler
pub mod login;

/// Profile handlers
pub mod account;

pub use types::{CreateAccountRequest, CreateAccountResponse, LoginRequest, LoginResponse};

pub use account::{get_account, update_account};
pub use login::login;
pub use signup::create_account;
