/**
 * Identity Provider
 *
 * Account creation is delegated to an identity provider; the rest of the
 * backend only ever sees the opaque account id it returns and uses it as
 * the `uid` of the user's document tree.
 *
 * # Credential Rules
 *
 * - Email must contain '@' (basic validation)
 * - Password must be at least 6 characters long
 * - Emails are unique, compared case-insensitively
 *
 * Passwords are hashed with bcrypt before they are stored anywhere.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque id issued for a new account
pub type AccountId = String;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Identity provider failures
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("an account already exists for {0}")]
    DuplicateAccount(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl From<bcrypt::BcryptError> for IdentityError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Unavailable(format!("password hashing failed: {err}"))
    }
}

/// Account creation request
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Issues and revokes user accounts
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and return its id
    async fn create_account(&self, account: &NewAccount) -> Result<AccountId, IdentityError>;

    /// Check a password and return the account it belongs to
    ///
    /// Unknown emails and wrong passwords are both `InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<AccountId, IdentityError>;

    /// Remove an account; used to roll back a half-finished signup
    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError>;
}

/// Compare `password` against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), IdentityError> {
    if bcrypt::verify(password, password_hash)? {
        Ok(())
    } else {
        Err(IdentityError::InvalidCredentials("email or password is incorrect".to_string()))
    }
}

/// Check email and password shape; returns the normalized email
pub fn check_credentials(email: &str, password: &str) -> Result<String, IdentityError> {
    let email = email.trim();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(IdentityError::InvalidCredentials("invalid email format".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::InvalidCredentials(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(email.to_ascii_lowercase())
}

/// Generate a fresh opaque account id
pub fn new_account_id() -> AccountId {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
struct StoredAccount {
    id: AccountId,
    password_hash: String,
}

/// Identity provider keeping accounts in process memory
#[derive(Debug)]
pub struct MemoryIdentity {
    /// Normalized email → account
    accounts: RwLock<HashMap<String, StoredAccount>>,
    cost: u32,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Use a custom bcrypt cost (tests use the minimum of 4)
    pub fn with_cost(cost: u32) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            cost,
        }
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_account(&self, account: &NewAccount) -> Result<AccountId, IdentityError> {
        let email = check_credentials(&account.email, &account.password)?;
        let password_hash = bcrypt::hash(&account.password, self.cost)?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(IdentityError::DuplicateAccount(email));
        }

        let id = new_account_id();
        accounts.insert(
            email,
            StoredAccount {
                id: id.clone(),
                password_hash,
            },
        );
        Ok(id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AccountId, IdentityError> {
        let email = email.trim().to_ascii_lowercase();
        let stored = self
            .accounts
            .read()
            .await
            .get(&email)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidCredentials("email or password is incorrect".to_string()))?;
        verify_password(password, &stored.password_hash)?;
        Ok(stored.id)
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError> {
        self.accounts.write().await.retain(|_, stored| stored.id != account_id);
        Ok(())
    }
}
