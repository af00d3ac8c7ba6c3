/**
 * Account Model and Database Operations
 *
 * PostgreSQL-backed identity provider. Accounts live in the `accounts`
 * table; the profile shown to other parts of the app is stored separately
 * by the stampbook store.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::identity::{
    check_credentials, new_account_id, verify_password, AccountId, IdentityError, IdentityProvider, NewAccount,
};

/// Account row as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Opaque account id, used as the user's `uid`
    pub id: String,
    /// Normalized (lowercase) email address
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub display_name: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(format!("database error: {err}"))
    }
}

/// Identity provider storing accounts in PostgreSQL
#[derive(Debug, Clone)]
pub struct PgIdentity {
    pool: PgPool,
    cost: u32,
}

impl PgIdentity {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Get account by normalized email
    ///
    /// # Returns
    /// Account or None if not found
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, display_name, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl IdentityProvider for PgIdentity {
    async fn create_account(&self, account: &NewAccount) -> Result<AccountId, IdentityError> {
        let email = check_credentials(&account.email, &account.password)?;
        let password_hash = bcrypt::hash(&account.password, self.cost)?;
        let id = new_account_id();

        let inserted = sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, display_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(&password_hash)
        .bind(&account.display_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(IdentityError::DuplicateAccount(email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AccountId, IdentityError> {
        let account = self
            .get_account_by_email(&email.trim().to_ascii_lowercase())
            .await?
            .ok_or_else(|| IdentityError::InvalidCredentials("email or password is incorrect".to_string()))?;
        verify_password(password, &account.password_hash)?;
        Ok(account.id)
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
