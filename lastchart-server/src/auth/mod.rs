//! Credential checks and the bearer token registry
//!
//! All registry mutation goes through SQLite, so token issuance and
//! revocation stay serialized under concurrent requests.

use chrono::Utc;
use lastchart_common::api::types::UserInfo;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

/// Length of issued bearer tokens
const TOKEN_LEN: usize = 40;

/// Authentication errors
///
/// User-facing text stays generic: `InvalidCredentials` never says whether
/// the email exists, `Unauthenticated` never says whether a token once did.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Empty token")]
    EmptyToken,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Successful login: a freshly minted token bound to the user
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserInfo,
}

/// Token registry and credential verification service
#[derive(Clone)]
pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a user with a salted password hash, returning the new id
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, AuthError> {
        let salt = random_string(16);
        let hash = hash_password(&salt, password);

        let result =
            sqlx::query("INSERT INTO users (name, email, password_hash, salt) VALUES (?, ?, ?, ?)")
                .bind(name)
                .bind(email)
                .bind(&hash)
                .bind(&salt)
                .execute(&self.db)
                .await?;

        Ok(result.last_insert_rowid())
    }

    /// Seed the development account on an empty users table
    pub async fn ensure_seed_user(&self) -> Result<(), AuthError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        if count == 0 {
            self.create_user("Test User", "test@example.com", "password")
                .await?;
            info!("Seeded default user test@example.com");
        }

        Ok(())
    }

    /// Verify credentials and mint a new token bound to the user
    ///
    /// Failure is always `InvalidCredentials`, whether the email is unknown
    /// or the password wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let row: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, name, password_hash, salt FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        let Some((id, name, stored_hash, salt)) = row else {
            debug!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if hash_password(&salt, password) != stored_hash {
            debug!("Login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = random_string(TOKEN_LEN);
        sqlx::query("INSERT INTO tokens (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(id)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.db)
            .await?;

        info!(user_id = id, "Issued bearer token");

        Ok(LoginOutcome {
            token,
            user: UserInfo {
                id,
                name,
                email: email.to_string(),
            },
        })
    }

    /// Resolve a token to the user it was issued to
    pub async fn authenticate(&self, token: &str) -> Result<UserInfo, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT u.id, u.name, u.email FROM tokens t
             JOIN users u ON u.id = t.user_id
             WHERE t.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some((id, name, email)) => Ok(UserInfo { id, name, email }),
            None => Err(AuthError::Unauthenticated),
        }
    }

    /// Revoke a token; idempotent (unknown or already-revoked tokens are Ok)
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM tokens WHERE token = ?")
            .bind(token)
            .execute(&self.db)
            .await?;

        if result.rows_affected() > 0 {
            info!("Revoked bearer token");
        }

        Ok(())
    }
}

/// Salted one-way hash, 64 hex characters
fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastchart_common::db::init_in_memory;

    async fn service() -> AuthService {
        let pool = init_in_memory().await.unwrap();
        AuthService::new(pool)
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("salt1", "password");
        let b = hash_password("salt2", "password");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn random_strings_differ() {
        assert_ne!(random_string(40), random_string(40));
    }

    #[tokio::test]
    async fn login_then_authenticate_then_logout() {
        let auth = service().await;
        auth.create_user("Jo", "jo@x.com", "secret").await.unwrap();

        let outcome = auth.login("jo@x.com", "secret").await.unwrap();
        assert_eq!(outcome.token.len(), TOKEN_LEN);
        assert_eq!(outcome.user.email, "jo@x.com");

        let user = auth.authenticate(&outcome.token).await.unwrap();
        assert_eq!(user.id, outcome.user.id);

        auth.logout(&outcome.token).await.unwrap();
        assert!(matches!(
            auth.authenticate(&outcome.token).await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn unknown_email_and_bad_password_look_identical() {
        let auth = service().await;
        auth.create_user("Jo", "jo@x.com", "secret").await.unwrap();

        let unknown = auth.login("nobody@x.com", "secret").await.unwrap_err();
        let wrong = auth.login("jo@x.com", "wrong").await.unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let auth = service().await;
        assert!(auth.logout("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn tokens_are_unique_per_issuance() {
        let auth = service().await;
        auth.create_user("Jo", "jo@x.com", "secret").await.unwrap();

        let first = auth.login("jo@x.com", "secret").await.unwrap();
        let second = auth.login("jo@x.com", "secret").await.unwrap();
        assert_ne!(first.token, second.token);

        // Both remain valid until individually revoked
        assert!(auth.authenticate(&first.token).await.is_ok());
        assert!(auth.authenticate(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn empty_token_is_unauthenticated() {
        let auth = service().await;
        assert!(matches!(
            auth.authenticate("").await,
            Err(AuthError::Unauthenticated)
        ));
    }
}
