//! # Admin Repository
//!
//! The single shared admin credential and the `app_config` key/value table
//! it lives in.
//!
//! ## Stored Form
//! ```text
//! app_config
//! ┌────────────────┬──────────────────────────────────────────────┐
//! │ key            │ value                                        │
//! ├────────────────┼──────────────────────────────────────────────┤
//! │ admin_password │ $argon2id$v=19$m=19456,t=2,p=1$...           │
//! └────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! A value that does not parse as a PHC string is a legacy plaintext
//! password and is compared as-is. The next `update_admin_password`
//! replaces it with a hash.
//!
//! This is one shared password, not an account system.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use coaching_core::validation::validate_password;
use coaching_core::ADMIN_PASSWORD_KEY;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks a candidate against a stored value (PHC hash or legacy plaintext).
pub fn password_matches(candidate: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            warn!("Stored admin password is not hashed; comparing as plaintext");
            candidate == stored
        }
    }
}

/// Repository for the admin credential and other app settings.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AdminRepository { pool }
    }

    /// Reads a config value.
    pub async fn get_value(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM app_config WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Writes a config value, replacing any previous one.
    pub async fn set_value(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Setting config value");

        sqlx::query(
            "INSERT INTO app_config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Checks the operator's password.
    ///
    /// Returns `Ok(false)` for a wrong password and when no credential is
    /// stored at all.
    pub async fn verify_admin(&self, password: &str) -> DbResult<bool> {
        let Some(stored) = self.get_value(ADMIN_PASSWORD_KEY).await? else {
            warn!("No admin credential stored");
            return Ok(false);
        };

        let ok = password_matches(password, &stored);
        debug!(ok, "Admin password checked");
        Ok(ok)
    }

    /// Replaces the admin password. The new value is stored hashed.
    pub async fn update_admin_password(&self, new_password: &str) -> DbResult<()> {
        validate_password(new_password)?;

        let hash = hash_password(new_password)?;
        self.set_value(ADMIN_PASSWORD_KEY, &hash).await?;

        info!("Admin password updated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
