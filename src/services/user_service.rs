//! Domain service for account registration and maintenance.
//!
//! The account store behind the /users endpoints: listing, lookup,
//! registration with password hashing, updates, and removal.

use serde::Serialize;
use thiserror::Error;

use crate::entities::user_account;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(i32),

    #[error("Username already exists.")]
    DuplicateUsername,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Stored account as returned by read endpoints.
///
/// Exposes the password hash for wire parity with the system this replaces.
/// The hash never reaches logs.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl From<user_account::Model> for UserRecord {
    fn from(model: user_account::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
        }
    }
}

/// Domain service trait for the account store.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Lists every account in insertion order.
    async fn list_users(&self) -> Result<Vec<UserRecord>, UserError>;

    /// Fetches one account by id.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] for unknown ids.
    async fn get_user(&self, id: i32) -> Result<UserRecord, UserError>;

    /// Registers a new account, hashing the supplied password.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::DuplicateUsername`] if the name is taken, whether
    /// caught by the pre-check or by the unique index under a race.
    async fn create_user(&self, username: &str, password: &str) -> Result<UserRecord, UserError>;

    /// Replaces username and password for an existing account. The password
    /// is re-hashed even when unchanged, so the salt rotates on every update.
    async fn update_user(&self, id: i32, username: &str, password: &str)
    -> Result<(), UserError>;

    /// Removes an account.
    async fn delete_user(&self, id: i32) -> Result<(), UserError>;
}
