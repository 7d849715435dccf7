//! Domain service for authentication.
//!
//! Verifies credentials against the store and issues signed bearer tokens.

use thiserror::Error;

use crate::services::token::Claims;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Login result containing the signed bearer token.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any credential failure.
    /// Unknown usernames and wrong passwords are indistinguishable to callers.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies a bearer token and returns its claims.
    fn verify_token(&self, token: &str) -> Result<Claims, AuthError>;
}
