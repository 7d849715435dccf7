//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use crate::services::token::{Claims, TokenService};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        // An unknown username and a wrong password take the same exit so both
        // produce the same error value.
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self
            .tokens
            .issue(&user.username, user.id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(LoginResult { token })
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)
    }
}
