//! `SeaORM` implementation of the `UserService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::hash_password;
use crate::services::user_service::{UserError, UserRecord, UserService};
use async_trait::async_trait;
use sea_orm::SqlErr;
use tokio::task;

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    /// Hash on the blocking pool; Argon2 is CPU-bound.
    async fn hash(&self, password: &str) -> Result<String, UserError> {
        let password = password.to_string();
        let security = self.security.clone();

        task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| UserError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| UserError::Internal(e.to_string()))
    }
}

/// A unique-index violation means a concurrent writer took the username
/// after the pre-check; it surfaces as the same conflict.
fn map_write_err(err: sea_orm::DbErr) -> UserError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        UserError::DuplicateUsername
    } else {
        UserError::Database(err.to_string())
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<UserRecord>, UserError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    async fn get_user(&self, id: i32) -> Result<UserRecord, UserError> {
        let user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(UserRecord::from(user))
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<UserRecord, UserError> {
        // Pre-check for the common case. The unique index stays the final
        // authority when two registrations race.
        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(UserError::DuplicateUsername);
        }

        let password_hash = self.hash(password).await?;

        let created = self
            .store
            .insert_user(username, &password_hash)
            .await
            .map_err(map_write_err)?;

        Ok(UserRecord::from(created))
    }

    async fn update_user(
        &self,
        id: i32,
        username: &str,
        password: &str,
    ) -> Result<(), UserError> {
        let password_hash = self.hash(password).await?;

        let updated = self
            .store
            .update_user(id, username, &password_hash)
            .await
            .map_err(map_write_err)?;

        if updated.is_none() {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    async fn delete_user(&self, id: i32) -> Result<(), UserError> {
        let removed = self.store.delete_user(id).await?;

        if !removed {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_db_errors_map_to_database() {
        let err = map_write_err(sea_orm::DbErr::Custom("boom".to_string()));
        assert!(matches!(err, UserError::Database(_)));
    }

    #[test]
    fn anyhow_errors_convert_to_internal() {
        let err: UserError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, UserError::Internal(_)));
    }
}
