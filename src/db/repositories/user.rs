use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::user_account;

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All accounts in insertion (id) order.
    pub async fn list(&self) -> Result<Vec<user_account::Model>> {
        user_account::Entity::find()
            .order_by_asc(user_account::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list user accounts")
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<user_account::Model>> {
        user_account::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<user_account::Model>> {
        user_account::Entity::find()
            .filter(user_account::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    pub async fn count(&self) -> Result<u64> {
        user_account::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count user accounts")
    }

    /// Insert a new account. The caller supplies an already-hashed password.
    /// Returns the raw `DbErr` so unique-index violations stay inspectable.
    pub async fn insert(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<user_account::Model, DbErr> {
        let active = user_account::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
        };

        active.insert(&self.conn).await
    }

    /// Overwrite username and password hash for an existing account.
    /// Returns `Ok(None)` when the id does not exist.
    pub async fn update(
        &self,
        id: i32,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<user_account::Model>, DbErr> {
        let Some(existing) = user_account::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: user_account::ActiveModel = existing.into();
        active.username = Set(username.to_string());
        active.password_hash = Set(password_hash.to_string());
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    /// Delete by id. Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = user_account::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user account")?;

        Ok(result.rows_affected > 0)
    }

    /// Verify a password against the stored hash for `username`.
    /// Returns `Ok(false)` when the account does not exist.
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = user_account::Entity::find()
            .filter(user_account::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        // Run CPU-intensive password verification in a blocking task
        task::spawn_blocking(move || verify_password_hash(&password, &password_hash))
            .await
            .context("Password verification task panicked")?
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash string.
/// The hash carries its own algorithm and cost parameters.
pub fn verify_password_hash(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
