use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::UserRecord;

use super::{ApiError, ApiResponse, AppState, validation};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateUserRequest {
    // Missing fields deserialize to empty strings and fail validation with a
    // field-level message instead of a body-level rejection.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /users
/// List every stored account
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserRecord>>>, ApiError> {
    let users = state.users().list_users().await?;

    Ok(Json(ApiResponse::success(users)))
}

/// GET /users/{id}
/// Fetch one account; unknown ids are 404, including zero and negatives
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let user = state.users().get_user(id).await?;

    Ok(Json(ApiResponse::success(user)))
}

/// POST /users
/// Register a new account, returns 201 with the stored record
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserRecord>>), ApiError> {
    validation::validate_username(&payload.username)?;
    validation::validate_password(&payload.password)?;

    let created = state
        .users()
        .create_user(&payload.username, &payload.password)
        .await?;

    tracing::info!("Registered user: {}", created.username);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// PUT /users
/// Replace username and password for the account named by `id` in the body
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_user_id(payload.id)?;
    validation::validate_username(&payload.username)?;
    validation::validate_password(&payload.password)?;

    state
        .users()
        .update_user(payload.id, &payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(())))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.users().delete_user(id).await?;

    tracing::info!("Deleted user {id}");

    Ok(Json(ApiResponse::success(())))
}
