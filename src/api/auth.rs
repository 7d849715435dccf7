use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::AuthError;

use super::{ApiError, ApiResponse, AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    // Missing fields fall through to credential verification and fail like
    // any other bad login, keeping the failure response uniform.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub user_id: i32,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
/// Authenticate with username and password, returns a signed bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = match state.auth().login(&payload.username, &payload.password).await {
        Ok(result) => result,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Failed login attempt for user: {}", payload.username);
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token,
    })))
}

/// GET /auth/me
/// Identify the caller from their bearer token
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<CurrentUserResponse>>, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state.auth().verify_token(&token)?;
    tracing::Span::current().record("user_id", claims.uid);

    Ok(Json(ApiResponse::success(CurrentUserResponse {
        username: claims.sub,
        user_id: claims.uid,
    })))
}

// ============================================================================
// Helpers
// ============================================================================

/// Extract the token from an `Authorization: Bearer` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}
