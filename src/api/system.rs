//! System API endpoints.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};

/// Returns service status.
///
/// # Endpoint
/// `GET /system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let user_count = state.store().count_users().await?;

    let database = if state.store().ping().await.is_ok() {
        "ok"
    } else {
        "unreachable"
    };

    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        user_count,
        database: database.to_string(),
    };

    Ok(Json(ApiResponse::success(status)))
}
