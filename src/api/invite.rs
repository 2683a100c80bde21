use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::models::{ApiResponse, InvitePayload};
use crate::state::AppState;

/// Invite routes
pub fn invite_routes() -> Router<AppState> {
    Router::new().route("/invite/", post(send_invites))
}

/// POST /invite/ - dispatch emails (and calendar attachments) to the payload's users
async fn send_invites(
    State(state): State<AppState>,
    Json(payload): Json<InvitePayload>,
) -> Result<(StatusCode, Json<ApiResponse>)> {
    let service = state
        .invites
        .as_ref()
        .ok_or_else(|| AppError::Config("email transport is not configured".to_string()))?;

    let response = service.handle(&payload).await?;
    Ok((StatusCode::OK, Json(response)))
}
