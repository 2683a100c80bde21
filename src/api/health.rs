use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::state::AppState;

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}

/// GET /healthcheck - 200 when the selected transport's config is complete
async fn healthcheck(State(state): State<AppState>) -> StatusCode {
    match state.config.mail_readiness() {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::error!(error = %err, "healthcheck failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
