pub mod health;
pub mod invite;

use axum::Router;

use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::health_routes())
        .merge(invite::invite_routes())
        .with_state(state)
}
