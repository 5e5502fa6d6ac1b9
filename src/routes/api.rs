use crate::{handlers::{diagnostics, execute_code, health_check, list_languages, ready_check, room_members}, AppState};
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/v1/rooms/:room_id", get(room_members))
        .route("/v1/languages", get(list_languages))
        .route("/v1/execute", post(execute_code))
}
