pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::config::MAX_UPLOAD_BYTES;
use crate::review::handlers;
use crate::state::AppState;

/// Transport limit for the whole multipart body: the file cap plus room for the
/// text fields. Files over `MAX_UPLOAD_BYTES` are rejected while streaming.
const REQUEST_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 512 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/review", post(handlers::handle_review))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}
