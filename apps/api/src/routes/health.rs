use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Static welcome message.
pub async fn welcome_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Resume Reviewer API. POST a resume PDF and job description to /api/v1/review."
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-reviewer"
    }))
}
