// Route handlers for the dev server.
//
// Public: /health, /auth/register, /auth/login
// Protected (bearer JWT): /api/auth/whoami, /api/data/:kind[/:id]

pub mod auth;
pub mod data;

use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;

use crate::server::response::ApiResponse;

/// GET /health
pub async fn health() -> impl IntoResponse {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
