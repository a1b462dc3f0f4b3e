//! Service root and health check

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> &'static str {
    "H2Safety API"
}

async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let (status, database) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    let summary = if status.is_success() {
        "healthy"
    } else {
        "degraded"
    };
    (
        status,
        Json(json!({
            "status": summary,
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
