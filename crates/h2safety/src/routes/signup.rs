//! Waitlist signup route

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::models::SignupRequest;
use crate::services::SignupService;

pub fn signup_routes() -> Router<Arc<AppState>> {
    Router::new().route("/signup", post(signup))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> H2Result<Json<Value>> {
    let signup = SignupService::new(state.store.clone()).submit(req).await?;
    Ok(Json(json!({
        "message": "Thanks for signing up",
        "id": signup.id,
    })))
}
