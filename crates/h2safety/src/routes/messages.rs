//! Message append route

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::services::{AddMessageRequest, MessageService};

pub fn message_routes() -> Router<Arc<AppState>> {
    Router::new().route("/messages/add", post(add_message))
}

async fn add_message(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AddMessageRequest>,
) -> H2Result<Json<Value>> {
    let message = MessageService::new(state.store.clone()).add(req).await?;
    Ok(Json(json!({
        "message": "Message added",
        "messageId": message.id,
    })))
}
