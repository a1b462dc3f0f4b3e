//! Insight routes - generate and attach to thread

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::services::{AttachInsightRequest, GenerateInsightRequest, InsightService};

pub fn insight_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights/generate", post(generate_insight))
        .route("/insights/add-to-thread", post(add_to_thread))
}

async fn generate_insight(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GenerateInsightRequest>,
) -> H2Result<Json<Value>> {
    let insight = InsightService::new(state.store.clone(), state.llm.clone())
        .generate(req)
        .await?;
    Ok(Json(json!({
        "message": "Insights generated successfully.",
        "content": insight.content,
        "insightId": insight.id,
    })))
}

async fn add_to_thread(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AttachInsightRequest>,
) -> H2Result<Json<Value>> {
    let message = InsightService::new(state.store.clone(), state.llm.clone())
        .attach_to_thread(req)
        .await?;
    Ok(Json(json!({
        "message": "Insight added to thread",
        "messageId": message.id,
    })))
}
