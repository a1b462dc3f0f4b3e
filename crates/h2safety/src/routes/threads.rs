//! Thread routes - CRUD and chat

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::models::{Insight, Thread, ThreadUpdate};
use crate::services::{ChatExchange, ChatService, InsightService, ThreadService};
use crate::AuthenticatedUserId;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: Option<String>,
}

pub fn thread_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/threads", get(list_threads))
        .route(
            "/threads/{id}",
            get(get_thread).put(update_thread).delete(delete_thread),
        )
        .route("/threads/{id}/chat", post(chat))
        .route("/threads/{id}/insights", get(list_insights))
}

async fn list_threads(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
) -> H2Result<Json<Vec<Thread>>> {
    let threads = ThreadService::new(state.store.clone())
        .list_for_owner(user.as_str())
        .await?;
    Ok(Json(threads))
}

async fn get_thread(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Thread>> {
    let thread = ThreadService::new(state.store.clone())
        .get(&id, user.as_str())
        .await?;
    Ok(Json(thread))
}

async fn update_thread(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ThreadUpdate>,
) -> H2Result<Json<Thread>> {
    let thread = ThreadService::new(state.store.clone())
        .update(&id, user.as_str(), update)
        .await?;
    Ok(Json(thread))
}

async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Value>> {
    ThreadService::new(state.store.clone())
        .delete(&id, user.as_str())
        .await?;
    Ok(Json(json!({ "message": "Thread deleted" })))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> H2Result<Json<ChatExchange>> {
    let exchange = ChatService::new(state.store.clone(), state.rag.clone())
        .ask(&id, user.as_str(), req.question.as_deref())
        .await?;
    Ok(Json(exchange))
}

async fn list_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Vec<Insight>>> {
    ThreadService::new(state.store.clone())
        .get(&id, user.as_str())
        .await?;
    let insights = InsightService::new(state.store.clone(), state.llm.clone())
        .list_for_thread(&id)
        .await?;
    Ok(Json(insights))
}
