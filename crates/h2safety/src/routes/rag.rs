//! RAG query proxy route

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::services::{RagQueryRequest, RagQueryService};

pub fn rag_routes() -> Router<Arc<AppState>> {
    Router::new().route("/rag/query", post(query))
}

async fn query(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RagQueryRequest>,
) -> H2Result<Json<Value>> {
    let service = RagQueryService::new(
        state.store.clone(),
        state.rag.clone(),
        state.auth.clone(),
    );
    let answer = service.query(req).await?;
    Ok(Json(json!({ "answer": answer })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collections;
    use crate::llm::testing::ScriptedLlm;
    use crate::rag::HttpRagClient;
    use crate::routes::testing::{body_json, post_json};
    use crate::store::{MemoryBackend, Store};
    use axum::http::StatusCode;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn upstream_502_returns_500_and_persists_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryBackend::new());
        let rag = HttpRagClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let state = Arc::new(AppState::new(
            Store::new(backend.clone()),
            Arc::new(ScriptedLlm::new()),
            Arc::new(rag),
            7,
        ));

        let response = rag_routes()
            .with_state(state)
            .oneshot(post_json(
                "/rag/query",
                json!({ "question": "Min setback?", "threadId": "t1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "Failed to query RAG pipeline: upstream exploded"
        );
        assert_eq!(backend.count(collections::MESSAGES).await, 0);
    }
}
