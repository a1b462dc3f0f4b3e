//! RAG query proxy

use serde::Deserialize;
use std::sync::Arc;

use super::AuthService;
use crate::error::H2Result;
use crate::models::{Message, Sender};
use crate::rag::RagClient;
use crate::security::require_non_empty;
use crate::store::Store;

/// Body of `POST /rag/query`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagQueryRequest {
    pub question: Option<String>,
    pub thread_id: Option<String>,
    pub user_token: Option<String>,
}

pub struct RagQueryService {
    store: Store,
    rag: Arc<dyn RagClient>,
    auth: AuthService,
}

impl RagQueryService {
    pub fn new(store: Store, rag: Arc<dyn RagClient>, auth: AuthService) -> Self {
        Self { store, rag, auth }
    }

    /// Forward the question and record the exchange in `messages`.
    ///
    /// Nothing is written when the upstream call fails. After a successful
    /// call the two writes are independent: a failed write is logged and
    /// the answer is still returned.
    pub async fn query(&self, req: RagQueryRequest) -> H2Result<String> {
        const MISSING: &str = "Missing question or threadId";
        let question = require_non_empty(req.question.as_deref(), MISSING)?;
        let thread_id = require_non_empty(req.thread_id.as_deref(), MISSING)?;

        let user_id = match req.user_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Some(self.auth.verify_token(token).await?),
            _ => None,
        };

        let answer = self.rag.ask(&question).await?;

        let question_msg = Message::new(&thread_id, question, Sender::User).with_user(user_id);
        if let Err(e) = self.store.insert(&question_msg).await {
            tracing::warn!(thread_id = %thread_id, "Failed to store question: {}", e);
        }
        let answer_msg = Message::new(&thread_id, answer.clone(), Sender::Ai);
        if let Err(e) = self.store.insert(&answer_msg).await {
            tracing::warn!(thread_id = %thread_id, "Failed to store answer: {}", e);
        }

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collections;
    use crate::error::H2Error;
    use crate::rag::testing::FakeRag;
    use crate::store::{ArrayAppend, DocumentBackend, MemoryBackend};
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory backend whose first insert into `messages` fails
    struct FailFirstMessageInsert {
        inner: MemoryBackend,
        failed: AtomicBool,
    }

    #[async_trait]
    impl DocumentBackend for FailFirstMessageInsert {
        async fn insert(&self, collection: &str, id: &str, doc: Value) -> H2Result<()> {
            if collection == collections::MESSAGES && !self.failed.swap(true, Ordering::SeqCst) {
                return Err(H2Error::Database("connection reset".into()));
            }
            self.inner.insert(collection, id, doc).await
        }

        async fn get(&self, collection: &str, id: &str) -> H2Result<Option<Value>> {
            self.inner.get(collection, id).await
        }

        async fn find_by(
            &self,
            collection: &str,
            field: &str,
            value: &str,
        ) -> H2Result<Vec<Value>> {
            self.inner.find_by(collection, field, value).await
        }

        async fn set_fields(
            &self,
            collection: &str,
            id: &str,
            fields: Map<String, Value>,
        ) -> H2Result<bool> {
            self.inner.set_fields(collection, id, fields).await
        }

        async fn append(&self, collection: &str, id: &str, append: ArrayAppend) -> H2Result<()> {
            self.inner.append(collection, id, append).await
        }

        async fn delete(&self, collection: &str, id: &str) -> H2Result<bool> {
            self.inner.delete(collection, id).await
        }

        async fn ping(&self) -> H2Result<()> {
            self.inner.ping().await
        }
    }

    fn request(token: Option<&str>) -> RagQueryRequest {
        RagQueryRequest {
            question: Some("What setback applies to a 500 kg tank?".into()),
            thread_id: Some("t1".into()),
            user_token: token.map(Into::into),
        }
    }

    fn setup(rag: FakeRag) -> (Arc<MemoryBackend>, RagQueryService) {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::new(backend.clone());
        let auth = AuthService::new(store.clone(), 7);
        (backend, RagQueryService::new(store, Arc::new(rag), auth))
    }

    #[tokio::test]
    async fn persists_question_and_answer_after_success() {
        let (backend, service) = setup(FakeRag::answering("See NFPA 2 table 7.3.2.2."));
        let answer = service.query(request(None)).await.unwrap();
        assert_eq!(answer, "See NFPA 2 table 7.3.2.2.");

        let store = Store::new(backend.clone());
        let stored: Vec<Message> = store.find_by("conversationId", "t1").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored
            .iter()
            .any(|m| m.sender == Sender::User && m.user_id.is_none()));
        assert!(stored
            .iter()
            .any(|m| m.sender == Sender::Ai && m.content == answer));
    }

    #[tokio::test]
    async fn upstream_failure_persists_nothing() {
        let (backend, service) = setup(FakeRag::failing(|| {
            H2Error::Upstream("Failed to query RAG pipeline: bad gateway".into())
        }));
        let err = service.query(request(None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to query RAG pipeline: bad gateway");
        assert_eq!(backend.count(collections::MESSAGES).await, 0);
    }

    #[tokio::test]
    async fn failed_question_write_still_stores_answer() {
        let backend = Arc::new(FailFirstMessageInsert {
            inner: MemoryBackend::new(),
            failed: AtomicBool::new(false),
        });
        let store = Store::new(backend.clone());
        let service = RagQueryService::new(
            store.clone(),
            Arc::new(FakeRag::answering("Use a 3 m setback.")),
            AuthService::new(store.clone(), 7),
        );

        let answer = service.query(request(None)).await.unwrap();
        assert_eq!(answer, "Use a 3 m setback.");

        let stored: Vec<Message> = store.find_by("conversationId", "t1").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sender, Sender::Ai);
        assert_eq!(stored[0].content, answer);
        assert_eq!(backend.inner.count(collections::MESSAGES).await, 1);
    }

    #[tokio::test]
    async fn invalid_token_is_auth_error() {
        let (backend, service) = setup(FakeRag::answering("x"));
        let err = service.query(request(Some("bogus"))).await.unwrap_err();
        assert_eq!(err.status_code().as_u16(), 401);
        assert_eq!(err.to_string(), "Invalid or expired user token");
        assert_eq!(backend.count(collections::MESSAGES).await, 0);
    }

    #[tokio::test]
    async fn missing_question_is_rejected() {
        let (_, service) = setup(FakeRag::answering("x"));
        let err = service
            .query(RagQueryRequest {
                question: Some("  ".into()),
                ..request(None)
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing question or threadId");
    }
}
