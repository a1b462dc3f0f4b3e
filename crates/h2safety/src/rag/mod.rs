//! Client for the external question-answering (RAG) service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{H2Error, H2Result};
use crate::llm::openai::map_transport_error;

/// A question-answering endpoint
#[async_trait]
pub trait RagClient: Send + Sync {
    /// Answer text; empty when the service returned no answer field
    async fn ask(&self, question: &str) -> H2Result<String>;
}

#[derive(Serialize)]
struct RagRequest<'a> {
    question: &'a str,
}

/// Response body of the RAG service.
///
/// `final_response` is the canonical field. Older deployments reply with
/// `answer`, which is only consulted when `final_response` is absent or empty.
#[derive(Debug, Default, Deserialize)]
pub struct RagResponse {
    #[serde(default)]
    pub final_response: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl RagResponse {
    pub fn into_answer(self) -> String {
        match self.final_response {
            Some(text) if !text.is_empty() => text,
            _ => self.answer.unwrap_or_default(),
        }
    }
}

pub struct HttpRagClient {
    http: reqwest::Client,
    url: String,
}

impl HttpRagClient {
    pub fn new(url: &str, timeout: Duration) -> H2Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| H2Error::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl RagClient for HttpRagClient {
    async fn ask(&self, question: &str) -> H2Result<String> {
        let response = self
            .http
            .post(&self.url)
            .json(&RagRequest { question })
            .send()
            .await
            .map_err(|e| map_transport_error(e, "RAG"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "RAG service returned an error");
            return Err(H2Error::Upstream(format!(
                "Failed to query RAG pipeline: {}",
                body
            )));
        }

        let parsed: RagResponse = response
            .json()
            .await
            .map_err(|e| H2Error::Upstream(format!("Malformed RAG response: {}", e)))?;
        Ok(parsed.into_answer())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Fixed-outcome RAG client that records the questions it was asked
    pub struct FakeRag {
        outcome: Result<String, fn() -> H2Error>,
        pub questions: Mutex<Vec<String>>,
    }

    impl FakeRag {
        pub fn answering(answer: &str) -> Self {
            Self {
                outcome: Ok(answer.to_string()),
                questions: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(err: fn() -> H2Error) -> Self {
            Self {
                outcome: Err(err),
                questions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RagClient for FakeRag {
        async fn ask(&self, question: &str) -> H2Result<String> {
            self.questions.lock().unwrap().push(question.to_string());
            match &self.outcome {
                Ok(answer) => Ok(answer.clone()),
                Err(make) => Err(make()),
            }
        }
    }
}
