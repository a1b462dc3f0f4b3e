//! Insight generator

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::prompts::{insight_prompt, INSIGHT_SYSTEM};
use super::transcript::build_transcript;
use super::MessageService;
use crate::error::{H2Error, H2Result};
use crate::llm::{ChatCompletion, ChatRequest};
use crate::models::{new_id, Insight, InsightType, Message, Sender, Thread};
use crate::security::require_non_empty;
use crate::store::Store;

const TEMPERATURE: f64 = 0.5;
const MAX_TOKENS: u32 = 3000;
pub const NO_INSIGHTS: &str = "No insights generated.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInsightRequest {
    pub thread_id: Option<String>,
    pub insight_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachInsightRequest {
    pub thread_id: Option<String>,
    pub content: Option<String>,
}

pub struct InsightService {
    store: Store,
    llm: Arc<dyn ChatCompletion>,
}

impl InsightService {
    pub fn new(store: Store, llm: Arc<dyn ChatCompletion>) -> Self {
        Self { store, llm }
    }

    /// Generate and store one insight for a thread.
    ///
    /// Exactly one insight document is written on success; nothing is
    /// written when validation, lookup or the LLM call fails.
    pub async fn generate(&self, req: GenerateInsightRequest) -> H2Result<Insight> {
        let thread_id =
            require_non_empty(req.thread_id.as_deref(), "Invalid or missing threadId.")?;
        let insight_type: InsightType = req
            .insight_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(H2Error::Validation)?;

        let thread: Thread = self.store.require(&thread_id).await?;
        let transcript = build_transcript(&thread.messages);
        let request = ChatRequest::new(
            INSIGHT_SYSTEM,
            insight_prompt(insight_type, &transcript),
            TEMPERATURE,
            MAX_TOKENS,
        );

        let content = match self.llm.complete(request).await {
            Ok(text) if text.trim().is_empty() => NO_INSIGHTS.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::error!(thread_id = %thread_id, "Insight generation failed: {}", e);
                return Err(H2Error::Upstream(
                    "Failed to generate insights from OpenAI.".to_string(),
                ));
            }
        };

        let insight = Insight {
            id: new_id(),
            thread_id,
            title: insight_type.as_str().to_string(),
            content,
            created_at: Utc::now(),
        };
        self.store.insert(&insight).await?;
        tracing::info!(insight_id = %insight.id, kind = %insight_type, "Insight generated");
        Ok(insight)
    }

    /// Copy insight text into the thread as a `sender: insight` message
    pub async fn attach_to_thread(&self, req: AttachInsightRequest) -> H2Result<Message> {
        const MISSING: &str = "Missing threadId or content";
        let thread_id = require_non_empty(req.thread_id.as_deref(), MISSING)?;
        let content = require_non_empty(req.content.as_deref(), MISSING)?;
        let message = Message::new(&thread_id, content, Sender::Insight);
        MessageService::new(self.store.clone())
            .append(&message)
            .await?;
        Ok(message)
    }

    pub async fn list_for_thread(&self, thread_id: &str) -> H2Result<Vec<Insight>> {
        let mut insights: Vec<Insight> = self.store.find_by("threadId", thread_id).await?;
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(insights)
    }
}
