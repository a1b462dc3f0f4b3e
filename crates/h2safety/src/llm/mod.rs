//! Chat-completion client seam
//!
//! Generators talk to the LLM through [`ChatCompletion`] so that the
//! provider is injected at startup and scripted in tests.

pub(crate) mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::H2Result;

/// One system + user prompt pair with sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
}

impl ChatRequest {
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            max_tokens,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn penalties(mut self, frequency: f64, presence: f64) -> Self {
        self.frequency_penalty = Some(frequency);
        self.presence_penalty = Some(presence);
        self
    }
}

/// A chat-completion endpoint returning the first choice's content
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> H2Result<String>;
}
