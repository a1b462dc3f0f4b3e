//! OpenAI-compatible chat-completions client

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::{ChatCompletion, ChatRequest};
use crate::error::{H2Error, H2Result};

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> H2Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| H2Error::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if let Some(top_p) = request.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(penalty) = request.frequency_penalty {
            body["frequency_penalty"] = json!(penalty);
        }
        if let Some(penalty) = request.presence_penalty {
            body["presence_penalty"] = json!(penalty);
        }
        body
    }
}

fn error_message(status: u16, payload: &Value) -> String {
    payload
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("LLM request failed with status {}", status))
}

pub(crate) fn map_transport_error(err: reqwest::Error, what: &str) -> H2Error {
    if err.is_timeout() {
        H2Error::Timeout(format!("{} request timed out", what))
    } else {
        H2Error::Network(format!("{} request failed: {}", what, err))
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> H2Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            "Sending chat completion"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.body(&request))
            .send()
            .await
            .map_err(|e| map_transport_error(e, "LLM"))?;

        let status = response.status();
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(H2Error::Upstream(error_message(status.as_u16(), &payload)));
        }

        payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| H2Error::Upstream("LLM returned a malformed response".to_string()))
    }
}
