//! Thread chat: user question, RAG answer, both appended to the thread

use serde::Serialize;
use std::sync::Arc;

use super::MessageService;
use crate::error::{H2Error, H2Result};
use crate::models::{Message, Sender, Thread};
use crate::rag::RagClient;
use crate::security::{ensure_owner, require_non_empty};
use crate::store::Store;

pub const EMPTY_ANSWER_FALLBACK: &str = "I apologize, but I was unable to generate a response.";
pub const CHAT_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request. Please try again later.";
pub const CHAT_TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    pub user_message: Message,
    pub ai_message: Message,
}

pub struct ChatService {
    store: Store,
    messages: MessageService,
    rag: Arc<dyn RagClient>,
}

impl ChatService {
    pub fn new(store: Store, rag: Arc<dyn RagClient>) -> Self {
        Self {
            messages: MessageService::new(store.clone()),
            store,
            rag,
        }
    }

    /// Ask a question inside a thread the caller owns.
    ///
    /// On failure the thread still receives a synthetic AI error message
    /// and the typed error is returned. There is no retry.
    pub async fn ask(
        &self,
        thread_id: &str,
        caller: &str,
        question: Option<&str>,
    ) -> H2Result<ChatExchange> {
        let question = require_non_empty(question, "Question is required")?;
        let thread: Thread = self.store.require(thread_id).await?;
        ensure_owner(Some(thread.owner_id.as_str()), caller, "Thread")?;

        let user_message = Message::new(thread_id, question.clone(), Sender::User)
            .with_user(Some(caller.to_string()));
        self.messages.append(&user_message).await?;

        match self.rag.ask(&question).await {
            Ok(answer) => {
                let answer = if answer.trim().is_empty() {
                    EMPTY_ANSWER_FALLBACK.to_string()
                } else {
                    answer
                };
                let ai_message = Message::new(thread_id, answer, Sender::Ai);
                self.messages.append(&ai_message).await?;
                Ok(ChatExchange {
                    user_message,
                    ai_message,
                })
            }
            Err(err) => {
                tracing::warn!(
                    thread_id = %thread_id,
                    code = err.code(),
                    "Chat request failed: {}",
                    err
                );
                let notice = Message::new(thread_id, CHAT_ERROR_MESSAGE, Sender::Ai);
                if let Err(e) = self.messages.append(&notice).await {
                    tracing::error!(thread_id = %thread_id, "Failed to append error notice: {}", e);
                }
                Err(match err {
                    H2Error::Timeout(_) => H2Error::Timeout(CHAT_TIMEOUT_MESSAGE.to_string()),
                    other => other,
                })
            }
        }
    }
}
