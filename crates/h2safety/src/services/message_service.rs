//! Message append service

use serde::Deserialize;

use crate::error::{H2Error, H2Result};
use crate::models::{Message, Sender};
use crate::security::require_non_empty;
use crate::store::Store;

/// Body of `POST /messages/add`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageRequest {
    pub thread_id: Option<String>,
    pub content: Option<String>,
    pub sender: Option<String>,
}

#[derive(Clone)]
pub struct MessageService {
    store: Store,
}

impl MessageService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Validate and append a message to a thread
    pub async fn add(&self, req: AddMessageRequest) -> H2Result<Message> {
        const MISSING: &str = "Missing parameters";
        let thread_id = require_non_empty(req.thread_id.as_deref(), MISSING)?;
        // content is kept verbatim, only checked for presence
        let content = match req.content {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(H2Error::Validation(MISSING.to_string())),
        };
        let sender: Sender = require_non_empty(req.sender.as_deref(), MISSING)?
            .parse()
            .map_err(H2Error::Validation)?;

        let message = Message::new(&thread_id, content, sender);
        self.append(&message).await?;
        Ok(message)
    }

    /// Append to the thread's embedded log, then mirror into `messages`.
    ///
    /// The thread write is one atomic upsert, so concurrent appends are never
    /// lost and a thread without a `messages` field gets a fresh array. The flat
    /// copy is a second write and may diverge if it fails.
    pub async fn append(&self, message: &Message) -> H2Result<()> {
        self.store
            .append_thread_message(&message.conversation_id, message)
            .await?;
        self.store.insert(message).await?;
        tracing::debug!(
            thread_id = %message.conversation_id,
            message_id = %message.id,
            sender = %message.sender,
            "Message appended"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collections;
    use crate::models::Thread;
    use serde_json::json;

    fn request(thread_id: &str, content: &str, sender: &str) -> AddMessageRequest {
        AddMessageRequest {
            thread_id: Some(thread_id.into()),
            content: Some(content.into()),
            sender: Some(sender.into()),
        }
    }

    #[tokio::test]
    async fn appends_to_thread_without_messages_field() {
        let store = Store::memory();
        store
            .backend()
            .insert(
                collections::THREADS,
                "t1",
                json!({ "id": "t1", "title": "Vent sizing", "projectId": "p1", "ownerId": "u1" }),
            )
            .await
            .unwrap();

        let service = MessageService::new(store.clone());
        let message = service.add(request("t1", "hello", "user")).await.unwrap();

        let thread: Thread = store.require("t1").await.unwrap();
        assert_eq!(thread.title, "Vent sizing");
        assert_eq!(thread.messages.len(), 1);
        assert_eq!(thread.messages[0].content, "hello");
        assert_eq!(thread.messages[0].sender, Sender::User);

        let flat: Message = store.require(&message.id).await.unwrap();
        assert_eq!(flat.content, "hello");
        assert_eq!(flat.conversation_id, "t1");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let service = MessageService::new(Store::memory());
        for req in [
            AddMessageRequest::default(),
            AddMessageRequest {
                content: None,
                ..request("t1", "x", "user")
            },
            request("t1", "x", ""),
            request("", "x", "user"),
        ] {
            let err = service.add(req).await.unwrap_err();
            assert_eq!(err.to_string(), "Missing parameters");
        }
    }

    #[tokio::test]
    async fn unknown_sender_is_validation_error() {
        let service = MessageService::new(Store::memory());
        let err = service.add(request("t1", "x", "robot")).await.unwrap_err();
        assert!(matches!(err, H2Error::Validation(_)));
    }

    #[tokio::test]
    async fn messages_keep_append_order() {
        let store = Store::memory();
        let service = MessageService::new(store.clone());
        for text in ["one", "two", "three"] {
            service.add(request("t1", text, "user")).await.unwrap();
        }
        let thread: Thread = store.require("t1").await.unwrap();
        let contents: Vec<_> = thread.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(thread.message_count, 3);
    }
}
