//! Chat message model

use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    Insight,
}

impl Sender {
    /// Chat-completion role for this sender
    pub fn role(self) -> Role {
        match self {
            Sender::User => Role::User,
            Sender::Ai | Sender::Insight => Role::Assistant,
        }
    }

    /// Label used when flattening a conversation into a transcript
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Ai => "AI",
            Sender::Insight => "Insight",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
            Sender::Insight => write!(f, "insight"),
        }
    }
}

impl std::str::FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" | "assistant" => Ok(Sender::Ai),
            "insight" => Ok(Sender::Insight),
            _ => Err(format!("Invalid sender: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a thread. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub role: Role,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Message {
    pub fn new(thread_id: &str, content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: super::new_id(),
            content: content.into(),
            sender,
            role: sender.role(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            conversation_id: thread_id.to_string(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_maps_to_role() {
        assert_eq!(Sender::User.role(), Role::User);
        assert_eq!(Sender::Ai.role(), Role::Assistant);
        assert_eq!(Sender::Insight.role(), Role::Assistant);
    }

    #[test]
    fn message_serializes_camel_case() {
        let msg = Message::new("t1", "hello", Sender::User);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["conversationId"], "t1");
        assert_eq!(value["sender"], "user");
        assert_eq!(value["role"], "user");
        assert!(value.get("userId").is_none());
    }

    #[test]
    fn sender_parses_legacy_assistant() {
        assert_eq!("assistant".parse::<Sender>().unwrap(), Sender::Ai);
        assert!("robot".parse::<Sender>().is_err());
    }
}
