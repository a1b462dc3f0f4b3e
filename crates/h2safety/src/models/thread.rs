//! Thread model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

/// Fixed thread categories offered when a thread is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadCategory {
    #[serde(rename = "Engineering Code Question")]
    EngineeringCodeQuestion,
    #[serde(rename = "Project-Specific Question")]
    ProjectSpecificQuestion,
    #[serde(rename = "Permitting Process Question")]
    PermittingProcessQuestion,
    #[serde(rename = "Compliance Support")]
    ComplianceSupport,
    #[serde(rename = "Other")]
    Other,
}

impl ThreadCategory {
    pub const ALL: [ThreadCategory; 5] = [
        ThreadCategory::EngineeringCodeQuestion,
        ThreadCategory::ProjectSpecificQuestion,
        ThreadCategory::PermittingProcessQuestion,
        ThreadCategory::ComplianceSupport,
        ThreadCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThreadCategory::EngineeringCodeQuestion => "Engineering Code Question",
            ThreadCategory::ProjectSpecificQuestion => "Project-Specific Question",
            ThreadCategory::PermittingProcessQuestion => "Permitting Process Question",
            ThreadCategory::ComplianceSupport => "Compliance Support",
            ThreadCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ThreadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThreadCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid thread category: {}", s))
    }
}

/// Thread document with its embedded, append-only message log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "super::empty_as_none::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<ThreadCategory>,
    /// Weak reference to the owning project
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Request to create a thread under a project
#[derive(Debug, Clone, Deserialize)]
pub struct NewThread {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Partial update of a thread
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_reads_as_none() {
        let thread: Thread = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "title": "Vent stack sizing",
            "category": "",
            "projectId": "p1",
            "ownerId": "u1"
        }))
        .unwrap();
        assert!(thread.category.is_none());
        assert!(thread.messages.is_empty());
    }

    #[test]
    fn category_round_trips_display_name() {
        let thread: Thread = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "category": "Compliance Support"
        }))
        .unwrap();
        assert_eq!(thread.category, Some(ThreadCategory::ComplianceSupport));
        let value = serde_json::to_value(&thread).unwrap();
        assert_eq!(value["category"], "Compliance Support");
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("Gossip".parse::<ThreadCategory>().is_err());
        assert_eq!(
            "other".parse::<ThreadCategory>().unwrap(),
            ThreadCategory::Other
        );
    }
}
