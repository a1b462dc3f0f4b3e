//! Insight model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of insight categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightType {
    #[serde(rename = "Code References")]
    CodeReferences,
    #[serde(rename = "Recommended Actions")]
    RecommendedActions,
    #[serde(rename = "General Insights")]
    GeneralInsights,
}

impl InsightType {
    pub fn as_str(self) -> &'static str {
        match self {
            InsightType::CodeReferences => "Code References",
            InsightType::RecommendedActions => "Recommended Actions",
            InsightType::GeneralInsights => "General Insights",
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Code References" => Ok(InsightType::CodeReferences),
            "Recommended Actions" => Ok(InsightType::RecommendedActions),
            "General Insights" => Ok(InsightType::GeneralInsights),
            _ => Err("Invalid or missing insightType.".to_string()),
        }
    }
}

/// Insight document. Write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub thread_id: String,
    /// The insight type this was generated for
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
