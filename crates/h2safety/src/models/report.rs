//! Report model and multistep pipeline stages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Summary,
    Communication,
    Custom,
    /// Produced by the multistep generator
    Project,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Summary => "summary",
            ReportType::Communication => "communication",
            ReportType::Custom => "custom",
            ReportType::Project => "project",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub created_at: DateTime<Utc>,
}

/// Stages of the multistep report pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStage {
    SectionPlanning,
    Draft,
    ReferenceExtraction,
    Refinement,
}

impl ReportStage {
    pub const ALL: [ReportStage; 4] = [
        ReportStage::SectionPlanning,
        ReportStage::Draft,
        ReportStage::ReferenceExtraction,
        ReportStage::Refinement,
    ];
}

impl std::fmt::Display for ReportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStage::SectionPlanning => write!(f, "section planning"),
            ReportStage::Draft => write!(f, "draft"),
            ReportStage::ReferenceExtraction => write!(f, "reference extraction"),
            ReportStage::Refinement => write!(f, "refinement"),
        }
    }
}
