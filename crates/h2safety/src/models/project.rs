//! Project model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(format!("Invalid project status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_milestone_status")]
    pub status: String,
}

fn default_milestone_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}

/// Project document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub project_name: String,
    #[serde(default)]
    pub facility_name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub project_priority: String,
    pub owner_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_phase: String,
    #[serde(default)]
    pub facility_location: String,
    #[serde(default)]
    pub facility_size: String,
    #[serde(default)]
    pub facility_type: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub compliance_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub expenditure: f64,
    #[serde(default)]
    pub last_updated_by: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Display name used in generated report titles
    pub fn display_name(&self) -> &str {
        if self.project_name.trim().is_empty() {
            "Project"
        } else {
            &self.project_name
        }
    }
}

/// Request to create a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub project_name: String,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default)]
    pub project_priority: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub facility_location: Option<String>,
    #[serde(default)]
    pub facility_type: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
}

/// Partial update of a project's editable fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub project_name: Option<String>,
    pub facility_name: Option<String>,
    pub status: Option<String>,
    pub project_priority: Option<String>,
    pub description: Option<String>,
    pub current_phase: Option<String>,
    pub facility_location: Option<String>,
    pub facility_size: Option<String>,
    pub facility_type: Option<String>,
    pub project_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub compliance_deadline: Option<DateTime<Utc>>,
    pub team_members: Option<Vec<String>>,
    pub milestones: Option<Vec<Milestone>>,
    pub budget: Option<f64>,
    pub expenditure: Option<f64>,
    pub custom_fields: Option<Vec<CustomField>>,
}
