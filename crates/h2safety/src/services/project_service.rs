//! Project CRUD

use chrono::Utc;

use crate::error::{H2Error, H2Result};
use crate::models::{new_id, NewProject, Project, ProjectStatus, ProjectUpdate};
use crate::security::{ensure_owner, validate_title};
use crate::store::Store;

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

#[derive(Clone)]
pub struct ProjectService {
    store: Store,
}

impl ProjectService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a project owned by `owner_id`
    pub async fn create(&self, owner_id: &str, req: NewProject) -> H2Result<Project> {
        let project_name = validate_title(&req.project_name, "Project name")?;
        let now = Utc::now();
        let project = Project {
            id: new_id(),
            project_name,
            facility_name: text(req.facility_name),
            status: ProjectStatus::Active,
            project_priority: text(req.project_priority),
            owner_id: owner_id.to_string(),
            description: text(req.description),
            current_phase: String::new(),
            facility_location: text(req.facility_location),
            facility_size: String::new(),
            facility_type: text(req.facility_type),
            project_type: text(req.project_type),
            start_date: None,
            end_date: None,
            compliance_deadline: None,
            team_members: Vec::new(),
            milestones: Vec::new(),
            budget: 0.0,
            expenditure: 0.0,
            last_updated_by: Some(owner_id.to_string()),
            custom_fields: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&project).await?;
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    /// Projects owned by the caller, most recently updated first
    pub async fn list(&self, owner_id: &str) -> H2Result<Vec<Project>> {
        let mut projects: Vec<Project> = self.store.find_by("ownerId", owner_id).await?;
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    pub async fn get(&self, project_id: &str, caller: &str) -> H2Result<Project> {
        let project: Project = self.store.require(project_id).await?;
        ensure_owner(Some(project.owner_id.as_str()), caller, "Project")?;
        Ok(project)
    }

    pub async fn update(
        &self,
        project_id: &str,
        caller: &str,
        update: ProjectUpdate,
    ) -> H2Result<Project> {
        let mut project = self.get(project_id, caller).await?;

        if let Some(name) = update.project_name {
            project.project_name = validate_title(&name, "Project name")?;
        }
        if let Some(status) = update.status {
            project.status = status.parse().map_err(H2Error::Validation)?;
        }
        if let Some(budget) = update.budget {
            if budget < 0.0 {
                return Err(H2Error::Validation("Budget cannot be negative".to_string()));
            }
            project.budget = budget;
        }
        if let Some(expenditure) = update.expenditure {
            if expenditure < 0.0 {
                return Err(H2Error::Validation("Expenditure cannot be negative".to_string()));
            }
            project.expenditure = expenditure;
        }

        macro_rules! assign {
            ($($field:ident),*) => {
                $(if let Some(value) = update.$field {
                    project.$field = value;
                })*
            };
        }
        assign!(
            facility_name,
            project_priority,
            description,
            current_phase,
            facility_location,
            facility_size,
            facility_type,
            project_type,
            team_members,
            milestones,
            custom_fields
        );
        if update.start_date.is_some() {
            project.start_date = update.start_date;
        }
        if update.end_date.is_some() {
            project.end_date = update.end_date;
        }
        if update.compliance_deadline.is_some() {
            project.compliance_deadline = update.compliance_deadline;
        }

        project.updated_at = Utc::now();
        project.last_updated_by = Some(caller.to_string());
        if !self.store.replace(&project).await? {
            return Err(H2Error::not_found("Project"));
        }
        Ok(project)
    }

    /// Delete a project. Threads keep their weak `projectId` reference.
    pub async fn delete(&self, project_id: &str, caller: &str) -> H2Result<()> {
        self.get(project_id, caller).await?;
        self.store.delete::<Project>(project_id).await?;
        tracing::info!(project_id = %project_id, "Project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project(name: &str) -> NewProject {
        serde_json::from_value(serde_json::json!({
            "projectName": name,
            "facilityName": " Harbor Site ",
            "projectPriority": "high",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_defaults_to_active() {
        let service = ProjectService::new(Store::memory());
        let project = service.create("u1", new_project("Pilot")).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.facility_name, "Harbor Site");
        assert_eq!(service.list("u1").await.unwrap().len(), 1);
        assert!(service.list("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let service = ProjectService::new(Store::memory());
        let err = service.create("u1", new_project("  ")).await.unwrap_err();
        assert!(matches!(err, H2Error::Validation(_)));
    }

    #[tokio::test]
    async fn only_owner_can_read_update_delete() {
        let service = ProjectService::new(Store::memory());
        let project = service.create("u1", new_project("Pilot")).await.unwrap();

        assert!(matches!(
            service.get(&project.id, "u2").await,
            Err(H2Error::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&project.id, "u2").await,
            Err(H2Error::Forbidden(_))
        ));

        let update = ProjectUpdate {
            status: Some("completed".into()),
            budget: Some(125_000.0),
            team_members: Some(vec!["u3".into()]),
            ..Default::default()
        };
        let updated = service.update(&project.id, "u1", update).await.unwrap();
        assert_eq!(updated.status, ProjectStatus::Completed);
        assert_eq!(updated.budget, 125_000.0);
        assert_eq!(updated.team_members, ["u3"]);
        assert_eq!(updated.project_name, "Pilot");

        service.delete(&project.id, "u1").await.unwrap();
        assert!(matches!(
            service.get(&project.id, "u1").await,
            Err(H2Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let service = ProjectService::new(Store::memory());
        let project = service.create("u1", new_project("Pilot")).await.unwrap();
        let update = ProjectUpdate {
            status: Some("paused".into()),
            ..Default::default()
        };
        let err = service.update(&project.id, "u1", update).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid project status: paused");
    }
}
