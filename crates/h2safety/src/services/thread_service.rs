//! Thread CRUD

use chrono::Utc;

use super::ProjectService;
use crate::error::{H2Error, H2Result};
use crate::models::{new_id, NewThread, Thread, ThreadCategory, ThreadUpdate};
use crate::security::{ensure_owner, validate_title};
use crate::store::Store;

fn parse_category(category: Option<&str>) -> H2Result<Option<ThreadCategory>> {
    match category.map(str::trim) {
        None | Some("") => Ok(None),
        Some(c) => c.parse().map(Some).map_err(H2Error::Validation),
    }
}

#[derive(Clone)]
pub struct ThreadService {
    store: Store,
    projects: ProjectService,
}

impl ThreadService {
    pub fn new(store: Store) -> Self {
        Self {
            projects: ProjectService::new(store.clone()),
            store,
        }
    }

    pub async fn create(
        &self,
        project_id: &str,
        caller: &str,
        req: NewThread,
    ) -> H2Result<Thread> {
        let project = self.projects.get(project_id, caller).await?;
        let title = validate_title(&req.title, "Title")?;
        let category = parse_category(req.category.as_deref())?;

        let now = Utc::now();
        let thread = Thread {
            id: new_id(),
            title,
            category,
            project_id: project.id,
            owner_id: caller.to_string(),
            messages: Vec::new(),
            message_count: 0,
            created_at: Some(now),
            last_modified: Some(now),
        };
        self.store.insert(&thread).await?;
        tracing::info!(thread_id = %thread.id, project_id = %project_id, "Thread created");
        Ok(thread)
    }

    /// Threads of a project, most recently modified first
    pub async fn list_for_project(&self, project_id: &str, caller: &str) -> H2Result<Vec<Thread>> {
        self.projects.get(project_id, caller).await?;
        let mut threads: Vec<Thread> = self.store.find_by("projectId", project_id).await?;
        threads.retain(|t| t.owner_id == caller);
        threads.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(threads)
    }

    pub async fn list_for_owner(&self, caller: &str) -> H2Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self.store.find_by("ownerId", caller).await?;
        threads.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(threads)
    }

    /// Thread with its messages ordered by timestamp
    pub async fn get(&self, thread_id: &str, caller: &str) -> H2Result<Thread> {
        let mut thread: Thread = self.store.require(thread_id).await?;
        ensure_owner(Some(thread.owner_id.as_str()), caller, "Thread")?;
        // stable sort keeps append order for equal timestamps
        thread.messages.sort_by_key(|m| m.timestamp);
        Ok(thread)
    }

    pub async fn update(
        &self,
        thread_id: &str,
        caller: &str,
        update: ThreadUpdate,
    ) -> H2Result<Thread> {
        let mut thread = self.get(thread_id, caller).await?;
        let mut fields = serde_json::Map::new();
        if let Some(title) = update.title {
            thread.title = validate_title(&title, "Title")?;
            fields.insert("title".to_string(), thread.title.clone().into());
        }
        if let Some(category) = update.category {
            thread.category = parse_category(Some(category.as_str()))?;
            fields.insert(
                "category".to_string(),
                thread
                    .category
                    .map(|c| c.as_str().into())
                    .unwrap_or(serde_json::Value::Null),
            );
        }
        let now = Utc::now();
        thread.last_modified = Some(now);
        fields.insert("lastModified".to_string(), serde_json::to_value(now)?);

        // field-level write so concurrent message appends are untouched
        if !self.store.set_fields::<Thread>(thread_id, fields).await? {
            return Err(H2Error::not_found("Thread"));
        }
        Ok(thread)
    }

    pub async fn delete(&self, thread_id: &str, caller: &str) -> H2Result<()> {
        self.get(thread_id, caller).await?;
        self.store.delete::<Thread>(thread_id).await?;
        tracing::info!(thread_id = %thread_id, "Thread deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, NewProject, Sender};
    use crate::services::MessageService;

    async fn setup() -> (Store, ThreadService, String) {
        let store = Store::memory();
        let project = ProjectService::new(store.clone())
            .create(
                "u1",
                NewProject {
                    project_name: "Pilot".into(),
                    facility_name: None,
                    project_priority: None,
                    description: None,
                    facility_location: None,
                    facility_type: None,
                    project_type: None,
                },
            )
            .await
            .unwrap();
        (store.clone(), ThreadService::new(store), project.id)
    }

    fn new_thread(title: &str, category: Option<&str>) -> NewThread {
        NewThread {
            title: title.into(),
            category: category.map(Into::into),
        }
    }

    #[tokio::test]
    async fn create_and_list_threads() {
        let (_, service, project_id) = setup().await;
        let thread = service
            .create(
                &project_id,
                "u1",
                new_thread("Setbacks", Some("Compliance Support")),
            )
            .await
            .unwrap();
        assert_eq!(thread.category, Some(ThreadCategory::ComplianceSupport));
        assert_eq!(thread.message_count, 0);

        let listed = service.list_for_project(&project_id, "u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(service.list_for_owner("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_category_and_foreign_project_are_rejected() {
        let (_, service, project_id) = setup().await;
        let err = service
            .create(&project_id, "u1", new_thread("x", Some("Gossip")))
            .await
            .unwrap_err();
        assert!(matches!(err, H2Error::Validation(_)));

        let err = service
            .create(&project_id, "u2", new_thread("x", None))
            .await
            .unwrap_err();
        assert!(matches!(err, H2Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn rename_keeps_messages() {
        let (store, service, project_id) = setup().await;
        let thread = service
            .create(&project_id, "u1", new_thread("Draft", None))
            .await
            .unwrap();
        MessageService::new(store)
            .append(&Message::new(&thread.id, "hello", Sender::User))
            .await
            .unwrap();

        let update = ThreadUpdate {
            title: Some("Final".into()),
            category: Some("Other".into()),
        };
        service.update(&thread.id, "u1", update).await.unwrap();

        let loaded = service.get(&thread.id, "u1").await.unwrap();
        assert_eq!(loaded.title, "Final");
        assert_eq!(loaded.category, Some(ThreadCategory::Other));
        assert_eq!(loaded.messages.len(), 1);

        service.delete(&thread.id, "u1").await.unwrap();
        assert!(matches!(
            service.get(&thread.id, "u1").await,
            Err(H2Error::NotFound(_))
        ));
    }
}
