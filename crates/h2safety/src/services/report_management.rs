//! Listing, renaming and deleting generated reports

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{H2Error, H2Result};
use crate::models::Report;
use crate::security::{ensure_owner, require_non_empty, validate_title};
use crate::store::Store;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReportRequest {
    pub report_id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReportRequest {
    pub report_id: Option<String>,
}

#[derive(Clone)]
pub struct ReportManagementService {
    store: Store,
}

impl ReportManagementService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Caller's reports, newest first
    pub async fn list(&self, caller: &str) -> H2Result<Vec<Report>> {
        let mut reports: Vec<Report> = self.store.find_by("userId", caller).await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    pub async fn get(&self, report_id: &str, caller: &str) -> H2Result<Report> {
        let report: Report = self.store.require(report_id).await?;
        ensure_owner(report.user_id.as_deref(), caller, "Report")?;
        Ok(report)
    }

    /// Rename is the only mutation a report allows
    pub async fn rename(&self, req: RenameReportRequest, caller: &str) -> H2Result<Report> {
        let report_id =
            require_non_empty(req.report_id.as_deref(), "Missing reportId or title")?;
        let title = validate_title(req.title.as_deref().unwrap_or_default(), "Title")?;
        let mut report = self.get(&report_id, caller).await?;

        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(title.clone()));
        if !self.store.set_fields::<Report>(&report_id, fields).await? {
            return Err(H2Error::not_found("Report"));
        }
        report.title = title;
        Ok(report)
    }

    pub async fn delete(&self, req: DeleteReportRequest, caller: &str) -> H2Result<()> {
        let report_id = require_non_empty(req.report_id.as_deref(), "Missing reportId")?;
        self.get(&report_id, caller).await?;
        self.store.delete::<Report>(&report_id).await?;
        tracing::info!(report_id = %report_id, "Report deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportType;
    use chrono::{Duration, Utc};

    fn report(id: &str, owner: &str, age_minutes: i64) -> Report {
        Report {
            id: id.into(),
            project_id: "p1".into(),
            user_id: Some(owner.into()),
            title: format!("Report {}", id),
            content: "body".into(),
            report_type: ReportType::Summary,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    async fn setup() -> ReportManagementService {
        let store = Store::memory();
        for r in [
            report("r1", "u1", 10),
            report("r2", "u1", 1),
            report("r3", "u2", 5),
        ] {
            store.insert(&r).await.unwrap();
        }
        ReportManagementService::new(store)
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let service = setup().await;
        let ids: Vec<_> = service
            .list("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["r2", "r1"]);
    }

    #[tokio::test]
    async fn rename_changes_only_title() {
        let service = setup().await;
        let renamed = service
            .rename(
                RenameReportRequest {
                    report_id: Some("r1".into()),
                    title: Some("Permit package".into()),
                },
                "u1",
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Permit package");
        let loaded = service.get("r1", "u1").await.unwrap();
        assert_eq!(loaded.title, "Permit package");
        assert_eq!(loaded.content, "body");
    }

    #[tokio::test]
    async fn non_owner_cannot_rename_or_delete() {
        let service = setup().await;
        let err = service
            .rename(
                RenameReportRequest {
                    report_id: Some("r3".into()),
                    title: Some("mine now".into()),
                },
                "u1",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, H2Error::Forbidden(_)));

        let err = service
            .delete(DeleteReportRequest { report_id: Some("r3".into()) }, "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, H2Error::Forbidden(_)));

        service
            .delete(DeleteReportRequest { report_id: Some("r3".into()) }, "u2")
            .await
            .unwrap();
        assert!(matches!(service.get("r3", "u2").await, Err(H2Error::NotFound(_))));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let service = setup().await;
        let err = service
            .rename(
                RenameReportRequest {
                    report_id: Some("r1".into()),
                    title: Some("   ".into()),
                },
                "u1",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, H2Error::Validation(_)));
    }
}
