//! Single-step report generator

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::prompts::{communication_prompt, custom_prompt, report_system, summary_prompt};
use super::transcript::{build_transcript, project_json};
use crate::error::{H2Error, H2Result};
use crate::llm::{ChatCompletion, ChatRequest};
use crate::models::{new_id, Project, Report, ReportType, Thread};
use crate::security::require_non_empty;
use crate::store::Store;

pub const NO_REPORT_CONTENT: &str = "No report content generated.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub project_id: Option<String>,
    pub thread_id: Option<String>,
    pub report_type: Option<String>,
    pub custom_prompt: Option<String>,
}

/// What the caller asked for, validated before any I/O
enum ReportKind {
    Summary,
    Communication,
    Custom(String),
}

impl ReportKind {
    fn parse(report_type: &str, custom: Option<&str>) -> H2Result<Self> {
        match report_type {
            "summary" => Ok(ReportKind::Summary),
            "communication" => Ok(ReportKind::Communication),
            "custom" => match custom.map(str::trim) {
                Some(p) if !p.is_empty() => Ok(ReportKind::Custom(p.to_string())),
                _ => Err(H2Error::Validation(
                    "Custom prompt is required for custom reports.".to_string(),
                )),
            },
            _ => Err(H2Error::Validation(
                "Invalid reportType. Use summary, communication, or custom.".to_string(),
            )),
        }
    }

    fn report_type(&self) -> ReportType {
        match self {
            ReportKind::Summary => ReportType::Summary,
            ReportKind::Communication => ReportType::Communication,
            ReportKind::Custom(_) => ReportType::Custom,
        }
    }
}

pub struct ReportService {
    store: Store,
    llm: Arc<dyn ChatCompletion>,
}

impl ReportService {
    pub fn new(store: Store, llm: Arc<dyn ChatCompletion>) -> Self {
        Self { store, llm }
    }

    pub async fn generate(&self, req: GenerateReportRequest) -> H2Result<Report> {
        const MISSING: &str = "Missing or invalid projectId, threadId, or reportType";
        let report_type = require_non_empty(req.report_type.as_deref(), MISSING)?;
        let kind = ReportKind::parse(&report_type, req.custom_prompt.as_deref())?;
        let project_id = require_non_empty(req.project_id.as_deref(), MISSING)?;
        let thread_id = require_non_empty(req.thread_id.as_deref(), MISSING)?;

        let project: Project = self.store.require(&project_id).await?;
        let thread: Thread = self.store.require(&thread_id).await?;
        let project_doc = project_json(&project)?;
        let transcript = build_transcript(&thread.messages);

        let prompt = match &kind {
            ReportKind::Summary => summary_prompt(&project_doc, &transcript),
            ReportKind::Communication => communication_prompt(&project_doc, &transcript),
            ReportKind::Custom(request) => custom_prompt(request, &project_doc, &transcript),
        };
        let report_type = kind.report_type();
        let request = ChatRequest::new(report_system(report_type), prompt, 0.2, 6000)
            .penalties(0.4, 0.2);

        let content = self.llm.complete(request).await?;
        let content = if content.trim().is_empty() {
            NO_REPORT_CONTENT.to_string()
        } else {
            content
        };

        let report = Report {
            id: new_id(),
            project_id,
            user_id: Some(project.owner_id.clone()),
            title: format!("Report - {} ({})", project.display_name(), report_type),
            content,
            report_type,
            created_at: Utc::now(),
        };
        self.store.insert(&report).await?;
        tracing::info!(report_id = %report.id, report_type = %report_type, "Report generated");
        Ok(report)
    }
}

/// "Summary report generated successfully."
pub fn generated_message(report_type: ReportType) -> String {
    let name = report_type.as_str();
    let mut chars = name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} report generated successfully.", capitalized)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::{Message, Sender};
    use crate::services::MessageService;

    /// Project p1 owned by u1 with a two-message thread t1
    pub async fn seed(store: &Store) {
        let now = Utc::now();
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "projectName": "Coastal Electrolyzer",
            "facilityName": "Harbor Site",
            "ownerId": "u1",
            "createdAt": now,
            "updatedAt": now,
        }))
        .unwrap();
        store.insert(&project).await.unwrap();

        let thread: Thread = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "title": "Permitting",
            "projectId": "p1",
            "ownerId": "u1",
        }))
        .unwrap();
        store.insert(&thread).await.unwrap();

        let messages = MessageService::new(store.clone());
        messages
            .append(&Message::new("t1", "Which permits apply?", Sender::User))
            .await
            .unwrap();
        messages
            .append(&Message::new(
                "t1",
                "An air permit and a fire code permit.",
                Sender::Ai,
            ))
            .await
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collections;
    use crate::llm::testing::ScriptedLlm;
    use crate::store::MemoryBackend;

    type Fixture = (Arc<MemoryBackend>, Arc<ScriptedLlm>, ReportService);

    async fn setup(llm: ScriptedLlm) -> Fixture {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::new(backend.clone());
        fixtures::seed(&store).await;
        let llm = Arc::new(llm);
        (backend, llm.clone(), ReportService::new(store, llm))
    }

    fn request(report_type: &str, custom: Option<&str>) -> GenerateReportRequest {
        GenerateReportRequest {
            project_id: Some("p1".into()),
            thread_id: Some("t1".into()),
            report_type: Some(report_type.into()),
            custom_prompt: custom.map(Into::into),
        }
    }

    #[tokio::test]
    async fn summary_report_is_persisted_for_project_owner() {
        let (backend, llm, service) = setup(ScriptedLlm::new().reply("## Summary")).await;
        let report = service.generate(request("summary", None)).await.unwrap();
        assert_eq!(report.title, "Report - Coastal Electrolyzer (summary)");
        assert_eq!(report.user_id.as_deref(), Some("u1"));
        assert_eq!(report.report_type, ReportType::Summary);
        assert_eq!(backend.count(collections::REPORTS).await, 1);

        let call = &llm.calls()[0];
        assert_eq!(call.temperature, 0.2);
        assert_eq!(call.max_tokens, 6000);
        assert_eq!(call.frequency_penalty, Some(0.4));
        assert_eq!(call.presence_penalty, Some(0.2));
        assert!(call.user.contains("\"projectName\": \"Coastal Electrolyzer\""));
        assert!(call.user.contains("User: Which permits apply?"));
    }

    #[tokio::test]
    async fn custom_report_embeds_request() {
        let (_, llm, service) = setup(ScriptedLlm::new()).await;
        let report = service
            .generate(request("custom", Some("List the setback distances")))
            .await
            .unwrap();
        assert_eq!(report.report_type, ReportType::Custom);
        assert!(llm.calls()[0].user.contains("\"List the setback distances\""));
        assert_eq!(
            llm.calls()[0].system,
            "You are a versatile technical assistant skilled at generating customized reports."
        );
    }

    #[tokio::test]
    async fn invalid_type_makes_no_call_and_no_write() {
        let (backend, llm, service) = setup(ScriptedLlm::new()).await;
        for bad in ["project", "SUMMARY", "memo"] {
            let err = service.generate(request(bad, None)).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid reportType. Use summary, communication, or custom."
            );
        }
        assert!(llm.calls().is_empty());
        assert_eq!(backend.count(collections::REPORTS).await, 0);
    }

    #[tokio::test]
    async fn custom_without_prompt_is_rejected_before_lookup() {
        let service = ReportService::new(Store::memory(), Arc::new(ScriptedLlm::new()));
        let err = service.generate(request("custom", Some("  "))).await.unwrap_err();
        assert!(matches!(
            err,
            H2Error::Validation(ref m) if m == "Custom prompt is required for custom reports."
        ));
    }

    #[tokio::test]
    async fn missing_thread_is_not_found() {
        let (_, llm, service) = setup(ScriptedLlm::new()).await;
        let err = service
            .generate(GenerateReportRequest {
                thread_id: Some("nope".into()),
                ..request("communication", None)
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Thread not found");
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_completion_uses_placeholder() {
        let (_, _, service) = setup(ScriptedLlm::new().reply("")).await;
        let report = service.generate(request("communication", None)).await.unwrap();
        assert_eq!(report.content, NO_REPORT_CONTENT);
    }

    #[test]
    fn success_message_capitalizes_type() {
        assert_eq!(
            generated_message(ReportType::Communication),
            "Communication report generated successfully."
        );
    }
}
