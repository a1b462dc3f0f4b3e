//! Multistep report generator
//!
//! A fixed linear pipeline of four LLM calls:
//! section planning, draft, reference extraction, refinement.
//! Each stage feeds the next. The first failing stage aborts the run and
//! nothing is persisted; only the refined report is stored.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::prompts::{
    draft_prompt, references_prompt, refine_prompt, sections_prompt, DRAFT_SYSTEM,
    REFERENCES_SYSTEM, REFINE_SYSTEM, SECTIONS_SYSTEM,
};
use super::transcript::{build_transcript, project_json};
use crate::error::{H2Error, H2Result};
use crate::llm::{ChatCompletion, ChatRequest};
use crate::models::{new_id, Project, Report, ReportStage, ReportType, Thread};
use crate::security::require_non_empty;
use crate::store::Store;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultistepReportRequest {
    pub project_id: Option<String>,
    pub thread_id: Option<String>,
}

pub struct MultistepReportService {
    store: Store,
    llm: Arc<dyn ChatCompletion>,
}

impl MultistepReportService {
    pub fn new(store: Store, llm: Arc<dyn ChatCompletion>) -> Self {
        Self { store, llm }
    }

    async fn run_stage(&self, stage: ReportStage, request: ChatRequest) -> H2Result<String> {
        tracing::debug!(stage = %stage, "Report stage started");
        let output = self
            .llm
            .complete(request)
            .await
            .map_err(|e| H2Error::Generation {
                stage,
                message: e.to_string(),
            })?;
        tracing::debug!(stage = %stage, chars = output.len(), "Report stage finished");
        Ok(output)
    }

    pub async fn generate(&self, req: MultistepReportRequest) -> H2Result<Report> {
        const MISSING: &str = "Missing or invalid projectId/threadId";
        let project_id = require_non_empty(req.project_id.as_deref(), MISSING)?;
        let thread_id = require_non_empty(req.thread_id.as_deref(), MISSING)?;

        let project: Project = self.store.require(&project_id).await?;
        let thread: Thread = self.store.require(&thread_id).await?;
        let project_doc = project_json(&project)?;
        let transcript = build_transcript(&thread.messages);

        let sections = self
            .run_stage(
                ReportStage::SectionPlanning,
                ChatRequest::new(
                    SECTIONS_SYSTEM,
                    sections_prompt(&project_doc, &transcript),
                    0.3,
                    2000,
                )
                .top_p(0.85)
                .penalties(0.2, 0.2),
            )
            .await?;

        let draft = self
            .run_stage(
                ReportStage::Draft,
                ChatRequest::new(
                    DRAFT_SYSTEM,
                    draft_prompt(&sections, &project_doc, &transcript),
                    0.2,
                    6000,
                ),
            )
            .await?;

        let references = self
            .run_stage(
                ReportStage::ReferenceExtraction,
                ChatRequest::new(REFERENCES_SYSTEM, references_prompt(&draft), 0.2, 2000),
            )
            .await?;

        let content = self
            .run_stage(
                ReportStage::Refinement,
                ChatRequest::new(REFINE_SYSTEM, refine_prompt(&draft, &references), 0.2, 6000),
            )
            .await?;

        let report = Report {
            id: new_id(),
            project_id,
            user_id: Some(project.owner_id.clone()),
            title: format!("Engineering Report - {}", project.display_name()),
            content,
            report_type: ReportType::Project,
            created_at: Utc::now(),
        };
        self.store.insert(&report).await?;
        tracing::info!(report_id = %report.id, "Multistep report generated");
        Ok(report)
    }
}
