//! Report export to DOCX and PDF
//!
//! Rendering is pure: a report goes in, bytes come out.

mod docx;
mod pdf;

pub use self::docx::render_docx;
pub use self::pdf::render_pdf;

use crate::error::{H2Error, H2Result};
use crate::models::Report;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn filename(self, report_id: &str) -> String {
        format!("report-{}.{}", report_id, self.extension())
    }
}

/// A rendered file ready to be sent as an attachment
#[derive(Debug)]
pub struct ExportedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Header lines shared by both formats
pub(crate) fn header_lines(report: &Report) -> [String; 4] {
    [
        format!("Report Title: {}", report.title),
        format!("Type: {}", report.report_type),
        format!("Project ID: {}", report.project_id),
        "Content:".to_string(),
    ]
}

pub struct ExportService {
    store: Store,
}

impl ExportService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn export(
        &self,
        report_id: Option<&str>,
        format: ExportFormat,
    ) -> H2Result<ExportedDocument> {
        let report_id = report_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| H2Error::Validation("Missing or invalid reportId".to_string()))?;
        let report: Report = self.store.require(report_id).await?;

        let bytes = match format {
            ExportFormat::Docx => render_docx(&report)?,
            ExportFormat::Pdf => render_pdf(&report)?,
        };
        tracing::debug!(
            report_id = %report_id,
            format = format.extension(),
            bytes = bytes.len(),
            "Report exported"
        );
        Ok(ExportedDocument {
            filename: format.filename(report_id),
            content_type: format.content_type(),
            bytes,
        })
    }
}
