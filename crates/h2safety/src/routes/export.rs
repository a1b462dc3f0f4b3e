//! Report download routes - DOCX and PDF attachments

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::error::H2Result;
use crate::export::{ExportFormat, ExportService, ExportedDocument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub report_id: Option<String>,
}

pub fn export_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/download-docx", get(download_docx).post(download_docx))
        .route("/reports/download-pdf", get(download_pdf).post(download_pdf))
}

fn attachment(doc: ExportedDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, doc.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", doc.filename),
            ),
        ],
        doc.bytes,
    )
        .into_response()
}

async fn export(
    state: &AppState,
    query: ExportQuery,
    format: ExportFormat,
) -> H2Result<Response> {
    let doc = ExportService::new(state.store.clone())
        .export(query.report_id.as_deref(), format)
        .await?;
    Ok(attachment(doc))
}

async fn download_docx(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> H2Result<Response> {
    export(&state, query, ExportFormat::Docx).await
}

async fn download_pdf(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> H2Result<Response> {
    export(&state, query, ExportFormat::Pdf).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Report, ReportType};
    use crate::routes::testing::state;
    use crate::store::Store;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn docx_download_sets_attachment_headers() {
        let store = Store::memory();
        store
            .insert(&Report {
                id: "r7".into(),
                project_id: "p1".into(),
                user_id: Some("u1".into()),
                title: "Summary".into(),
                content: "Body".into(),
                report_type: ReportType::Summary,
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let response = export_routes()
            .with_state(state(store))
            .oneshot(
                Request::builder()
                    .uri("/reports/download-docx?reportId=r7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=report-r7.docx"
        );
    }

    #[tokio::test]
    async fn unknown_report_is_404() {
        let response = export_routes()
            .with_state(state(Store::memory()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports/download-pdf?reportId=missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
