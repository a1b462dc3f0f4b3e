//! Report routes - generators and owner management

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::models::Report;
use crate::services::{
    generated_message, DeleteReportRequest, GenerateReportRequest, MultistepReportRequest,
    MultistepReportService, RenameReportRequest, ReportManagementService, ReportService,
};
use crate::AuthenticatedUserId;

/// Report generators, callable without a session
pub fn generator_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/generate", post(generate_report))
        .route("/reports/multistep-generate", post(multistep_generate))
}

/// Report management for the signed-in owner
pub fn management_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/{id}", get(get_report))
        .route("/reports/update", post(rename_report))
        .route("/reports/delete", post(delete_report))
}

async fn generate_report(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GenerateReportRequest>,
) -> H2Result<Json<Value>> {
    let report = ReportService::new(state.store.clone(), state.llm.clone())
        .generate(req)
        .await?;
    Ok(Json(json!({
        "message": generated_message(report.report_type),
        "content": report.content,
        "reportId": report.id,
    })))
}

async fn multistep_generate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MultistepReportRequest>,
) -> H2Result<Json<Value>> {
    let report = MultistepReportService::new(state.store.clone(), state.llm.clone())
        .generate(req)
        .await?;
    Ok(Json(json!({
        "message": "Report generated",
        "content": report.content,
        "reportId": report.id,
    })))
}

async fn list_reports(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
) -> H2Result<Json<Vec<Report>>> {
    let reports = ReportManagementService::new(state.store.clone())
        .list(user.as_str())
        .await?;
    Ok(Json(reports))
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Report>> {
    let report = ReportManagementService::new(state.store.clone())
        .get(&id, user.as_str())
        .await?;
    Ok(Json(report))
}

async fn rename_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    ApiJson(req): ApiJson<RenameReportRequest>,
) -> H2Result<Json<Value>> {
    let report = ReportManagementService::new(state.store.clone())
        .rename(req, user.as_str())
        .await?;
    Ok(Json(json!({
        "message": "Report updated",
        "report": report,
    })))
}

async fn delete_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    ApiJson(req): ApiJson<DeleteReportRequest>,
) -> H2Result<Json<Value>> {
    ReportManagementService::new(state.store.clone())
        .delete(req, user.as_str())
        .await?;
    Ok(Json(json!({ "message": "Report deleted" })))
}
