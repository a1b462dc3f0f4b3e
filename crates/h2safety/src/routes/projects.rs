//! Project routes - owner scoped CRUD and project threads

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ApiJson, AppState};
use crate::error::H2Result;
use crate::models::{NewProject, NewThread, Project, ProjectUpdate, Thread};
use crate::services::{ProjectService, ThreadService};
use crate::AuthenticatedUserId;

pub fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(
            "/projects/{id}/threads",
            get(list_threads).post(create_thread),
        )
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
) -> H2Result<Json<Vec<Project>>> {
    let projects = ProjectService::new(state.store.clone())
        .list(user.as_str())
        .await?;
    Ok(Json(projects))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    ApiJson(req): ApiJson<NewProject>,
) -> H2Result<(StatusCode, Json<Project>)> {
    let project = ProjectService::new(state.store.clone())
        .create(user.as_str(), req)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Project>> {
    let project = ProjectService::new(state.store.clone())
        .get(&id, user.as_str())
        .await?;
    Ok(Json(project))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProjectUpdate>,
) -> H2Result<Json<Project>> {
    let project = ProjectService::new(state.store.clone())
        .update(&id, user.as_str(), update)
        .await?;
    Ok(Json(project))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Value>> {
    ProjectService::new(state.store.clone())
        .delete(&id, user.as_str())
        .await?;
    Ok(Json(json!({ "message": "Project deleted" })))
}

async fn list_threads(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
) -> H2Result<Json<Vec<Thread>>> {
    let threads = ThreadService::new(state.store.clone())
        .list_for_project(&id, user.as_str())
        .await?;
    Ok(Json(threads))
}

async fn create_thread(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewThread>,
) -> H2Result<(StatusCode, Json<Thread>)> {
    let thread = ThreadService::new(state.store.clone())
        .create(&id, user.as_str(), req)
        .await?;
    Ok((StatusCode::CREATED, Json(thread)))
}
