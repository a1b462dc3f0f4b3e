//! JSON API routes
//!
//! `public_routes` match the unauthenticated surface the dashboard calls
//! directly. `protected_routes` expect an [`AuthenticatedUserId`]
//! extension inserted by the server's auth middleware.
//!
//! [`AuthenticatedUserId`]: crate::AuthenticatedUserId

pub mod export;
pub mod health;
pub mod insights;
pub mod messages;
pub mod projects;
pub mod rag;
pub mod reports;
pub mod signup;
pub mod threads;

use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::H2Error;
use crate::llm::ChatCompletion;
use crate::rag::RagClient;
use crate::services::AuthService;
use crate::store::Store;

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub llm: Arc<dyn ChatCompletion>,
    pub rag: Arc<dyn RagClient>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        store: Store,
        llm: Arc<dyn ChatCompletion>,
        rag: Arc<dyn RagClient>,
        session_ttl_days: i64,
    ) -> Self {
        Self {
            auth: AuthService::new(store.clone(), session_ttl_days),
            store,
            llm,
            rag,
        }
    }
}

/// JSON body extractor whose rejections use the `{error}` body
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = H2Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| H2Error::Validation(rejection.body_text()))
    }
}

/// Routes reachable without a session
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::health_routes())
        .merge(insights::insight_routes())
        .merge(reports::generator_routes())
        .merge(messages::message_routes())
        .merge(rag::rag_routes())
        .merge(export::export_routes())
        .merge(signup::signup_routes())
}

/// Routes that read the caller from `AuthenticatedUserId`
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(projects::project_routes())
        .merge(threads::thread_routes())
        .merge(reports::management_routes())
}
