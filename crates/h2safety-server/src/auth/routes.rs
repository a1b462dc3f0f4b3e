//! Authentication API routes

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use h2safety::routes::{ApiJson, AppState};
use h2safety::services::{LoginRequest, ProfileUpdate, RegisterRequest};
use h2safety::{AuthenticatedUserId, H2Result};

use super::{extract_session_token, SessionCookie};

/// Register, login and logout; reachable without a session
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Routes behind the auth middleware
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(get_current_user).put(update_profile))
}

async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> H2Result<Response> {
    let user = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))).into_response())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Extension(cookie): Extension<SessionCookie>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> H2Result<Response> {
    let session = state.auth.login(request).await?;
    tracing::info!(user_id = %session.user.id, "User logged in");

    let set_cookie = cookie.build(&session.token, state.auth.session_ttl().num_seconds());
    Ok(([(SET_COOKIE, set_cookie)], Json(session)).into_response())
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(cookie): Extension<SessionCookie>,
    headers: HeaderMap,
) -> H2Result<Response> {
    if let Some(token) = extract_session_token(&headers) {
        state.auth.logout(&token).await?;
    }
    Ok((
        [(SET_COOKIE, cookie.clear())],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response())
}

async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
) -> H2Result<Response> {
    let user = state.auth.get_user(user.as_str()).await?;
    Ok(Json(user).into_response())
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUserId>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> H2Result<Response> {
    let user = state.auth.update_profile(user.as_str(), update).await?;
    Ok(Json(user).into_response())
}
