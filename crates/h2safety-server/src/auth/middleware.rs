//! Authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use h2safety::routes::AppState;
use h2safety::{AuthenticatedUserId, H2Error};

use super::extract_session_token;

/// Resolve the session token and expose the caller as [`AuthenticatedUserId`]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(request.headers()) else {
        debug!("No session token on {}", request.uri().path());
        return H2Error::Auth("Authentication required".to_string()).into_response();
    };

    match state.auth.verify_token(&token).await {
        Ok(user_id) => {
            debug!(user_id = %user_id, "Session verified");
            request
                .extensions_mut()
                .insert(AuthenticatedUserId(user_id));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
