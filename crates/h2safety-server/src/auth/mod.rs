//! Session authentication for the API server

pub mod middleware;
pub mod routes;

use axum::http::{header, HeaderMap};
use axum_extra::extract::CookieJar;

pub const SESSION_COOKIE_NAME: &str = "h2_session";
pub const SESSION_HEADER: &str = "X-Session-Token";

/// Session cookie attributes, attached as a router extension
#[derive(Clone, Copy, Debug)]
pub struct SessionCookie {
    pub secure: bool,
}

impl SessionCookie {
    pub fn build(&self, token: &str, max_age_secs: i64) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
            SESSION_COOKIE_NAME,
            token,
            max_age_secs,
            self.secure_flag()
        )
    }

    pub fn clear(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
            SESSION_COOKIE_NAME,
            self.secure_flag()
        )
    }

    fn secure_flag(&self) -> &'static str {
        if self.secure {
            "; Secure"
        } else {
            ""
        }
    }
}

/// Find a session token in the cookie, bearer or session header, in that order
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
pub(crate) mod testing {
    use h2safety::llm::OpenAiClient;
    use h2safety::rag::HttpRagClient;
    use h2safety::routes::AppState;
    use h2safety::Store;
    use std::sync::Arc;
    use std::time::Duration;

    /// App state over the memory store; the upstream clients point nowhere
    pub fn state() -> Arc<AppState> {
        let llm = OpenAiClient::new(
            "http://127.0.0.1:9",
            "sk-test",
            "gpt-4o-mini",
            Duration::from_secs(1),
        )
        .unwrap();
        let rag = HttpRagClient::new("http://127.0.0.1:9/ask", Duration::from_secs(1)).unwrap();
        Arc::new(AppState::new(Store::memory(), Arc::new(llm), Arc::new(rag), 7))
    }
}
