//! Error types for the H2Safety services

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::models::ReportStage;

/// Result type alias for H2Safety operations
pub type H2Result<T> = Result<T, H2Error>;

/// Error taxonomy shared by every service and route
#[derive(Debug, Error)]
pub enum H2Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Network(String),

    #[error("Report generation failed during {stage}: {message}")]
    Generation { stage: ReportStage, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for H2Error {
    fn from(err: mongodb::error::Error) -> Self {
        H2Error::Database(err.to_string())
    }
}

impl From<serde_json::Error> for H2Error {
    fn from(err: serde_json::Error) -> Self {
        H2Error::Serialization(err.to_string())
    }
}

impl From<bson::ser::Error> for H2Error {
    fn from(err: bson::ser::Error) -> Self {
        H2Error::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for H2Error {
    fn from(err: bson::de::Error) -> Self {
        H2Error::Serialization(err.to_string())
    }
}

/// API error body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl H2Error {
    /// Stable error code used in logs
    pub fn code(&self) -> &'static str {
        match self {
            H2Error::Validation(_) => "VALIDATION_ERROR",
            H2Error::Auth(_) => "AUTH_ERROR",
            H2Error::Forbidden(_) => "FORBIDDEN",
            H2Error::NotFound(_) => "NOT_FOUND",
            H2Error::Upstream(_) => "UPSTREAM_ERROR",
            H2Error::Timeout(_) => "TIMEOUT",
            H2Error::Network(_) => "NETWORK_ERROR",
            H2Error::Generation { .. } => "GENERATION_ERROR",
            H2Error::Database(_) => "DATABASE_ERROR",
            H2Error::Serialization(_) => "SERIALIZATION_ERROR",
            H2Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            H2Error::Validation(_) => StatusCode::BAD_REQUEST,
            H2Error::Auth(_) => StatusCode::UNAUTHORIZED,
            H2Error::Forbidden(_) => StatusCode::FORBIDDEN,
            H2Error::NotFound(_) => StatusCode::NOT_FOUND,
            H2Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            H2Error::Network(_) => StatusCode::BAD_GATEWAY,

            H2Error::Upstream(_)
            | H2Error::Generation { .. }
            | H2Error::Database(_)
            | H2Error::Serialization(_)
            | H2Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(what: &str) -> Self {
        H2Error::NotFound(format!("{} not found", what))
    }
}

impl IntoResponse for H2Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "{}", self);
        }
        let body = ApiError {
            error: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
