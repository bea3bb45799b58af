//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered to HTTP callers.

use crate::config::ConfigError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use course_search_core::ports::PortError;
use serde_json::json;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the retrieval core or one of its ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// The request was well-formed JSON but its values were not acceptable.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body could not be read at all (for example, it exceeded the size limit).
    #[error("Request rejected: {1}")]
    Rejected(StatusCode, String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Port(PortError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Port(PortError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Port(PortError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected(status, _) => *status,
            ApiError::Port(PortError::Unexpected(_))
            | ApiError::Config(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Port(PortError::NotFound(_)) => "Document not found".to_string(),
            ApiError::Port(PortError::Forbidden(reason)) => reason.clone(),
            ApiError::Port(PortError::Unauthorized) => "Unauthorized".to_string(),
            ApiError::Validation(reason) | ApiError::Rejected(_, reason) => reason.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

/// Body extraction failures are reported like any other invalid request.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(_) => {
                ApiError::Rejected(rejection.status(), rejection.body_text())
            }
            _ => ApiError::Validation(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
