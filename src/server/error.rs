use axum::{
    http::StatusCode,
    response::{ IntoResponse, Response },
    Json,
};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::llm::LlmError;

/// Everything /api/chat can fail with, mapped onto HTTP statuses.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Misconfigured(String),
    /// Provider-reported failure; the provider's status is mirrored.
    #[error("upstream error ({status}): {details}")]
    Upstream { status: u16, details: String },
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<LlmError> for RelayError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => RelayError::Upstream {
                status,
                details: message,
            },
            other => RelayError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!("Chat request failed: {}", self);

        let (status, body) = match self {
            RelayError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            RelayError::Misconfigured(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            RelayError::Upstream { status, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ErrorBody {
                    error: "upstream error".to_string(),
                    details: Some(details),
                },
            ),
            RelayError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal error".to_string(),
                    details: Some(details),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
