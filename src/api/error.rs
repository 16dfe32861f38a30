//! Mapping of crate errors onto HTTP responses

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::TravelAgentError;
use crate::models::ErrorResponse;

/// Error returned by every handler, rendered as `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: TravelAgentError,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> &TravelAgentError {
        &self.error
    }
}

impl From<TravelAgentError> for ApiError {
    fn from(error: TravelAgentError) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { status, error }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413, every other rejection is bad input
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self {
            status,
            error: TravelAgentError::validation(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, "Request failed: {}", self.error);
        } else {
            tracing::debug!(status = %self.status, "Request rejected: {}", self.error);
        }
        let body = ErrorResponse {
            detail: self.error.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
