//! Response envelopes and API error mapping.
//!
//! The error envelope is the legacy `{"error": message}` object with the
//! status codes the original service used; success acknowledgements are
//! `{"message": ...}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use iisman_host::HostError;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: String,
}

/// API-level failures, mapped onto status codes in [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Website not found")]
    NotFound,
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Host(error) => match error {
                HostError::SiteNotFound(_) => StatusCode::NOT_FOUND,
                HostError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                HostError::BindingExists { .. }
                | HostError::UnsafeArgument { .. }
                | HostError::PathTraversal(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iisman_core::Protocol;

    #[test]
    fn test_status_mapping_follows_the_legacy_api() {
        assert_eq!(
            ApiError::BadRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_host_errors_map_onto_meaningful_statuses() {
        let not_found = ApiError::Host(HostError::SiteNotFound("blog".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = ApiError::Host(HostError::BindingExists {
            protocol: Protocol::Http,
            host: "localhost".into(),
            port: 80,
        });
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

        let timeout = ApiError::Host(HostError::Timeout {
            program: "powershell.exe".into(),
            timeout: std::time::Duration::from_secs(30),
        });
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let failed = ApiError::Host(HostError::CommandFailed {
            code: Some(1),
            output: "broken".into(),
        });
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_uses_the_error_envelope() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
