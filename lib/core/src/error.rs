use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Unified service error type used across all modules.
///
/// Each variant maps to an HTTP status code. Responses carry the status
/// only — provisioning clients are unattended phones, and the reason an
/// account, device, or template lookup failed must not leak to the
/// network. The message is for server-side logs.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Input data is invalid. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Request identity rejected. HTTP 403.
    #[error("{0}")]
    PermissionDenied(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::PermissionDenied("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ServiceError::Storage("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_has_no_body_detail() {
        // The Display text stays out of the wire response.
        let resp = ServiceError::NotFound("account 'acme' not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_display_is_just_message() {
        assert_eq!(ServiceError::NotFound("device 123".into()).to_string(), "device 123");
        assert_eq!(ServiceError::PermissionDenied("subject mismatch".into()).to_string(), "subject mismatch");
    }
}
