//! Error types for the gateway.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by gateway handlers.
///
/// Response bodies are deliberately generic: nothing below the gate may
/// leak internal detail or let a caller distinguish failure causes
/// beyond the status class.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Operator-caused misconfiguration (e.g. missing signing secret).
    /// The detail is for logs; the response body stays generic.
    #[error("server misconfiguration: {0}")]
    Misconfigured(String),

    /// The request body was unusable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The identity provider rejected (or we could not verify) the
    /// presented provider token.
    #[error("provider token rejected")]
    ProviderRejected,

    /// Authenticated but not on the allow-list for a privileged
    /// operation. Distinct from a credential failure: no redirect, no
    /// credential discard.
    #[error("insufficient privilege")]
    InsufficientPrivilege,

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Misconfigured(detail) => {
                tracing::error!(detail = %detail, "server misconfiguration");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server misconfiguration")
            }
            ServerError::InvalidRequest(detail) => {
                tracing::debug!(detail = %detail, "invalid request");
                (StatusCode::BAD_REQUEST, "Invalid request")
            }
            ServerError::ProviderRejected => {
                (StatusCode::UNAUTHORIZED, "Failed to verify provider token")
            }
            ServerError::InsufficientPrivilege => (
                StatusCode::FORBIDDEN,
                "Only privileged operatives may perform this operation",
            ),
            ServerError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
