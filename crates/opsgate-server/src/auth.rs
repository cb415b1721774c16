//! Authentication middleware for protected routes.
//!
//! Every `/api/v1/*` request passes through [`require_session`], the
//! single call site of the access decision gate. On success the
//! verified claims ride along as a request extension; on denial the
//! response carries the advisory side-channel headers telling the
//! client where to log in and to discard its stored credential.

use crate::state::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use opsgate_token::{Claims, Decision, DenyReason, authorize};
use serde_json::json;

/// Response header naming the login redirect target.
pub const LOGIN_REDIRECT_HEADER: &str = "x-redirect";

/// Response header instructing the client to drop its credential.
pub const CLEAR_TOKEN_HEADER: &str = "x-clear-token";

/// Verified claims attached to an allowed request.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity(pub Claims);

/// Axum middleware gating protected routes on a valid credential.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authorize(authorization, state.key()) {
        Decision::Allow(claims) => {
            req.extensions_mut().insert(VerifiedIdentity(claims));
            next.run(req).await
        }
        Decision::Deny(reason) => deny_response(&state, reason, req.uri().path()),
    }
}

/// Build the denial response for a gate decision.
///
/// Client-caused denials share one opaque 401 body regardless of cause;
/// operator misconfiguration is a 500 without the redirect/discard
/// signals (there is nothing useful for the client to discard).
fn deny_response(state: &AppState, reason: DenyReason, path: &str) -> Response {
    if !reason.is_client_caused() {
        tracing::error!(path, "signing secret not configured for protected route");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Server misconfiguration" })),
        )
            .into_response();
    }

    tracing::warn!(path, reason = reason.as_str(), "denied protected request");

    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Access denied" })),
    )
        .into_response();

    let headers = response.headers_mut();
    if let Ok(value) = state.login_path().parse() {
        headers.insert(LOGIN_REDIRECT_HEADER, value);
    }
    if reason.discard_credential() {
        headers.insert(CLEAR_TOKEN_HEADER, "true".parse().expect("static value"));
    }
    headers.insert(header::CACHE_CONTROL, "no-store".parse().expect("static value"));

    response
}
