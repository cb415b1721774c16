//! Request handlers for the gateway.

use crate::auth::VerifiedIdentity;
use crate::error::ServerError;
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
};
use opsgate_roster::Operative;
use opsgate_token::Claims;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::json;

// =============================================================================
// Response types
// =============================================================================

/// Identity returned to the client after verification.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub privileged: bool,
}

impl UserResponse {
    fn from_claims(claims: &Claims, privileged: bool) -> Self {
        Self {
            sub: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            picture: claims.picture.clone(),
            privileged,
        }
    }
}

/// Body of the issuance request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "idToken", default)]
    pub id_token: Option<String>,
}

// =============================================================================
// Protected handlers (behind the gate)
// =============================================================================

/// `GET /api/v1/user` — the verified identity plus its privilege flag.
pub async fn user(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Response {
    let claims = &identity.0;
    let privileged = state.roster().is_privileged(claims.email.as_deref());
    let body = Json(json!({ "user": UserResponse::from_claims(claims, privileged) }));

    ([(header::CACHE_CONTROL, "no-store")], body).into_response()
}

/// `GET /api/v1/hash` — privilege-gated ephemeral key generation.
///
/// Requires both a verified credential (the gate) and roster membership
/// of the verified email. Failing the roster check alone is a 403, not
/// a credential problem.
pub async fn hash_key(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Response, ServerError> {
    if !state.roster().is_privileged(identity.0.email.as_deref()) {
        return Err(ServerError::InsufficientPrivilege);
    }

    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    let hash: String = bytes.iter().map(|b| format!("{b:02X}")).collect();

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "hash": hash })),
    )
        .into_response())
}

/// `GET /api/v1/operatives` — roster enumeration for display.
///
/// Lower-trust read path: any verified session may list the roster;
/// membership itself is only checked where privilege is required.
pub async fn operatives(State(state): State<AppState>) -> Json<serde_json::Value> {
    let entries: &[Operative] = state.roster().entries();
    Json(json!({ "operatives": entries }))
}

// =============================================================================
// Public handlers
// =============================================================================

/// `POST /api/auth/google` — exchange a provider ID token for a session
/// credential.
pub async fn google_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(request) =
        body.map_err(|e| ServerError::InvalidRequest(format!("invalid JSON body: {e}")))?;
    let id_token = request
        .id_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("idToken is required".to_string()))?;

    let identity = state.issuer().verify_id_token(id_token).await?;

    let signer = state
        .signer()
        .ok_or_else(|| ServerError::Misconfigured("signing secret is not configured".to_string()))?;

    let claims = Claims {
        sub: Some(identity.sub),
        email: identity.email,
        name: identity.name,
        picture: identity.picture,
        iat: None,
        exp: None,
    };
    let token = signer
        .mint(&claims)
        .map_err(|e| ServerError::Misconfigured(format!("failed to mint credential: {e}")))?;

    let user = UserResponse::from_claims(&claims, state.roster().is_privileged(claims.email.as_deref()));
    Ok(Json(json!({ "token": token, "user": user })).into_response())
}

/// `GET /healthz` — liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "opsgate" }))
}
