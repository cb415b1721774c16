//! Access decision gate.
//!
//! The single shared entry point every protected path goes through: it
//! extracts the bearer credential, runs codec, signature, and expiry
//! checks in order, and produces an allow/deny decision. Each request
//! is evaluated independently with no shared mutable state, so
//! concurrent evaluations cannot interfere.

use crate::claims::Claims;
use crate::codec;
use crate::error::TokenError;
use crate::token::{SigningKey, verify_signature};
use chrono::{DateTime, Utc};

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The credential verified; the claims are trusted.
    Allow(Claims),
    /// The request is denied.
    Deny(DenyReason),
}

/// Why a request was denied.
///
/// Client-caused reasons are surfaced uniformly to the caller (one
/// opaque denial body) so an attacker cannot distinguish a signature
/// failure from an expiry failure; the reason is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No signing secret configured. Operator-caused; surfaced as a
    /// 500-class failure, never as a client denial.
    ServerMisconfigured,
    /// Authorization header absent, wrong scheme, or empty token.
    MissingToken,
    /// The credential is not a well-formed three-segment token.
    Malformed,
    /// Signature mismatch.
    BadSignature,
    /// The credential's `exp` is in the past.
    Expired,
}

impl DenyReason {
    /// Whether the client caused this denial (vs. operator error).
    pub fn is_client_caused(&self) -> bool {
        !matches!(self, DenyReason::ServerMisconfigured)
    }

    /// Whether the client should discard its stored credential and
    /// re-authenticate. Advisory; enforcement is the client's job.
    pub fn discard_credential(&self) -> bool {
        self.is_client_caused()
    }

    /// Stable name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::ServerMisconfigured => "server-misconfigured",
            DenyReason::MissingToken => "missing-token",
            DenyReason::Malformed => "malformed",
            DenyReason::BadSignature => "bad-signature",
            DenyReason::Expired => "expired",
        }
    }
}

/// Evaluate a request's Authorization header against the signing key.
pub fn authorize(authorization: Option<&str>, key: Option<&SigningKey>) -> Decision {
    authorize_at(authorization, key, Utc::now())
}

/// [`authorize`] with an explicit wall-clock instant.
pub fn authorize_at(
    authorization: Option<&str>,
    key: Option<&SigningKey>,
    now: DateTime<Utc>,
) -> Decision {
    let decision = evaluate(authorization, key, now);
    if let Decision::Deny(reason) = &decision {
        tracing::debug!(reason = reason.as_str(), "credential check denied");
    }
    decision
}

fn evaluate(authorization: Option<&str>, key: Option<&SigningKey>, now: DateTime<Utc>) -> Decision {
    // Operator error is decided first and kept distinct from anything
    // a client can trigger.
    let Some(key) = key else {
        return Decision::Deny(DenyReason::ServerMisconfigured);
    };

    let Some(token) = authorization.and_then(extract_bearer) else {
        return Decision::Deny(DenyReason::MissingToken);
    };

    let decoded = match codec::decode(token) {
        Ok(decoded) => decoded,
        Err(_) => return Decision::Deny(DenyReason::Malformed),
    };

    if verify_signature(
        &decoded.header_seg,
        &decoded.payload_seg,
        &decoded.signature_seg,
        key,
    )
    .is_err()
    {
        return Decision::Deny(DenyReason::BadSignature);
    }

    // Only now are the payload bytes allowed to mean anything.
    let claims = match Claims::from_payload(&decoded.payload) {
        Ok(claims) => claims,
        Err(_) => return Decision::Deny(DenyReason::Malformed),
    };

    match claims.validate_expiry(now) {
        Ok(()) => Decision::Allow(claims),
        Err(TokenError::Expired) => Decision::Deny(DenyReason::Expired),
        Err(_) => Decision::Deny(DenyReason::Malformed),
    }
}

/// Extract the bearer token from an Authorization header value.
///
/// The prefix match is case-sensitive with a single space; the
/// remainder is trimmed and must be non-empty.
fn extract_bearer(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("Bearer ")?.trim();
    if rest.is_empty() { None } else { Some(rest) }
}
