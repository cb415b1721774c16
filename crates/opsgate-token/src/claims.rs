//! Typed claims carried in a credential payload.

use crate::error::TokenError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims extracted from a credential payload.
///
/// Every field is optional at the decode level; callers enforce the
/// subset they require for a specific operation (an endpoint that needs
/// an email fails its own check when it is absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity subject assigned by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Avatar image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    /// Issued-at, seconds since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiry, seconds since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Parse claims from decoded payload JSON bytes.
    ///
    /// Any parse failure folds into [`TokenError::Malformed`]; nothing
    /// here may propagate as an unhandled fault.
    pub fn from_payload(payload: &[u8]) -> Result<Self, TokenError> {
        serde_json::from_slice(payload).map_err(|_| TokenError::Malformed)
    }

    /// Check temporal validity against the given wall-clock instant.
    ///
    /// A missing `exp` passes: the credential never expires. This
    /// mirrors the issuing side's historical behavior and is a policy
    /// decision to revisit, not a bug (see DESIGN.md).
    pub fn validate_expiry(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        match self.exp {
            Some(exp) if exp * 1000 < now.timestamp_millis() => Err(TokenError::Expired),
            _ => Ok(()),
        }
    }
}
