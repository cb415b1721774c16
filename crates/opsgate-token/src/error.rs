//! Error types for credential handling.

use thiserror::Error;

/// Errors that can occur during credential operations.
///
/// Client-caused variants must never be distinguishable in a response
/// body; the concrete reason is for server-side logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The credential does not parse as three non-empty base64url
    /// segments, or a segment holds invalid bytes.
    #[error("malformed credential")]
    Malformed,

    /// The recomputed signature does not match the presented one.
    #[error("credential signature mismatch")]
    BadSignature,

    /// The `exp` claim is in the past.
    #[error("credential has expired")]
    Expired,

    /// Failed to serialize claims while minting.
    #[error("claims serialization failed: {0}")]
    Serialization(String),
}
