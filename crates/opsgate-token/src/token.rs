//! Credential signing and verification.
//!
//! The signature is HMAC-SHA256 over the ASCII bytes of
//! `header_seg + "." + payload_seg` — the encoded text exactly as
//! transmitted, not the decoded JSON. This is the sole cryptographic
//! trust boundary: an attacker-supplied payload is distinguished from a
//! legitimately issued one here and nowhere else.

use crate::claims::Claims;
use crate::codec::{self, DecodedToken};
use crate::error::TokenError;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Symmetric key material for credential signing.
///
/// HMAC accepts keys of any length (RFC 2104); the secret string's raw
/// bytes are used directly.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Create a key from a secret string.
    pub fn new(secret: &str) -> Self {
        Self(secret.as_bytes().to_vec())
    }

    /// Compute the MAC over a signing input.
    fn mac(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.0).map_err(|_| TokenError::BadSignature)?;
        mac.update(signing_input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        // Zeroize on drop
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// Verify a presented signature against the encoded segments.
///
/// The computed MAC is base64url-encoded to match the wire convention
/// of the signature segment, then compared in constant time. Any
/// mismatch or MAC construction failure is [`TokenError::BadSignature`].
pub fn verify_signature(
    header_seg: &str,
    payload_seg: &str,
    signature_seg: &str,
    key: &SigningKey,
) -> Result<(), TokenError> {
    let signing_input = format!("{header_seg}.{payload_seg}");
    let computed = codec::encode_segment(&key.mac(signing_input.as_bytes())?);

    if computed.as_bytes().ct_eq(signature_seg.as_bytes()).into() {
        Ok(())
    } else {
        Err(TokenError::BadSignature)
    }
}

/// Issues signed credentials with a fixed validity window.
pub struct TokenSigner {
    key: SigningKey,
    ttl: TimeDelta,
}

impl TokenSigner {
    /// Create a signer with the given key and credential lifetime.
    pub fn new(key: SigningKey, ttl: TimeDelta) -> Self {
        Self { key, ttl }
    }

    /// Mint a credential for the given claims, stamping `iat` and `exp`.
    pub fn mint(&self, claims: &Claims) -> Result<String, TokenError> {
        self.mint_at(claims, Utc::now())
    }

    /// Mint with an explicit issuance instant.
    pub fn mint_at(&self, claims: &Claims, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mut claims = claims.clone();
        claims.iat = Some(now.timestamp());
        claims.exp = Some((now + self.ttl).timestamp());

        let header = serde_json::json!({ "alg": "HS256", "typ": "JWT" });
        let header_json =
            serde_json::to_vec(&header).map_err(|e| TokenError::Serialization(e.to_string()))?;
        let payload_json =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Serialization(e.to_string()))?;

        let header_seg = codec::encode_segment(&header_json);
        let payload_seg = codec::encode_segment(&payload_json);
        let signing_input = format!("{header_seg}.{payload_seg}");
        let signature_seg = codec::encode_segment(&self.key.mac(signing_input.as_bytes())?);

        Ok(format!("{header_seg}.{payload_seg}.{signature_seg}"))
    }
}

/// Verifies credentials end to end: decode, signature, expiry.
pub struct TokenVerifier {
    key: SigningKey,
}

impl TokenVerifier {
    /// Create a verifier with the given key.
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// Verify a credential and extract its claims.
    ///
    /// Claims are only parsed after the signature has been confirmed;
    /// nothing from an unverified payload escapes this function.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify against an explicit wall-clock instant.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let decoded: DecodedToken = codec::decode(token)?;
        verify_signature(
            &decoded.header_seg,
            &decoded.payload_seg,
            &decoded.signature_seg,
            &self.key,
        )?;

        let claims = Claims::from_payload(&decoded.payload)?;
        claims.validate_expiry(now)?;
        Ok(claims)
    }
}
