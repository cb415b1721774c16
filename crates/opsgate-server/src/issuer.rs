//! Identity-provider token verification for the issuance path.
//!
//! The gateway exchanges a Google ID token for its own session
//! credential. The provider token is verified **cryptographically**
//! before anything is issued: RS256 signature against Google's JWKS,
//! plus audience and issuer checks. Public keys are cached in-process
//! with a TTL so issuance does not hit the JWKS endpoint per login.

use crate::error::ServerError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;

const JWKS_CACHE_TTL_SECS: i64 = 3600;
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Identity asserted by the provider after verification.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    /// Provider-assigned subject identifier.
    pub sub: String,
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Avatar reference.
    pub picture: Option<String>,
}

/// Claims we read from a Google ID token after validation.
#[derive(Debug, Deserialize)]
struct GoogleIdClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// One key from the provider's JWKS.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Default)]
struct JwksCache {
    keys: HashMap<String, Jwk>,
    fetched_at: Option<DateTime<Utc>>,
}

impl JwksCache {
    fn is_expired(&self) -> bool {
        match self.fetched_at {
            Some(t) => Utc::now() - t > Duration::seconds(JWKS_CACHE_TTL_SECS),
            None => true,
        }
    }
}

/// Verifies Google ID tokens against the provider's published keys.
pub struct GoogleIssuer {
    client_id: Option<String>,
    jwks_url: String,
    http: reqwest::Client,
    cache: RwLock<JwksCache>,
}

impl GoogleIssuer {
    /// Create a verifier for the given OAuth client id and JWKS URL.
    pub fn new(client_id: Option<String>, jwks_url: String) -> Self {
        Self {
            client_id,
            jwks_url,
            http: reqwest::Client::new(),
            cache: RwLock::new(JwksCache::default()),
        }
    }

    /// Verify a provider ID token and extract the asserted identity.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<ProviderIdentity, ServerError> {
        let Some(client_id) = &self.client_id else {
            return Err(ServerError::Misconfigured(
                "provider client id is not configured".to_string(),
            ));
        };

        let header = decode_header(id_token).map_err(|e| {
            tracing::warn!(error = %e, "provider token header did not parse");
            ServerError::ProviderRejected
        })?;
        let kid = header.kid.ok_or_else(|| {
            tracing::warn!("provider token header has no key id");
            ServerError::ProviderRejected
        })?;

        let jwk = self.key_for(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
            tracing::warn!(error = %e, "provider public key did not parse");
            ServerError::ProviderRejected
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleIdClaims>(id_token, &decoding_key, &validation).map_err(|e| {
            tracing::warn!(error = %e, "provider token failed validation");
            ServerError::ProviderRejected
        })?;

        tracing::info!(sub = %data.claims.sub, "verified provider identity");
        Ok(ProviderIdentity {
            sub: data.claims.sub,
            email: data.claims.email,
            name: data.claims.name,
            picture: data.claims.picture,
        })
    }

    /// Look up a key by id, refreshing the JWKS cache when stale or on
    /// a miss (provider key rotation).
    async fn key_for(&self, kid: &str) -> Result<Jwk, ServerError> {
        {
            let cache = self.cache.read().expect("jwks cache poisoned");
            if !cache.is_expired()
                && let Some(jwk) = cache.keys.get(kid)
            {
                return Ok(jwk.clone());
            }
        }

        let keys = self.fetch_jwks().await?;
        let mut cache = self.cache.write().expect("jwks cache poisoned");
        cache.keys = keys.into_iter().map(|k| (k.kid.clone(), k)).collect();
        cache.fetched_at = Some(Utc::now());

        cache.keys.get(kid).cloned().ok_or_else(|| {
            tracing::warn!(kid, "provider token signed by unknown key");
            ServerError::ProviderRejected
        })
    }

    async fn fetch_jwks(&self) -> Result<Vec<Jwk>, ServerError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to fetch provider JWKS");
                ServerError::ProviderRejected
            })?
            .error_for_status()
            .map_err(|e| {
                tracing::error!(error = %e, "provider JWKS endpoint returned an error");
                ServerError::ProviderRejected
            })?;

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "provider JWKS did not parse");
            ServerError::ProviderRejected
        })?;

        tracing::debug!(count = jwks.keys.len(), "fetched provider JWKS");
        Ok(jwks.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_is_expired() {
        assert!(JwksCache::default().is_expired());
    }

    #[test]
    fn test_fresh_cache_not_expired() {
        let cache = JwksCache {
            keys: HashMap::new(),
            fetched_at: Some(Utc::now()),
        };
        assert!(!cache.is_expired());
    }

    #[test]
    fn test_stale_cache_is_expired() {
        let cache = JwksCache {
            keys: HashMap::new(),
            fetched_at: Some(Utc::now() - Duration::seconds(JWKS_CACHE_TTL_SECS + 1)),
        };
        assert!(cache.is_expired());
    }

    #[tokio::test]
    async fn test_missing_client_id_is_misconfiguration() {
        let issuer = GoogleIssuer::new(None, "https://example.invalid/jwks".to_string());
        let result = issuer.verify_id_token("x.y.z").await;
        assert!(matches!(result, Err(ServerError::Misconfigured(_))));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let issuer = GoogleIssuer::new(
            Some("client".to_string()),
            "https://example.invalid/jwks".to_string(),
        );
        let result = issuer.verify_id_token("not-a-jwt").await;
        assert!(matches!(result, Err(ServerError::ProviderRejected)));
    }
}
