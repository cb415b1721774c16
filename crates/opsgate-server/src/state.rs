//! Shared application state.

use crate::issuer::GoogleIssuer;
use chrono::TimeDelta;
use opsgate_core::OpsgateConfig;
use opsgate_roster::Roster;
use opsgate_token::{SigningKey, TokenSigner};
use std::sync::Arc;

/// Shared state for the gateway. Everything inside is read-only after
/// startup; handlers and middleware clone the cheap `Arc` handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// The loaded configuration.
    config: OpsgateConfig,
    /// Signing key resolved from configuration, if any. Absence is an
    /// operator error surfaced per request, not a startup panic.
    key: Option<SigningKey>,
    /// The operative allow-list.
    roster: Roster,
    /// Identity-provider verifier for the issuance path.
    issuer: GoogleIssuer,
}

impl AppState {
    /// Build state from configuration, resolving the secret and roster.
    pub fn new(config: OpsgateConfig) -> Self {
        let key = config.auth.resolve_secret().map(|s| SigningKey::new(&s));
        if key.is_none() {
            tracing::error!("no signing secret configured; all protected requests will fail");
        }

        let roster = match &config.roster_file {
            Some(path) => match Roster::from_file(path) {
                Ok(roster) => roster,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load roster file, using built-in roster");
                    Roster::builtin()
                }
            },
            None => Roster::builtin(),
        };

        let issuer = GoogleIssuer::new(
            config.provider.resolve_client_id(),
            config.provider.jwks_url.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                key,
                roster,
                issuer,
            }),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpsgateConfig {
        &self.inner.config
    }

    /// Get the signing key if configured.
    pub fn key(&self) -> Option<&SigningKey> {
        self.inner.key.as_ref()
    }

    /// Build a signer for the configured key and lifetime.
    pub fn signer(&self) -> Option<TokenSigner> {
        let ttl = TimeDelta::seconds(self.inner.config.auth.token_ttl_secs);
        self.key().map(|key| TokenSigner::new(key.clone(), ttl))
    }

    /// Get the operative roster.
    pub fn roster(&self) -> &Roster {
        &self.inner.roster
    }

    /// Get the identity-provider verifier.
    pub fn issuer(&self) -> &GoogleIssuer {
        &self.inner.issuer
    }

    /// Path clients are redirected to on denial.
    pub fn login_path(&self) -> &str {
        &self.inner.config.auth.login_path
    }
}
