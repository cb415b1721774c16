//! Configuration for the Opsgate gateway.
//!
//! A single YAML file (opsgate.yaml) configures the HTTP listener, the
//! session-credential signing secret, the identity-provider client, and
//! the operative roster location.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete Opsgate configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpsgateConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session credential settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Identity-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Path to a YAML roster file (falls back to the built-in roster).
    #[serde(default)]
    pub roster_file: Option<PathBuf>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl GatewayConfig {
    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Signing secret (prefer `secret_env` over inline values).
    #[serde(default)]
    pub secret: Option<String>,

    /// Environment variable containing the signing secret.
    #[serde(default = "default_secret_env")]
    pub secret_env: Option<String>,

    /// Credential lifetime in seconds from issuance.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// Path clients are redirected to on denial.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secret_env: default_secret_env(),
            token_ttl_secs: default_token_ttl_secs(),
            login_path: default_login_path(),
        }
    }
}

impl AuthConfig {
    /// Get the signing secret, checking `secret_env` first.
    pub fn resolve_secret(&self) -> Option<String> {
        if let Some(env_var) = &self.secret_env
            && let Ok(secret) = std::env::var(env_var)
            && !secret.is_empty()
        {
            return Some(secret);
        }
        self.secret.clone().filter(|s| !s.is_empty())
    }
}

/// Identity-provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth client id the provider token must be issued for.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Environment variable containing the client id.
    #[serde(default = "default_client_id_env")]
    pub client_id_env: Option<String>,

    /// JWKS endpoint for provider signature verification.
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_id_env: default_client_id_env(),
            jwks_url: default_jwks_url(),
        }
    }
}

impl ProviderConfig {
    /// Get the client id, checking `client_id_env` first.
    pub fn resolve_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env
            && let Ok(id) = std::env::var(env_var)
            && !id.is_empty()
        {
            return Some(id);
        }
        self.client_id.clone().filter(|s| !s.is_empty())
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_secret_env() -> Option<String> {
    Some("OPSGATE_JWT_SECRET".to_string())
}

fn default_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_client_id_env() -> Option<String> {
    Some("OPSGATE_GOOGLE_CLIENT_ID".to_string())
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/oauth2/v3/certs".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpsgateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
