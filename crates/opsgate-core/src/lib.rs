//! # opsgate-core
//!
//! Configuration types for the Opsgate authentication gateway.
//!
//! Configuration is loaded from a single YAML file (opsgate.yaml) and
//! shared read-only across the server. Secret material is never stored
//! inline by convention; fields with an `*_env` companion resolve from
//! the environment first.

pub mod config;

pub use config::{AuthConfig, ConfigError, GatewayConfig, OpsgateConfig, ProviderConfig};
