//! # opsgate-roster
//!
//! Static allow-list of privileged operatives.
//!
//! The roster is loaded once at process start (from a YAML file, or
//! the built-in default list) and is immutable afterwards, so lookups
//! need no locking. Membership is decided on a normalized email —
//! trimmed and lowercased on both sides — and must only ever be fed an
//! email taken from an already-verified credential.
//!
//! Enumeration (`entries`) is a separate, lower-trust read path used
//! for display; it is never consulted for authorization.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// A named operative on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operative {
    /// Display name.
    pub name: String,
    /// Email address (the lookup key).
    pub email: String,
}

/// Errors that can occur loading a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The immutable operative allow-list.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<Operative>,
    normalized: HashSet<String>,
}

impl Roster {
    /// Build a roster from a list of operatives.
    pub fn new(entries: Vec<Operative>) -> Self {
        let normalized = entries.iter().map(|o| normalize(&o.email)).collect();
        Self { entries, normalized }
    }

    /// Load a roster from a YAML file (a sequence of name/email pairs).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<Operative> = serde_yaml::from_str(&content)?;
        Ok(Self::new(entries))
    }

    /// The built-in default roster.
    pub fn builtin() -> Self {
        let entries = [
            ("Avery Collins", "avery.collins@glitchhq.io"),
            ("Prince Raj", "princerajgrke1901@gmail.com"),
            ("Morgan Reyes", "morgan.reyes@glitchhq.io"),
            ("Jordan Bennett", "jordan.bennett@glitchhq.io"),
            ("Rowan Patel", "rowan.patel@glitchhq.io"),
            ("Taylor Monroe", "taylor.monroe@glitchhq.io"),
        ]
        .into_iter()
        .map(|(name, email)| Operative {
            name: name.to_string(),
            email: email.to_string(),
        })
        .collect();
        Self::new(entries)
    }

    /// Whether the given email belongs to a privileged operative.
    ///
    /// Input is trimmed and lowercased before lookup; `None` or empty
    /// input is never privileged. Pure, no side effects.
    pub fn is_privileged(&self, email: Option<&str>) -> bool {
        match email {
            Some(email) if !email.trim().is_empty() => {
                self.normalized.contains(&normalize(email))
            }
            _ => false,
        }
    }

    /// Full read-only enumeration, for display purposes.
    pub fn entries(&self) -> &[Operative] {
        &self.entries
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
