//! Verifier configuration

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use zkbalance_core::ConfigError;

/// Minimum disclosed destination balance accepted by default
pub const DEFAULT_MIN_DISCLOSED_BALANCE: u64 = 100_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Hex-encoded compressed verifying key; the embedded key is used when absent
    pub verifying_key_hex: Option<String>,
    /// Disclosed balances below this value are rejected before any pairing
    pub min_disclosed_balance: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            verifying_key_hex: None,
            min_disclosed_balance: DEFAULT_MIN_DISCLOSED_BALANCE,
        }
    }
}

impl VerifierConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
