//! Prover configuration
//!
//! Loaded from JSON; every field has a default, so `{}` is a valid config.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::proof::transfer_circuit::DEFAULT_BATCH_LOG_CAPACITY;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Compressed Groth16 proving key on disk
    pub proving_key_path: PathBuf,
    /// `log2` capacity of the batched addition gadget the key was generated for
    pub batch_log_capacity: usize,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            proving_key_path: PathBuf::from("pk.bin"),
            batch_log_capacity: DEFAULT_BATCH_LOG_CAPACITY,
        }
    }
}

impl ProverConfig {
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
