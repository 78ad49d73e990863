//! Deterministic identification of inputs and runs.
//!
//! - `DatasetHash`: BLAKE3 over the raw input bytes.
//! - `RunId`: dataset hash + canonical configuration JSON. Same file, same
//!   settings → same id, so re-running an analysis lands in the same
//!   artifact directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash of an input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// First 12 hex characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// `config_json` must be canonical (stable key order) for the id to be stable.
    pub fn new(dataset_hash: &DatasetHash, config_json: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(dataset_hash.0.as_bytes());
        hasher.update(b"\0");
        hasher.update(config_json.as_bytes());
        let hex = hasher.finalize().to_hex();
        Self(hex[..16].to_string())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
