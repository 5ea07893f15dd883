//! Dataset fingerprinting: deterministic identification of a run's inputs.
//!
//! - `DatasetFingerprint`: BLAKE3 over every loaded source, in sorted source
//!   order, each prefixed by its name and length so file boundaries count.
//! - `SourceDigest`: the per-source hash recorded in the run manifest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::DatasetHash;

/// Hash of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDigest {
    pub name: String,
    pub bytes: usize,
    pub hash: String,
}

/// Accumulates source bytes keyed by source name.
///
/// Uses `BTreeMap` so the combined hash does not depend on load order.
#[derive(Debug, Default)]
pub struct DatasetFingerprint {
    sources: BTreeMap<String, Vec<u8>>,
}

impl DatasetFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, bytes: &[u8]) {
        self.sources.insert(name.into(), bytes.to_vec());
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn digests(&self) -> Vec<SourceDigest> {
        self.sources
            .iter()
            .map(|(name, bytes)| SourceDigest {
                name: name.clone(),
                bytes: bytes.len(),
                hash: blake3::hash(bytes).to_hex().to_string(),
            })
            .collect()
    }

    pub fn finish(&self) -> DatasetHash {
        let mut hasher = blake3::Hasher::new();
        for (name, bytes) in &self.sources {
            hasher.update(name.as_bytes());
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        DatasetHash(hasher.finalize().to_hex().to_string())
    }
}
