//! The durable record binding a project to its IndexNow key.

use serde::{Deserialize, Serialize};

/// Manifest persisted as `indexnow.manifest.json` in the project root.
///
/// Once written it is the source of truth for the key; the public key file
/// is regenerated from it on every provisioning call, so the two never
/// diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// The IndexNow key
    pub key: String,

    /// Public route of the key file, `/<key>.txt`
    #[serde(rename = "keyFile")]
    pub key_file: String,
}

impl Manifest {
    /// Build the manifest for a key, deriving the conventional route.
    pub fn for_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let key_file = format!("/{key}.txt");
        Self { key, key_file }
    }
}
