//! Key storage abstractions for ownership-proof provisioning.
//!
//! The IndexNow protocol proves control of a host through a plaintext key
//! file served from a predictable public path. Provisioning keeps two
//! artifacts in step:
//!
//! ```text
//! {projectRoot}/
//! ├── indexnow.manifest.json   # durable record: { key, keyFile }
//! └── public/
//!     └── {key}.txt            # publicly served proof, content = key
//! ```
//!
//! The manifest is read once created; the key file is rewritten from it on
//! every call, so the pair cannot drift apart.

pub mod fs;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::KeyFileOptions;

// Re-export for convenience
pub use fs::FsKeyStore;

/// Name of the manifest file under the project root.
pub const MANIFEST_FILE: &str = "indexnow.manifest.json";

/// Environment variable consulted for a default key when no manifest exists.
pub const KEY_ENV_VAR: &str = "INDEXNOW_KEY";

/// A provisioned key with its public location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedKey {
    /// The key itself
    pub key: String,

    /// Public route of the key file, `/<key>.txt`
    pub key_file_route: String,

    /// Filesystem path of the key file
    pub key_file_path: PathBuf,
}

/// Capability for durable key provisioning.
///
/// Submission consults [`supported`](KeyStore::supported) instead of probing
/// the runtime; embedders without filesystem access plug in
/// [`UnsupportedKeyStore`] and supply keys explicitly.
pub trait KeyStore: Send + Sync {
    /// Whether this store can provision keys at all.
    fn supported(&self) -> bool;

    /// Ensure a key exists and its key file is written, returning both.
    fn provision(
        &self,
        explicit_key: Option<&str>,
        options: &KeyFileOptions,
    ) -> Result<ProvisionedKey>;
}

/// Key store for runtimes without filesystem access.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedKeyStore;

impl KeyStore for UnsupportedKeyStore {
    fn supported(&self) -> bool {
        false
    }

    fn provision(
        &self,
        _explicit_key: Option<&str>,
        _options: &KeyFileOptions,
    ) -> Result<ProvisionedKey> {
        Err(AppError::platform(
            "key provisioning needs filesystem access; supply a key explicitly",
        ))
    }
}
