//! Filesystem-backed key provisioning.
//!
//! Resolves a stable project root from the environment, keeps the manifest
//! under it, and mirrors the manifest key into the public key file. All
//! writes are plain overwrites; two calls racing on the same manifest are
//! not coordinated.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::env::{EnvProvider, ProcessEnv};
use crate::error::{AppError, Result};
use crate::models::{KeyFileOptions, Manifest};

use super::{KEY_ENV_VAR, KeyStore, MANIFEST_FILE, ProvisionedKey};

/// Environment variable package managers set to the directory a lifecycle
/// script was launched from.
const INIT_CWD_VAR: &str = "INIT_CWD";

/// Files marking a directory as a project root.
const PROJECT_MARKERS: &[&str] = &["package.json", "Cargo.toml", ".git"];

/// Directory names dependencies are installed into; never project roots.
const DEPENDENCY_DIRS: &[&str] = &["node_modules", "target", ".cargo"];

/// Filesystem-backed key store.
pub struct FsKeyStore {
    env: Box<dyn EnvProvider>,
}

impl FsKeyStore {
    /// Store backed by the real process environment.
    pub fn new() -> Self {
        Self::with_env(ProcessEnv)
    }

    /// Store with an injected environment, for tests and embedders.
    pub fn with_env(env: impl EnvProvider + 'static) -> Self {
        Self { env: Box::new(env) }
    }

    /// Resolve the project root.
    ///
    /// An explicit root wins outright. Otherwise the originating working
    /// directory (`INIT_CWD`), the current directory, and the executable's
    /// nearest ancestor outside dependency directories are probed in order;
    /// the first candidate that is outside dependency directories and
    /// carries a project marker wins, with the current directory as the
    /// final fallback.
    fn resolve_root(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(root) = explicit {
            return root.to_path_buf();
        }

        let mut candidates = Vec::new();
        if let Some(init_cwd) = self.env.var(INIT_CWD_VAR) {
            candidates.push(PathBuf::from(init_cwd));
        }
        if let Some(cwd) = self.env.current_dir() {
            candidates.push(cwd);
        }
        if let Some(exe_dir) = self.env.exe_dir() {
            if let Some(ancestor) = nearest_ancestor_outside_deps(&exe_dir) {
                candidates.push(ancestor);
            }
        }

        candidates
            .into_iter()
            .find(|c| !inside_dependency_dir(c) && has_project_marker(c))
            .or_else(|| self.env.current_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn manifest_path(&self, root: &Path, options: &KeyFileOptions) -> PathBuf {
        match &options.manifest_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join(MANIFEST_FILE),
        }
    }

    /// Read the manifest, distinguishing absence from a broken file.
    fn read_manifest(path: &Path) -> Result<Option<Manifest>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(manifest)?)?;
        Ok(())
    }

    /// Decide which manifest record applies, writing it when it changes.
    fn resolve_manifest(
        &self,
        manifest_path: &Path,
        explicit_key: Option<&str>,
        rotate: bool,
    ) -> Result<Manifest> {
        match Self::read_manifest(manifest_path)? {
            Some(existing) => {
                if rotate {
                    let replacement = match explicit_key {
                        Some(key) if key != existing.key => Manifest::for_key(key),
                        // Rotating to the key already stored changes nothing.
                        Some(_) => return Ok(existing),
                        None => Manifest::for_key(generate_key()?),
                    };
                    log::info!("rotating IndexNow key at {}", manifest_path.display());
                    Self::write_manifest(manifest_path, &replacement)?;
                    return Ok(replacement);
                }
                if let Some(key) = explicit_key {
                    if key != existing.key {
                        log::warn!(
                            "manifest key takes precedence over the supplied key; \
                             request a rotation to replace it"
                        );
                    }
                }
                Ok(existing)
            }
            None => {
                let key = match explicit_key {
                    Some(key) => key.to_string(),
                    None => match self.env.var(KEY_ENV_VAR) {
                        Some(key) => key,
                        None => generate_key()?,
                    },
                };
                let manifest = Manifest::for_key(key);
                Self::write_manifest(manifest_path, &manifest)?;
                log::debug!("created manifest at {}", manifest_path.display());
                Ok(manifest)
            }
        }
    }
}

impl Default for FsKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for FsKeyStore {
    fn supported(&self) -> bool {
        true
    }

    fn provision(
        &self,
        explicit_key: Option<&str>,
        options: &KeyFileOptions,
    ) -> Result<ProvisionedKey> {
        let root = self.resolve_root(options.project_root.as_deref());
        let manifest_path = self.manifest_path(&root, options);
        let manifest =
            self.resolve_manifest(&manifest_path, explicit_key, options.force_rotate_key)?;

        let public_dir = if options.public_dir.is_absolute() {
            options.public_dir.clone()
        } else {
            root.join(&options.public_dir)
        };
        let key_file_path = public_dir.join(manifest.key_file.trim_start_matches('/'));
        if let Some(parent) = key_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Rewritten on every call so the file can never drift from the manifest.
        fs::write(&key_file_path, &manifest.key)?;
        log::debug!("key file written to {}", key_file_path.display());

        Ok(ProvisionedKey {
            key: manifest.key,
            key_file_route: manifest.key_file,
            key_file_path,
        })
    }
}

/// Generate a fresh 256-bit key, hex-encoded to 64 characters.
fn generate_key() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| AppError::platform(format!("random key generation failed: {e}")))?;
    Ok(hex::encode(bytes))
}

fn inside_dependency_dir(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => DEPENDENCY_DIRS.iter().any(|dir| name == *dir),
        _ => false,
    })
}

fn has_project_marker(path: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|marker| path.join(marker).exists())
}

fn nearest_ancestor_outside_deps(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|ancestor| !inside_dependency_dir(ancestor))
        .map(Path::to_path_buf)
}
