// src/env.rs

//! Process environment access behind an injectable seam.
//!
//! Project-root resolution depends on the working directory, package-manager
//! environment variables, and the running executable's location. Routing
//! those probes through a trait keeps the resolution algorithm testable
//! without touching real process state.

use std::path::{Path, PathBuf};

/// Read-only view of the process environment.
pub trait EnvProvider: Send + Sync {
    /// Current working directory, if one exists.
    fn current_dir(&self) -> Option<PathBuf>;

    /// An environment variable; empty values count as unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Directory containing the running executable.
    fn exe_dir(&self) -> Option<PathBuf>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    fn exe_dir(&self) -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
    }
}
