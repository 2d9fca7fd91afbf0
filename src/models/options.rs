//! Per-call submission and key-file options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The public IndexNow endpoint used when none is configured.
pub const INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/indexnow";

/// Largest number of URLs the protocol accepts in one request.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// One URL or a list of URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlInput {
    /// A single URL
    One(String),
    /// A list of URLs
    Many(Vec<String>),
}

impl UrlInput {
    /// View the input as a slice of raw URL strings.
    pub fn as_slice(&self) -> &[String] {
        match self {
            UrlInput::One(url) => std::slice::from_ref(url),
            UrlInput::Many(urls) => urls,
        }
    }

    /// Number of raw entries.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether no URLs were given.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl Default for UrlInput {
    fn default() -> Self {
        UrlInput::Many(Vec::new())
    }
}

impl From<String> for UrlInput {
    fn from(url: String) -> Self {
        UrlInput::One(url)
    }
}

impl From<&str> for UrlInput {
    fn from(url: &str) -> Self {
        UrlInput::One(url.to_string())
    }
}

impl From<Vec<String>> for UrlInput {
    fn from(urls: Vec<String>) -> Self {
        UrlInput::Many(urls)
    }
}

impl FromIterator<String> for UrlInput {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        UrlInput::Many(iter.into_iter().collect())
    }
}

/// Options for one submission call.
///
/// Serialized field names are camelCase (`batchSize`, `keyLocation`,
/// `publicDir`, ...), so a JSON options object reads the same way the
/// submission payload does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOptions {
    /// URLs to submit; all must share one host
    pub urls: UrlInput,

    /// Host submitted to the endpoint; inferred from the first URL if unset
    #[serde(default)]
    pub host: Option<String>,

    /// IndexNow key; provisioned from the manifest when omitted
    #[serde(default)]
    pub key: Option<String>,

    /// Public URL of the key file; derived from host and route when omitted
    #[serde(default)]
    pub key_location: Option<String>,

    /// Endpoint receiving the POSTs
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Maximum URLs per request, clamped to `1..=MAX_BATCH_SIZE`
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Extra attempts allowed after a retryable response
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// Base backoff delay in milliseconds; doubles per retry
    #[serde(default = "defaults::retry_base_ms")]
    pub retry_base_ms: u64,

    /// Provision the key file when no key is supplied
    #[serde(default = "defaults::ensure_key_file")]
    pub ensure_key_file: bool,

    /// Key-file provisioning options
    #[serde(flatten)]
    pub key_file: KeyFileOptions,
}

impl SubmitOptions {
    /// Options for the given URLs with every other field at its default.
    pub fn new(urls: impl Into<UrlInput>) -> Self {
        Self {
            urls: urls.into(),
            ..Self::default()
        }
    }

    /// Batch size clamped to the range the protocol accepts.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            urls: UrlInput::default(),
            host: None,
            key: None,
            key_location: None,
            endpoint: defaults::endpoint(),
            batch_size: defaults::batch_size(),
            retries: defaults::retries(),
            retry_base_ms: defaults::retry_base_ms(),
            ensure_key_file: defaults::ensure_key_file(),
            key_file: KeyFileOptions::default(),
        }
    }
}

/// Options for key-file provisioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFileOptions {
    /// Directory served as the site root; relative paths resolve against the
    /// project root
    #[serde(default = "defaults::public_dir")]
    pub public_dir: PathBuf,

    /// Project root; resolved from the environment when unset
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    /// Manifest location; `indexnow.manifest.json` under the project root
    /// when unset
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    /// Replace the stored key instead of keeping it
    #[serde(default)]
    pub force_rotate_key: bool,
}

impl Default for KeyFileOptions {
    fn default() -> Self {
        Self {
            public_dir: defaults::public_dir(),
            project_root: None,
            manifest_path: None,
            force_rotate_key: false,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn endpoint() -> String {
        super::INDEXNOW_ENDPOINT.to_string()
    }
    pub fn batch_size() -> usize {
        super::MAX_BATCH_SIZE
    }
    pub fn retries() -> u32 {
        2
    }
    pub fn retry_base_ms() -> u64 {
        500
    }
    pub fn ensure_key_file() -> bool {
        true
    }
    pub fn public_dir() -> PathBuf {
        PathBuf::from("public")
    }
}
