//! Results returned from a submission call.

use std::path::PathBuf;

use serde::Serialize;

/// Outcome of one batch POST, after its retry budget is spent.
///
/// A failing final response is recorded here (`ok: false`) rather than
/// raised, so a caller can see exactly which slice of URLs the endpoint
/// rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Whether the final response was a 2xx
    pub ok: bool,

    /// Final HTTP status
    pub status: u16,

    /// Raw response body, forwarded unparsed
    pub body: String,

    /// Number of URLs sent in the batch
    pub sent_count: usize,
}

/// Aggregate outcome of a submission call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    /// Host the URLs were submitted under
    pub host: String,

    /// Total number of URLs submitted
    pub total: usize,

    /// Key sent with every batch
    pub key_used: String,

    /// Route of the key file, when provisioning ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file_route: Option<String>,

    /// Absolute path of the key file, when provisioning ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file_path: Option<PathBuf>,

    /// Per-batch outcomes, in submission order
    pub batches: Vec<BatchOutcome>,
}

impl SubmitOutcome {
    /// Whether every batch ended on a successful response.
    pub fn all_ok(&self) -> bool {
        self.batches.iter().all(|b| b.ok)
    }
}
