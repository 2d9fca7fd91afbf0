//! Wire body POSTed to the IndexNow endpoint.

use serde::{Deserialize, Serialize};

/// One batch submission body.
///
/// `keyLocation` is omitted entirely when unset rather than serialized as
/// null; the endpoint then assumes the conventional `/<key>.txt` location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Host every URL in the batch belongs to
    pub host: String,

    /// Key proving ownership of the host
    pub key: String,

    /// URLs in this batch, in submission order
    pub url_list: Vec<String>,

    /// Public URL of the key file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_location: Option<String>,
}
