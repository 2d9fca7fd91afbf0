// src/utils/url.rs

//! URL normalization helpers.

use url::Url;

use crate::error::{AppError, Result};

/// Parse a raw string into an absolute URL.
///
/// Anything `url` cannot parse (relative paths included) is an input error
/// naming the offending string.
///
/// # Examples
/// ```
/// use indexnow::utils::url::parse_url;
///
/// assert!(parse_url("https://example.com/news/1").is_ok());
/// assert!(parse_url("/news/1").is_err());
/// ```
pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| AppError::input(format!("unparseable URL '{raw}': {e}")))
}

/// Extract the host component of a parsed URL.
///
/// URLs without a host (`data:`, `mailto:` and friends) cannot be submitted
/// to a host-scoped protocol and are rejected as input errors.
pub fn host_of(url: &Url) -> Result<&str> {
    url.host_str()
        .ok_or_else(|| AppError::input(format!("URL '{url}' has no host component")))
}
