// src/utils/retry.rs

//! Retry policy helpers for batch submission.

use std::time::Duration;

/// Calculate the delay before a retry attempt using exponential backoff.
///
/// The delay formula is `base * 2^attempt`, so with the default 500 ms base
/// the waits run 500 ms, 1 s, 2 s, ...
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use indexnow::utils::retry::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(500)), Duration::from_millis(500));
/// assert_eq!(retry_delay(1, Duration::from_millis(500)), Duration::from_millis(1000));
/// assert_eq!(retry_delay(2, Duration::from_millis(500)), Duration::from_millis(2000));
/// ```
pub fn retry_delay(attempt: u32, base: Duration) -> Duration {
    // Saturating arithmetic keeps absurd attempt counts from overflowing.
    let multiplier = 2_u32.saturating_pow(attempt);
    base.saturating_mul(multiplier)
}

/// Whether an HTTP status is worth retrying.
///
/// 429 and all 5xx responses are transient; every other status (including
/// client errors like 403 or 422, which IndexNow uses for bad keys and bad
/// payloads) is final.
pub fn retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}
