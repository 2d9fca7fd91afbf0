// src/submit/transport.rs

//! HTTP transport for batch submission.
//!
//! [`Transport`] is the seam between the submission pipeline and the network:
//! one JSON POST in, one raw response out. [`send_batch`] layers the retry
//! policy on top of it, so the policy can be tested without a server.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BatchOutcome, SubmissionPayload};
use crate::utils::retry::{retry_delay, retryable_status};

/// Timeout applied to every request attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("indexnow/", env!("CARGO_PKG_VERSION"));

/// Raw response from the endpoint, before any retry decision.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single JSON POST to the submission endpoint.
///
/// Implementations return `Err` only when no HTTP response was produced at
/// all (DNS failure, refused connection, timeout). A response with a failure
/// status is still `Ok`: the retry loop decides what to do with it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default client configuration.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse> {
        let body = serde_json::to_vec(payload)?;
        let response = self
            .client
            .post(endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json; charset=utf-8",
            )
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

/// Send one batch, retrying transient failures with exponential backoff.
///
/// 429 and 5xx responses are retried after `retry_base * 2^attempt`. Any
/// other failure status ends the loop immediately. When the retry budget is
/// exhausted the last response is returned as a failed [`BatchOutcome`], not
/// as an error; the caller keeps going with the remaining batches.
pub async fn send_batch(
    transport: &dyn Transport,
    endpoint: &str,
    payload: &SubmissionPayload,
    retries: u32,
    retry_base: Duration,
) -> Result<BatchOutcome> {
    let sent_count = payload.url_list.len();
    let mut attempt = 0;
    loop {
        log::debug!(
            "POST {} ({} URLs, attempt {} of {})",
            endpoint,
            sent_count,
            attempt + 1,
            retries + 1
        );
        let response = transport.post_json(endpoint, payload).await?;

        if response.ok() || !retryable_status(response.status) || attempt >= retries {
            if !response.ok() {
                log::debug!("batch rejected with status {}", response.status);
            }
            return Ok(BatchOutcome {
                ok: response.ok(),
                status: response.status,
                body: response.body,
                sent_count,
            });
        }

        let delay = retry_delay(attempt, retry_base);
        log::debug!(
            "status {} is transient, retrying in {:?}",
            response.status,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
