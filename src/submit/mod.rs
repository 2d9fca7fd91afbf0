// src/submit/mod.rs

//! Submission pipeline.
//!
//! Validates the URL list, provisions a key when the caller brought none,
//! splits the list into endpoint-sized batches and posts them in order. A
//! rejected batch never aborts the run: its outcome is recorded and the
//! remaining batches are still attempted.

pub mod transport;

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::keystore::{FsKeyStore, KeyStore, ProvisionedKey};
use crate::models::{SubmissionPayload, SubmitOptions, SubmitOutcome};
use crate::utils::url::{host_of, parse_url};

pub use transport::{HttpTransport, Transport, TransportResponse};

use transport::send_batch;

/// Submit with the default HTTP transport and the filesystem key store.
pub async fn submit(options: &SubmitOptions) -> Result<SubmitOutcome> {
    let transport = HttpTransport::new()?;
    let key_store = FsKeyStore::new();
    submit_with(options, &transport, &key_store).await
}

/// Submit through caller-supplied transport and key-store implementations.
pub async fn submit_with(
    options: &SubmitOptions,
    transport: &dyn Transport,
    key_store: &dyn KeyStore,
) -> Result<SubmitOutcome> {
    let (urls, host) = normalize_urls(options)?;

    // Key provisioning only runs when the caller brought no key of their own.
    let provisioned: Option<ProvisionedKey> =
        if options.key.is_none() && options.ensure_key_file && key_store.supported() {
            Some(key_store.provision(None, &options.key_file)?)
        } else {
            log::debug!("key provisioning skipped");
            None
        };

    let key = match (&options.key, &provisioned) {
        (Some(key), _) => key.clone(),
        (None, Some(provisioned)) => provisioned.key.clone(),
        (None, None) => {
            return Err(AppError::config(
                "no IndexNow key available: pass one explicitly, or enable key-file \
                 provisioning in an environment with filesystem access",
            ));
        }
    };

    let key_location = options.key_location.clone().or_else(|| {
        provisioned
            .as_ref()
            .map(|p| format!("https://{}{}", host, p.key_file_route))
    });

    let batch_size = options.effective_batch_size();
    let retry_base = Duration::from_millis(options.retry_base_ms);
    log::debug!(
        "submitting {} URLs for {} in batches of at most {}",
        urls.len(),
        host,
        batch_size
    );

    let mut batches = Vec::new();
    for chunk in urls.chunks(batch_size) {
        let payload = SubmissionPayload {
            host: host.clone(),
            key: key.clone(),
            url_list: chunk.to_vec(),
            key_location: key_location.clone(),
        };
        let outcome = send_batch(
            transport,
            &options.endpoint,
            &payload,
            options.retries,
            retry_base,
        )
        .await?;
        batches.push(outcome);
    }

    let (key_file_route, key_file_path) = match provisioned {
        Some(p) => (Some(p.key_file_route), Some(p.key_file_path)),
        None => (None, None),
    };

    Ok(SubmitOutcome {
        host,
        total: urls.len(),
        key_used: key,
        key_file_route,
        key_file_path,
        batches,
    })
}

/// Parse every URL, pin the submission host and reject mixed-host input.
///
/// The host comes from `options.host` when set, otherwise from the first
/// URL. Each entry is re-serialized from its parsed form, which lowercases
/// the host and normalizes an origin-only URL to a trailing slash.
fn normalize_urls(options: &SubmitOptions) -> Result<(Vec<String>, String)> {
    let raw = options.urls.as_slice();
    let Some(first) = raw.first() else {
        return Err(AppError::input("URL list is empty"));
    };

    let host = match &options.host {
        Some(host) => host.clone(),
        None => host_of(&parse_url(first)?)?.to_string(),
    };

    let mut urls = Vec::with_capacity(raw.len());
    for entry in raw {
        let parsed = parse_url(entry)?;
        let url_host = host_of(&parsed)?;
        if url_host != host {
            return Err(AppError::validation(format!(
                "all URLs must share one host: expected '{host}' but '{entry}' has '{url_host}'"
            )));
        }
        urls.push(String::from(parsed));
    }

    Ok((urls, host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::env::EnvProvider;
    use crate::keystore::UnsupportedKeyStore;
    use crate::models::KeyFileOptions;

    /// Answers every POST with one status, recording the payloads it saw.
    struct RecordingTransport {
        statuses: Mutex<VecDeque<u16>>,
        requests: Mutex<Vec<SubmissionPayload>>,
    }

    impl RecordingTransport {
        fn ok() -> Self {
            Self::scripted(&[])
        }

        /// Scripted statuses are consumed per call; afterwards every call
        /// answers 200.
        fn scripted(statuses: &[u16]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<SubmissionPayload> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_json(
            &self,
            _endpoint: &str,
            payload: &SubmissionPayload,
        ) -> Result<TransportResponse> {
            self.requests.lock().unwrap().push(payload.clone());
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
            Ok(TransportResponse {
                status,
                body: String::new(),
            })
        }
    }

    /// Environment with no working directory, variables or executable.
    struct NullEnv;

    impl EnvProvider for NullEnv {
        fn current_dir(&self) -> Option<PathBuf> {
            None
        }

        fn var(&self, _name: &str) -> Option<String> {
            None
        }

        fn exe_dir(&self) -> Option<PathBuf> {
            None
        }
    }

    fn keyed_options(urls: Vec<String>) -> SubmitOptions {
        SubmitOptions {
            key: Some("testkey".into()),
            retry_base_ms: 1,
            ..SubmitOptions::new(urls)
        }
    }

    fn urls(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("https://example.com/page-{i}"))
            .collect()
    }

    #[tokio::test]
    async fn test_batches_split_in_order() {
        let transport = RecordingTransport::ok();
        let options = SubmitOptions {
            batch_size: 3,
            ..keyed_options(urls(7))
        };

        let outcome = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        assert_eq!(outcome.total, 7);
        assert_eq!(outcome.host, "example.com");
        assert!(outcome.all_ok());
        let sent: Vec<usize> = outcome.batches.iter().map(|b| b.sent_count).collect();
        assert_eq!(sent, vec![3, 3, 1]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].url_list[0], "https://example.com/page-0");
        assert_eq!(requests[1].url_list[0], "https://example.com/page-3");
        assert_eq!(requests[2].url_list, vec!["https://example.com/page-6"]);
        for request in &requests {
            assert_eq!(request.host, "example.com");
            assert_eq!(request.key, "testkey");
        }
    }

    #[tokio::test]
    async fn test_single_url_fits_one_batch() {
        let transport = RecordingTransport::ok();
        let options = keyed_options(vec!["https://example.com/".into()]);

        let outcome = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.batches.len(), 1);
        assert_eq!(outcome.key_used, "testkey");
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let transport = RecordingTransport::ok();
        let options = keyed_options(Vec::new());

        let err = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Input(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_rejected() {
        let transport = RecordingTransport::ok();
        let options = keyed_options(vec!["not a url".into()]);

        let err = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Input(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_hosts_are_rejected_before_any_request() {
        let transport = RecordingTransport::ok();
        let options = keyed_options(vec![
            "https://example.com/a".into(),
            "https://other.com/b".into(),
        ]);

        let err = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap_err();

        let AppError::Validation(message) = err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert!(message.contains("example.com"));
        assert!(message.contains("other.com"));
        assert!(message.contains("https://other.com/b"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_host_must_match_urls() {
        let transport = RecordingTransport::ok();
        let options = SubmitOptions {
            host: Some("expected.com".into()),
            ..keyed_options(vec!["https://example.com/a".into()])
        };

        let err = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_urls_are_normalized() {
        let transport = RecordingTransport::ok();
        let options = keyed_options(vec!["HTTPS://EXAMPLE.com".into()]);

        let outcome = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        assert_eq!(outcome.host, "example.com");
        assert_eq!(
            transport.requests()[0].url_list,
            vec!["https://example.com/"]
        );
    }

    #[tokio::test]
    async fn test_missing_key_without_store_is_config_error() {
        let transport = RecordingTransport::ok();
        let mut options = keyed_options(urls(1));
        options.key = None;

        let err = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_with_provisioning_disabled_is_config_error() {
        let transport = RecordingTransport::ok();
        let mut options = keyed_options(urls(1));
        options.key = None;
        options.ensure_key_file = false;

        let err = submit_with(&options, &transport, &FsKeyStore::with_env(NullEnv))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_provisions_key_and_derives_key_location() {
        let tmp = TempDir::new().unwrap();
        let transport = RecordingTransport::ok();
        let mut options = SubmitOptions::new("https://example.com/a");
        options.host = Some("example.com".into());
        options.retry_base_ms = 1;
        options.key_file = KeyFileOptions {
            project_root: Some(tmp.path().to_path_buf()),
            ..KeyFileOptions::default()
        };

        let outcome = submit_with(&options, &transport, &FsKeyStore::with_env(NullEnv))
            .await
            .unwrap();

        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.key_used.len(), 64);
        assert!(outcome.all_ok());

        let route = outcome.key_file_route.as_deref().unwrap();
        assert_eq!(route, format!("/{}.txt", outcome.key_used));
        let key_file = outcome.key_file_path.as_deref().unwrap();
        assert!(key_file.starts_with(tmp.path().join("public")));
        assert_eq!(
            std::fs::read_to_string(key_file).unwrap(),
            outcome.key_used
        );

        let request = &transport.requests()[0];
        assert_eq!(request.key, outcome.key_used);
        assert_eq!(
            request.key_location.as_deref(),
            Some(format!("https://example.com{route}").as_str())
        );
    }

    #[tokio::test]
    async fn test_explicit_key_skips_provisioning() {
        let tmp = TempDir::new().unwrap();
        let transport = RecordingTransport::ok();
        let mut options = keyed_options(vec!["https://example.com/a".into()]);
        options.key_file = KeyFileOptions {
            project_root: Some(tmp.path().to_path_buf()),
            ..KeyFileOptions::default()
        };

        let outcome = submit_with(&options, &transport, &FsKeyStore::with_env(NullEnv))
            .await
            .unwrap();

        assert_eq!(outcome.key_used, "testkey");
        assert!(outcome.key_file_route.is_none());
        assert!(outcome.key_file_path.is_none());
        assert!(!tmp.path().join("indexnow.manifest.json").exists());
        assert!(transport.requests()[0].key_location.is_none());
    }

    #[tokio::test]
    async fn test_explicit_key_location_passes_through() {
        let transport = RecordingTransport::ok();
        let options = SubmitOptions {
            key_location: Some("https://cdn.example.com/indexnow.txt".into()),
            ..keyed_options(urls(1))
        };

        submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].key_location.as_deref(),
            Some("https://cdn.example.com/indexnow.txt")
        );
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_later_batches() {
        let transport = RecordingTransport::scripted(&[200, 404, 200]);
        let options = SubmitOptions {
            batch_size: 1,
            retries: 0,
            ..keyed_options(urls(3))
        };

        let outcome = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        assert_eq!(outcome.batches.len(), 3);
        assert!(!outcome.all_ok());
        let ok: Vec<bool> = outcome.batches.iter().map(|b| b.ok).collect();
        assert_eq!(ok, vec![true, false, true]);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_each_batch_has_its_own_retry_budget() {
        // First batch needs one retry, second succeeds outright.
        let transport = RecordingTransport::scripted(&[500, 200, 200]);
        let options = SubmitOptions {
            batch_size: 1,
            retries: 2,
            ..keyed_options(urls(2))
        };

        let outcome = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        assert!(outcome.all_ok());
        assert_eq!(outcome.batches.len(), 2);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_batch_size_is_clamped() {
        let transport = RecordingTransport::ok();
        let options = SubmitOptions {
            batch_size: 0,
            ..keyed_options(urls(2))
        };

        let outcome = submit_with(&options, &transport, &UnsupportedKeyStore)
            .await
            .unwrap();

        // A zero batch size degenerates to one URL per batch.
        assert_eq!(outcome.batches.len(), 2);
    }
}
