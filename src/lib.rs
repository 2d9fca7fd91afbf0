// src/lib.rs

//! IndexNow submission library.
//!
//! Validates a list of changed URLs, makes sure the host publishes an
//! IndexNow key file, and posts the URLs to the endpoint in batches:
//!
//! ```no_run
//! # async fn example() -> indexnow::Result<()> {
//! let options = indexnow::SubmitOptions::new(vec![
//!     "https://example.com/a".to_string(),
//!     "https://example.com/b".to_string(),
//! ]);
//! let outcome = indexnow::submit(&options).await?;
//! assert!(outcome.all_ok());
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod error;
pub mod keystore;
pub mod models;
pub mod submit;
pub mod utils;

pub use env::{EnvProvider, ProcessEnv};
pub use error::{AppError, Result};
pub use keystore::{FsKeyStore, KeyStore, ProvisionedKey, UnsupportedKeyStore};
pub use models::{
    BatchOutcome, KeyFileOptions, Manifest, SubmitOptions, SubmitOutcome, UrlInput,
    INDEXNOW_ENDPOINT,
};
pub use submit::{submit, submit_with, HttpTransport, Transport};
