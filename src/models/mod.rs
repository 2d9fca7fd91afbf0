// src/models/mod.rs

//! Domain models for the IndexNow client.

mod manifest;
mod options;
mod outcome;
mod payload;

// Re-export all public types
pub use manifest::Manifest;
pub use options::{INDEXNOW_ENDPOINT, KeyFileOptions, MAX_BATCH_SIZE, SubmitOptions, UrlInput};
pub use outcome::{BatchOutcome, SubmitOutcome};
pub use payload::SubmissionPayload;
