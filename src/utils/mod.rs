//! Utility functions and helpers.

pub mod retry;
pub mod url;
