//! Error types for the date module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a file's date.
#[derive(Debug, Error)]
pub enum DateError {
    /// Every fallback was tried and none produced a date.
    #[error("Cannot determine a date for {path}: {reason}")]
    Unresolvable { path: PathBuf, reason: String },

    /// A compact date needs at least eight characters.
    #[error("Compact date '{input}' is shorter than 8 characters")]
    CompactDateTooShort { input: String },

    /// The rolled-over date falls outside the representable range.
    #[error("Compact date '{input}' is outside the supported calendar range")]
    CompactDateOutOfRange { input: String },
}

impl DateError {
    /// Creates an unresolvable error.
    pub fn unresolvable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Unresolvable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
