//! Error types for the mover module.

use std::path::PathBuf;
use thiserror::Error;

use crate::hasher::HashError;

/// Errors that stop a single file from being moved.
///
/// None of these are retried; a failed verification is reported as
/// [`super::MoveOutcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Source file not found.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Source is a directory, symlink or special file.
    #[error("{path} is not a regular file")]
    NotRegularFile { path: PathBuf },

    /// Failed to create the destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy file.
    #[error("Failed to copy file from {source} to {destination}")]
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Both the plain and the disambiguated name hold different content.
    #[error("No free destination name left for {path}")]
    CollisionUnresolved { path: PathBuf },

    /// A mismatched copy could not be removed.
    #[error("Failed to remove unverified copy: {path}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to hash the source or a destination.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MoveError {
    /// Creates a copy failed error.
    pub fn copy_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::CopyFailed {
            source,
            destination,
            error,
        }
    }

    /// Whether the source itself was unusable, as opposed to an I/O failure
    /// while reading or writing.
    pub fn is_source_problem(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::NotRegularFile { .. }
        )
    }
}
