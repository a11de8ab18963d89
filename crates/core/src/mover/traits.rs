//! Trait definitions for the mover module.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;

use super::error::MoveError;
use super::types::MoveOutcome;

/// Something that can stage one file into a destination directory.
#[async_trait]
pub trait Mover: Send + Sync {
    /// Returns the name of this mover implementation.
    fn name(&self) -> &str;

    /// Stages `source` into `dest_dir` under `base_name`.
    ///
    /// Never overwrites an existing file and never deletes `source`.
    async fn move_file(
        &self,
        source: &Path,
        dest_dir: &Path,
        base_name: &OsStr,
    ) -> Result<MoveOutcome, MoveError>;
}
