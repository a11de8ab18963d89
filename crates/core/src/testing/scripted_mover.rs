//! Scripted mover for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::mover::{MoveError, MoveFailure, MoveOutcome, Mover, SkipReason};

/// A recorded `move_file` call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMove {
    pub source: PathBuf,
    pub dest_dir: PathBuf,
    pub base_name: OsString,
}

/// Mover that never touches the filesystem.
///
/// Every call succeeds with `Moved` unless scripted otherwise:
/// - a number of copy mismatches for a source
/// - a duplicate for a source
/// - a hard error for a source
///
/// # Example
///
/// ```rust,ignore
/// use snapstage_core::testing::ScriptedMover;
///
/// let mover = ScriptedMover::new();
/// mover.mismatch_times("/pics/a.jpg", 2).await;
///
/// // ... run the pool ...
///
/// assert_eq!(mover.calls_for(Path::new("/pics/a.jpg")).await, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedMover {
    calls: Arc<RwLock<Vec<RecordedMove>>>,
    /// Remaining mismatches per source.
    mismatches: Arc<RwLock<HashMap<PathBuf, u32>>>,
    duplicates: Arc<RwLock<HashMap<PathBuf, PathBuf>>>,
    failures: Arc<RwLock<HashSet<PathBuf>>>,
}

impl ScriptedMover {
    /// Create a mover that moves everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `times` moves of `source` fail verification.
    pub async fn mismatch_times(&self, source: impl Into<PathBuf>, times: u32) {
        self.mismatches.write().await.insert(source.into(), times);
    }

    /// Report `source` as already stored at `existing`.
    pub async fn duplicate_of(&self, source: impl Into<PathBuf>, existing: impl Into<PathBuf>) {
        self.duplicates
            .write()
            .await
            .insert(source.into(), existing.into());
    }

    /// Make every move of `source` fail with [`MoveError::SourceNotFound`].
    pub async fn fail_on(&self, source: impl Into<PathBuf>) {
        self.failures.write().await.insert(source.into());
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedMove> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Get the number of calls for one source.
    pub async fn calls_for(&self, source: &Path) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.source == source)
            .count()
    }
}

#[async_trait]
impl Mover for ScriptedMover {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn move_file(
        &self,
        source: &Path,
        dest_dir: &Path,
        base_name: &OsStr,
    ) -> Result<MoveOutcome, MoveError> {
        self.calls.write().await.push(RecordedMove {
            source: source.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            base_name: base_name.to_os_string(),
        });

        let destination = dest_dir.join(base_name);

        if self.failures.read().await.contains(source) {
            return Err(MoveError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        if let Some(existing) = self.duplicates.read().await.get(source) {
            return Ok(MoveOutcome::Skipped {
                reason: SkipReason::Duplicate {
                    existing: existing.clone(),
                },
            });
        }

        if let Some(remaining) = self.mismatches.write().await.get_mut(source) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(MoveOutcome::Failed {
                    reason: MoveFailure::CopyMismatch { destination },
                });
            }
        }

        Ok(MoveOutcome::Moved { destination })
    }
}
