//! Types for the mover module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Suffix inserted before the extension when a different file already owns
/// the destination name.
pub const COLLISION_SUFFIX: &str = "_01";

/// Result of a move attempt that did not hit an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The file was copied and verified.
    Moved { destination: PathBuf },
    /// Nothing was written.
    Skipped { reason: SkipReason },
    /// The copy was written but did not verify; it has been removed.
    Failed { reason: MoveFailure },
}

impl MoveOutcome {
    /// Whether the same move should be attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                reason: MoveFailure::CopyMismatch { .. }
            }
        )
    }
}

/// Why a move wrote nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Identical content is already stored at `existing`.
    Duplicate { existing: PathBuf },
}

/// Why a written copy was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFailure {
    /// Digest of the written copy differed from the source.
    CopyMismatch { destination: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_copy_mismatch_is_retryable() {
        let mismatch = MoveOutcome::Failed {
            reason: MoveFailure::CopyMismatch {
                destination: PathBuf::from("out/a.jpg"),
            },
        };
        let moved = MoveOutcome::Moved {
            destination: PathBuf::from("out/a.jpg"),
        };
        let skipped = MoveOutcome::Skipped {
            reason: SkipReason::Duplicate {
                existing: PathBuf::from("out/a.jpg"),
            },
        };

        assert!(mismatch.is_retryable());
        assert!(!moved.is_retryable());
        assert!(!skipped.is_retryable());
    }
}
