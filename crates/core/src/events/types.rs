use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::date::DateSource;
use crate::discover::DiscoveryStats;

/// Diagnostic events emitted while organizing a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrganizeEvent {
    // Discovery
    DiscoveryStarted {
        root: PathBuf,
    },
    FileDiscovered {
        path: PathBuf,
        resolved_date: DateTime<Utc>,
        source: DateSource,
    },
    DateUnresolvable {
        path: PathBuf,
        reason: String,
    },
    DiscoveryFinished {
        stats: DiscoveryStats,
    },
    DiscoveryFailed {
        root: PathBuf,
        error: String,
    },

    // Moves
    FileMoved {
        source: PathBuf,
        destination: PathBuf,
    },
    DuplicateSkipped {
        source: PathBuf,
        existing: PathBuf,
    },
    /// Copy verification failed; the destination was removed.
    CopyMismatch {
        source: PathBuf,
        attempt: u32,
    },
    Requeued {
        source: PathBuf,
        next_attempt: u32,
    },
    RetriesExhausted {
        source: PathBuf,
        attempts: u32,
    },
    MoveFailed {
        source: PathBuf,
        error: String,
    },

    // Workers
    WorkerFinished {
        worker_id: usize,
        processed: usize,
    },
}

impl OrganizeEvent {
    /// Stable name of the event kind.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DiscoveryStarted { .. } => "discovery_started",
            Self::FileDiscovered { .. } => "file_discovered",
            Self::DateUnresolvable { .. } => "date_unresolvable",
            Self::DiscoveryFinished { .. } => "discovery_finished",
            Self::DiscoveryFailed { .. } => "discovery_failed",
            Self::FileMoved { .. } => "file_moved",
            Self::DuplicateSkipped { .. } => "duplicate_skipped",
            Self::CopyMismatch { .. } => "copy_mismatch",
            Self::Requeued { .. } => "requeued",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::MoveFailed { .. } => "move_failed",
            Self::WorkerFinished { .. } => "worker_finished",
        }
    }

    /// The file the event is about, if any.
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileDiscovered { path, .. } | Self::DateUnresolvable { path, .. } => Some(path),
            Self::FileMoved { source, .. }
            | Self::DuplicateSkipped { source, .. }
            | Self::CopyMismatch { source, .. }
            | Self::Requeued { source, .. }
            | Self::RetriesExhausted { source, .. }
            | Self::MoveFailed { source, .. } => Some(source),
            Self::DiscoveryStarted { .. }
            | Self::DiscoveryFinished { .. }
            | Self::DiscoveryFailed { .. }
            | Self::WorkerFinished { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serializes_with_type_tag() {
        let event = OrganizeEvent::FileDiscovered {
            path: PathBuf::from("/pics/a.jpg"),
            resolved_date: Utc.with_ymd_and_hms(2021, 6, 15, 4, 0, 0).unwrap(),
            source: DateSource::BurstCoverName,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "file_discovered");
        assert_eq!(json["source"], "burst_cover_name");
        assert_eq!(json["path"], "/pics/a.jpg");
    }

    #[test]
    fn test_event_type_matches_tag() {
        let event = OrganizeEvent::Requeued {
            source: PathBuf::from("a.jpg"),
            next_attempt: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }

    #[test]
    fn test_file_path() {
        let moved = OrganizeEvent::FileMoved {
            source: PathBuf::from("a.jpg"),
            destination: PathBuf::from("out/a.jpg"),
        };
        assert_eq!(moved.file_path(), Some(&PathBuf::from("a.jpg")));

        let finished = OrganizeEvent::WorkerFinished {
            worker_id: 0,
            processed: 3,
        };
        assert_eq!(finished.file_path(), None);
    }
}
