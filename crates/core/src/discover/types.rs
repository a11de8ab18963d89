//! Types for the discover module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::PathBuf;

/// Extensions picked up by default. Matched case-sensitively.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".JPG", ".gif"];

/// A picture whose date has been resolved, ready to be staged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredItem {
    pub path: PathBuf,
    pub resolved_date: DateTime<Utc>,
}

impl DiscoveredItem {
    /// File name the item keeps in the collection tree.
    pub fn base_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }
}

/// Counters for one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryStats {
    /// Non-directory entries seen.
    pub scanned: usize,
    /// Entries with a supported extension.
    pub matched: usize,
    /// Items pushed to the work queue.
    pub enqueued: usize,
    /// Matches skipped because no date could be resolved.
    pub unresolved: usize,
}
