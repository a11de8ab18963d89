//! Types for the worker pool.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::discover::DiscoveredItem;

/// A discovered item together with its attempt number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub item: DiscoveredItem,
    /// 1 for the first try.
    pub attempt: u32,
}

impl WorkItem {
    /// Wraps a freshly discovered item.
    pub fn new(item: DiscoveredItem) -> Self {
        Self { item, attempt: 1 }
    }

    /// The same item, one attempt later.
    pub fn retry(&self) -> Self {
        Self {
            item: self.item.clone(),
            attempt: self.attempt + 1,
        }
    }
}

/// Terminal result for one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Moved {
        source: PathBuf,
        destination: PathBuf,
    },
    Skipped {
        source: PathBuf,
        existing: PathBuf,
    },
    Errored {
        source: PathBuf,
        error: String,
    },
    RetriesExhausted {
        source: PathBuf,
        attempts: u32,
    },
}

impl ItemOutcome {
    /// The file this outcome is about.
    pub fn source(&self) -> &Path {
        match self {
            Self::Moved { source, .. }
            | Self::Skipped { source, .. }
            | Self::Errored { source, .. }
            | Self::RetriesExhausted { source, .. } => source,
        }
    }
}

/// What the workers did during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub outcomes: Vec<ItemOutcome>,
    /// Number of times an item was put back on the queue.
    pub retries: usize,
}

impl PoolReport {
    pub(crate) fn record(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn merge(&mut self, other: PoolReport) {
        self.outcomes.extend(other.outcomes);
        self.retries += other.retries;
    }

    /// Items that reached a terminal outcome.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Moved { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Errored { .. }))
    }

    pub fn exhausted(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::RetriesExhausted { .. }))
    }

    /// Outcome recorded for `source`, if any.
    pub fn outcome_for(&self, source: &Path) -> Option<&ItemOutcome> {
        self.outcomes.iter().find(|o| o.source() == source)
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
