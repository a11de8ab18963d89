//! Recursive walk that feeds dated pictures into the work queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};
use walkdir::{DirEntry, WalkDir};

use crate::date::{DateResolver, MetadataReader};
use crate::events::{EventSink, OrganizeEvent};
use crate::pool::{QueueProducer, WorkItem};

use super::error::DiscoveryError;
use super::types::{DiscoveredItem, DiscoveryStats, DEFAULT_EXTENSIONS};

/// Walks a tree and enqueues every supported picture with its resolved date.
pub struct Discoverer<R> {
    resolver: DateResolver<R>,
    extensions: Vec<String>,
    excluded: Vec<PathBuf>,
    sink: Arc<dyn EventSink>,
}

impl<R: MetadataReader> Discoverer<R> {
    /// Creates a discoverer with the default extension list.
    pub fn new(resolver: DateResolver<R>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            resolver,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded: Vec::new(),
            sink,
        }
    }

    /// Replaces the extension allow-list. Entries include the leading dot.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Skips `dir` and everything below it.
    ///
    /// Used to keep the collection tree out of the walk when it lives under
    /// the scanned root.
    pub fn exclude(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded.push(dir.into());
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` has one of the allowed extensions.
    ///
    /// The extension is everything from the last `.` of the file name,
    /// compared byte for byte.
    pub fn is_supported(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        match name.rfind('.') {
            Some(idx) => self.extensions.iter().any(|ext| ext == &name[idx..]),
            None => false,
        }
    }

    /// Walks `root` and pushes every dated picture into `producer`.
    ///
    /// Symlinks are not followed. Pictures without a resolvable date are
    /// reported and skipped. Any enumeration error stops the walk. The
    /// producer is dropped on return, which closes the queue for new items.
    pub fn discover(
        &self,
        root: &Path,
        producer: QueueProducer<WorkItem>,
    ) -> Result<DiscoveryStats, DiscoveryError> {
        self.sink.record(OrganizeEvent::DiscoveryStarted {
            root: root.to_path_buf(),
        });

        let excluded: Vec<PathBuf> = self
            .excluded
            .iter()
            .filter_map(|dir| dir.canonicalize().ok())
            .collect();

        let mut stats = DiscoveryStats::default();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry, &excluded));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    let err = DiscoveryError::Walk {
                        root: root.to_path_buf(),
                        source,
                    };
                    error!("Walk of {} failed: {}", root.display(), err_chain(&err));
                    self.sink.record(OrganizeEvent::DiscoveryFailed {
                        root: root.to_path_buf(),
                        error: err_chain(&err),
                    });
                    return Err(err);
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            stats.scanned += 1;

            let path = entry.path();
            if !self.is_supported(path) {
                continue;
            }
            stats.matched += 1;

            match self.resolver.resolve_with_source(path) {
                Ok(resolved) => {
                    debug!("{} resolved to {}", path.display(), resolved.timestamp);
                    self.sink.record(OrganizeEvent::FileDiscovered {
                        path: path.to_path_buf(),
                        resolved_date: resolved.timestamp,
                        source: resolved.source,
                    });
                    producer
                        .push(WorkItem::new(DiscoveredItem {
                            path: path.to_path_buf(),
                            resolved_date: resolved.timestamp,
                        }))
                        .map_err(|_| DiscoveryError::QueueClosed)?;
                    stats.enqueued += 1;
                }
                Err(e) => {
                    stats.unresolved += 1;
                    self.sink.record(OrganizeEvent::DateUnresolvable {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.sink.record(OrganizeEvent::DiscoveryFinished {
            stats: stats.clone(),
        });
        Ok(stats)
    }
}

fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .path()
        .canonicalize()
        .map(|p| excluded.contains(&p))
        .unwrap_or(false)
}

fn err_chain(err: &DiscoveryError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{}: {}", err, source),
        None => err.to_string(),
    }
}
