//! One end-to-end run: discover, stage, report.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::date::{DateResolver, ExifMetadataReader, MetadataReader};
use crate::discover::{Discoverer, DiscoveryError, DiscoveryStats};
use crate::events::EventSink;
use crate::mover::{Mover, SafeMover};
use crate::pool::{work_queue, PoolReport, WorkerPool};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Failed to create collection root {path}")]
    CollectRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Discovery task panicked: {0}")]
    DiscoveryPanicked(String),
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub discovery: DiscoveryStats,
    pub pool: PoolReport,
}

impl RunReport {
    /// Whether every discovered picture was either staged or already present.
    pub fn is_clean(&self) -> bool {
        self.pool.errored() == 0 && self.pool.exhausted() == 0
    }
}

/// Wires a [`Discoverer`] to a [`WorkerPool`] for a single run.
pub struct Organizer<R, M> {
    discoverer: Arc<Discoverer<R>>,
    pool: WorkerPool<M>,
    collect_root: PathBuf,
}

impl<R, M> Organizer<R, M>
where
    R: MetadataReader + 'static,
    M: Mover + 'static,
{
    pub fn new(discoverer: Discoverer<R>, pool: WorkerPool<M>, collect_root: impl Into<PathBuf>) -> Self {
        Self {
            discoverer: Arc::new(discoverer),
            pool,
            collect_root: collect_root.into(),
        }
    }

    pub fn collect_root(&self) -> &Path {
        &self.collect_root
    }

    /// Stages every dated picture under `scan_root` into the collection tree.
    ///
    /// The walk runs on a blocking thread while the workers drain the queue.
    /// When the walk fails, the items it already queued are still processed
    /// before the error is returned.
    pub async fn run(&self, scan_root: &Path) -> Result<RunReport, OrganizeError> {
        tokio::fs::create_dir_all(&self.collect_root)
            .await
            .map_err(|source| OrganizeError::CollectRoot {
                path: self.collect_root.clone(),
                source,
            })?;

        info!(
            "Staging pictures from {} into {} with {} workers",
            scan_root.display(),
            self.collect_root.display(),
            self.pool.config().worker_count.max(1)
        );

        let (producer, queue) = work_queue();
        let discoverer = Arc::clone(&self.discoverer);
        let root = scan_root.to_path_buf();
        let discovery = tokio::task::spawn_blocking(move || discoverer.discover(&root, producer));

        let pool = self.pool.run(queue, &self.collect_root).await;

        let discovery = discovery
            .await
            .map_err(|e| OrganizeError::DiscoveryPanicked(e.to_string()))?;
        let discovery = match discovery {
            Ok(stats) => stats,
            Err(e) => {
                warn!(
                    "Walk aborted after {} items were staged",
                    pool.moved() + pool.skipped()
                );
                return Err(e.into());
            }
        };

        info!(
            "Run finished: {} found, {} moved, {} already present, {} failed",
            discovery.enqueued,
            pool.moved(),
            pool.skipped(),
            pool.errored() + pool.exhausted()
        );
        Ok(RunReport { discovery, pool })
    }
}

impl Organizer<ExifMetadataReader, SafeMover> {
    /// Builds the standard pipeline: EXIF dates, [`SafeMover`], and the
    /// collection root excluded from the walk.
    pub fn from_config(config: &Config, sink: Arc<dyn EventSink>) -> Self {
        let discoverer = Discoverer::new(DateResolver::new(ExifMetadataReader::new()), Arc::clone(&sink))
            .with_extensions(config.scan.extensions.iter().cloned())
            .exclude(&config.collect.root);
        let pool = WorkerPool::new(
            config.pool.clone(),
            SafeMover::new(config.collect.mover.clone()),
            sink,
        );
        Self::new(discoverer, pool, &config.collect.root)
    }
}
