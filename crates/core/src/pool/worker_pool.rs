//! Fixed-size pool of workers draining the work queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::events::{EventSink, OrganizeEvent};
use crate::layout::canonical_dir;
use crate::mover::{MoveOutcome, Mover, SkipReason};

use super::config::PoolConfig;
use super::queue::{Claim, WorkQueue};
use super::types::{ItemOutcome, PoolReport, WorkItem};

/// Runs a fixed number of workers that stage queued items with a [`Mover`].
pub struct WorkerPool<M> {
    config: PoolConfig,
    mover: Arc<M>,
    sink: Arc<dyn EventSink>,
}

impl<M: Mover + 'static> WorkerPool<M> {
    /// Creates a pool that stages files with `mover` and reports to `sink`.
    pub fn new(config: PoolConfig, mover: M, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            mover: Arc::new(mover),
            sink,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn mover(&self) -> &M {
        &self.mover
    }

    /// Drains `queue` into `collect_root` and returns once every item has
    /// reached a terminal outcome and every worker has exited.
    ///
    /// Items whose copy fails verification are put back at the end of the
    /// queue. The queue ends when its producer is dropped and nothing is in
    /// flight.
    pub async fn run(&self, queue: WorkQueue<WorkItem>, collect_root: &Path) -> PoolReport {
        let workers = self.config.worker_count.max(1);
        let mut tasks = JoinSet::new();

        for worker_id in 0..workers {
            let worker = Worker {
                id: worker_id,
                queue: queue.clone(),
                mover: Arc::clone(&self.mover),
                sink: Arc::clone(&self.sink),
                max_attempts: self.config.max_attempts,
                collect_root: collect_root.to_path_buf(),
            };
            tasks.spawn(worker.run());
        }
        drop(queue);

        let mut report = PoolReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(worker_report) => report.merge(worker_report),
                Err(e) => error!("Worker task failed: {}", e),
            }
        }

        debug!(
            "Pool finished: {} moved, {} skipped, {} errored, {} exhausted, {} retries",
            report.moved(),
            report.skipped(),
            report.errored(),
            report.exhausted(),
            report.retries
        );
        report
    }
}

struct Worker<M> {
    id: usize,
    queue: WorkQueue<WorkItem>,
    mover: Arc<M>,
    sink: Arc<dyn EventSink>,
    max_attempts: Option<u32>,
    collect_root: PathBuf,
}

impl<M: Mover> Worker<M> {
    async fn run(self) -> PoolReport {
        let mut report = PoolReport::default();
        let mut processed = 0;

        while let Some(claim) = self.queue.recv().await {
            processed += 1;
            self.handle(claim, &mut report).await;
        }

        self.sink.record(OrganizeEvent::WorkerFinished {
            worker_id: self.id,
            processed,
        });
        report
    }

    async fn handle(&self, claim: Claim<WorkItem>, report: &mut PoolReport) {
        let work = claim.item();
        let source = work.item.path.clone();
        let attempt = work.attempt;

        let Some(base_name) = work.item.base_name().map(|n| n.to_os_string()) else {
            self.errored(report, source, "path has no file name".to_string());
            return;
        };
        let dest_dir = canonical_dir(&self.collect_root, &work.item.resolved_date);

        let outcome = match self.mover.move_file(&source, &dest_dir, &base_name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.errored(report, source, e.to_string());
                return;
            }
        };

        match outcome {
            MoveOutcome::Moved { destination } => {
                self.sink.record(OrganizeEvent::FileMoved {
                    source: source.clone(),
                    destination: destination.clone(),
                });
                report.record(ItemOutcome::Moved {
                    source,
                    destination,
                });
            }
            MoveOutcome::Skipped {
                reason: SkipReason::Duplicate { existing },
            } => {
                self.sink.record(OrganizeEvent::DuplicateSkipped {
                    source: source.clone(),
                    existing: existing.clone(),
                });
                report.record(ItemOutcome::Skipped { source, existing });
            }
            MoveOutcome::Failed { .. } => {
                self.sink.record(OrganizeEvent::CopyMismatch {
                    source: source.clone(),
                    attempt,
                });

                if self.max_attempts.is_some_and(|max| attempt >= max) {
                    self.sink.record(OrganizeEvent::RetriesExhausted {
                        source: source.clone(),
                        attempts: attempt,
                    });
                    report.record(ItemOutcome::RetriesExhausted {
                        source,
                        attempts: attempt,
                    });
                    return;
                }

                let next = work.retry();
                let next_attempt = next.attempt;
                match claim.requeue(next) {
                    Ok(()) => {
                        report.retries += 1;
                        self.sink.record(OrganizeEvent::Requeued {
                            source,
                            next_attempt,
                        });
                    }
                    Err(e) => self.errored(report, source, e.to_string()),
                }
            }
        }
    }

    fn errored(&self, report: &mut PoolReport, source: PathBuf, error: String) {
        self.sink.record(OrganizeEvent::MoveFailed {
            source: source.clone(),
            error: error.clone(),
        });
        report.record(ItemOutcome::Errored { source, error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::DiscoveredItem;
    use crate::pool::work_queue;
    use crate::testing::{MemorySink, ScriptedMover};
    use chrono::{DateTime, TimeZone, Utc};

    fn june_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 15, 4, 0, 0).unwrap()
    }

    fn item(path: &str) -> WorkItem {
        WorkItem::new(DiscoveredItem {
            path: PathBuf::from(path),
            resolved_date: june_15(),
        })
    }

    fn pool(mover: ScriptedMover, config: PoolConfig) -> (WorkerPool<ScriptedMover>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (WorkerPool::new(config, mover, sink.clone()), sink)
    }

    #[tokio::test]
    async fn test_every_item_reaches_an_outcome() {
        let (pool, sink) = pool(ScriptedMover::new(), PoolConfig::default().with_workers(3));
        let (producer, queue) = work_queue();
        for i in 0..20 {
            producer.push(item(&format!("/src/p{}.jpg", i))).unwrap();
        }
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(report.total(), 20);
        assert_eq!(report.moved(), 20);
        assert_eq!(pool.mover().call_count().await, 20);

        let finished = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, OrganizeEvent::WorkerFinished { .. }))
            .count();
        assert_eq!(finished, 3);
    }

    #[tokio::test]
    async fn test_items_go_to_dated_directory() {
        let (pool, _sink) = pool(ScriptedMover::new(), PoolConfig::default());
        let (producer, queue) = work_queue();
        producer.push(item("/src/a.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(
            report.outcome_for(Path::new("/src/a.jpg")),
            Some(&ItemOutcome::Moved {
                source: PathBuf::from("/src/a.jpg"),
                destination: PathBuf::from("/out/2021/06/15/a.jpg"),
            })
        );
        let calls = pool.mover().recorded_calls().await;
        assert_eq!(calls[0].dest_dir, PathBuf::from("/out/2021/06/15"));
    }

    #[tokio::test]
    async fn test_mismatch_is_requeued_until_it_verifies() {
        let mover = ScriptedMover::new();
        mover.mismatch_times("/src/flaky.jpg", 2).await;
        let (pool, sink) = pool(mover, PoolConfig::default().with_workers(2));

        let (producer, queue) = work_queue();
        producer.push(item("/src/flaky.jpg")).unwrap();
        producer.push(item("/src/fine.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(report.moved(), 2);
        assert_eq!(report.retries, 2);
        assert_eq!(pool.mover().calls_for(Path::new("/src/flaky.jpg")).await, 3);

        let requeued: Vec<u32> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                OrganizeEvent::Requeued { next_attempt, .. } => Some(next_attempt),
                _ => None,
            })
            .collect();
        assert_eq!(requeued, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_bounded_attempts_give_up() {
        let mover = ScriptedMover::new();
        mover.mismatch_times("/src/bad.jpg", u32::MAX).await;
        let (pool, sink) = pool(mover, PoolConfig::default().with_max_attempts(3));

        let (producer, queue) = work_queue();
        producer.push(item("/src/bad.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(
            report.outcomes,
            vec![ItemOutcome::RetriesExhausted {
                source: PathBuf::from("/src/bad.jpg"),
                attempts: 3,
            }]
        );
        assert_eq!(report.retries, 2);
        assert!(sink
            .events()
            .contains(&OrganizeEvent::RetriesExhausted {
                source: PathBuf::from("/src/bad.jpg"),
                attempts: 3,
            }));
    }

    #[tokio::test]
    async fn test_mover_error_is_recorded_not_retried() {
        let mover = ScriptedMover::new();
        mover.fail_on("/src/gone.jpg").await;
        let (pool, sink) = pool(mover, PoolConfig::default());

        let (producer, queue) = work_queue();
        producer.push(item("/src/gone.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(report.errored(), 1);
        assert_eq!(report.retries, 0);
        assert_eq!(pool.mover().calls_for(Path::new("/src/gone.jpg")).await, 1);
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, OrganizeEvent::MoveFailed { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_is_skipped() {
        let mover = ScriptedMover::new();
        mover.duplicate_of("/src/dup.jpg", "/out/2021/06/15/dup.jpg").await;
        let (pool, _sink) = pool(mover, PoolConfig::default());

        let (producer, queue) = work_queue();
        producer.push(item("/src/dup.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.moved(), 0);
    }

    #[tokio::test]
    async fn test_item_without_file_name_is_errored() {
        let (pool, sink) = pool(ScriptedMover::new(), PoolConfig::default());
        let (producer, queue) = work_queue();
        producer.push(item("/")).unwrap();
        producer.push(item("/src/a.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;

        assert_eq!(report.errored(), 1);
        assert_eq!(report.moved(), 1);
        assert_eq!(pool.mover().calls_for(Path::new("/")).await, 0);
        assert!(sink.events().contains(&OrganizeEvent::MoveFailed {
            source: PathBuf::from("/"),
            error: "path has no file name".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_zero_workers_still_drains() {
        let (pool, _sink) = pool(ScriptedMover::new(), PoolConfig::default().with_workers(0));
        let (producer, queue) = work_queue();
        producer.push(item("/src/a.jpg")).unwrap();
        drop(producer);

        let report = pool.run(queue, Path::new("/out")).await;
        assert_eq!(report.moved(), 1);
    }

    #[tokio::test]
    async fn test_workers_wait_for_late_items() {
        let (pool, _sink) = pool(ScriptedMover::new(), PoolConfig::default().with_workers(2));
        let (producer, queue) = work_queue();

        let feeder = tokio::spawn(async move {
            for i in 0..5 {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                producer.push(item(&format!("/src/late{}.jpg", i))).unwrap();
            }
        });

        let report = pool.run(queue, Path::new("/out")).await;
        feeder.await.unwrap();

        assert_eq!(report.moved(), 5);
    }
}
