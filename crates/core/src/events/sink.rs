use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::OrganizeEvent;

/// Destination for diagnostic events.
///
/// Components receive a sink instead of printing, so callers decide whether
/// events go to the log, a file, or a test recorder. `record` must not block
/// for long; it is called from the discovery thread and from workers.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: OrganizeEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn record(&self, event: OrganizeEvent) {
        (**self).record(event)
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: OrganizeEvent) {}
}

/// Sink that writes events to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: OrganizeEvent) {
        match &event {
            OrganizeEvent::DiscoveryStarted { root } => {
                tracing::info!("Scanning {}", root.display());
            }
            OrganizeEvent::FileDiscovered {
                path,
                resolved_date,
                source,
            } => {
                tracing::debug!(
                    "Found {} dated {} ({:?})",
                    path.display(),
                    resolved_date,
                    source
                );
            }
            OrganizeEvent::DateUnresolvable { path, reason } => {
                tracing::warn!("Skipping {}: {}", path.display(), reason);
            }
            OrganizeEvent::DiscoveryFinished { stats } => {
                tracing::info!(
                    "Scan finished: {} entries, {} pictures, {} queued, {} without date",
                    stats.scanned,
                    stats.matched,
                    stats.enqueued,
                    stats.unresolved
                );
            }
            OrganizeEvent::DiscoveryFailed { root, error } => {
                tracing::error!("Scan of {} failed: {}", root.display(), error);
            }
            OrganizeEvent::FileMoved {
                source,
                destination,
            } => {
                tracing::info!("Moved {} to {}", source.display(), destination.display());
            }
            OrganizeEvent::DuplicateSkipped { source, existing } => {
                tracing::info!(
                    "Skipping {}: already stored as {}",
                    source.display(),
                    existing.display()
                );
            }
            OrganizeEvent::CopyMismatch { source, attempt } => {
                tracing::warn!(
                    "Copy of {} failed verification on attempt {}",
                    source.display(),
                    attempt
                );
            }
            OrganizeEvent::Requeued {
                source,
                next_attempt,
            } => {
                tracing::warn!(
                    "Error copying {}, trying again later (attempt {})",
                    source.display(),
                    next_attempt
                );
            }
            OrganizeEvent::RetriesExhausted { source, attempts } => {
                tracing::error!("Giving up on {} after {} attempts", source.display(), attempts);
            }
            OrganizeEvent::MoveFailed { source, error } => {
                tracing::warn!("Failed to move {}: {}", source.display(), error);
            }
            OrganizeEvent::WorkerFinished {
                worker_id,
                processed,
            } => {
                tracing::debug!("Worker {} finished after {} items", worker_id, processed);
            }
        }
    }
}

/// Envelope wrapping an event with the time it was recorded.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: OrganizeEvent,
}

/// Count of events a [`ChannelSink`] could not forward.
///
/// Shared between clones of the sink. Holding it does not keep the channel
/// open.
#[derive(Debug, Clone, Default)]
pub struct DroppedEvents(Arc<AtomicUsize>);

impl DroppedEvents {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Sink that forwards events through a bounded channel.
///
/// Cheaply cloneable. `record` never blocks: if the channel is full or
/// closed the event is dropped and counted in [`DroppedEvents`]. A log fed
/// by this sink is complete only when that count is zero.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<EventEnvelope>,
    dropped: DroppedEvents,
}

impl ChannelSink {
    /// Creates a sink from a channel sender.
    pub fn new(tx: mpsc::Sender<EventEnvelope>) -> Self {
        Self {
            tx,
            dropped: DroppedEvents::default(),
        }
    }

    /// Handle to the count of events dropped so far.
    pub fn dropped_events(&self) -> DroppedEvents {
        self.dropped.clone()
    }

    /// Tries to forward an event, returning whether it was accepted.
    pub fn try_record(&self, event: OrganizeEvent) -> bool {
        let envelope = EventEnvelope {
            timestamp: Utc::now(),
            event,
        };
        match self.tx.try_send(envelope) {
            Ok(()) => true,
            Err(e) => {
                if self.dropped.increment() == 0 {
                    tracing::error!("Failed to record event, event log is incomplete: {}", e);
                } else {
                    tracing::debug!("Failed to record event: {}", e);
                }
                false
            }
        }
    }
}

impl EventSink for ChannelSink {
    fn record(&self, event: OrganizeEvent) {
        self.try_record(event);
    }
}

/// Sink that hands every event to each of its inner sinks.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    /// Creates an empty fanout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of inner sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there are no inner sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn record(&self, event: OrganizeEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.record(event.clone());
            }
            last.record(event);
        }
    }
}
