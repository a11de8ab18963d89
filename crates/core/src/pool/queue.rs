//! Shared work queue between the discovery thread and the workers.
//!
//! The queue accepts items from one producer and hands each to exactly one of
//! many consumers. Consumers can push an item back for another attempt. The
//! producer closing the queue means "no new items"; the queue only reports
//! end-of-stream once every accepted item has been finished, so requeues
//! issued while draining are never lost.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

/// The queue no longer accepts items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Work queue is closed")]
pub struct QueueClosed;

struct Shared<T> {
    tx: Mutex<Option<mpsc::UnboundedSender<T>>>,
    rx: AsyncMutex<mpsc::UnboundedReceiver<T>>,
    /// Items accepted from the producer that have not been finished.
    outstanding: AtomicUsize,
    producer_closed: AtomicBool,
}

impl<T> Shared<T> {
    fn send(&self, item: T) -> Result<(), QueueClosed> {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(tx) => tx.send(item).map_err(|_| QueueClosed),
            None => Err(QueueClosed),
        }
    }

    fn finish_one(&self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        self.shut_if_drained();
    }

    fn shut_if_drained(&self) {
        if self.producer_closed.load(Ordering::SeqCst) && self.outstanding.load(Ordering::SeqCst) == 0
        {
            self.tx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
        }
    }
}

/// Creates a queue, returning its single producer and a cloneable consumer.
pub fn work_queue<T>() -> (QueueProducer<T>, WorkQueue<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let shared = Arc::new(Shared {
        tx: Mutex::new(Some(tx)),
        rx: AsyncMutex::new(rx),
        outstanding: AtomicUsize::new(0),
        producer_closed: AtomicBool::new(false),
    });

    (
        QueueProducer {
            shared: Arc::clone(&shared),
        },
        WorkQueue { shared },
    )
}

/// Producer side. Dropping it closes the queue for new items.
pub struct QueueProducer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> QueueProducer<T> {
    /// Adds a new item.
    pub fn push(&self, item: T) -> Result<(), QueueClosed> {
        self.shared.outstanding.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.shared.send(item) {
            self.shared.outstanding.fetch_sub(1, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    /// Closes the queue for new items. Equivalent to dropping the producer.
    pub fn close(self) {}
}

impl<T> Drop for QueueProducer<T> {
    fn drop(&mut self) {
        self.shared.producer_closed.store(true, Ordering::SeqCst);
        self.shared.shut_if_drained();
    }
}

/// Consumer side, shared by all workers.
pub struct WorkQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> WorkQueue<T> {
    /// Waits for the next item.
    ///
    /// Returns `None` once the producer has closed and every item has been
    /// finished.
    pub async fn recv(&self) -> Option<Claim<T>> {
        let item = self.shared.rx.lock().await.recv().await?;
        Some(Claim {
            item,
            requeued: false,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Items accepted but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::SeqCst)
    }

    /// Whether the queue has shut down for good.
    pub fn is_closed(&self) -> bool {
        self.shared
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// An item taken from the queue.
///
/// Dropping the claim marks the item finished, including when a worker
/// unwinds. Use [`Claim::requeue`] to hand it back instead.
pub struct Claim<T> {
    item: T,
    requeued: bool,
    shared: Arc<Shared<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Claim<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claim")
            .field("item", &self.item)
            .field("requeued", &self.requeued)
            .finish_non_exhaustive()
    }
}

impl<T> Claim<T> {
    /// The claimed item.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Puts `next` back on the queue in place of the claimed item.
    ///
    /// On error the claimed item counts as finished.
    pub fn requeue(mut self, next: T) -> Result<(), QueueClosed> {
        self.shared.send(next)?;
        self.requeued = true;
        Ok(())
    }
}

impl<T> Drop for Claim<T> {
    fn drop(&mut self) {
        if !self.requeued {
            self.shared.finish_one();
        }
    }
}
