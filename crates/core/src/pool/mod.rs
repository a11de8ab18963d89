//! Worker pool that drains discovered pictures into the collection tree.
//!
//! Discovery pushes [`WorkItem`]s through a [`QueueProducer`]; a fixed number
//! of workers pull them from the shared [`WorkQueue`] and hand each one to a
//! [`crate::mover::Mover`]. A copy that fails verification goes back to the
//! end of the queue with its attempt count bumped.
//!
//! The pool finishes when the producer has been dropped and no item is queued
//! or in flight, so retries issued after discovery ends still run.

mod config;
mod queue;
mod types;
mod worker_pool;

pub use config::PoolConfig;
pub use queue::{work_queue, Claim, QueueClosed, QueueProducer, WorkQueue};
pub use types::{ItemOutcome, PoolReport, WorkItem};
pub use worker_pool::WorkerPool;
