//! Diagnostic events and the sinks that receive them.
//!
//! Every component reports what happened to each file through an
//! [`EventSink`] instead of printing. The binary logs events via
//! [`TracingSink`] and can also persist them with [`create_event_log`];
//! tests use [`crate::testing::MemorySink`] to assert on them.

mod log;
mod sink;
mod types;

pub use log::{create_event_log, EventLogWriter};
pub use sink::{
    ChannelSink, DroppedEvents, EventEnvelope, EventSink, FanoutSink, NullSink, TracingSink,
};
pub use types::OrganizeEvent;
