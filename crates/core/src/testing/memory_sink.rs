//! Recording event sink for testing.

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::{EventSink, OrganizeEvent};

/// Event sink that keeps every event in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<OrganizeEvent>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in order.
    pub fn events(&self) -> Vec<OrganizeEvent> {
        self.lock().clone()
    }

    /// Recorded events with the given [`OrganizeEvent::event_type`].
    pub fn events_of(&self, event_type: &str) -> Vec<OrganizeEvent> {
        self.lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<OrganizeEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: OrganizeEvent) {
        self.lock().push(event);
    }
}
