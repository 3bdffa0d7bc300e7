//! Event dispatcher that records delivered events in memory.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::lifecycle::{
    domain::IssueEvent,
    ports::{DispatchError, DispatchResult, EventDispatcher},
};

/// Collects dispatched events for inspection.
///
/// Thread-safe via internal [`RwLock`]. Suitable for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventDispatcher {
    events: Arc<RwLock<Vec<IssueEvent>>>,
}

impl RecordingEventDispatcher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event delivered so far, in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<IssueEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EventDispatcher for RecordingEventDispatcher {
    async fn dispatch(&self, event: &IssueEvent) -> DispatchResult<()> {
        let mut events = self.events.write().map_err(|err| {
            DispatchError::transport(std::io::Error::other(err.to_string()))
        })?;
        events.push(event.clone());
        Ok(())
    }
}
