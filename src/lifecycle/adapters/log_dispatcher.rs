//! Event dispatcher that emits each event as a structured log record.

use async_trait::async_trait;

use crate::lifecycle::{
    domain::IssueEvent,
    ports::{DispatchError, DispatchResult, EventDispatcher},
};

/// Writes lifecycle events to the `tracing` pipeline.
///
/// Useful as a default notification sink when no external consumer is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventDispatcher;

#[async_trait]
impl EventDispatcher for TracingEventDispatcher {
    async fn dispatch(&self, event: &IssueEvent) -> DispatchResult<()> {
        let payload = serde_json::to_string(event.kind()).map_err(DispatchError::transport)?;
        tracing::info!(
            target: "issue_lifecycle::events",
            issue_id = %event.issue_id(),
            event_type = event.event_type(),
            occurred_at = %event.occurred_at(),
            payload = %payload,
            "lifecycle event"
        );
        Ok(())
    }
}
