//! Notification port for emitted lifecycle events.

use crate::lifecycle::domain::IssueEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Delivers committed lifecycle events to external consumers.
///
/// Dispatch happens after the transition is persisted, so a failure here
/// never affects issue state.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Delivers a single event.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the consumer could not be reached.
    async fn dispatch(&self, event: &IssueEvent) -> DispatchResult<()>;
}

/// Errors returned by event dispatchers.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The consumer rejected or could not receive the event.
    #[error("event dispatch failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl DispatchError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
