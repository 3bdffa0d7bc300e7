//! Best-effort event delivery after a committed transition.

use super::LifecycleService;
use crate::lifecycle::{
    domain::IssueEvent,
    ports::{EventDispatcher, IssueRepository, ReleaseRepository},
};
use mockable::Clock;
use tracing::warn;

impl<I, R, D, C> LifecycleService<I, R, D, C>
where
    I: IssueRepository,
    R: ReleaseRepository,
    D: EventDispatcher,
    C: Clock + Send + Sync,
{
    /// Delivers events in order, retrying each up to the configured number of
    /// attempts. Failures are logged and dropped.
    pub(super) async fn dispatch_all(&self, events: &[IssueEvent]) {
        for event in events {
            self.dispatch_one(event).await;
        }
    }

    async fn dispatch_one(&self, event: &IssueEvent) {
        let attempts = self.config.effective_dispatch_attempts();
        for attempt in 1..=attempts {
            match self.dispatcher.dispatch(event).await {
                Ok(()) => return,
                Err(err) if attempt < attempts => {
                    warn!(
                        issue_id = %event.issue_id(),
                        event_type = event.event_type(),
                        attempt,
                        error = %err,
                        "event dispatch failed, retrying"
                    );
                }
                Err(err) => {
                    warn!(
                        issue_id = %event.issue_id(),
                        event_type = event.event_type(),
                        attempts,
                        error = %err,
                        "event dispatch abandoned"
                    );
                }
            }
        }
    }
}
