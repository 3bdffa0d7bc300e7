//! Shared world state for issue lifecycle BDD scenarios.

use std::sync::Arc;

use issue_lifecycle::lifecycle::{
    adapters::memory::{
        InMemoryIssueRepository, InMemoryReleaseRepository, RecordingEventDispatcher,
    },
    domain::{Issue, IssueId},
    services::{CloseReleaseReport, CommandOutcome, LifecycleService, LifecycleServiceError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestLifecycleService = LifecycleService<
    InMemoryIssueRepository,
    InMemoryReleaseRepository,
    RecordingEventDispatcher,
    DefaultClock,
>;

/// Scenario world for issue lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub service: TestLifecycleService,
    pub issue_id: Option<IssueId>,
    pub last_command: Option<Result<CommandOutcome, LifecycleServiceError>>,
    pub backport: Option<Issue>,
    pub last_report: Option<CloseReleaseReport>,
}

impl LifecycleWorld {
    /// Creates a world with an empty tracker and default configuration.
    #[must_use]
    pub fn new() -> Self {
        let service = LifecycleService::new(
            Arc::new(InMemoryIssueRepository::new()),
            Arc::new(InMemoryReleaseRepository::new()),
            Arc::new(RecordingEventDispatcher::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            issue_id: None,
            last_command: None,
            backport: None,
            last_report: None,
        }
    }

    /// Returns the issue under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no issue has been opened yet.
    pub fn issue_id(&self) -> Result<IssueId, eyre::Report> {
        self.issue_id
            .ok_or_else(|| eyre::eyre!("missing issue in scenario world"))
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
