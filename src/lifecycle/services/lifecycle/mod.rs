//! Orchestration service for issue commands, queries, and release closure.

mod closing;
mod dispatch;

pub use closing::{CloseFailure, CloseReleaseReport};

use super::{CommandRequest, CommandRequestError, IssueLocks, LifecycleConfig};
use crate::lifecycle::{
    domain::{
        Issue, IssueCommand, IssueEvent, IssueId, IssueState, IssueStatus, LifecycleDomainError,
        ParseResolutionError, Release, TransitionContext, VersionLabel,
    },
    ports::{
        EventDispatcher, IssueRepository, IssueRepositoryError, ReleaseRepository,
        ReleaseRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum LifecycleServiceError {
    /// Domain validation or a transition guard failed.
    #[error(transparent)]
    Domain(#[from] LifecycleDomainError),

    /// A resolution code in the request is not recognised.
    #[error(transparent)]
    UnknownResolution(#[from] ParseResolutionError),

    /// The referenced issue does not exist.
    #[error("unknown issue: {0}")]
    UnknownIssue(IssueId),

    /// Issue persistence failed.
    #[error(transparent)]
    IssueRepository(#[from] IssueRepositoryError),

    /// Release persistence failed.
    #[error(transparent)]
    ReleaseRepository(#[from] ReleaseRepositoryError),
}

impl From<CommandRequestError> for LifecycleServiceError {
    fn from(err: CommandRequestError) -> Self {
        match err {
            CommandRequestError::Domain(domain) => Self::Domain(domain),
            CommandRequestError::UnknownResolution(parse) => Self::UnknownResolution(parse),
        }
    }
}

impl LifecycleServiceError {
    /// Returns the domain error, if this failure was a domain rejection.
    #[must_use]
    pub const fn as_domain(&self) -> Option<&LifecycleDomainError> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for lifecycle service operations.
pub type LifecycleResult<T> = Result<T, LifecycleServiceError>;

/// Result of a successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Issue the command was applied to.
    pub issue_id: IssueId,
    /// State after the transition.
    pub new_state: IssueState,
    /// Events committed with the transition.
    pub events: Vec<IssueEvent>,
    /// Backport task spawned by the command, if any.
    pub backport: Option<Issue>,
}

/// Issue lifecycle orchestration service.
///
/// Commands against one issue are serialised through a per-issue lock;
/// persistence happens before events are dispatched, and dispatch failures
/// never undo a committed transition.
pub struct LifecycleService<I, R, D, C>
where
    I: IssueRepository,
    R: ReleaseRepository,
    D: EventDispatcher,
    C: Clock + Send + Sync,
{
    issues: Arc<I>,
    releases: Arc<R>,
    dispatcher: Arc<D>,
    clock: Arc<C>,
    config: LifecycleConfig,
    locks: Arc<IssueLocks>,
}

impl<I, R, D, C> Clone for LifecycleService<I, R, D, C>
where
    I: IssueRepository,
    R: ReleaseRepository,
    D: EventDispatcher,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            issues: Arc::clone(&self.issues),
            releases: Arc::clone(&self.releases),
            dispatcher: Arc::clone(&self.dispatcher),
            clock: Arc::clone(&self.clock),
            config: self.config,
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<I, R, D, C> LifecycleService<I, R, D, C>
where
    I: IssueRepository,
    R: ReleaseRepository,
    D: EventDispatcher,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(issues: Arc<I>, releases: Arc<R>, dispatcher: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            issues,
            releases,
            dispatcher,
            clock,
            config: LifecycleConfig::default(),
            locks: Arc::new(IssueLocks::new()),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub const fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Opens a new issue in the unassigned state.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::Domain`] when the summary is blank and
    /// [`LifecycleServiceError::IssueRepository`] when persistence fails.
    pub async fn open_issue(&self, summary: impl Into<String> + Send) -> LifecycleResult<Issue> {
        let (issue, opened) = Issue::open(summary, &*self.clock)?;
        self.issues
            .store(&issue, std::slice::from_ref(&opened))
            .await?;
        info!(issue_id = %issue.id(), "issue opened");
        self.dispatch_all(std::slice::from_ref(&opened)).await;
        Ok(issue)
    }

    /// Validates and applies a command to an issue.
    ///
    /// The request is parsed before the issue is looked up, so malformed
    /// payloads never reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::UnknownIssue`] when the issue does not
    /// exist, [`LifecycleServiceError::Domain`] when validation or a guard
    /// fails, and repository errors when persistence fails.
    pub async fn submit_command(
        &self,
        issue_id: IssueId,
        request: CommandRequest,
    ) -> LifecycleResult<CommandOutcome> {
        let command = request.into_command()?;
        self.execute(issue_id, command).await
    }

    /// Returns a snapshot of an issue.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::UnknownIssue`] when the issue does not
    /// exist.
    pub async fn query_issue(&self, issue_id: IssueId) -> LifecycleResult<Issue> {
        self.load(issue_id).await
    }

    /// Returns the identifiers of all issues currently in `status`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::IssueRepository`] when the lookup
    /// fails.
    pub async fn query_by_state(&self, status: IssueStatus) -> LifecycleResult<Vec<IssueId>> {
        let issues = self.issues.find_by_status(status).await?;
        debug!(status = %status, count = issues.len(), "queried issues by state");
        Ok(issues.iter().map(Issue::id).collect())
    }

    /// Returns the full event history of an issue, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::UnknownIssue`] when the issue does not
    /// exist.
    pub async fn issue_history(&self, issue_id: IssueId) -> LifecycleResult<Vec<IssueEvent>> {
        self.load(issue_id).await?;
        Ok(self.issues.history(issue_id).await?)
    }

    /// Reconstructs the reopen count of an issue from its history.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::UnknownIssue`] when the issue does not
    /// exist.
    pub async fn audit_reopen_count(&self, issue_id: IssueId) -> LifecycleResult<u32> {
        let history = self.issue_history(issue_id).await?;
        Ok(IssueEvent::count_reopens(&history))
    }

    /// Registers an open release.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::Domain`] when the label is malformed
    /// and [`LifecycleServiceError::ReleaseRepository`] when the release is
    /// already registered.
    pub async fn register_release(&self, label: &str) -> LifecycleResult<Release> {
        let version = VersionLabel::parse(label)?;
        let release = Release::new(version, &*self.clock);
        self.releases.register(&release).await?;
        info!(release = %release.label(), "release registered");
        Ok(release)
    }

    /// Looks up a registered release.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleServiceError::Domain`] when the label is malformed.
    pub async fn find_release(&self, label: &str) -> LifecycleResult<Option<Release>> {
        let version = VersionLabel::parse(label)?;
        Ok(self.releases.find_by_label(&version).await?)
    }

    async fn execute(
        &self,
        issue_id: IssueId,
        command: IssueCommand,
    ) -> LifecycleResult<CommandOutcome> {
        let _guard = self.locks.acquire(issue_id).await;
        let mut issue = self.load(issue_id).await?;
        let releases = self.releases.list_all().await?;
        let context = TransitionContext::new(&releases, self.config.require_known_release);

        let from = issue.status();
        let command_name = command.name();
        let transition = issue
            .apply(command, &context, &*self.clock)
            .inspect_err(|err| {
                debug!(issue_id = %issue_id, command = command_name, error = %err, "command rejected");
            })?;

        match &transition.backport {
            Some(spawned) => {
                self.issues
                    .update_with_backport(&issue, &transition.events, spawned)
                    .await?;
            }
            None => self.issues.update(&issue, &transition.events).await?,
        }
        info!(
            issue_id = %issue_id,
            command = command_name,
            from = %from,
            to = %transition.status,
            "issue transitioned"
        );

        self.dispatch_all(&transition.events).await;
        if let Some(spawned) = &transition.backport {
            info!(
                issue_id = %spawned.issue.id(),
                backport_of = %issue_id,
                "backport task opened"
            );
            self.dispatch_all(&spawned.events).await;
        }

        Ok(CommandOutcome {
            issue_id,
            new_state: issue.state().clone(),
            events: transition.events,
            backport: transition.backport.map(|spawned| spawned.issue),
        })
    }

    async fn load(&self, issue_id: IssueId) -> LifecycleResult<Issue> {
        self.issues
            .find_by_id(issue_id)
            .await?
            .ok_or(LifecycleServiceError::UnknownIssue(issue_id))
    }
}
