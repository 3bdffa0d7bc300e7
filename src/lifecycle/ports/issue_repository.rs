//! Repository port for issue snapshots and their append-only event history.

use crate::lifecycle::domain::{Issue, IssueEvent, IssueId, IssueStatus, SpawnedBackport};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Issue persistence contract.
///
/// Snapshot writes and event appends for one call are committed together;
/// a caller that receives `Ok` may treat the transition as durable.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a new issue together with its opening events.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when the identifier
    /// already exists.
    async fn store(&self, issue: &Issue, events: &[IssueEvent]) -> IssueRepositoryResult<()>;

    /// Persists a transitioned issue and appends its events.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] when the issue does not
    /// exist.
    async fn update(&self, issue: &Issue, events: &[IssueEvent]) -> IssueRepositoryResult<()>;

    /// Persists a transitioned parent and inserts its spawned backport task.
    ///
    /// Both snapshots and both event batches are committed in one write;
    /// on error neither issue changes.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] when the parent does not
    /// exist and [`IssueRepositoryError::DuplicateIssue`] when the backport
    /// identifier is already taken.
    async fn update_with_backport(
        &self,
        issue: &Issue,
        events: &[IssueEvent],
        backport: &SpawnedBackport,
    ) -> IssueRepositoryResult<()>;

    /// Finds an issue by identifier.
    ///
    /// Returns `None` when the issue does not exist.
    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>>;

    /// Returns all issues currently in `status`.
    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns every stored issue.
    async fn list_all(&self) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns the issue's events in append order.
    ///
    /// Returns an empty history for unknown issues.
    async fn history(&self, id: IssueId) -> IssueRepositoryResult<Vec<IssueEvent>>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
