//! Release-scoped batch closure.

use super::{LifecycleResult, LifecycleService, LifecycleServiceError};
use crate::lifecycle::{
    domain::{
        IssueCommand, IssueId, IssueStatus, LifecycleDomainError, Release, TransitionContext,
        VersionLabel,
    },
    ports::{EventDispatcher, IssueRepository, ReleaseRepository},
};
use mockable::Clock;
use tracing::{debug, info, warn};

/// An issue that could not be closed with its release.
#[derive(Debug, Clone)]
pub struct CloseFailure {
    /// Issue that was left unchanged.
    pub issue_id: IssueId,
    /// Reason the issue could not be closed.
    pub error: LifecycleServiceError,
}

/// Summary of a release closure.
#[derive(Debug, Clone)]
pub struct CloseReleaseReport {
    /// The release after closure.
    pub release: Release,
    /// Number of issues moved to the closed state by this call.
    pub closed_count: usize,
    /// Bound issues that could not be closed.
    pub failures: Vec<CloseFailure>,
}

impl CloseReleaseReport {
    /// Returns whether every bound issue was closed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the identifiers of the issues that failed to close.
    #[must_use]
    pub fn failed_issue_ids(&self) -> Vec<IssueId> {
        self.failures.iter().map(|failure| failure.issue_id).collect()
    }
}

impl<I, R, D, C> LifecycleService<I, R, D, C>
where
    I: IssueRepository,
    R: ReleaseRepository,
    D: EventDispatcher,
    C: Clock + Send + Sync,
{
    /// Closes a release and every issue it finalises.
    ///
    /// Resolved issues bound to the release are closed; bound issues that are
    /// still open are reported as failures and left untouched. Once every
    /// bound issue has been processed, the release and every registered
    /// release it subsumes are marked closed. Closing an already closed
    /// release reports nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::UnknownRelease`] when the label is not
    /// registered, [`LifecycleDomainError::InvalidVersion`] when it is
    /// malformed, and repository errors when the release catalogue cannot be
    /// read or updated. Failures on individual issues are reported in the
    /// returned [`CloseReleaseReport`].
    pub async fn close_release(&self, label: &str) -> LifecycleResult<CloseReleaseReport> {
        let version = VersionLabel::parse(label)?;
        let mut target = self
            .releases
            .find_by_label(&version)
            .await?
            .ok_or_else(|| LifecycleDomainError::UnknownRelease(version.to_string()))?;

        if target.is_closed() {
            debug!(release = %version, "release already closed");
            return Ok(CloseReleaseReport {
                release: target,
                closed_count: 0,
                failures: Vec::new(),
            });
        }

        let bound: Vec<IssueId> = self
            .issues
            .list_all()
            .await?
            .iter()
            .filter(|issue| issue.status() != IssueStatus::Closed && issue.is_bound_to(&version))
            .map(|issue| issue.id())
            .collect();

        let mut closed_count = 0_usize;
        let mut failures = Vec::new();
        for issue_id in bound {
            match self.close_bound_issue(issue_id, &version).await {
                Ok(true) => closed_count = closed_count.saturating_add(1),
                Ok(false) => {}
                Err(error) => {
                    warn!(
                        issue_id = %issue_id,
                        release = %version,
                        error = %error,
                        "issue could not be closed with release"
                    );
                    failures.push(CloseFailure { issue_id, error });
                }
            }
        }

        for mut registered in self.releases.list_all().await? {
            if !version.subsumes(registered.label()) {
                continue;
            }
            if registered.close(&*self.clock) {
                self.releases.update(&registered).await?;
                info!(release = %registered.label(), closed_by = %version, "release closed");
            }
            if registered.label() == &version {
                target = registered;
            }
        }

        info!(
            release = %version,
            closed_count,
            failed = failures.len(),
            "release closure finished"
        );
        Ok(CloseReleaseReport {
            release: target,
            closed_count,
            failures,
        })
    }

    /// Closes one bound issue under its lock. Returns `false` when the issue
    /// was closed concurrently.
    async fn close_bound_issue(
        &self,
        issue_id: IssueId,
        release: &VersionLabel,
    ) -> LifecycleResult<bool> {
        let _guard = self.locks.acquire(issue_id).await;
        let mut issue = self.load(issue_id).await?;
        if issue.status() == IssueStatus::Closed {
            return Ok(false);
        }

        let transition = issue.apply(
            IssueCommand::CloseOnRelease {
                release: release.clone(),
            },
            &TransitionContext::detached(),
            &*self.clock,
        )?;
        self.issues.update(&issue, &transition.events).await?;
        info!(
            issue_id = %issue_id,
            release = %release,
            from = %IssueStatus::Resolved,
            to = %transition.status,
            "issue closed on release"
        );
        self.dispatch_all(&transition.events).await;
        Ok(true)
    }
}
