//! Issue aggregate root and its state machine.

use super::{
    CommitterId, FixVersion, IssueCommand, IssueEvent, IssueEventKind, IssueId, IssueState,
    IssueStatus, IssueSummary, LifecycleDomainError, ReopenTarget, Resolution, TransitionContext,
    TriageDecision, VersionLabel,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Issue aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    summary: IssueSummary,
    state: IssueState,
    assignee: Option<CommitterId>,
    fix_version: Option<FixVersion>,
    backport_of: Option<IssueId>,
    backport_tasks: Vec<IssueId>,
    reopen_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted issue aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted issue identifier.
    pub id: IssueId,
    /// Persisted summary.
    pub summary: IssueSummary,
    /// Persisted lifecycle state.
    pub state: IssueState,
    /// Persisted assignee, if any.
    pub assignee: Option<CommitterId>,
    /// Persisted fix version, if any.
    pub fix_version: Option<FixVersion>,
    /// Persisted parent link for backport tasks.
    pub backport_of: Option<IssueId>,
    /// Persisted backport task links, in creation order.
    pub backport_tasks: Vec<IssueId>,
    /// Persisted reopen counter.
    pub reopen_count: u32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A backport task spawned by a transition, with its opening history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedBackport {
    /// The new backport issue.
    pub issue: Issue,
    /// Events that open the backport's own history.
    pub events: Vec<IssueEvent>,
}

/// Result of an applied transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State of the issue after the transition.
    pub status: IssueStatus,
    /// Events emitted by the transition, in order.
    pub events: Vec<IssueEvent>,
    /// Backport task created by the transition, if any.
    pub backport: Option<SpawnedBackport>,
}

/// Changes produced by a single guarded step before timestamps are applied.
type StepOutcome = (Vec<IssueEventKind>, Option<Issue>);

impl Issue {
    /// Opens a new unassigned issue and returns it with its intake event.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::EmptySummary`] when the summary is
    /// blank.
    pub fn open(
        summary: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(Self, IssueEvent), LifecycleDomainError> {
        let validated = IssueSummary::new(summary)?;
        let timestamp = clock.utc();
        let issue = Self {
            id: IssueId::new(),
            summary: validated,
            state: IssueState::Unassigned,
            assignee: None,
            fix_version: None,
            backport_of: None,
            backport_tasks: Vec::new(),
            reopen_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };
        let event = IssueEvent::new(issue.id, issue.opened_event_kind(), clock);
        Ok((issue, event))
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            summary: data.summary,
            state: data.state,
            assignee: data.assignee,
            fix_version: data.fix_version,
            backport_of: data.backport_of,
            backport_tasks: data.backport_tasks,
            reopen_count: data.reopen_count,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the issue summary.
    #[must_use]
    pub const fn summary(&self) -> &IssueSummary {
        &self.summary
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &IssueState {
        &self.state
    }

    /// Returns the field-less lifecycle status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.state.status()
    }

    /// Returns the resolution; `None` means unresolved.
    #[must_use]
    pub const fn resolution(&self) -> Option<Resolution> {
        self.state.resolution()
    }

    /// Returns the assigned committer, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&CommitterId> {
        self.assignee.as_ref()
    }

    /// Returns the fix version, if any.
    #[must_use]
    pub const fn fix_version(&self) -> Option<&FixVersion> {
        self.fix_version.as_ref()
    }

    /// Returns the parent issue when this issue is a backport task.
    #[must_use]
    pub const fn backport_of(&self) -> Option<IssueId> {
        self.backport_of
    }

    /// Returns linked backport tasks in creation order.
    #[must_use]
    pub fn backport_tasks(&self) -> &[IssueId] {
        &self.backport_tasks
    }

    /// Returns how many times the issue has been reopened.
    #[must_use]
    pub const fn reopen_count(&self) -> u32 {
        self.reopen_count
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the issue's concrete fix version is finalised by
    /// closing `release`.
    #[must_use]
    pub fn is_bound_to(&self, release: &VersionLabel) -> bool {
        self.fix_version
            .as_ref()
            .and_then(FixVersion::as_concrete)
            .is_some_and(|label| release.subsumes(label))
    }

    /// Applies a command to the issue.
    ///
    /// Every combination of state and command either yields a transition or
    /// a specific error; the issue is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::InvalidTransition`] when the command is
    /// not legal from the current state, [`LifecycleDomainError::ReleaseClosed`]
    /// when reopening against a closed release, and guard-specific errors for
    /// the remaining failures.
    pub fn apply(
        &mut self,
        command: IssueCommand,
        context: &TransitionContext<'_>,
        clock: &impl Clock,
    ) -> Result<Transition, LifecycleDomainError> {
        let (kinds, spawned) = match (self.status(), command) {
            (IssueStatus::Unassigned, IssueCommand::Assign { committer }) => {
                Ok(self.assign(committer))
            }
            (IssueStatus::WaitingForTriage, IssueCommand::Triage(decision)) => {
                Ok(self.triage(decision))
            }
            (IssueStatus::Triaged, IssueCommand::StartWork { accept_backlog }) => {
                self.start_work(accept_backlog, context)
            }
            (
                IssueStatus::Triaged,
                IssueCommand::CreateBackport {
                    maintenance_version,
                },
            ) => self.create_backport(maintenance_version, clock),
            (IssueStatus::InProgress, IssueCommand::Resolve { resolution }) => {
                Ok(self.resolve(resolution))
            }
            (IssueStatus::Resolved, IssueCommand::Reopen { target }) => {
                self.reopen(target, context)
            }
            (IssueStatus::Resolved, IssueCommand::CloseOnRelease { release }) => {
                self.close_on_release(release)
            }
            (IssueStatus::Closed, IssueCommand::Reopen { .. }) => Err(self.closed_release_error()),
            (state, rejected) => Err(LifecycleDomainError::InvalidTransition {
                issue_id: self.id,
                state,
                command: rejected.name(),
            }),
        }?;

        let events = kinds
            .into_iter()
            .map(|kind| IssueEvent::new(self.id, kind, clock))
            .collect();
        let backport = spawned.map(|issue| {
            let opened = IssueEvent::new(issue.id, issue.opened_event_kind(), clock);
            SpawnedBackport {
                issue,
                events: vec![opened],
            }
        });
        self.touch(clock);

        Ok(Transition {
            status: self.status(),
            events,
            backport,
        })
    }

    fn assign(&mut self, committer: CommitterId) -> StepOutcome {
        self.assignee = Some(committer.clone());
        self.state = IssueState::WaitingForTriage;
        (
            vec![IssueEventKind::Assigned {
                assignee: committer,
            }],
            None,
        )
    }

    fn triage(&mut self, decision: TriageDecision) -> StepOutcome {
        let kind = match decision {
            TriageDecision::Accept(version) => {
                self.fix_version = Some(version.clone());
                self.state = IssueState::Triaged;
                IssueEventKind::Triaged {
                    fix_version: Some(version),
                    resolution: None,
                }
            }
            TriageDecision::Dispose(resolution) => {
                self.state = IssueState::Resolved { resolution };
                IssueEventKind::Triaged {
                    fix_version: None,
                    resolution: Some(resolution),
                }
            }
        };
        (vec![kind], None)
    }

    fn start_work(
        &mut self,
        accept_backlog: bool,
        context: &TransitionContext<'_>,
    ) -> Result<StepOutcome, LifecycleDomainError> {
        let version = self
            .fix_version
            .clone()
            .ok_or(LifecycleDomainError::MissingFixVersion(self.id))?;

        match &version {
            FixVersion::Concrete(label) => {
                if let Some(closed) = context.closed_release_for(label) {
                    return Err(LifecycleDomainError::ReleaseClosed {
                        issue_id: self.id,
                        release: closed.label().to_string(),
                    });
                }
                if context.require_known_release() && !context.is_known(label) {
                    return Err(LifecycleDomainError::UnknownRelease(label.to_string()));
                }
            }
            FixVersion::Backlog(_) => {
                if !accept_backlog {
                    return Err(LifecycleDomainError::BacklogWorkNotAccepted(self.id));
                }
            }
        }

        self.state = IssueState::InProgress;
        Ok((
            vec![IssueEventKind::WorkStarted {
                fix_version: version,
            }],
            None,
        ))
    }

    fn resolve(&mut self, resolution: Resolution) -> StepOutcome {
        self.state = IssueState::Resolved { resolution };
        (vec![IssueEventKind::Resolved { resolution }], None)
    }

    fn reopen(
        &mut self,
        target: ReopenTarget,
        context: &TransitionContext<'_>,
    ) -> Result<StepOutcome, LifecycleDomainError> {
        if let Some(closed) = self
            .fix_version
            .as_ref()
            .and_then(FixVersion::as_concrete)
            .and_then(|label| context.closed_release_for(label))
        {
            return Err(LifecycleDomainError::ReleaseClosed {
                issue_id: self.id,
                release: closed.label().to_string(),
            });
        }
        if target != ReopenTarget::WaitingForTriage && self.fix_version.is_none() {
            return Err(LifecycleDomainError::MissingFixVersion(self.id));
        }

        self.reopen_count = self.reopen_count.saturating_add(1);
        self.state = match target {
            ReopenTarget::WaitingForTriage => IssueState::WaitingForTriage,
            ReopenTarget::Triaged => IssueState::Triaged,
            ReopenTarget::InProgress => IssueState::InProgress,
        };
        Ok((
            vec![IssueEventKind::Reopened {
                reopen_count: self.reopen_count,
                target: target.status(),
            }],
            None,
        ))
    }

    fn close_on_release(
        &mut self,
        release: VersionLabel,
    ) -> Result<StepOutcome, LifecycleDomainError> {
        if !self.is_bound_to(&release) {
            return Err(LifecycleDomainError::NotBoundToRelease {
                issue_id: self.id,
                release: release.to_string(),
            });
        }
        let resolution = self
            .resolution()
            .ok_or(LifecycleDomainError::InvalidTransition {
                issue_id: self.id,
                state: self.status(),
                command: "close_on_release",
            })?;

        self.state = IssueState::Closed {
            resolution,
            release: release.clone(),
        };
        Ok((vec![IssueEventKind::Closed { release }], None))
    }

    fn create_backport(
        &mut self,
        maintenance_version: VersionLabel,
        clock: &impl Clock,
    ) -> Result<StepOutcome, LifecycleDomainError> {
        if self.backport_of.is_some() {
            return Err(LifecycleDomainError::NestedBackport(self.id));
        }
        let parent_version = match &self.fix_version {
            Some(FixVersion::Concrete(label)) => label,
            Some(FixVersion::Backlog(_)) => {
                return Err(LifecycleDomainError::BacklogHasNoBackport(self.id));
            }
            None => return Err(LifecycleDomainError::MissingFixVersion(self.id)),
        };
        if !parent_version.same_line(&maintenance_version) {
            return Err(LifecycleDomainError::BackportLineMismatch {
                parent: parent_version.to_string(),
                backport: maintenance_version.to_string(),
            });
        }

        let timestamp = clock.utc();
        let backport = Self {
            id: IssueId::new(),
            summary: IssueSummary::new(format!("[{maintenance_version}] {}", self.summary))?,
            state: IssueState::Triaged,
            assignee: self.assignee.clone(),
            fix_version: Some(FixVersion::Concrete(maintenance_version.clone())),
            backport_of: Some(self.id),
            backport_tasks: Vec::new(),
            reopen_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.backport_tasks.push(backport.id);

        Ok((
            vec![IssueEventKind::BackportCreated {
                backport_id: backport.id,
                fix_version: maintenance_version,
            }],
            Some(backport),
        ))
    }

    fn closed_release_error(&self) -> LifecycleDomainError {
        let release = self
            .state
            .closed_by()
            .map(ToString::to_string)
            .unwrap_or_default();
        LifecycleDomainError::ReleaseClosed {
            issue_id: self.id,
            release,
        }
    }

    fn opened_event_kind(&self) -> IssueEventKind {
        IssueEventKind::Opened {
            summary: self.summary.as_str().to_owned(),
            backport_of: self.backport_of,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
