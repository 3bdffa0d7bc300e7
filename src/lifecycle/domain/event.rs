//! Transition events appended to each issue's history.

use super::{CommitterId, FixVersion, IssueId, IssueStatus, Resolution, VersionLabel};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// What happened to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueEventKind {
    /// The issue entered the tracker.
    Opened {
        /// Summary at intake.
        summary: String,
        /// Parent issue when the issue is a backport task.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        backport_of: Option<IssueId>,
    },
    /// A committer took ownership.
    Assigned {
        /// New owner.
        assignee: CommitterId,
    },
    /// Triage completed.
    Triaged {
        /// Fix version when the issue was accepted.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        fix_version: Option<FixVersion>,
        /// Resolution when the issue was disposed of.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        resolution: Option<Resolution>,
    },
    /// Implementation began.
    WorkStarted {
        /// Fix version the work targets.
        fix_version: FixVersion,
    },
    /// Implementation finished.
    Resolved {
        /// Recorded resolution.
        resolution: Resolution,
    },
    /// A resolved issue returned to an open state.
    Reopened {
        /// Reopen count after this reopening.
        reopen_count: u32,
        /// State the issue reopened into.
        target: IssueStatus,
    },
    /// The issue shipped in a closed release.
    Closed {
        /// Release that closed the issue.
        release: VersionLabel,
    },
    /// A backport task was linked to the issue.
    BackportCreated {
        /// Identifier of the new backport task.
        backport_id: IssueId,
        /// Maintenance version of the backport.
        fix_version: VersionLabel,
    },
}

impl IssueEventKind {
    /// Returns the event type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Opened { .. } => "opened",
            Self::Assigned { .. } => "assigned",
            Self::Triaged { .. } => "triaged",
            Self::WorkStarted { .. } => "work_started",
            Self::Resolved { .. } => "resolved",
            Self::Reopened { .. } => "reopened",
            Self::Closed { .. } => "closed",
            Self::BackportCreated { .. } => "backport_created",
        }
    }
}

/// A timestamped event in an issue's append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    issue_id: IssueId,
    occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    kind: IssueEventKind,
}

impl IssueEvent {
    /// Creates an event stamped with the current clock time.
    #[must_use]
    pub fn new(issue_id: IssueId, kind: IssueEventKind, clock: &impl Clock) -> Self {
        Self {
            issue_id,
            occurred_at: clock.utc(),
            kind,
        }
    }

    /// Reconstructs an event from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        issue_id: IssueId,
        occurred_at: DateTime<Utc>,
        kind: IssueEventKind,
    ) -> Self {
        Self {
            issue_id,
            occurred_at,
            kind,
        }
    }

    /// Returns the issue the event belongs to.
    #[must_use]
    pub const fn issue_id(&self) -> IssueId {
        self.issue_id
    }

    /// Returns when the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns the event payload.
    #[must_use]
    pub const fn kind(&self) -> &IssueEventKind {
        &self.kind
    }

    /// Returns the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Rebuilds an issue's reopen count from its history.
    #[must_use]
    pub fn count_reopens(history: &[Self]) -> u32 {
        history
            .iter()
            .filter(|event| matches!(event.kind, IssueEventKind::Reopened { .. }))
            .fold(0_u32, |count, _| count.saturating_add(1))
    }
}
