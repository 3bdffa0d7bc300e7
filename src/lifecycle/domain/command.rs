//! Commands accepted by the issue state machine and the guard context they
//! are evaluated against.

use super::{
    CommitterId, FixVersion, IssueStatus, LifecycleDomainError, Release, Resolution, VersionLabel,
};
use serde::{Deserialize, Serialize};

/// Outcome of triage: either a fix version or an immediate disposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageDecision {
    /// Accept the issue for the given fix version.
    Accept(FixVersion),
    /// Resolve the issue without implementation work.
    Dispose(Resolution),
}

impl TriageDecision {
    /// Builds a decision from optional triage inputs.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::AmbiguousTriageInput`] unless exactly
    /// one input is supplied.
    pub fn from_parts(
        fix_version: Option<FixVersion>,
        resolution: Option<Resolution>,
    ) -> Result<Self, LifecycleDomainError> {
        match (fix_version, resolution) {
            (Some(version), None) => Ok(Self::Accept(version)),
            (None, Some(value)) => Ok(Self::Dispose(value)),
            _ => Err(LifecycleDomainError::AmbiguousTriageInput),
        }
    }
}

/// Open state an issue returns to when reopened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReopenTarget {
    /// Back to the triage queue.
    #[default]
    WaitingForTriage,
    /// Back to accepted work, keeping the fix version.
    Triaged,
    /// Straight back into implementation.
    InProgress,
}

impl ReopenTarget {
    /// Returns the status the issue lands in.
    #[must_use]
    pub const fn status(self) -> IssueStatus {
        match self {
            Self::WaitingForTriage => IssueStatus::WaitingForTriage,
            Self::Triaged => IssueStatus::Triaged,
            Self::InProgress => IssueStatus::InProgress,
        }
    }
}

/// A validated lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueCommand {
    /// Assign an unassigned issue to a committer.
    Assign {
        /// Committer taking ownership.
        committer: CommitterId,
    },
    /// Triage an assigned issue.
    Triage(TriageDecision),
    /// Begin implementation.
    StartWork {
        /// Whether the committer explicitly accepts backlog work.
        accept_backlog: bool,
    },
    /// Resolve implemented work.
    Resolve {
        /// Resolution to record.
        resolution: Resolution,
    },
    /// Return a resolved issue to an open state.
    Reopen {
        /// State to reopen into.
        target: ReopenTarget,
    },
    /// Close a resolved issue as part of a release closure.
    CloseOnRelease {
        /// Release being finalised.
        release: VersionLabel,
    },
    /// Spawn a backport task for a maintenance version.
    CreateBackport {
        /// Maintenance version the fix is backported to.
        maintenance_version: VersionLabel,
    },
}

impl IssueCommand {
    /// Returns the command name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::Triage(_) => "triage",
            Self::StartWork { .. } => "start_work",
            Self::Resolve { .. } => "resolve",
            Self::Reopen { .. } => "reopen",
            Self::CloseOnRelease { .. } => "close_on_release",
            Self::CreateBackport { .. } => "create_backport",
        }
    }
}

/// Release catalogue view consulted by transition guards.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    releases: &'a [Release],
    require_known_release: bool,
}

impl<'a> TransitionContext<'a> {
    /// Creates a context over the given releases.
    #[must_use]
    pub const fn new(releases: &'a [Release], require_known_release: bool) -> Self {
        Self {
            releases,
            require_known_release,
        }
    }

    /// Creates a context with no known releases and no catalogue
    /// requirement.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            releases: &[],
            require_known_release: false,
        }
    }

    /// Returns whether concrete fix versions must name a registered release.
    #[must_use]
    pub const fn require_known_release(&self) -> bool {
        self.require_known_release
    }

    /// Returns whether a release with this label is registered.
    #[must_use]
    pub fn is_known(&self, label: &VersionLabel) -> bool {
        self.releases.iter().any(|release| release.label() == label)
    }

    /// Returns the closed release binding `label`, if any.
    #[must_use]
    pub fn closed_release_for(&self, label: &VersionLabel) -> Option<&'a Release> {
        self.releases
            .iter()
            .find(|release| release.is_closed() && release.label().subsumes(label))
    }
}
