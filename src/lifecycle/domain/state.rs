//! Lifecycle states and resolution codes.

use super::{ParseIssueStatusError, ParseResolutionError, VersionLabel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution code recorded when an issue is resolved.
///
/// An issue without a resolution is reported as `Unresolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The requested change was implemented.
    Complete,
    /// The issue duplicates another issue.
    Duplicate,
    /// The reported behaviour could not be reproduced.
    CannotReproduce,
    /// The team decided not to address the issue.
    WontFix,
    /// The issue is not a valid report.
    Invalid,
}

impl Resolution {
    /// Label used for issues that carry no resolution.
    pub const UNRESOLVED: &'static str = "unresolved";

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Duplicate => "duplicate",
            Self::CannotReproduce => "cannot_reproduce",
            Self::WontFix => "wont_fix",
            Self::Invalid => "invalid",
        }
    }

    /// Returns the display label for an optional resolution.
    #[must_use]
    pub const fn label(resolution: Option<Self>) -> &'static str {
        match resolution {
            Some(value) => value.as_str(),
            None => Self::UNRESOLVED,
        }
    }
}

impl TryFrom<&str> for Resolution {
    type Error = ParseResolutionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' '], "_")
            .replace('\'', "");
        match normalized.as_str() {
            "complete" | "fixed" => Ok(Self::Complete),
            "duplicate" => Ok(Self::Duplicate),
            "cannot_reproduce" => Ok(Self::CannotReproduce),
            "wont_fix" => Ok(Self::WontFix),
            "invalid" => Ok(Self::Invalid),
            _ => Err(ParseResolutionError(value.to_owned())),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-less lifecycle state used for queries, persistence, and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Newly reported, nobody owns it yet.
    Unassigned,
    /// Owned by a committer and awaiting triage.
    WaitingForTriage,
    /// Accepted with a fix version.
    Triaged,
    /// Being implemented.
    InProgress,
    /// Resolved but not yet shipped.
    Resolved,
    /// Shipped in a closed release; permanent.
    Closed,
}

impl IssueStatus {
    /// All states in order of normal progression.
    pub const ALL: [Self; 6] = [
        Self::Unassigned,
        Self::WaitingForTriage,
        Self::Triaged,
        Self::InProgress,
        Self::Resolved,
        Self::Closed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::WaitingForTriage => "waiting_for_triage",
            Self::Triaged => "triaged",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Returns whether the issue still needs work or a decision.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Resolved | Self::Closed)
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = ParseIssueStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "unassigned" => Ok(Self::Unassigned),
            "waiting_for_triage" => Ok(Self::WaitingForTriage),
            "triaged" => Ok(Self::Triaged),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseIssueStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state with the data each state owns.
///
/// Only the resolved and closed variants carry a resolution, so an issue
/// cannot hold a resolution while open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IssueState {
    /// See [`IssueStatus::Unassigned`].
    Unassigned,
    /// See [`IssueStatus::WaitingForTriage`].
    WaitingForTriage,
    /// See [`IssueStatus::Triaged`].
    Triaged,
    /// See [`IssueStatus::InProgress`].
    InProgress,
    /// See [`IssueStatus::Resolved`].
    Resolved {
        /// Recorded resolution.
        resolution: Resolution,
    },
    /// See [`IssueStatus::Closed`].
    Closed {
        /// Resolution carried over from the resolved state.
        resolution: Resolution,
        /// Release whose closure closed the issue.
        release: VersionLabel,
    },
}

impl IssueState {
    /// Returns the field-less status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        match self {
            Self::Unassigned => IssueStatus::Unassigned,
            Self::WaitingForTriage => IssueStatus::WaitingForTriage,
            Self::Triaged => IssueStatus::Triaged,
            Self::InProgress => IssueStatus::InProgress,
            Self::Resolved { .. } => IssueStatus::Resolved,
            Self::Closed { .. } => IssueStatus::Closed,
        }
    }

    /// Returns the resolution, present only when resolved or closed.
    #[must_use]
    pub const fn resolution(&self) -> Option<Resolution> {
        match self {
            Self::Resolved { resolution } | Self::Closed { resolution, .. } => Some(*resolution),
            _ => None,
        }
    }

    /// Returns the release that closed the issue.
    #[must_use]
    pub const fn closed_by(&self) -> Option<&VersionLabel> {
        match self {
            Self::Closed { release, .. } => Some(release),
            _ => None,
        }
    }

    /// Rebuilds a state from its flattened storage columns.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIssueStatusError`] when the columns are inconsistent,
    /// for example an open status with a resolution.
    pub fn from_parts(
        status: IssueStatus,
        resolution: Option<Resolution>,
        closed_by: Option<VersionLabel>,
    ) -> Result<Self, ParseIssueStatusError> {
        let inconsistent = || {
            ParseIssueStatusError(format!(
                "{status} with resolution {}",
                Resolution::label(resolution)
            ))
        };
        match (status, resolution, closed_by) {
            (IssueStatus::Unassigned, None, None) => Ok(Self::Unassigned),
            (IssueStatus::WaitingForTriage, None, None) => Ok(Self::WaitingForTriage),
            (IssueStatus::Triaged, None, None) => Ok(Self::Triaged),
            (IssueStatus::InProgress, None, None) => Ok(Self::InProgress),
            (IssueStatus::Resolved, Some(value), None) => Ok(Self::Resolved { resolution: value }),
            (IssueStatus::Closed, Some(value), Some(release)) => Ok(Self::Closed {
                resolution: value,
                release,
            }),
            _ => Err(inconsistent()),
        }
    }
}
