//! Error types for issue lifecycle validation and parsing.

use super::{IssueId, IssueStatus};
use thiserror::Error;

/// Errors returned by lifecycle transitions and domain value construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleDomainError {
    /// The command is not legal from the issue's current state.
    #[error("issue {issue_id} cannot accept '{command}' while {state}")]
    InvalidTransition {
        /// Issue the command targeted.
        issue_id: IssueId,
        /// State the issue was in when the command arrived.
        state: IssueStatus,
        /// Name of the rejected command.
        command: &'static str,
    },

    /// Triage requires exactly one of a fix version or a resolution.
    #[error("triage requires exactly one of fix version or resolution")]
    AmbiguousTriageInput,

    /// The issue is bound to a release that has already been closed.
    #[error("issue {issue_id} is bound to closed release {release}")]
    ReleaseClosed {
        /// Issue that was asked to reopen.
        issue_id: IssueId,
        /// Label of the closed release.
        release: String,
    },

    /// The issue's fix version is not finalised by the given release.
    #[error("issue {issue_id} is not bound to release {release}")]
    NotBoundToRelease {
        /// Issue that was asked to close.
        issue_id: IssueId,
        /// Label of the release being closed.
        release: String,
    },

    /// Backports can only be created from a concrete fix version.
    #[error("issue {0} has a backlog fix version and cannot be backported")]
    BacklogHasNoBackport(IssueId),

    /// The referenced release is not registered.
    #[error("unknown release: {0}")]
    UnknownRelease(String),

    /// The committer identifier is empty after trimming.
    #[error("committer identifier must not be empty")]
    EmptyCommitter,

    /// The issue summary is empty after trimming.
    #[error("issue summary must not be empty")]
    EmptySummary,

    /// The version label does not follow the project's version scheme.
    #[error("invalid version label '{0}', expected <generation>.<major>[.<maintenance>][.<type>]")]
    InvalidVersion(String),

    /// Work on a backlog fix version requires explicit acceptance.
    #[error("issue {0} targets a backlog label; starting work requires explicit acceptance")]
    BacklogWorkNotAccepted(IssueId),

    /// The requested transition needs a fix version the issue does not carry.
    #[error("issue {0} has no fix version")]
    MissingFixVersion(IssueId),

    /// Backport tasks cannot spawn further backports.
    #[error("issue {0} is already a backport task")]
    NestedBackport(IssueId),

    /// A backport must stay on its parent's generation and major line.
    #[error("backport version {backport} is not on the {parent} line")]
    BackportLineMismatch {
        /// Parent fix version.
        parent: String,
        /// Requested backport version.
        backport: String,
    },

    /// The command name is not recognised.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Error returned while parsing issue states from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue state: {0}")]
pub struct ParseIssueStatusError(pub String);

/// Error returned while parsing resolution codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown resolution: {0}")]
pub struct ParseResolutionError(pub String);
