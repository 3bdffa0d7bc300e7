//! Wire-level command payloads accepted by the lifecycle service.

use crate::lifecycle::domain::{
    CommitterId, FixVersion, IssueCommand, LifecycleDomainError, ParseResolutionError,
    ReopenTarget, Resolution, TriageDecision, VersionLabel,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unvalidated command as submitted by an external actor.
///
/// Closing on release is deliberately absent: issues are only closed through
/// the release-scoped batch operation.
///
/// # Examples
///
/// ```
/// use issue_lifecycle::lifecycle::services::CommandRequest;
///
/// let request: CommandRequest =
///     serde_json::from_str(r#"{"command":"assign","committer":"alice"}"#).unwrap();
/// assert_eq!(request.name(), "assign");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandRequest {
    /// Assign the issue to a committer.
    Assign {
        /// Committer identifier.
        committer: String,
    },
    /// Triage the issue with a fix version or a resolution.
    Triage {
        /// Fix version label, concrete or backlog.
        #[serde(default)]
        fix_version: Option<String>,
        /// Resolution code for immediate disposal.
        #[serde(default)]
        resolution: Option<String>,
    },
    /// Start implementation.
    StartWork {
        /// Explicit acceptance of backlog work.
        #[serde(default)]
        accept_backlog: bool,
    },
    /// Resolve implementation work.
    Resolve {
        /// Resolution code.
        resolution: String,
    },
    /// Reopen a resolved issue.
    Reopen {
        /// State to reopen into.
        #[serde(default)]
        target: ReopenTarget,
    },
    /// Create a backport task.
    CreateBackport {
        /// Maintenance version label.
        maintenance_version: String,
    },
}

/// Errors raised while validating a [`CommandRequest`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandRequestError {
    /// A field failed domain validation.
    #[error(transparent)]
    Domain(#[from] LifecycleDomainError),
    /// The resolution code is not recognised.
    #[error(transparent)]
    UnknownResolution(#[from] ParseResolutionError),
}

impl CommandRequest {
    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::Triage { .. } => "triage",
            Self::StartWork { .. } => "start_work",
            Self::Resolve { .. } => "resolve",
            Self::Reopen { .. } => "reopen",
            Self::CreateBackport { .. } => "create_backport",
        }
    }

    /// Validates the payload into a domain command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRequestError`] when a field is blank, a version label
    /// is malformed, a resolution code is unknown, or triage input is
    /// ambiguous.
    pub fn into_command(self) -> Result<IssueCommand, CommandRequestError> {
        let command = match self {
            Self::Assign { committer } => IssueCommand::Assign {
                committer: CommitterId::new(committer)?,
            },
            Self::Triage {
                fix_version,
                resolution,
            } => {
                let version = fix_version
                    .as_deref()
                    .map(FixVersion::parse)
                    .transpose()?;
                let disposal = resolution
                    .as_deref()
                    .map(Resolution::try_from)
                    .transpose()?;
                IssueCommand::Triage(TriageDecision::from_parts(version, disposal)?)
            }
            Self::StartWork { accept_backlog } => IssueCommand::StartWork { accept_backlog },
            Self::Resolve { resolution } => IssueCommand::Resolve {
                resolution: Resolution::try_from(resolution.as_str())?,
            },
            Self::Reopen { target } => IssueCommand::Reopen { target },
            Self::CreateBackport {
                maintenance_version,
            } => IssueCommand::CreateBackport {
                maintenance_version: VersionLabel::parse(&maintenance_version)?,
            },
        };
        Ok(command)
    }

    /// Parses a request from a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::UnknownCommand`] when the payload does
    /// not describe a supported command.
    pub fn from_json(payload: &str) -> Result<Self, LifecycleDomainError> {
        serde_json::from_str(payload)
            .map_err(|err| LifecycleDomainError::UnknownCommand(err.to_string()))
    }
}

impl TryFrom<CommandRequest> for IssueCommand {
    type Error = CommandRequestError;

    fn try_from(request: CommandRequest) -> Result<Self, Self::Error> {
        request.into_command()
    }
}
