//! Domain model for the issue lifecycle.
//!
//! Issues move through triage, implementation, resolution, and
//! release-bound closure. All guards live here; infrastructure concerns stay
//! outside the domain boundary.

mod command;
mod error;
mod event;
mod ids;
mod issue;
mod release;
mod state;
mod version;

pub use command::{IssueCommand, ReopenTarget, TransitionContext, TriageDecision};
pub use error::{LifecycleDomainError, ParseIssueStatusError, ParseResolutionError};
pub use event::{IssueEvent, IssueEventKind};
pub use ids::{CommitterId, IssueId, IssueSummary};
pub use issue::{Issue, PersistedIssueData, SpawnedBackport, Transition};
pub use release::{PersistedReleaseData, Release};
pub use state::{IssueState, IssueStatus, Resolution};
pub use version::{FixVersion, ReleaseType, VersionLabel};
