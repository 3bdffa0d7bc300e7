//! Port contracts for the issue lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by lifecycle
//! services.

pub mod dispatcher;
pub mod issue_repository;
pub mod release_repository;

pub use dispatcher::{DispatchError, DispatchResult, EventDispatcher};
pub use issue_repository::{IssueRepository, IssueRepositoryError, IssueRepositoryResult};
pub use release_repository::{
    ReleaseRepository, ReleaseRepositoryError, ReleaseRepositoryResult,
};
