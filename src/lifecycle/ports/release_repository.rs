//! Repository port for the release catalogue.

use crate::lifecycle::domain::{Release, VersionLabel};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for release repository operations.
pub type ReleaseRepositoryResult<T> = Result<T, ReleaseRepositoryError>;

/// Release persistence contract.
#[async_trait]
pub trait ReleaseRepository: Send + Sync {
    /// Registers a new release.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseRepositoryError::DuplicateRelease`] when a release
    /// with an equal label exists.
    async fn register(&self, release: &Release) -> ReleaseRepositoryResult<()>;

    /// Persists changes to an existing release.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseRepositoryError::NotFound`] when the release is not
    /// registered.
    async fn update(&self, release: &Release) -> ReleaseRepositoryResult<()>;

    /// Finds a release by label.
    ///
    /// Returns `None` when no release with an equal label is registered.
    async fn find_by_label(&self, label: &VersionLabel) -> ReleaseRepositoryResult<Option<Release>>;

    /// Returns every registered release.
    async fn list_all(&self) -> ReleaseRepositoryResult<Vec<Release>>;
}

/// Errors returned by release repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReleaseRepositoryError {
    /// A release with the same label is already registered.
    #[error("duplicate release: {0}")]
    DuplicateRelease(String),

    /// The release was not found.
    #[error("release not found: {0}")]
    NotFound(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReleaseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
