//! In-memory release catalogue.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::lifecycle::{
    domain::{Release, VersionLabel},
    ports::{ReleaseRepository, ReleaseRepositoryError, ReleaseRepositoryResult},
};

/// Thread-safe in-memory release repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReleaseRepository {
    releases: Arc<RwLock<HashMap<VersionLabel, Release>>>,
}

impl InMemoryReleaseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> ReleaseRepositoryError {
    ReleaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReleaseRepository for InMemoryReleaseRepository {
    async fn register(&self, release: &Release) -> ReleaseRepositoryResult<()> {
        let mut releases = self.releases.write().map_err(poisoned)?;
        if releases.contains_key(release.label()) {
            return Err(ReleaseRepositoryError::DuplicateRelease(
                release.label().to_string(),
            ));
        }
        releases.insert(release.label().clone(), release.clone());
        Ok(())
    }

    async fn update(&self, release: &Release) -> ReleaseRepositoryResult<()> {
        let mut releases = self.releases.write().map_err(poisoned)?;
        let stored = releases
            .get_mut(release.label())
            .ok_or_else(|| ReleaseRepositoryError::NotFound(release.label().to_string()))?;
        *stored = release.clone();
        Ok(())
    }

    async fn find_by_label(&self, label: &VersionLabel) -> ReleaseRepositoryResult<Option<Release>> {
        let releases = self.releases.read().map_err(poisoned)?;
        Ok(releases.get(label).cloned())
    }

    async fn list_all(&self) -> ReleaseRepositoryResult<Vec<Release>> {
        let releases = self.releases.read().map_err(poisoned)?;
        let mut all: Vec<Release> = releases.values().cloned().collect();
        all.sort_by_key(Release::registered_at);
        Ok(all)
    }
}
