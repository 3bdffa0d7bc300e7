//! In-memory issue repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::lifecycle::{
    domain::{Issue, IssueEvent, IssueId, IssueStatus, SpawnedBackport},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};

/// Thread-safe in-memory issue repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    state: Arc<RwLock<InMemoryIssueState>>,
}

#[derive(Debug, Default)]
struct InMemoryIssueState {
    issues: HashMap<IssueId, Issue>,
    histories: HashMap<IssueId, Vec<IssueEvent>>,
}

impl InMemoryIssueRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> IssueRepositoryResult<RwLockReadGuard<'_, InMemoryIssueState>> {
        self.state.read().map_err(|err| {
            IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> IssueRepositoryResult<RwLockWriteGuard<'_, InMemoryIssueState>> {
        self.state.write().map_err(|err| {
            IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn append_events(state: &mut InMemoryIssueState, issue_id: IssueId, events: &[IssueEvent]) {
    state
        .histories
        .entry(issue_id)
        .or_default()
        .extend(events.iter().cloned());
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn store(&self, issue: &Issue, events: &[IssueEvent]) -> IssueRepositoryResult<()> {
        let mut state = self.write()?;
        if state.issues.contains_key(&issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id()));
        }
        append_events(&mut state, issue.id(), events);
        state.issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn update(&self, issue: &Issue, events: &[IssueEvent]) -> IssueRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .issues
            .get_mut(&issue.id())
            .ok_or(IssueRepositoryError::NotFound(issue.id()))?;
        *stored = issue.clone();
        append_events(&mut state, issue.id(), events);
        Ok(())
    }

    async fn update_with_backport(
        &self,
        issue: &Issue,
        events: &[IssueEvent],
        backport: &SpawnedBackport,
    ) -> IssueRepositoryResult<()> {
        let mut state = self.write()?;
        let backport_id = backport.issue.id();
        if state.issues.contains_key(&backport_id) {
            return Err(IssueRepositoryError::DuplicateIssue(backport_id));
        }
        let stored = state
            .issues
            .get_mut(&issue.id())
            .ok_or(IssueRepositoryError::NotFound(issue.id()))?;
        *stored = issue.clone();
        append_events(&mut state, issue.id(), events);
        append_events(&mut state, backport_id, &backport.events);
        state.issues.insert(backport_id, backport.issue.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        let state = self.read()?;
        Ok(state.issues.get(&id).cloned())
    }

    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>> {
        let state = self.read()?;
        let mut matching: Vec<Issue> = state
            .issues
            .values()
            .filter(|issue| issue.status() == status)
            .cloned()
            .collect();
        matching.sort_by_key(Issue::created_at);
        Ok(matching)
    }

    async fn list_all(&self) -> IssueRepositoryResult<Vec<Issue>> {
        let state = self.read()?;
        let mut issues: Vec<Issue> = state.issues.values().cloned().collect();
        issues.sort_by_key(Issue::created_at);
        Ok(issues)
    }

    async fn history(&self, id: IssueId) -> IssueRepositoryResult<Vec<IssueEvent>> {
        let state = self.read()?;
        Ok(state.histories.get(&id).cloned().unwrap_or_default())
    }
}
