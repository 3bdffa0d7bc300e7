//! Shared fixtures for lifecycle unit tests.

use std::sync::Arc;

use crate::lifecycle::{
    adapters::memory::{
        InMemoryIssueRepository, InMemoryReleaseRepository, RecordingEventDispatcher,
    },
    domain::IssueId,
    services::{CommandRequest, LifecycleConfig, LifecycleService},
};
use mockable::DefaultClock;

pub(super) type TestService = LifecycleService<
    InMemoryIssueRepository,
    InMemoryReleaseRepository,
    RecordingEventDispatcher,
    DefaultClock,
>;

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) dispatcher: RecordingEventDispatcher,
}

pub(super) fn harness(config: LifecycleConfig) -> Harness {
    let dispatcher = RecordingEventDispatcher::new();
    let service = LifecycleService::new(
        Arc::new(InMemoryIssueRepository::new()),
        Arc::new(InMemoryReleaseRepository::new()),
        Arc::new(dispatcher.clone()),
        Arc::new(DefaultClock),
    )
    .with_config(config);
    Harness {
        service,
        dispatcher,
    }
}

pub(super) fn assign(committer: &str) -> CommandRequest {
    CommandRequest::Assign {
        committer: committer.to_owned(),
    }
}

pub(super) fn triage_version(fix_version: &str) -> CommandRequest {
    CommandRequest::Triage {
        fix_version: Some(fix_version.to_owned()),
        resolution: None,
    }
}

pub(super) fn triage_disposal(resolution: &str) -> CommandRequest {
    CommandRequest::Triage {
        fix_version: None,
        resolution: Some(resolution.to_owned()),
    }
}

pub(super) const fn start_work() -> CommandRequest {
    CommandRequest::StartWork {
        accept_backlog: false,
    }
}

pub(super) fn resolve(resolution: &str) -> CommandRequest {
    CommandRequest::Resolve {
        resolution: resolution.to_owned(),
    }
}

/// Opens an issue and drives it through the given commands.
pub(super) async fn issue_after(
    service: &TestService,
    commands: Vec<CommandRequest>,
) -> eyre::Result<IssueId> {
    let issue = service.open_issue("Lifecycle fixture").await?;
    for command in commands {
        service.submit_command(issue.id(), command).await?;
    }
    Ok(issue.id())
}

/// Opens an issue and resolves it against `fix_version`.
pub(super) async fn resolved_issue(service: &TestService, fix_version: &str) -> eyre::Result<IssueId> {
    issue_after(
        service,
        vec![
            assign("alice"),
            triage_version(fix_version),
            start_work(),
            resolve("complete"),
        ],
    )
    .await
}
