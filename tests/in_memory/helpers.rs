//! Shared test helpers for in-memory lifecycle integration tests.

use std::sync::Arc;

use issue_lifecycle::lifecycle::{
    adapters::memory::{
        InMemoryIssueRepository, InMemoryReleaseRepository, RecordingEventDispatcher,
    },
    domain::IssueId,
    services::{CommandRequest, LifecycleConfig, LifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type wired to in-memory adapters.
pub type TestService = LifecycleService<
    InMemoryIssueRepository,
    InMemoryReleaseRepository,
    RecordingEventDispatcher,
    DefaultClock,
>;

/// Provides a service with the default configuration.
#[fixture]
pub fn service() -> TestService {
    LifecycleService::new(
        Arc::new(InMemoryIssueRepository::new()),
        Arc::new(InMemoryReleaseRepository::new()),
        Arc::new(RecordingEventDispatcher::new()),
        Arc::new(DefaultClock),
    )
    .with_config(LifecycleConfig::default())
}

/// Parses a JSON command payload.
///
/// # Errors
///
/// Returns an error when the payload does not describe a command.
pub fn command(payload: &str) -> eyre::Result<CommandRequest> {
    Ok(CommandRequest::from_json(payload)?)
}

/// Opens an issue and applies each JSON payload in order.
///
/// # Errors
///
/// Returns an error if intake or any command fails.
pub async fn drive(service: &TestService, summary: &str, payloads: &[&str]) -> eyre::Result<IssueId> {
    let issue = service.open_issue(summary).await?;
    for payload in payloads {
        service.submit_command(issue.id(), command(payload)?).await?;
    }
    Ok(issue.id())
}

/// Payloads that take a fresh issue to resolved against `fix_version`.
#[must_use]
pub fn resolve_path(fix_version: &str) -> Vec<String> {
    vec![
        r#"{"command":"assign","committer":"alice"}"#.to_owned(),
        format!(r#"{{"command":"triage","fix_version":"{fix_version}"}}"#),
        r#"{"command":"start_work"}"#.to_owned(),
        r#"{"command":"resolve","resolution":"complete"}"#.to_owned(),
    ]
}

/// Opens an issue and resolves it against `fix_version`.
///
/// # Errors
///
/// Returns an error if any step fails.
pub async fn resolved(service: &TestService, fix_version: &str) -> eyre::Result<IssueId> {
    let payloads = resolve_path(fix_version);
    let borrowed: Vec<&str> = payloads.iter().map(String::as_str).collect();
    drive(service, "Resolved fixture", &borrowed).await
}
