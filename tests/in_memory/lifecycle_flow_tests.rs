//! In-memory integration tests for command sequences.

use super::helpers::{TestService, command, drive, resolved, service};
use issue_lifecycle::lifecycle::{
    domain::{FixVersion, IssueState, IssueStatus, LifecycleDomainError, Resolution},
    services::LifecycleServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_travels_from_intake_to_resolution(service: TestService) -> eyre::Result<()> {
    service.register_release("3.2 RC1").await?;

    let issue_id = resolved(&service, "3.2 RC1").await?;

    let issue = service.query_issue(issue_id).await?;
    eyre::ensure!(
        issue.state()
            == &IssueState::Resolved {
                resolution: Resolution::Complete
            }
    );
    eyre::ensure!(issue.fix_version().map(FixVersion::as_str) == Some("3.2 RC1"));
    eyre::ensure!(service.query_by_state(IssueStatus::Resolved).await? == [issue_id]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_config_requires_registered_release(service: TestService) -> eyre::Result<()> {
    let issue_id = drive(
        &service,
        "Unscheduled work",
        &[
            r#"{"command":"assign","committer":"alice"}"#,
            r#"{"command":"triage","fix_version":"5.0 M1"}"#,
        ],
    )
    .await?;

    let result = service
        .submit_command(issue_id, command(r#"{"command":"start_work"}"#)?)
        .await;

    eyre::ensure!(matches!(
        result,
        Err(LifecycleServiceError::Domain(
            LifecycleDomainError::UnknownRelease(_)
        ))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_work_is_accepted_explicitly(service: TestService) -> eyre::Result<()> {
    let issue_id = drive(
        &service,
        "Someday",
        &[
            r#"{"command":"assign","committer":"alice"}"#,
            r#"{"command":"triage","fix_version":"General Backlog"}"#,
        ],
    )
    .await?;

    let refused = service
        .submit_command(issue_id, command(r#"{"command":"start_work"}"#)?)
        .await;
    eyre::ensure!(matches!(
        refused,
        Err(LifecycleServiceError::Domain(
            LifecycleDomainError::BacklogWorkNotAccepted(_)
        ))
    ));

    let accepted = service
        .submit_command(
            issue_id,
            command(r#"{"command":"start_work","accept_backlog":true}"#)?,
        )
        .await?;
    eyre::ensure!(accepted.new_state == IssueState::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ambiguous_triage_is_rejected(service: TestService) -> eyre::Result<()> {
    let issue_id = drive(
        &service,
        "Ambiguous",
        &[r#"{"command":"assign","committer":"alice"}"#],
    )
    .await?;

    let result = service
        .submit_command(
            issue_id,
            command(r#"{"command":"triage","fix_version":"3.2.0","resolution":"invalid"}"#)?,
        )
        .await;

    eyre::ensure!(matches!(
        result,
        Err(LifecycleServiceError::Domain(
            LifecycleDomainError::AmbiguousTriageInput
        ))
    ));
    eyre::ensure!(service.query_issue(issue_id).await?.status() == IssueStatus::WaitingForTriage);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_issue_returns_to_triage(service: TestService) -> eyre::Result<()> {
    service.register_release("3.2.0").await?;
    let issue_id = resolved(&service, "3.2.0").await?;

    let outcome = service
        .submit_command(issue_id, command(r#"{"command":"reopen"}"#)?)
        .await?;

    eyre::ensure!(outcome.new_state == IssueState::WaitingForTriage);
    let issue = service.query_issue(issue_id).await?;
    eyre::ensure!(issue.resolution().is_none());
    eyre::ensure!(issue.reopen_count() == 1);
    eyre::ensure!(service.audit_reopen_count(issue_id).await? == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backport_tasks_follow_their_own_lifecycle(service: TestService) -> eyre::Result<()> {
    service.register_release("3.1.0.RELEASE").await?;
    service.register_release("3.1.2").await?;
    let parent_id = drive(
        &service,
        "Race in scheduler",
        &[
            r#"{"command":"assign","committer":"alice"}"#,
            r#"{"command":"triage","fix_version":"3.1.0.RELEASE"}"#,
        ],
    )
    .await?;

    let outcome = service
        .submit_command(
            parent_id,
            command(r#"{"command":"create_backport","maintenance_version":"3.1.2"}"#)?,
        )
        .await?;
    let backport = outcome
        .backport
        .ok_or_else(|| eyre::eyre!("backport should be created"))?;

    service
        .submit_command(backport.id(), command(r#"{"command":"start_work"}"#)?)
        .await?;
    let resolved_backport = service
        .submit_command(
            backport.id(),
            command(r#"{"command":"resolve","resolution":"complete"}"#)?,
        )
        .await?;

    eyre::ensure!(
        resolved_backport.new_state
            == IssueState::Resolved {
                resolution: Resolution::Complete
            }
    );
    eyre::ensure!(service.query_issue(parent_id).await?.status() == IssueStatus::Triaged);
    Ok(())
}
