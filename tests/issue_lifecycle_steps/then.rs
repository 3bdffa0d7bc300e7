//! Then steps for issue lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use issue_lifecycle::lifecycle::{
    domain::{FixVersion, IssueStatus, LifecycleDomainError, Resolution},
    services::LifecycleServiceError,
};
use rstest_bdd_macros::then;

fn parse_status(raw: &str) -> Result<IssueStatus, eyre::Report> {
    IssueStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))
}

#[then(r#"the issue state is "{state}""#)]
fn issue_state_is(world: &LifecycleWorld, state: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&state)?;
    let issue = run_async(world.service.query_issue(world.issue_id()?))?;

    if issue.status() != expected {
        return Err(eyre::eyre!(
            "expected state {expected}, found {}",
            issue.status()
        ));
    }
    Ok(())
}

#[then(r#"the issue assignee is "{committer}""#)]
fn issue_assignee_is(world: &LifecycleWorld, committer: String) -> Result<(), eyre::Report> {
    let issue = run_async(world.service.query_issue(world.issue_id()?))?;
    let assignee = issue.assignee().map(|value| value.as_str().to_owned());

    eyre::ensure!(
        assignee.as_deref() == Some(committer.as_str()),
        "expected assignee {committer}, found {assignee:?}"
    );
    Ok(())
}

#[then(r#"the issue resolution is "{resolution}""#)]
fn issue_resolution_is(world: &LifecycleWorld, resolution: String) -> Result<(), eyre::Report> {
    let expected = Resolution::try_from(resolution.as_str())?;
    let issue = run_async(world.service.query_issue(world.issue_id()?))?;

    eyre::ensure!(
        issue.resolution() == Some(expected),
        "expected resolution {expected}, found {}",
        Resolution::label(issue.resolution())
    );
    Ok(())
}

#[then(r#"the release "{label}" is marked closed"#)]
fn release_is_marked_closed(world: &LifecycleWorld, label: String) -> Result<(), eyre::Report> {
    let release = run_async(world.service.find_release(&label))?
        .ok_or_else(|| eyre::eyre!("release {label} is not registered"))?;

    eyre::ensure!(release.is_closed(), "release {label} is still open");
    Ok(())
}

#[then("the closure reports a closed count of {count:usize}")]
fn closure_count_is(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing closure report"))?;

    eyre::ensure!(
        report.closed_count == count,
        "expected {count} closed issues, found {}",
        report.closed_count
    );
    eyre::ensure!(report.is_clean(), "unexpected failures: {:?}", report.failures);
    Ok(())
}

#[then("the command fails with a release closed error")]
fn command_fails_with_release_closed(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_command
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing command result"))?;

    if !matches!(
        result,
        Err(LifecycleServiceError::Domain(
            LifecycleDomainError::ReleaseClosed { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected ReleaseClosed error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the backport state is "{state}""#)]
fn backport_state_is(world: &LifecycleWorld, state: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&state)?;
    let backport = world
        .backport
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing backport"))?;
    let stored = run_async(world.service.query_issue(backport.id()))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected backport state {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the backport fix version is "{fix_version}""#)]
fn backport_fix_version_is(
    world: &LifecycleWorld,
    fix_version: String,
) -> Result<(), eyre::Report> {
    let backport = world
        .backport
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing backport"))?;
    let expected = FixVersion::parse(&fix_version)?;

    eyre::ensure!(
        backport.fix_version() == Some(&expected),
        "expected fix version {fix_version}, found {:?}",
        backport.fix_version()
    );
    Ok(())
}

#[then("the backport is linked to the issue")]
fn backport_is_linked(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let parent_id = world.issue_id()?;
    let backport = world
        .backport
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing backport"))?;
    let parent = run_async(world.service.query_issue(parent_id))?;

    eyre::ensure!(backport.backport_of() == Some(parent_id));
    eyre::ensure!(parent.backport_tasks() == [backport.id()]);
    Ok(())
}
