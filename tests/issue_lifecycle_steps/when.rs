//! When steps for issue lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use issue_lifecycle::lifecycle::{domain::ReopenTarget, services::CommandRequest};
use rstest_bdd_macros::when;

#[when(r#"the issue is assigned to "{committer}""#)]
fn assign_issue(world: &mut LifecycleWorld, committer: String) -> Result<(), eyre::Report> {
    submit(world, CommandRequest::Assign { committer })
}

#[when(r#"the issue is triaged with resolution "{resolution}""#)]
fn triage_with_resolution(
    world: &mut LifecycleWorld,
    resolution: String,
) -> Result<(), eyre::Report> {
    submit(
        world,
        CommandRequest::Triage {
            fix_version: None,
            resolution: Some(resolution),
        },
    )
}

#[when(r#"the issue is triaged with fix version "{fix_version}""#)]
fn triage_with_fix_version(
    world: &mut LifecycleWorld,
    fix_version: String,
) -> Result<(), eyre::Report> {
    submit(
        world,
        CommandRequest::Triage {
            fix_version: Some(fix_version),
            resolution: None,
        },
    )
}

#[when("work starts on the issue")]
fn start_work(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    submit(
        world,
        CommandRequest::StartWork {
            accept_backlog: false,
        },
    )
}

#[when(r#"the issue is resolved as "{resolution}""#)]
fn resolve_issue(world: &mut LifecycleWorld, resolution: String) -> Result<(), eyre::Report> {
    submit(world, CommandRequest::Resolve { resolution })
}

#[when("the issue is reopened")]
fn reopen_issue(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    submit(
        world,
        CommandRequest::Reopen {
            target: ReopenTarget::WaitingForTriage,
        },
    )
}

#[when(r#"a backport is created for "{maintenance_version}""#)]
fn create_backport(
    world: &mut LifecycleWorld,
    maintenance_version: String,
) -> Result<(), eyre::Report> {
    submit(
        world,
        CommandRequest::CreateBackport {
            maintenance_version,
        },
    )?;
    let backport = world
        .last_command
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .and_then(|outcome| outcome.backport.clone())
        .ok_or_else(|| eyre::eyre!("backport command did not produce a backport"))?;
    world.backport = Some(backport);
    Ok(())
}

#[when(r#"the release "{label}" is closed"#)]
fn close_release(world: &mut LifecycleWorld, label: String) -> Result<(), eyre::Report> {
    let report = run_async(world.service.close_release(&label)).wrap_err("close release")?;
    world.last_report = Some(report);
    Ok(())
}

/// Records the command result; rejections are asserted by `then` steps.
fn submit(world: &mut LifecycleWorld, request: CommandRequest) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let result = run_async(world.service.submit_command(issue_id, request));
    world.last_command = Some(result);
    Ok(())
}
