//! Given steps for issue lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use issue_lifecycle::lifecycle::services::CommandRequest;
use rstest_bdd_macros::given;

#[given(r#"a registered release "{label}""#)]
fn registered_release(world: &mut LifecycleWorld, label: String) -> Result<(), eyre::Report> {
    run_async(world.service.register_release(&label)).wrap_err("register release")?;
    Ok(())
}

#[given(r#"an open issue "{summary}""#)]
fn open_issue(world: &mut LifecycleWorld, summary: String) -> Result<(), eyre::Report> {
    let issue = run_async(world.service.open_issue(summary)).wrap_err("open issue")?;
    world.issue_id = Some(issue.id());
    Ok(())
}

#[given(r#"the issue has been assigned to "{committer}""#)]
fn issue_assigned(world: &mut LifecycleWorld, committer: String) -> Result<(), eyre::Report> {
    apply(world, CommandRequest::Assign { committer })
}

#[given(r#"the issue has been triaged with fix version "{fix_version}""#)]
fn issue_triaged(world: &mut LifecycleWorld, fix_version: String) -> Result<(), eyre::Report> {
    apply(
        world,
        CommandRequest::Triage {
            fix_version: Some(fix_version),
            resolution: None,
        },
    )
}

#[given(r#"the issue has been resolved against "{fix_version}""#)]
fn issue_resolved(world: &mut LifecycleWorld, fix_version: String) -> Result<(), eyre::Report> {
    let steps = [
        CommandRequest::Assign {
            committer: "alice".to_owned(),
        },
        CommandRequest::Triage {
            fix_version: Some(fix_version),
            resolution: None,
        },
        CommandRequest::StartWork {
            accept_backlog: false,
        },
        CommandRequest::Resolve {
            resolution: "complete".to_owned(),
        },
    ];
    for request in steps {
        apply(world, request)?;
    }
    Ok(())
}

#[given(r#"the release "{label}" has been closed"#)]
fn release_closed(world: &mut LifecycleWorld, label: String) -> Result<(), eyre::Report> {
    run_async(world.service.close_release(&label)).wrap_err("close release in setup")?;
    Ok(())
}

fn apply(world: &LifecycleWorld, request: CommandRequest) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let name = request.name();
    run_async(world.service.submit_command(issue_id, request))
        .wrap_err_with(|| format!("apply {name} in scenario setup"))?;
    Ok(())
}
