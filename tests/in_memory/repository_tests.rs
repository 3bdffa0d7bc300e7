//! Port contract tests for the in-memory adapters.

use issue_lifecycle::lifecycle::{
    adapters::memory::{InMemoryIssueRepository, InMemoryReleaseRepository},
    domain::{
        CommitterId, Issue, IssueCommand, IssueStatus, Release, TransitionContext, VersionLabel,
    },
    ports::{IssueRepository, IssueRepositoryError, ReleaseRepository, ReleaseRepositoryError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn issues() -> InMemoryIssueRepository {
    InMemoryIssueRepository::new()
}

#[fixture]
fn releases() -> InMemoryReleaseRepository {
    InMemoryReleaseRepository::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifiers(issues: InMemoryIssueRepository) -> eyre::Result<()> {
    let (issue, opened) = Issue::open("Duplicate", &DefaultClock)?;
    issues.store(&issue, &[opened]).await?;

    let result = issues.store(&issue, &[]).await;

    eyre::ensure!(matches!(
        result,
        Err(IssueRepositoryError::DuplicateIssue(id)) if id == issue.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_requires_existing_issue(issues: InMemoryIssueRepository) -> eyre::Result<()> {
    let (issue, _) = Issue::open("Never stored", &DefaultClock)?;

    let result = issues.update(&issue, &[]).await;

    eyre::ensure!(matches!(result, Err(IssueRepositoryError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_appends_history(issues: InMemoryIssueRepository) -> eyre::Result<()> {
    let clock = DefaultClock;
    let (mut issue, opened) = Issue::open("History", &clock)?;
    issues.store(&issue, std::slice::from_ref(&opened)).await?;

    let transition = issue.apply(
        IssueCommand::Assign {
            committer: CommitterId::new("alice")?,
        },
        &TransitionContext::detached(),
        &clock,
    )?;
    issues.update(&issue, &transition.events).await?;

    let history = issues.history(issue.id()).await?;
    let types: Vec<_> = history.iter().map(|event| event.event_type()).collect();
    eyre::ensure!(types == ["opened", "assigned"]);
    let waiting = issues.find_by_status(IssueStatus::WaitingForTriage).await?;
    eyre::ensure!(waiting == [issue.clone()]);
    eyre::ensure!(issues.find_by_status(IssueStatus::Unassigned).await?.is_empty());
    eyre::ensure!(issues.list_all().await?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_issue_has_empty_history(issues: InMemoryIssueRepository) -> eyre::Result<()> {
    let (issue, _) = Issue::open("Unknown", &DefaultClock)?;

    eyre::ensure!(issues.find_by_id(issue.id()).await?.is_none());
    eyre::ensure!(issues.history(issue.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn releases_are_keyed_by_parsed_label(
    releases: InMemoryReleaseRepository,
) -> eyre::Result<()> {
    let clock = DefaultClock;
    let candidate = Release::new(VersionLabel::parse("3.2 RC1")?, &clock);
    releases.register(&candidate).await?;

    let respelled = VersionLabel::parse("3.2.0.RC1")?;
    let found = releases.find_by_label(&respelled).await?;
    eyre::ensure!(found.as_ref() == Some(&candidate));

    let duplicate = Release::new(respelled, &clock);
    let result = releases.register(&duplicate).await;
    eyre::ensure!(matches!(
        result,
        Err(ReleaseRepositoryError::DuplicateRelease(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_update_persists_closure(releases: InMemoryReleaseRepository) -> eyre::Result<()> {
    let clock = DefaultClock;
    let mut ga = Release::new(VersionLabel::parse("3.2.0.RELEASE")?, &clock);
    releases.register(&ga).await?;

    eyre::ensure!(ga.close(&clock));
    eyre::ensure!(!ga.close(&clock), "closing twice should report no change");
    releases.update(&ga).await?;

    let stored = releases
        .find_by_label(ga.label())
        .await?
        .ok_or_else(|| eyre::eyre!("release should be stored"))?;
    eyre::ensure!(stored.is_closed());
    eyre::ensure!(releases.list_all().await?.len() == 1);

    let unregistered = Release::new(VersionLabel::parse("9.9.9")?, &clock);
    eyre::ensure!(matches!(
        releases.update(&unregistered).await,
        Err(ReleaseRepositoryError::NotFound(_))
    ));
    Ok(())
}
