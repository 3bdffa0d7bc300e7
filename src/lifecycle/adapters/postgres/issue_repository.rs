//! `PostgreSQL` repository implementation for issue snapshots and history.

use super::{
    LifecyclePgPool,
    models::{IssueEventRow, IssueRecord, IssueRow, NewIssueEventRow},
    schema::{issue_events, issues},
};
use crate::lifecycle::{
    domain::{
        CommitterId, FixVersion, Issue, IssueEvent, IssueEventKind, IssueId, IssueState,
        IssueStatus, IssueSummary, PersistedIssueData, Resolution, SpawnedBackport, VersionLabel,
    },
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed issue repository.
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: LifecyclePgPool,
}

/// Failure inside a write transaction.
#[derive(Debug)]
enum WriteError {
    Repository(IssueRepositoryError),
    Diesel(DieselError),
}

impl From<DieselError> for WriteError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<WriteError> for IssueRepositoryError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Repository(inner) => inner,
            WriteError::Diesel(inner) => Self::persistence(inner),
        }
    }
}

impl PostgresIssueRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LifecyclePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IssueRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IssueRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IssueRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IssueRepositoryError::persistence)?
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueRepository {
    async fn store(&self, issue: &Issue, events: &[IssueEvent]) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let record = to_record(issue)?;
        let event_rows = to_event_rows(events)?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| {
                    insert_issue(tx, issue_id, &record)?;
                    append_events(tx, &event_rows)?;
                    Ok(())
                })
                .map_err(IssueRepositoryError::from)
        })
        .await
    }

    async fn update(&self, issue: &Issue, events: &[IssueEvent]) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let record = to_record(issue)?;
        let event_rows = to_event_rows(events)?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| {
                    update_issue(tx, issue_id, &record)?;
                    append_events(tx, &event_rows)?;
                    Ok(())
                })
                .map_err(IssueRepositoryError::from)
        })
        .await
    }

    async fn update_with_backport(
        &self,
        issue: &Issue,
        events: &[IssueEvent],
        backport: &SpawnedBackport,
    ) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let record = to_record(issue)?;
        let event_rows = to_event_rows(events)?;
        let backport_id = backport.issue.id();
        let backport_record = to_record(&backport.issue)?;
        let backport_event_rows = to_event_rows(&backport.events)?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| {
                    update_issue(tx, issue_id, &record)?;
                    insert_issue(tx, backport_id, &backport_record)?;
                    append_events(tx, &event_rows)?;
                    append_events(tx, &backport_event_rows)?;
                    Ok(())
                })
                .map_err(IssueRepositoryError::from)
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let row = issues::table
                .find(id.into_inner())
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()
                .map_err(IssueRepositoryError::persistence)?;
            row.map(row_to_issue).transpose()
        })
        .await
    }

    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>> {
        self.run_blocking(move |connection| {
            let rows = issues::table
                .filter(issues::status.eq(status.as_str()))
                .order(issues::created_at.asc())
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(IssueRepositoryError::persistence)?;
            rows.into_iter().map(row_to_issue).collect()
        })
        .await
    }

    async fn list_all(&self) -> IssueRepositoryResult<Vec<Issue>> {
        self.run_blocking(move |connection| {
            let rows = issues::table
                .order(issues::created_at.asc())
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(IssueRepositoryError::persistence)?;
            rows.into_iter().map(row_to_issue).collect()
        })
        .await
    }

    async fn history(&self, id: IssueId) -> IssueRepositoryResult<Vec<IssueEvent>> {
        self.run_blocking(move |connection| {
            let rows = issue_events::table
                .filter(issue_events::issue_id.eq(id.into_inner()))
                .order(issue_events::seq.asc())
                .select(IssueEventRow::as_select())
                .load::<IssueEventRow>(connection)
                .map_err(IssueRepositoryError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

fn insert_issue(
    connection: &mut PgConnection,
    issue_id: IssueId,
    record: &IssueRecord,
) -> Result<(), WriteError> {
    diesel::insert_into(issues::table)
        .values(record)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                WriteError::Repository(IssueRepositoryError::DuplicateIssue(issue_id))
            }
            other => WriteError::Diesel(other),
        })?;
    Ok(())
}

fn update_issue(
    connection: &mut PgConnection,
    issue_id: IssueId,
    record: &IssueRecord,
) -> Result<(), WriteError> {
    let updated = diesel::update(issues::table.find(issue_id.into_inner()))
        .set(record)
        .execute(connection)?;
    if updated == 0 {
        return Err(WriteError::Repository(IssueRepositoryError::NotFound(issue_id)));
    }
    Ok(())
}

fn append_events(
    connection: &mut PgConnection,
    event_rows: &[NewIssueEventRow],
) -> Result<(), DieselError> {
    if event_rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(issue_events::table)
        .values(event_rows)
        .execute(connection)?;
    Ok(())
}

fn to_record(issue: &Issue) -> IssueRepositoryResult<IssueRecord> {
    let backport_tasks =
        serde_json::to_value(issue.backport_tasks()).map_err(IssueRepositoryError::persistence)?;
    let reopen_count =
        i32::try_from(issue.reopen_count()).map_err(IssueRepositoryError::persistence)?;

    Ok(IssueRecord {
        id: issue.id().into_inner(),
        summary: issue.summary().as_str().to_owned(),
        status: issue.status().as_str().to_owned(),
        resolution: issue.resolution().map(|value| value.as_str().to_owned()),
        closed_by: issue.state().closed_by().map(VersionLabel::canonical),
        assignee: issue.assignee().map(|value| value.as_str().to_owned()),
        fix_version: issue.fix_version().map(|value| value.as_str().to_owned()),
        backport_of: issue.backport_of().map(IssueId::into_inner),
        backport_tasks,
        reopen_count,
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
    })
}

fn to_event_rows(events: &[IssueEvent]) -> IssueRepositoryResult<Vec<NewIssueEventRow>> {
    events
        .iter()
        .map(|event| {
            let payload =
                serde_json::to_value(event.kind()).map_err(IssueRepositoryError::persistence)?;
            Ok(NewIssueEventRow {
                issue_id: event.issue_id().into_inner(),
                event_type: event.event_type().to_owned(),
                payload,
                occurred_at: event.occurred_at(),
            })
        })
        .collect()
}

fn row_to_issue(row: IssueRow) -> IssueRepositoryResult<Issue> {
    let IssueRow {
        id,
        summary: persisted_summary,
        status: persisted_status,
        resolution: persisted_resolution,
        closed_by: persisted_closed_by,
        assignee: persisted_assignee,
        fix_version: persisted_fix_version,
        backport_of,
        backport_tasks: persisted_backport_tasks,
        reopen_count: persisted_reopen_count,
        created_at,
        updated_at,
    } = row;

    let status = IssueStatus::try_from(persisted_status.as_str())
        .map_err(IssueRepositoryError::persistence)?;
    let resolution = persisted_resolution
        .map(|value| Resolution::try_from(value.as_str()))
        .transpose()
        .map_err(IssueRepositoryError::persistence)?;
    let closed_by = persisted_closed_by
        .map(|value| VersionLabel::parse(&value))
        .transpose()
        .map_err(IssueRepositoryError::persistence)?;
    let state = IssueState::from_parts(status, resolution, closed_by)
        .map_err(IssueRepositoryError::persistence)?;
    let assignee = persisted_assignee
        .map(CommitterId::new)
        .transpose()
        .map_err(IssueRepositoryError::persistence)?;
    let fix_version = persisted_fix_version
        .map(|value| FixVersion::parse(&value))
        .transpose()
        .map_err(IssueRepositoryError::persistence)?;
    let backport_tasks = serde_json::from_value::<Vec<IssueId>>(persisted_backport_tasks)
        .map_err(IssueRepositoryError::persistence)?;
    let reopen_count =
        u32::try_from(persisted_reopen_count).map_err(IssueRepositoryError::persistence)?;

    let data = PersistedIssueData {
        id: IssueId::from_uuid(id),
        summary: IssueSummary::new(persisted_summary)
            .map_err(IssueRepositoryError::persistence)?,
        state,
        assignee,
        fix_version,
        backport_of: backport_of.map(IssueId::from_uuid),
        backport_tasks,
        reopen_count,
        created_at,
        updated_at,
    };
    Ok(Issue::from_persisted(data))
}

fn row_to_event(row: IssueEventRow) -> IssueRepositoryResult<IssueEvent> {
    let kind = serde_json::from_value::<IssueEventKind>(row.payload)
        .map_err(IssueRepositoryError::persistence)?;
    Ok(IssueEvent::from_persisted(
        IssueId::from_uuid(row.issue_id),
        row.occurred_at,
        kind,
    ))
}
