//! `PostgreSQL` repository implementation for the release catalogue.

use super::{LifecyclePgPool, models::ReleaseRow, schema::releases};
use crate::lifecycle::{
    domain::{PersistedReleaseData, Release, VersionLabel},
    ports::{ReleaseRepository, ReleaseRepositoryError, ReleaseRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed release repository.
#[derive(Debug, Clone)]
pub struct PostgresReleaseRepository {
    pool: LifecyclePgPool,
}

impl PostgresReleaseRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LifecyclePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReleaseRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReleaseRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReleaseRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReleaseRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReleaseRepository for PostgresReleaseRepository {
    async fn register(&self, release: &Release) -> ReleaseRepositoryResult<()> {
        let row = to_row(release);
        self.run_blocking(move |connection| {
            diesel::insert_into(releases::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReleaseRepositoryError::DuplicateRelease(row.display_label.clone())
                    }
                    other => ReleaseRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, release: &Release) -> ReleaseRepositoryResult<()> {
        let row = to_row(release);
        self.run_blocking(move |connection| {
            let updated = diesel::update(releases::table.find(row.label.clone()))
                .set(&row)
                .execute(connection)
                .map_err(ReleaseRepositoryError::persistence)?;
            if updated == 0 {
                return Err(ReleaseRepositoryError::NotFound(row.display_label));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_label(&self, label: &VersionLabel) -> ReleaseRepositoryResult<Option<Release>> {
        let key = label.canonical();
        self.run_blocking(move |connection| {
            let row = releases::table
                .find(key)
                .select(ReleaseRow::as_select())
                .first::<ReleaseRow>(connection)
                .optional()
                .map_err(ReleaseRepositoryError::persistence)?;
            row.map(row_to_release).transpose()
        })
        .await
    }

    async fn list_all(&self) -> ReleaseRepositoryResult<Vec<Release>> {
        self.run_blocking(move |connection| {
            let rows = releases::table
                .order(releases::registered_at.asc())
                .select(ReleaseRow::as_select())
                .load::<ReleaseRow>(connection)
                .map_err(ReleaseRepositoryError::persistence)?;
            rows.into_iter().map(row_to_release).collect()
        })
        .await
    }
}

fn to_row(release: &Release) -> ReleaseRow {
    ReleaseRow {
        label: release.label().canonical(),
        display_label: release.label().as_str().to_owned(),
        closed_at: release.closed_at(),
        registered_at: release.registered_at(),
    }
}

fn row_to_release(row: ReleaseRow) -> ReleaseRepositoryResult<Release> {
    let label =
        VersionLabel::parse(&row.display_label).map_err(ReleaseRepositoryError::persistence)?;
    Ok(Release::from_persisted(PersistedReleaseData {
        label,
        closed_at: row.closed_at,
        registered_at: row.registered_at,
    }))
}
