//! Diesel row models for issue lifecycle persistence.

use super::schema::{issue_events, issues, releases};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for issue records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// One-line summary.
    pub summary: String,
    /// Lifecycle status.
    pub status: String,
    /// Resolution code.
    pub resolution: Option<String>,
    /// Release that closed the issue.
    pub closed_by: Option<String>,
    /// Assigned committer.
    pub assignee: Option<String>,
    /// Fix version as spelled.
    pub fix_version: Option<String>,
    /// Parent issue for backport tasks.
    pub backport_of: Option<uuid::Uuid>,
    /// Ordered backport task identifiers.
    pub backport_tasks: Value,
    /// Reopen counter.
    pub reopen_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for issue records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(treat_none_as_null = true)]
pub struct IssueRecord {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// One-line summary.
    pub summary: String,
    /// Lifecycle status.
    pub status: String,
    /// Resolution code.
    pub resolution: Option<String>,
    /// Release that closed the issue.
    pub closed_by: Option<String>,
    /// Assigned committer.
    pub assignee: Option<String>,
    /// Fix version as spelled.
    pub fix_version: Option<String>,
    /// Parent issue for backport tasks.
    pub backport_of: Option<uuid::Uuid>,
    /// Ordered backport task identifiers.
    pub backport_tasks: Value,
    /// Reopen counter.
    pub reopen_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for issue events.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issue_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueEventRow {
    /// Global append sequence.
    #[expect(dead_code, reason = "history ordering is applied in SQL")]
    pub seq: i64,
    /// Issue the event belongs to.
    pub issue_id: uuid::Uuid,
    /// Event type name.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: Value,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Insert model for issue events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issue_events)]
pub struct NewIssueEventRow {
    /// Issue the event belongs to.
    pub issue_id: uuid::Uuid,
    /// Event type name.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: Value,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Row model for release records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = releases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ReleaseRow {
    /// Canonical label.
    pub label: String,
    /// Label as originally registered.
    pub display_label: String,
    /// Closure timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}
