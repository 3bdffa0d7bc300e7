//! Diesel schema for issue lifecycle persistence.

diesel::table! {
    /// Issue snapshots, one row per issue.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// One-line summary.
        summary -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Resolution code, set only for resolved and closed issues.
        #[max_length = 50]
        resolution -> Nullable<Varchar>,
        /// Release that closed the issue.
        #[max_length = 100]
        closed_by -> Nullable<Varchar>,
        /// Assigned committer.
        #[max_length = 255]
        assignee -> Nullable<Varchar>,
        /// Fix version as spelled at triage.
        #[max_length = 255]
        fix_version -> Nullable<Varchar>,
        /// Parent issue for backport tasks.
        backport_of -> Nullable<Uuid>,
        /// Ordered backport task identifiers.
        backport_tasks -> Jsonb,
        /// Reopen counter.
        reopen_count -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only per-issue event log.
    issue_events (seq) {
        /// Global append sequence.
        seq -> Int8,
        /// Issue the event belongs to.
        issue_id -> Uuid,
        /// Event type name.
        #[max_length = 50]
        event_type -> Varchar,
        /// Serialized event payload.
        payload -> Jsonb,
        /// When the event occurred.
        occurred_at -> Timestamptz,
    }
}

diesel::table! {
    /// Release catalogue keyed by canonical label.
    releases (label) {
        /// Canonical `<generation>.<major>.<maintenance>.<type>` label.
        #[max_length = 100]
        label -> Varchar,
        /// Label as originally registered.
        #[max_length = 100]
        display_label -> Varchar,
        /// Closure timestamp.
        closed_at -> Nullable<Timestamptz>,
        /// Registration timestamp.
        registered_at -> Timestamptz,
    }
}

diesel::joinable!(issue_events -> issues (issue_id));
diesel::allow_tables_to_appear_in_same_query!(issues, issue_events);
