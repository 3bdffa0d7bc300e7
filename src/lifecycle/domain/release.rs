//! Release aggregate.

use super::{ReleaseType, VersionLabel};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A release known to the version catalog.
///
/// Once closed, a release is immutable and no issue bound to it may return
/// to an open state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    label: VersionLabel,
    closed_at: Option<DateTime<Utc>>,
    registered_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReleaseData {
    /// Persisted release label.
    pub label: VersionLabel,
    /// Persisted closure timestamp, if closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Persisted registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl Release {
    /// Registers a new, open release.
    #[must_use]
    pub fn new(label: VersionLabel, clock: &impl Clock) -> Self {
        Self {
            label,
            closed_at: None,
            registered_at: clock.utc(),
        }
    }

    /// Reconstructs a release from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReleaseData) -> Self {
        Self {
            label: data.label,
            closed_at: data.closed_at,
            registered_at: data.registered_at,
        }
    }

    /// Returns the release label.
    #[must_use]
    pub const fn label(&self) -> &VersionLabel {
        &self.label
    }

    /// Returns the release type.
    #[must_use]
    pub const fn release_type(&self) -> ReleaseType {
        self.label.release_type()
    }

    /// Returns whether the release has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    /// Returns the closure timestamp.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Closes the release.
    ///
    /// Returns `false` when the release was already closed.
    pub fn close(&mut self, clock: &impl Clock) -> bool {
        if self.is_closed() {
            return false;
        }
        self.closed_at = Some(clock.utc());
        true
    }
}
