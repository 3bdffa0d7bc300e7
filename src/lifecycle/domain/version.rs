//! Version labels and fix-version values.
//!
//! Labels follow the `<generation>.<major>.<maintenance>.<type>` scheme used
//! by the project's release train. Spellings such as `3.2 RC1`,
//! `3.2.0.RC1`, and `3.2.0.rc1` all denote the same release; the original
//! spelling is kept for display only.

use super::LifecycleDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Word that marks a fix-version value as a backlog label.
const BACKLOG_MARKER: &str = "backlog";

/// Release type encoded in the trailing token of a version label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    /// Nightly build snapshot.
    Snapshot,
    /// Numbered milestone.
    Milestone(u32),
    /// Numbered release candidate.
    ReleaseCandidate(u32),
    /// General availability.
    Ga,
}

impl ReleaseType {
    /// Returns the canonical type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Milestone(_) => "milestone",
            Self::ReleaseCandidate(_) => "release_candidate",
            Self::Ga => "ga",
        }
    }

    /// Returns whether the type precedes a GA on the same line.
    #[must_use]
    pub const fn is_pre_release(self) -> bool {
        !matches!(self, Self::Ga)
    }

    fn parse_token(token: &str) -> Option<Self> {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "RELEASE" | "GA" | "FINAL" => Some(Self::Ga),
            "SNAPSHOT" | "BUILD-SNAPSHOT" => Some(Self::Snapshot),
            other => other
                .strip_prefix("RC")
                .and_then(parse_component)
                .map(Self::ReleaseCandidate)
                .or_else(|| {
                    other
                        .strip_prefix('M')
                        .and_then(parse_component)
                        .map(Self::Milestone)
                }),
        }
    }

    fn canonical_suffix(self) -> String {
        match self {
            Self::Snapshot => "BUILD-SNAPSHOT".to_owned(),
            Self::Milestone(number) => format!("M{number}"),
            Self::ReleaseCandidate(number) => format!("RC{number}"),
            Self::Ga => "RELEASE".to_owned(),
        }
    }
}

fn parse_component(token: &str) -> Option<u32> {
    if token.is_empty() || !token.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parsed concrete version label.
///
/// Equality and hashing consider only the parsed components, so two
/// spellings of the same release compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionLabel {
    generation: u32,
    major: u32,
    maintenance: u32,
    kind: ReleaseType,
    raw: String,
}

impl VersionLabel {
    /// Parses a version label.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::InvalidVersion`] when the label does
    /// not start with numeric generation and major components, carries an
    /// unrecognised type token, or has trailing tokens.
    pub fn parse(label: &str) -> Result<Self, LifecycleDomainError> {
        let invalid = || LifecycleDomainError::InvalidVersion(label.to_owned());
        let trimmed = label.trim();
        let mut tokens = trimmed
            .split(|ch: char| ch == '.' || ch.is_whitespace())
            .filter(|token| !token.is_empty());

        let generation = tokens.next().and_then(parse_component).ok_or_else(invalid)?;
        let major = tokens.next().and_then(parse_component).ok_or_else(invalid)?;
        let mut maintenance = 0;
        let mut kind = ReleaseType::Ga;

        if let Some(third) = tokens.next() {
            if let Some(number) = parse_component(third) {
                maintenance = number;
                if let Some(type_token) = tokens.next() {
                    kind = ReleaseType::parse_token(type_token).ok_or_else(invalid)?;
                }
            } else {
                kind = ReleaseType::parse_token(third).ok_or_else(invalid)?;
            }
        }

        if tokens.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            generation,
            major,
            maintenance,
            kind,
            raw: trimmed.to_owned(),
        })
    }

    /// Returns the generation component.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the maintenance component.
    #[must_use]
    pub const fn maintenance(&self) -> u32 {
        self.maintenance
    }

    /// Returns the release type.
    #[must_use]
    pub const fn release_type(&self) -> ReleaseType {
        self.kind
    }

    /// Returns the label as originally spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the normalised `<generation>.<major>.<maintenance>.<type>`
    /// spelling used as a storage key.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.generation,
            self.major,
            self.maintenance,
            self.kind.canonical_suffix()
        )
    }

    /// Returns whether both labels share a generation and major component.
    #[must_use]
    pub const fn same_line(&self, other: &Self) -> bool {
        self.generation == other.generation && self.major == other.major
    }

    /// Returns whether finalising `self` also finalises `other`.
    ///
    /// A label subsumes itself, and a GA subsumes every snapshot, milestone,
    /// and release candidate of the same maintenance version.
    #[must_use]
    pub fn subsumes(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }
        matches!(self.kind, ReleaseType::Ga)
            && other.kind.is_pre_release()
            && self.same_line(other)
            && self.maintenance == other.maintenance
    }
}

impl PartialEq for VersionLabel {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
            && self.major == other.major
            && self.maintenance == other.maintenance
            && self.kind == other.kind
    }
}

impl Eq for VersionLabel {}

impl Hash for VersionLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.generation.hash(state);
        self.major.hash(state);
        self.maintenance.hash(state);
        self.kind.hash(state);
    }
}

impl TryFrom<String> for VersionLabel {
    type Error = LifecycleDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionLabel> for String {
    fn from(value: VersionLabel) -> Self {
        value.raw
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Fix version assigned at triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum FixVersion {
    /// A concrete, releasable version.
    Concrete(VersionLabel),
    /// Accepted but unscheduled work.
    Backlog(String),
}

impl FixVersion {
    /// Parses a fix-version value.
    ///
    /// Values mentioning "backlog" (any case) are backlog labels; anything
    /// else must be a version label.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::InvalidVersion`] when the value is
    /// neither a backlog label nor a valid version label.
    pub fn parse(value: &str) -> Result<Self, LifecycleDomainError> {
        let trimmed = value.trim();
        if trimmed.to_ascii_lowercase().contains(BACKLOG_MARKER) {
            return Ok(Self::Backlog(trimmed.to_owned()));
        }
        VersionLabel::parse(trimmed).map(Self::Concrete)
    }

    /// Returns the concrete version, if any.
    #[must_use]
    pub const fn as_concrete(&self) -> Option<&VersionLabel> {
        match self {
            Self::Concrete(label) => Some(label),
            Self::Backlog(_) => None,
        }
    }

    /// Returns whether this is a backlog label.
    #[must_use]
    pub const fn is_backlog(&self) -> bool {
        matches!(self, Self::Backlog(_))
    }

    /// Returns the value as spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Concrete(label) => label.as_str(),
            Self::Backlog(label) => label,
        }
    }
}

impl fmt::Display for FixVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
