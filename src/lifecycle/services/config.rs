//! Runtime configuration for the lifecycle service.

use serde::Deserialize;

/// Configuration for lifecycle guards and event delivery.
///
/// # Examples
///
/// ```
/// use issue_lifecycle::lifecycle::services::LifecycleConfig;
///
/// let config = LifecycleConfig::default();
/// assert!(config.require_known_release);
///
/// let lenient = LifecycleConfig::lenient();
/// assert!(!lenient.require_known_release);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Whether work may only start on fix versions registered as releases.
    pub require_known_release: bool,
    /// Delivery attempts per event before giving up. Values below one are
    /// treated as one.
    pub dispatch_attempts: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            require_known_release: true,
            dispatch_attempts: 3,
        }
    }
}

impl LifecycleConfig {
    /// Creates a lenient configuration for tests and ad hoc trackers.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            require_known_release: false,
            dispatch_attempts: 1,
        }
    }

    /// Sets whether work requires a registered release.
    #[must_use]
    pub const fn with_require_known_release(mut self, required: bool) -> Self {
        self.require_known_release = required;
        self
    }

    /// Sets the number of delivery attempts per event.
    #[must_use]
    pub const fn with_dispatch_attempts(mut self, attempts: u32) -> Self {
        self.dispatch_attempts = attempts;
        self
    }

    /// Returns the effective number of delivery attempts.
    #[must_use]
    pub const fn effective_dispatch_attempts(&self) -> u32 {
        if self.dispatch_attempts == 0 {
            1
        } else {
            self.dispatch_attempts
        }
    }
}
