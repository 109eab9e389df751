//! Polling configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default number of indexer lookups before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Default pause between two lookups.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Configuration for [`ConfirmationTracker`](crate::ConfirmationTracker).
///
/// The delay is fixed; there is no backoff.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Total number of lookups, the first one included (default: 20).
    pub max_attempts: u32,
    /// Pause between lookups in milliseconds (default: 1500).
    pub retry_delay_ms: u64,
}

impl TrackerConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of lookups. At least one lookup is always made.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the pause between lookups.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.retry_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_builder_clamps_attempts() {
        let config = TrackerConfig::new()
            .with_max_attempts(0)
            .with_retry_delay(Duration::from_secs(2));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.retry_delay_ms, 2000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TrackerConfig = serde_json::from_str(r#"{"max_attempts": 5}"#).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay_ms, 1500);
    }
}
