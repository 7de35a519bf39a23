//! Runner configuration.

use lantern_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wait for deferred callbacks, per snippet
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 300;

/// Upper bound accepted for the per-snippet wait
pub const MAX_TIMEOUT_MILLIS: u64 = 60_000;

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    /// How long to wait for a snippet's deferred callbacks
    pub timeout_millis: u64,
}

impl RunnerConfig {
    /// Create a config with the default timeout
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
        }
    }

    /// Set the per-snippet timeout
    #[must_use]
    pub fn with_timeout_millis(mut self, millis: u64) -> Self {
        self.timeout_millis = millis;
        self
    }

    /// Check the values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] for a zero timeout or one
    /// above [`MAX_TIMEOUT_MILLIS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_millis == 0 {
            return Err(ConfigError::InvalidTimeout {
                millis: self.timeout_millis,
                reason: "must be positive".to_string(),
            });
        }
        if self.timeout_millis > MAX_TIMEOUT_MILLIS {
            return Err(ConfigError::InvalidTimeout {
                millis: self.timeout_millis,
                reason: format!("must not exceed {}ms", MAX_TIMEOUT_MILLIS),
            });
        }
        Ok(())
    }

    /// Timeout as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RunnerConfig::default();
        assert_eq!(config.timeout_millis, DEFAULT_TIMEOUT_MILLIS);
        assert_eq!(config.timeout(), Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero() {
        let config = RunnerConfig::new().with_timeout_millis(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout { millis: 0, .. })
        ));
    }

    #[test]
    fn test_config_rejects_too_large() {
        let config = RunnerConfig::new().with_timeout_millis(MAX_TIMEOUT_MILLIS + 1);
        assert!(config.validate().is_err());

        let config = RunnerConfig::new().with_timeout_millis(MAX_TIMEOUT_MILLIS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_json_uses_timeout_millis_key() {
        let config: RunnerConfig = serde_json::from_str(r#"{"timeoutMillis": 750}"#).unwrap();
        assert_eq!(config.timeout_millis, 750);

        let json = serde_json::to_string(&RunnerConfig::default()).unwrap();
        assert_eq!(json, r#"{"timeoutMillis":300}"#);
    }
}
