//! Runner configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{FrameworkError, Result};

/// Default time an asynchronous case or hook may take before it is
/// reported as timed out (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Configuration for a run of the assertion runner.
#[derive(Debug, Clone, clap::Args, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Time budget for each asynchronous case or hook, in milliseconds.
    ///
    /// Cases may override it individually.
    #[clap(name = "timeout-ms", long, default_value_t = default_timeout_ms())]
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Only run cases whose full name ("<suite> <case>") contains this text.
    #[clap(name = "filter", long)]
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            filter: None,
        }
    }
}

impl RunnerConfig {
    /// Default timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builder-style timeout override
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Builder-style filter
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Whether a case with this full name is selected by the filter
    pub fn selects(&self, full_name: &str) -> bool {
        match &self.filter {
            Some(filter) if !filter.is_empty() => full_name.contains(filter.as_str()),
            _ => true,
        }
    }

    /// Reject configurations the runner cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(FrameworkError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.filter.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = RunnerConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(FrameworkError::ZeroTimeout));
    }

    #[test]
    fn test_filter_selection() {
        let config = RunnerConfig::default().with_filter("menu");
        assert!(config.selects("The menu is hidden by default"));
        assert!(!config.selects("RSS Feeds are defined"));

        // Empty filter selects everything
        let config = RunnerConfig::default().with_filter("");
        assert!(config.selects("anything"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: RunnerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RunnerConfig::default());

        let config: RunnerConfig =
            serde_json::from_str(r#"{"timeout_ms": 250, "filter": "Feed"}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.filter.as_deref(), Some("Feed"));
    }
}
