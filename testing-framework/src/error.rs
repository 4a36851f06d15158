// File: testing-framework/src/error.rs
//
// Error types raised by the runner itself (configuration and registration).
// Failures of the code under test are never errors: they are recorded in
// the run report instead.

use thiserror::Error;

/// Result alias for framework operations
pub type Result<T> = std::result::Result<T, FrameworkError>;

/// Errors produced by the assertion runner
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameworkError {
    /// A zero timeout would time out every asynchronous step immediately
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// Suites must be addressable by name in reports and filters
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// What was being named ("suite", "case")
        kind: &'static str,
    },

    /// A `describe` body failed while registering its cases
    #[error("suite '{suite}' failed during setup: {reason}")]
    Setup {
        /// Suite name
        suite: String,
        /// Rendered cause
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FrameworkError::ZeroTimeout.to_string(),
            "timeout must be greater than zero"
        );
        assert_eq!(
            FrameworkError::EmptyName { kind: "suite" }.to_string(),
            "suite name must not be empty"
        );

        let err = FrameworkError::Setup {
            suite: "RSS Feeds".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "suite 'RSS Feeds' failed during setup: boom"
        );
    }
}
