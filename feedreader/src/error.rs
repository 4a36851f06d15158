// File: feedreader/src/error.rs
//
// Errors raised by the feed reader page. None of them abort a run: the
// suites observe their effects through the document instead.

use thiserror::Error;

/// Result alias for feed reader operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Feed reader errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// No feed list was configured at all
    #[error("no feed list is configured")]
    Undefined,

    /// The feed list is configured but empty
    #[error("feed list is empty")]
    EmptyFeedList,

    /// A record lacks a required field or has it empty
    #[error("feed {index} has no {field}")]
    InvalidFeed {
        /// Position in the feed list
        index: usize,
        /// "name" or "url"
        field: &'static str,
    },

    /// `load_feed` was asked for a feed that does not exist
    #[error("feed index {index} out of range (have {len} feeds)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of configured feeds
        len: usize,
    },

    /// Selector outside the supported set
    #[error("unsupported selector '{0}'")]
    UnknownSelector(String),

    /// The feed source could not deliver entries
    #[error("failed to fetch {url}: {reason}")]
    Fetch {
        /// Feed URL
        url: String,
        /// Source-specific cause
        reason: String,
    },

    /// A feed list file could not be parsed
    #[error("invalid feed list: {0}")]
    Parse(String),
}
