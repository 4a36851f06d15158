//! # Feed Reader
//!
//! In-process model of the feed reader page and the suites that check it.
//!
//! The page offers a list of feeds, a slide-out menu hidden behind
//! `menu-hidden` on `body`, and `load_feed`, which asynchronously replaces
//! the `.feed` entries and then calls back exactly once. Entries come from a
//! [`source::FeedSource`]; nothing touches the network.
//!
//! ```rust,ignore
//! use feedreader::prelude::*;
//!
//! let app = PageConfig::default().build().await?;
//! app.init().await?;
//!
//! let report = Runner::new(RunnerConfig::default())?
//!     .run(suites::registry(&app))
//!     .await;
//! report.print();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Feed reader page handle
pub mod app;

pub mod config;

/// Document model
pub mod dom;

/// Feed reader error types
pub mod error;

/// Feed list configuration
pub mod feeds;

/// Feed sources
pub mod source;

/// Suites run against the page
pub mod suites;

/// Convenient re-exports
pub mod prelude {
    pub use crate::app::FeedReader;
    pub use crate::config::PageConfig;
    pub use crate::dom::{Document, Entry, FeedItem, Selector, MENU_HIDDEN};
    pub use crate::error::FeedError;
    pub use crate::feeds::{default_feeds, FeedConfig};
    pub use crate::source::{FeedSource, StaticFeedSource};
    pub use crate::suites;
    pub use feedreader_testing_framework::prelude::*;
}

pub use app::FeedReader;
pub use error::FeedError;
pub use feeds::FeedConfig;
