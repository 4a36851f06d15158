//! Configuration of the simulated page.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::FeedReader;
use crate::feeds::{self, FeedConfig};
use crate::source::{StaticFeedSource, DEFAULT_ENTRIES_PER_FEED};

const fn default_entries_per_feed() -> usize {
    DEFAULT_ENTRIES_PER_FEED
}

/// How the feed reader page is set up before the suites run.
#[derive(Debug, Clone, clap::Args, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageConfig {
    /// Feed list file (YAML or JSON). The built-in list is used when absent.
    #[clap(name = "feeds", long)]
    #[serde(default)]
    pub feeds: Option<PathBuf>,

    /// Simulated delay of every feed fetch, in milliseconds.
    #[clap(name = "latency-ms", long, default_value_t = 0)]
    #[serde(default)]
    pub latency_ms: u64,

    /// Upper bound of random extra delay per fetch, in milliseconds.
    #[clap(name = "jitter-ms", long, default_value_t = 0)]
    #[serde(default)]
    pub jitter_ms: u64,

    /// Seed for the jitter RNG, so a slow run can be replayed.
    #[clap(name = "seed", long, default_value_t = 0)]
    #[serde(default)]
    pub seed: u64,

    /// Entries served per feed.
    #[clap(name = "entries-per-feed", long, default_value_t = default_entries_per_feed())]
    #[serde(default = "default_entries_per_feed")]
    pub entries_per_feed: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            feeds: None,
            latency_ms: 0,
            jitter_ms: 0,
            seed: 0,
            entries_per_feed: DEFAULT_ENTRIES_PER_FEED,
        }
    }
}

impl PageConfig {
    /// Feed list to serve: the configured file or the built-in list
    pub async fn load_feeds(&self) -> anyhow::Result<Vec<FeedConfig>> {
        match &self.feeds {
            Some(path) => feeds::load_feeds(path).await,
            None => Ok(feeds::default_feeds()),
        }
    }

    /// Feed source with the configured latency
    pub fn source(&self) -> StaticFeedSource {
        StaticFeedSource::new()
            .with_entries_per_feed(self.entries_per_feed)
            .with_latency(Duration::from_millis(self.latency_ms))
            .with_jitter(Duration::from_millis(self.jitter_ms), self.seed)
    }

    /// Command line arguments that rebuild this page, for replay commands
    pub fn replay_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = &self.feeds {
            args.push("--feeds".to_string());
            args.push(path.display().to_string());
        }
        args.extend([
            "--latency-ms".to_string(),
            self.latency_ms.to_string(),
            "--jitter-ms".to_string(),
            self.jitter_ms.to_string(),
            "--seed".to_string(),
            self.seed.to_string(),
            "--entries-per-feed".to_string(),
            self.entries_per_feed.to_string(),
        ]);
        args
    }

    /// Page ready for `init`
    ///
    /// A feed list that fails validation is still served; the suites
    /// report what is wrong with it.
    pub async fn build(&self) -> anyhow::Result<FeedReader> {
        let feeds = self.load_feeds().await?;

        if let Err(e) = feeds::validate(&feeds) {
            if log::log_enabled!(log::Level::Warn) {
                log::warn!("Feed list is invalid: {}", e);
            }
        }

        Ok(FeedReader::new(feeds, Arc::new(self.source())))
    }
}
