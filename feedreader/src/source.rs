// File: feedreader/src/source.rs
//
// Where `load_feed` gets its entries from.
//
// The page never talks to the network: a `FeedSource` hands back the items
// for a feed URL. `StaticFeedSource` derives them deterministically from
// the URL, so two different feeds never share a first entry, and can delay
// each fetch to make loading observably asynchronous.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::dom::FeedItem;
use crate::error::{FeedError, Result};
use crate::feeds::FeedConfig;

/// Entries generated per feed unless configured otherwise
pub const DEFAULT_ENTRIES_PER_FEED: usize = 10;

/// Supplier of feed items
///
/// Implementations must be cheap to share; the page keeps one behind an
/// `Arc` and may fetch several feeds concurrently.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the items of `feed`
    ///
    /// # Errors
    ///
    /// Returns an error if the feed has no URL or cannot be delivered.
    async fn fetch(&self, feed: &FeedConfig) -> Result<Vec<FeedItem>>;
}

/// In-memory feed source
///
/// # Examples
///
/// ```rust
/// use feedreader::feeds::FeedConfig;
/// use feedreader::source::{FeedSource, StaticFeedSource};
///
/// # tokio_test::block_on(async {
/// let source = StaticFeedSource::new().with_entries_per_feed(3);
/// let feed = FeedConfig::new("CSS Tricks", "http://feeds.feedburner.com/CssTricks");
///
/// let items = source.fetch(&feed).await.unwrap();
/// assert_eq!(items.len(), 3);
/// # });
/// ```
pub struct StaticFeedSource {
    entries_per_feed: usize,
    latency: Duration,
    jitter: Duration,
    rng: Mutex<StdRng>,
    items: HashMap<String, Vec<FeedItem>>,
    failing: HashSet<String>,
}

impl Default for StaticFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticFeedSource {
    /// Source without latency producing `DEFAULT_ENTRIES_PER_FEED` items
    pub fn new() -> Self {
        Self {
            entries_per_feed: DEFAULT_ENTRIES_PER_FEED,
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            rng: Mutex::new(StdRng::seed_from_u64(0)),
            items: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    /// Number of generated items per feed
    pub fn with_entries_per_feed(mut self, count: usize) -> Self {
        self.entries_per_feed = count;
        self
    }

    /// Fixed delay before every fetch completes
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Extra random delay of up to `jitter`, drawn from a seeded RNG so a
    /// run can be reproduced
    pub fn with_jitter(mut self, jitter: Duration, seed: u64) -> Self {
        self.jitter = jitter;
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Serve exactly `items` for `url` instead of generated ones
    pub fn with_items(mut self, url: impl Into<String>, items: Vec<FeedItem>) -> Self {
        self.items.insert(url.into(), items);
        self
    }

    /// Make every fetch of `url` fail
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    fn delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        let max = self.jitter.as_millis() as u64;
        let extra = self.rng.lock().gen_range(0..=max);
        self.latency + Duration::from_millis(extra)
    }

    fn generate(&self, feed: &FeedConfig, url: &str) -> Vec<FeedItem> {
        let label = feed.name.as_deref().unwrap_or(url);
        let base = url.trim_end_matches('/');

        (1..=self.entries_per_feed)
            .map(|n| FeedItem {
                link: format!("{}/entries/{}", base, n),
                title: format!("{} #{}", label, n),
                snippet: format!("Entry {} of {}", n, url),
            })
            .collect()
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch(&self, feed: &FeedConfig) -> Result<Vec<FeedItem>> {
        let url = match feed.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(FeedError::Fetch {
                    url: String::new(),
                    reason: "feed has no URL".to_string(),
                })
            }
        };

        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(url) {
            return Err(FeedError::Fetch {
                url: url.to_string(),
                reason: "source unavailable".to_string(),
            });
        }

        let items = match self.items.get(url) {
            Some(items) => items.clone(),
            None => self.generate(feed, url),
        };

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Fetched {} items from {} after {:?}", items.len(), url, delay);
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::default_feeds;

    #[tokio::test]
    async fn test_generated_items_are_deterministic() {
        let source = StaticFeedSource::new();
        let feed = &default_feeds()[0];

        let first = source.fetch(feed).await.unwrap();
        let second = source.fetch(feed).await.unwrap();

        assert_eq!(first.len(), DEFAULT_ENTRIES_PER_FEED);
        assert_eq!(first, second);
        assert_eq!(first[0].title, "Udacity Blog #1");
        assert_eq!(first[0].link, "http://blog.udacity.com/feed/entries/1");
    }

    #[tokio::test]
    async fn test_different_feeds_differ() {
        let source = StaticFeedSource::new();
        let feeds = default_feeds();

        let a = source.fetch(&feeds[0]).await.unwrap();
        let b = source.fetch(&feeds[2]).await.unwrap();

        assert_ne!(a[0], b[0]);
    }

    #[tokio::test]
    async fn test_missing_url_is_an_error() {
        let source = StaticFeedSource::new();
        let feed = FeedConfig {
            name: Some("No URL".to_string()),
            url: None,
        };

        assert!(matches!(
            source.fetch(&feed).await,
            Err(FeedError::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_configured_items_and_failures() {
        let item = FeedItem {
            link: "http://example.com/only".to_string(),
            title: "Only".to_string(),
            snippet: String::new(),
        };
        let source = StaticFeedSource::new()
            .with_items("http://example.com/feed", vec![item.clone()])
            .with_failure("http://example.com/down");

        let items = source
            .fetch(&FeedConfig::new("Example", "http://example.com/feed"))
            .await
            .unwrap();
        assert_eq!(items, vec![item]);

        let err = source
            .fetch(&FeedConfig::new("Down", "http://example.com/down"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to fetch http://example.com/down: source unavailable");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_and_jitter_delay_the_fetch() {
        let source = StaticFeedSource::new()
            .with_latency(Duration::from_millis(100))
            .with_jitter(Duration::from_millis(50), 7);
        let feed = &default_feeds()[1];

        let start = tokio::time::Instant::now();
        source.fetch(feed).await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed <= Duration::from_millis(150));
    }

    #[test]
    fn test_jitter_is_reproducible() {
        let a = StaticFeedSource::new().with_jitter(Duration::from_millis(500), 42);
        let b = StaticFeedSource::new().with_jitter(Duration::from_millis(500), 42);

        let delays_a: Vec<_> = (0..5).map(|_| a.delay()).collect();
        let delays_b: Vec<_> = (0..5).map(|_| b.delay()).collect();
        assert_eq!(delays_a, delays_b);
    }
}
