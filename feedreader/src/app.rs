// File: feedreader/src/app.rs
//
// The feed reader page: feed list, menu toggle and asynchronous feed loading.
//
// `FeedReader` is a cheap handle; clones share the same document and feed
// source. The document lock is only taken for synchronous reads and
// updates, never while a fetch is in flight.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::dom::{Document, Entry, FeedLink, Selector, MENU_HIDDEN};
use crate::error::{FeedError, Result};
use crate::feeds::FeedConfig;
use crate::source::FeedSource;

/// Handle to the feed reader page
#[derive(Clone)]
pub struct FeedReader {
    feeds: Option<Arc<Vec<FeedConfig>>>,
    source: Arc<dyn FeedSource>,
    document: Arc<Mutex<Document>>,
}

impl std::fmt::Debug for FeedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedReader")
            .field("feeds", &self.feeds)
            .field("document", &*self.document.lock())
            .finish()
    }
}

impl FeedReader {
    /// Page offering `feeds`, loading entries from `source`
    pub fn new(feeds: Vec<FeedConfig>, source: Arc<dyn FeedSource>) -> Self {
        Self {
            feeds: Some(Arc::new(feeds)),
            source,
            document: Arc::new(Mutex::new(Document::new())),
        }
    }

    /// Page whose feed list was never configured
    pub fn without_feeds(source: Arc<dyn FeedSource>) -> Self {
        Self {
            feeds: None,
            source,
            document: Arc::new(Mutex::new(Document::new())),
        }
    }

    /// The configured feed list (`allFeeds`), if any
    pub fn all_feeds(&self) -> Option<&[FeedConfig]> {
        self.feeds.as_deref().map(Vec::as_slice)
    }

    /// Build the `.feed-list` menu and load the first feed
    pub async fn init(&self) -> Result<()> {
        let feeds = self.all_feeds().ok_or(FeedError::Undefined)?;

        let links = feeds
            .iter()
            .enumerate()
            .map(|(id, feed)| FeedLink {
                id,
                name: feed.name.clone().unwrap_or_default(),
            })
            .collect();
        self.document.lock().set_feed_links(links);

        self.load(0).await.map(|_| ())
    }

    /// Fetch feed `index` and replace the `.feed` entries with its items
    ///
    /// Returns the number of entries now on the page. On error the document
    /// is left untouched.
    pub async fn load(&self, index: usize) -> Result<usize> {
        let feed = self.feed(index)?;
        let items = self.source.fetch(&feed).await?;

        let mut doc = self.document.lock();
        doc.set_header_title(feed.name.clone().unwrap_or_default());
        doc.replace_entries(items);
        let count = doc.count(Selector::Entry);
        drop(doc);

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "Loaded feed {} ({}) with {} entries",
                index,
                feed.name.as_deref().unwrap_or("unnamed"),
                count
            );
        }

        Ok(count)
    }

    /// Load feed `index` in the background, then invoke `callback` once
    ///
    /// The callback runs after the document has been updated. It also runs
    /// when loading fails, in which case the document is unchanged. Must be
    /// called from within a tokio runtime.
    pub fn load_feed<F>(&self, index: usize, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let app = self.clone();
        tokio::spawn(async move {
            if let Err(e) = app.load(index).await {
                if log::log_enabled!(log::Level::Warn) {
                    log::warn!("Failed to load feed {}: {}", index, e);
                }
            }
            callback();
        });
    }

    /// Simulated click on the first node matching `selector`
    ///
    /// Only `.menu-icon-link` has a handler: it toggles `menu-hidden` on
    /// `body`. Clicking any other supported selector does nothing.
    pub fn click(&self, selector: &str) -> Result<()> {
        if selector.parse::<Selector>()? == Selector::MenuIcon {
            let hidden = self.document.lock().toggle_class(MENU_HIDDEN);
            if log::log_enabled!(log::Level::Trace) {
                log::trace!("Menu {}", if hidden { "hidden" } else { "shown" });
            }
        }
        Ok(())
    }

    /// Simulated click on a `.feed-list` link: hides the menu and loads
    /// that feed in the background
    pub fn click_feed_link(&self, id: usize) -> Result<()> {
        self.feed(id)?;
        self.document.lock().add_class(MENU_HIDDEN);
        self.load_feed(id, || {});
        Ok(())
    }

    /// Whether `body` carries `class`
    pub fn body_has_class(&self, class: &str) -> bool {
        self.document.lock().has_class(class)
    }

    /// Number of nodes matching `selector`
    pub fn count(&self, selector: &str) -> Result<usize> {
        let selector = selector.parse::<Selector>()?;
        Ok(self.document.lock().count(selector))
    }

    /// Number of `.entry` nodes
    pub fn entry_count(&self) -> usize {
        self.document.lock().count(Selector::Entry)
    }

    /// First `.entry` node (`$('.entry')[0]`)
    pub fn first_entry(&self) -> Option<Entry> {
        self.document.lock().entries().first().cloned()
    }

    /// Snapshot of all `.entry` nodes
    pub fn entries(&self) -> Vec<Entry> {
        self.document.lock().entries().to_vec()
    }

    /// Text of `.header-title`
    pub fn header_title(&self) -> String {
        self.document.lock().header_title().to_string()
    }

    /// Snapshot of the `.feed-list` links
    pub fn feed_links(&self) -> Vec<FeedLink> {
        self.document.lock().feed_links().to_vec()
    }

    fn feed(&self, index: usize) -> Result<FeedConfig> {
        let feeds = self.all_feeds().unwrap_or_default();
        feeds
            .get(index)
            .cloned()
            .ok_or(FeedError::IndexOutOfRange {
                index,
                len: feeds.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::default_feeds;
    use crate::source::StaticFeedSource;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn app() -> FeedReader {
        FeedReader::new(default_feeds(), Arc::new(StaticFeedSource::new()))
    }

    #[tokio::test]
    async fn test_init_builds_menu_and_loads_first_feed() {
        let app = app();
        app.init().await.unwrap();

        assert_eq!(app.feed_links().len(), 4);
        assert_eq!(app.feed_links()[3].name, "Linear Digressions");
        assert_eq!(app.header_title(), "Udacity Blog");
        assert!(app.entry_count() > 0);
    }

    #[tokio::test]
    async fn test_init_without_feeds() {
        let app = FeedReader::without_feeds(Arc::new(StaticFeedSource::new()));
        assert_eq!(app.init().await, Err(FeedError::Undefined));
        assert!(app.all_feeds().is_none());
    }

    #[tokio::test]
    async fn test_load_replaces_entries() {
        let app = app();

        app.load(0).await.unwrap();
        let first = app.first_entry().unwrap();

        app.load(2).await.unwrap();
        let second = app.first_entry().unwrap();

        assert_eq!(app.header_title(), "HTML5 Rocks");
        assert!(!second.is_equal_node(Some(&first)));
    }

    #[tokio::test]
    async fn test_load_feed_invokes_callback_after_update() {
        let app = app();
        let (tx, rx) = oneshot::channel();

        let observer = app.clone();
        app.load_feed(1, move || {
            let _ = tx.send(observer.entry_count());
        });

        let count = rx.await.unwrap();
        assert_eq!(count, crate::source::DEFAULT_ENTRIES_PER_FEED);
    }

    #[tokio::test]
    async fn test_load_feed_out_of_range_still_calls_back() {
        let app = app();
        app.load(0).await.unwrap();
        let before = app.entries();

        let (tx, rx) = oneshot::channel();
        app.load_feed(9, move || {
            let _ = tx.send(());
        });
        rx.await.unwrap();

        let after = app.entries();
        assert_eq!(after.len(), before.len());
        assert!(after[0].is_same_node(Some(&before[0])));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_document_unchanged() {
        let source = StaticFeedSource::new().with_failure("http://feeds.feedburner.com/CssTricks");
        let app = FeedReader::new(default_feeds(), Arc::new(source));
        app.load(0).await.unwrap();

        let err = app.load(1).await.unwrap_err();
        assert!(matches!(err, FeedError::Fetch { .. }));
        assert_eq!(app.header_title(), "Udacity Blog");
    }

    #[test]
    fn test_menu_click_toggles() {
        let app = app();
        assert!(app.body_has_class(MENU_HIDDEN));

        app.click(".menu-icon-link").unwrap();
        assert!(!app.body_has_class(MENU_HIDDEN));

        app.click(".menu-icon-link").unwrap();
        assert!(app.body_has_class(MENU_HIDDEN));
    }

    #[test]
    fn test_click_without_handler_and_unknown_selector() {
        let app = app();
        app.click(".feed").unwrap();
        assert!(app.body_has_class(MENU_HIDDEN));

        assert_eq!(
            app.click("#nope"),
            Err(FeedError::UnknownSelector("#nope".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_feed_link_hides_menu_and_loads() {
        let source = StaticFeedSource::new().with_latency(Duration::from_millis(50));
        let app = FeedReader::new(default_feeds(), Arc::new(source));
        app.click(".menu-icon-link").unwrap();

        app.click_feed_link(3).unwrap();
        assert!(app.body_has_class(MENU_HIDDEN));
        assert_eq!(app.entry_count(), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(app.header_title(), "Linear Digressions");

        assert_eq!(
            app.click_feed_link(4),
            Err(FeedError::IndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn test_count_selectors() {
        let app = app();
        assert_eq!(app.count("body").unwrap(), 1);
        assert_eq!(app.count(".entry").unwrap(), 0);
        assert!(app.count("div").is_err());
    }
}
