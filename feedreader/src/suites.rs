// File: feedreader/src/suites.rs
//
// The four suites run against the feed reader page.
//
// Every suite gets its own clone of the page handle; the clones share one
// document, so the order in which suites are registered is the order in
// which they observe each other's effects. "New Feed Selection" restores
// the first feed in its afterAll hook.

use parking_lot::Mutex;
use std::sync::Arc;

use feedreader_testing_framework::prelude::*;

use crate::app::FeedReader;
use crate::dom::{Entry, MENU_HIDDEN};

/// Selector of the hamburger icon that toggles the menu
pub const MENU_ICON: &str = ".menu-icon-link";

/// Build a registry holding every suite, in page order
pub fn registry(app: &FeedReader) -> Registry {
    let mut registry = Registry::new();
    register(&mut registry, app);
    registry
}

/// Register every suite on an existing registry
pub fn register(registry: &mut Registry, app: &FeedReader) {
    rss_feeds(registry, app);
    the_menu(registry, app);
    initial_entries(registry, app);
    new_feed_selection(registry, app);
}

/// "RSS Feeds": the feed list is defined and every record is complete
pub fn rss_feeds(registry: &mut Registry, app: &FeedReader) {
    registry.describe("RSS Feeds", |s| {
        s.it("are defined", {
            let app = app.clone();
            move |ctx| {
                let feeds = app.all_feeds();
                ctx.expect(feeds).to_be_defined();
                ctx.expect(feeds.map_or(0, |f| f.len())).not().to_be(0);
            }
        });

        s.it("all have a URL defined", {
            let app = app.clone();
            move |ctx| {
                for feed in app.all_feeds().unwrap_or_default() {
                    ctx.expect(feed.url.as_deref()).to_be_defined();
                    ctx.expect(feed.url.as_deref()).not().to_be(Some(""));
                }
            }
        });

        s.it("all have a name defined", {
            let app = app.clone();
            move |ctx| {
                for feed in app.all_feeds().unwrap_or_default() {
                    ctx.expect(feed.name.as_deref()).to_be_defined();
                    ctx.expect(feed.name.as_deref()).not().to_be(Some(""));
                }
            }
        });

        Ok(())
    });
}

/// "The menu": hidden by default, toggled by the menu icon
pub fn the_menu(registry: &mut Registry, app: &FeedReader) {
    registry.describe("The menu", |s| {
        s.it("is hidden by default", {
            let app = app.clone();
            move |ctx| {
                ctx.expect(app.body_has_class(MENU_HIDDEN)).to_be(true);
            }
        });

        s.it("changes visibility when menu icon is clicked", {
            let app = app.clone();
            move |ctx| {
                for expected_hidden in [false, true] {
                    if let Err(e) = app.click(MENU_ICON) {
                        ctx.fail(e.to_string());
                        return;
                    }
                    ctx.expect(app.body_has_class(MENU_HIDDEN))
                        .to_be(expected_hidden);
                }
            }
        });

        Ok(())
    });
}

/// "Initial Entries": loading the first feed puts entries on the page
pub fn initial_entries(registry: &mut Registry, app: &FeedReader) {
    registry.describe("Initial Entries", |s| {
        s.before_each_async({
            let app = app.clone();
            move |_, done| app.load_feed(0, done.into_callback())
        });

        s.it_async("are defined after calling loadFeed function", {
            let app = app.clone();
            move |ctx, done| {
                ctx.expect(app.entry_count()).to_be_greater_than(0);
                done.call();
            }
        });

        Ok(())
    });
}

/// "New Feed Selection": loading another feed changes the entries
pub fn new_feed_selection(registry: &mut Registry, app: &FeedReader) {
    registry.describe("New Feed Selection", |s| {
        // First entry of feed 0, captured before feed 2 is loaded
        let old_entry: Arc<Mutex<Option<Entry>>> = Arc::new(Mutex::new(None));

        s.before_each_async({
            let app = app.clone();
            let old_entry = old_entry.clone();
            move |_, done| {
                let reloaded = app.clone();
                let old_entry = old_entry.clone();
                app.load_feed(0, move || {
                    *old_entry.lock() = reloaded.first_entry();
                    reloaded.load_feed(2, done.into_callback());
                });
            }
        });

        s.after_all_async({
            let app = app.clone();
            move |_, done| app.load_feed(0, done.into_callback())
        });

        s.it_async("changes the content of the RSS feed entries", {
            let app = app.clone();
            move |ctx, done| {
                let current = app.first_entry();
                ctx.expect(current.as_ref().map(Entry::title)).to_be_defined();
                if let Some(current) = current {
                    let previous = old_entry.lock().clone();
                    ctx.expect(current.is_equal_node(previous.as_ref()))
                        .to_be(false);
                }
                done.call();
            }
        });

        Ok(())
    });
}
