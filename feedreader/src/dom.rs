// File: feedreader/src/dom.rs
//
// Minimal document model of the feed reader page.
//
// Only the parts the suites look at exist: the body class list, the header
// title, the `.feed` container with its `.entry` nodes and the `.feed-list`
// menu links. Every entry gets a fresh node id when inserted, so identity
// (`is_same_node`) and structure (`is_equal_node`) can be told apart.

use std::str::FromStr;

use crate::error::FeedError;

/// Class on `body` while the slide-out menu is hidden
pub const MENU_HIDDEN: &str = "menu-hidden";

/// Node identifier, unique within one document
pub type NodeId = u64;

/// Supported selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `body`
    Body,
    /// `.header-title`
    HeaderTitle,
    /// `.menu-icon-link`
    MenuIcon,
    /// `.feed`
    Feed,
    /// `.entry`
    Entry,
    /// `.feed-list`
    FeedList,
    /// `.feed-list a`
    FeedLink,
}

impl FromStr for Selector {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let selector = match s.trim() {
            "body" => Selector::Body,
            ".header-title" => Selector::HeaderTitle,
            ".menu-icon-link" => Selector::MenuIcon,
            ".feed" => Selector::Feed,
            ".entry" | ".feed .entry" => Selector::Entry,
            ".feed-list" => Selector::FeedList,
            ".feed-list a" => Selector::FeedLink,
            other => return Err(FeedError::UnknownSelector(other.to_string())),
        };
        Ok(selector)
    }
}

/// Content of one feed item, as delivered by a feed source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Article link
    pub link: String,
    /// Article title
    pub title: String,
    /// Short excerpt
    pub snippet: String,
}

/// An `.entry` node inside `.feed`
#[derive(Debug, Clone)]
pub struct Entry {
    id: NodeId,
    item: FeedItem,
}

impl Entry {
    /// Node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Article link
    pub fn link(&self) -> &str {
        &self.item.link
    }

    /// Article title
    pub fn title(&self) -> &str {
        &self.item.title
    }

    /// Short excerpt
    pub fn snippet(&self) -> &str {
        &self.item.snippet
    }

    /// Same node, not merely equal content
    pub fn is_same_node(&self, other: Option<&Entry>) -> bool {
        other.map_or(false, |o| o.id == self.id)
    }

    /// Structurally equal: same link, title and snippet
    pub fn is_equal_node(&self, other: Option<&Entry>) -> bool {
        other.map_or(false, |o| o.item == self.item)
    }
}

/// A link in the `.feed-list` menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLink {
    /// Index into the feed list
    pub id: usize,
    /// Link text
    pub name: String,
}

/// The page
#[derive(Debug)]
pub struct Document {
    body_classes: Vec<String>,
    header_title: String,
    entries: Vec<Entry>,
    feed_links: Vec<FeedLink>,
    next_node_id: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Fresh page: menu hidden, no entries, empty title
    pub fn new() -> Self {
        Self {
            body_classes: vec![MENU_HIDDEN.to_string()],
            header_title: String::new(),
            entries: Vec::new(),
            feed_links: Vec::new(),
            next_node_id: 1,
        }
    }

    /// Whether `body` carries `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.body_classes.iter().any(|c| c == class)
    }

    /// Add `class` to `body` if absent
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.body_classes.push(class.to_string());
        }
    }

    /// Remove `class` from `body`
    pub fn remove_class(&mut self, class: &str) {
        self.body_classes.retain(|c| c != class);
    }

    /// Flip `class` on `body`; returns whether it is now present
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    /// Classes on `body`, in insertion order
    pub fn body_classes(&self) -> &[String] {
        &self.body_classes
    }

    /// Text of `.header-title`
    pub fn header_title(&self) -> &str {
        &self.header_title
    }

    /// Replace the `.header-title` text
    pub fn set_header_title(&mut self, title: impl Into<String>) {
        self.header_title = title.into();
    }

    /// `.entry` nodes in document order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Empty `.feed` and insert one new `.entry` node per item
    pub fn replace_entries(&mut self, items: Vec<FeedItem>) {
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            entries.push(Entry {
                id: self.next_node_id,
                item,
            });
            self.next_node_id += 1;
        }
        self.entries = entries;
    }

    /// `.feed-list` links
    pub fn feed_links(&self) -> &[FeedLink] {
        &self.feed_links
    }

    /// Rebuild the `.feed-list` menu
    pub fn set_feed_links(&mut self, links: Vec<FeedLink>) {
        self.feed_links = links;
    }

    /// Number of nodes matching `selector` (`$(selector).length`)
    pub fn count(&self, selector: Selector) -> usize {
        match selector {
            Selector::Entry => self.entries.len(),
            Selector::FeedLink => self.feed_links.len(),
            Selector::Body
            | Selector::HeaderTitle
            | Selector::MenuIcon
            | Selector::Feed
            | Selector::FeedList => 1,
        }
    }
}
