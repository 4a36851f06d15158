// File: feedreader/src/feeds.rs
//
// Feed configuration: the ordered list of feeds the page offers.
//
// Records are external data, so both fields are optional here. A record
// with a missing or empty field is still loaded; it is the "RSS Feeds"
// suite that reports it.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FeedError, Result};

/// One entry of the feed list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Display name, used as the header title once loaded
    #[serde(default)]
    pub name: Option<String>,
    /// Feed URL handed to the feed source
    #[serde(default)]
    pub url: Option<String>,
}

impl FeedConfig {
    /// Record with both fields set
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
        }
    }
}

/// The feeds the page ships with
pub fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("Udacity Blog", "http://blog.udacity.com/feed"),
        FeedConfig::new("CSS Tricks", "http://feeds.feedburner.com/CssTricks"),
        FeedConfig::new("HTML5 Rocks", "http://feeds.feedburner.com/html5rocks"),
        FeedConfig::new(
            "Linear Digressions",
            "http://feeds.feedburner.com/udacity-linear-digressions",
        ),
    ]
}

/// Check that the list is non-empty and every record has a name and a URL
pub fn validate(feeds: &[FeedConfig]) -> Result<()> {
    if feeds.is_empty() {
        return Err(FeedError::EmptyFeedList);
    }

    for (index, feed) in feeds.iter().enumerate() {
        if feed.name.as_deref().map_or(true, str::is_empty) {
            return Err(FeedError::InvalidFeed {
                index,
                field: "name",
            });
        }
        if feed.url.as_deref().map_or(true, str::is_empty) {
            return Err(FeedError::InvalidFeed { index, field: "url" });
        }
    }

    Ok(())
}

/// Encoding of a feed list file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl FeedFormat {
    /// Pick the format from the file extension; anything that is not
    /// `.json` is read as YAML, which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FeedFormat::Json,
            _ => FeedFormat::Yaml,
        }
    }
}

/// Parse a feed list: a sequence of `{name, url}` records
pub fn parse_feeds(content: &str, format: FeedFormat) -> Result<Vec<FeedConfig>> {
    match format {
        FeedFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| FeedError::Parse(e.to_string()))
        }
        FeedFormat::Json => {
            serde_json::from_str(content).map_err(|e| FeedError::Parse(e.to_string()))
        }
    }
}

/// Read and parse a feed list file
pub async fn load_feeds(path: impl AsRef<Path>) -> anyhow::Result<Vec<FeedConfig>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read feed list {}", path.display()))?;

    let feeds = parse_feeds(&content, FeedFormat::from_path(path))
        .with_context(|| format!("Failed to parse feed list {}", path.display()))?;

    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Loaded {} feeds from {}", feeds.len(), path.display());
    }

    Ok(feeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feeds_are_valid() {
        let feeds = default_feeds();
        assert_eq!(feeds.len(), 4);
        assert_eq!(feeds[0].name.as_deref(), Some("Udacity Blog"));
        assert_eq!(
            feeds[2].url.as_deref(),
            Some("http://feeds.feedburner.com/html5rocks")
        );
        assert!(validate(&feeds).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_list() {
        assert_eq!(validate(&[]), Err(FeedError::EmptyFeedList));
    }

    #[test]
    fn test_validate_reports_first_bad_record() {
        let feeds = vec![
            FeedConfig::new("Good", "http://example.com/feed"),
            FeedConfig {
                name: Some("No URL".to_string()),
                url: Some(String::new()),
            },
            FeedConfig {
                name: None,
                url: None,
            },
        ];

        assert_eq!(
            validate(&feeds),
            Err(FeedError::InvalidFeed {
                index: 1,
                field: "url"
            })
        );
    }

    #[test]
    fn test_parse_yaml_with_missing_field() {
        let yaml = r#"
- name: Udacity Blog
  url: http://blog.udacity.com/feed
- name: Nameless URL
"#;
        let feeds = parse_feeds(yaml, FeedFormat::Yaml).unwrap();
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[1].url, None);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[{"name": "CSS Tricks", "url": "http://feeds.feedburner.com/CssTricks"}]"#;
        let feeds = parse_feeds(json, FeedFormat::Json).unwrap();
        assert_eq!(
            feeds,
            vec![FeedConfig::new(
                "CSS Tricks",
                "http://feeds.feedburner.com/CssTricks"
            )]
        );
    }

    #[test]
    fn test_parse_error() {
        let err = parse_feeds("{ not a list", FeedFormat::Json).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FeedFormat::from_path(Path::new("feeds.JSON")), FeedFormat::Json);
        assert_eq!(FeedFormat::from_path(Path::new("feeds.yml")), FeedFormat::Yaml);
        assert_eq!(FeedFormat::from_path(Path::new("feeds")), FeedFormat::Yaml);
    }

    #[tokio::test]
    async fn test_load_feeds_from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("feeds.json");
        tokio::fs::write(&path, serde_json::to_string(&default_feeds())?).await?;

        let feeds = load_feeds(&path).await?;
        assert_eq!(feeds, default_feeds());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_feeds_missing_file() {
        let err = load_feeds("/nonexistent/feeds.yaml").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read feed list"));
    }
}
