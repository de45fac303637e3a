//! Data models shared by the fetchers, the pipeline and the HTTP surface.
//!
//! - [`Source`]: one registry entry (name and feed URL)
//! - [`FeedEntry`]: one item parsed out of a feed, fields all optional
//! - [`Article`]: the output record served by `/fetch_news`
//! - [`Category`]: the coarse topic label assigned by a categorizer
//! - [`FeedProbe`]: the diagnostic record served by `/test_feed`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when a feed entry carries none.
pub const DEFAULT_TITLE: &str = "No Title";

/// A named feed in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Human-readable name, unique within a registry.
    pub name: String,
    /// Absolute URL of the RSS/Atom document.
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One entry of a parsed feed.
///
/// Feeds are inconsistent about which fields they fill in, so every field
/// is optional and empty strings are normalized to `None` by the fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// The feed's own summary/description for the entry.
    pub content: Option<String>,
    /// Publish time as rendered by the fetcher. Opaque to everything else.
    pub published: Option<String>,
}

/// Coarse topic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Politics,
    War,
    Finance,
    Other,
}

impl Category {
    /// Every label, in the order the front end lists them.
    pub const ALL: [Category; 4] = [
        Category::Politics,
        Category::War,
        Category::Finance,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Politics => "politics",
            Category::War => "war",
            Category::Finance => "finance",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An aggregated article as returned to the front end.
///
/// `summary` is the full resolved content of the entry; nothing is cut.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub summary: String,
    pub category: Category,
    pub link: String,
    pub timestamp: String,
}

/// Outcome label of a feed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ProbeStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "no entries")]
    NoEntries,
}

/// Result of probing a single registered feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedProbe {
    pub source: String,
    pub url: String,
    pub status: ProbeStatus,
    /// Number of parsed entries. Not capped.
    pub entry_count: usize,
    /// Why the feed could not be read, when it could not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedProbe {
    pub fn from_entries(source: &Source, entry_count: usize) -> Self {
        Self {
            source: source.name.clone(),
            url: source.url.clone(),
            status: if entry_count > 0 {
                ProbeStatus::Success
            } else {
                ProbeStatus::NoEntries
            },
            entry_count,
            error: None,
        }
    }

    pub fn from_error(source: &Source, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::from_entries(source, 0)
        }
    }
}
