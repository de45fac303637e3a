//! In-memory fetchers for driving the pipeline and router in tests.

use crate::config::SourceRegistry;
use crate::error::{NewsError, Result};
use crate::models::{FeedEntry, Source};
use crate::scrapers::{ContentExtractor, FeedFetcher};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn registry(sources: &[(&str, &str)]) -> SourceRegistry {
    SourceRegistry::new(
        sources
            .iter()
            .map(|(name, url)| Source::new(*name, *url))
            .collect(),
    )
    .unwrap()
}

pub fn entry(title: Option<&str>, link: Option<&str>, content: Option<&str>) -> FeedEntry {
    FeedEntry {
        title: title.map(str::to_string),
        link: link.map(str::to_string),
        content: content.map(str::to_string),
        published: None,
    }
}

/// Serves canned entries per feed URL. Unknown URLs yield an empty feed.
#[derive(Debug, Default, Clone)]
pub struct FakeFetcher {
    feeds: HashMap<String, Vec<FeedEntry>>,
    failing: Vec<String>,
}

impl FakeFetcher {
    pub fn with_entries(mut self, url: &str, entries: Vec<FeedEntry>) -> Self {
        self.feeds.insert(url.to_string(), entries);
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }
}

impl FeedFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        if self.failing.iter().any(|u| u == url) {
            return Err(NewsError::feed_fetch(url, "simulated outage"));
        }
        Ok(self.feeds.get(url).cloned().unwrap_or_default())
    }
}

/// Serves canned page text and records every URL it was asked for.
/// Unknown URLs fail with a scrape error.
#[derive(Debug, Default, Clone)]
pub struct FakeExtractor {
    pages: HashMap<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeExtractor {
    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContentExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| NewsError::scrape(url, "simulated 404"))
    }
}
