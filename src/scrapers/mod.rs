//! Outbound fetching: feeds and article pages.
//!
//! The pipeline talks to the network through two small traits so that it
//! can be driven by canned data in tests:
//!
//! | Trait | Production impl | Module | Purpose |
//! |-------|-----------------|--------|---------|
//! | [`FeedFetcher`] | [`feed::RssFetcher`] | [`feed`] | Download and parse an RSS/Atom feed |
//! | [`ContentExtractor`] | [`page::PageExtractor`] | [`page`] | Scrape paragraph text from an article page |
//!
//! Both production impls share one [`reqwest::Client`] built by
//! [`http_client`]. Neither retries; a failure is returned to the caller
//! as a [`NewsError`](crate::error::NewsError).

use crate::error::Result;
use crate::models::FeedEntry;
use std::future::Future;
use std::time::Duration;

pub mod feed;
pub mod page;

/// Identity sent on feed requests.
pub const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Downloads a feed and returns its entries in document order.
pub trait FeedFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<FeedEntry>>> + Send;
}

/// Downloads an article page and returns its readable text.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Build the HTTP client shared by the fetchers.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(CLIENT_USER_AGENT)
        .timeout(timeout)
        .build()
}
