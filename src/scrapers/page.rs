//! Fallback content extraction for entries whose feed carries no text.
//!
//! The page is fetched with a desktop browser User-Agent (some origins
//! refuse anything else) and reduced to the text of its `<p>` elements,
//! joined by single spaces in document order.

use super::ContentExtractor;
use crate::error::{NewsError, Result};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::{Client, Response, header::USER_AGENT};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

/// User-Agent sent when scraping article pages.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("`p` is a valid selector"));

/// [`ContentExtractor`] backed by HTTP and `scraper`.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    client: Client,
}

impl PageExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ContentExtractor for PageExtractor {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Result<String> {
        let html = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| NewsError::scrape(url, e))?
            .text()
            .await
            .map_err(|e| NewsError::scrape(url, e))?;

        let text = paragraph_text(&html);
        debug!(
            bytes = text.len(),
            preview = %truncate_for_log(&text, 120),
            "Extracted paragraph text"
        );
        Ok(text)
    }
}

/// Text of every `<p>` in `html`, space-joined in document order.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>())
        .join(" ")
}
