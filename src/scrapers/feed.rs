//! RSS/Atom feed fetching.
//!
//! Feeds are downloaded with the shared client and parsed with `feed-rs`,
//! which handles RSS 0.9x/1.0/2.0, Atom and JSON Feed alike. Entries are
//! reduced to the four fields the pipeline cares about.
//!
//! `feed-rs` only keeps dates it could parse, normalized to UTC. Publish
//! dates are served exactly as the feed wrote them, so a second pass over
//! the document ([`raw_publish_dates`]) reads them as text, one slot per
//! entry in document order.

use super::FeedFetcher;
use crate::error::{NewsError, Result};
use crate::models::FeedEntry;
use feed_rs::parser::{self, ParseFeedError};
use quick_xml::{Reader, events::Event};
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

/// Entry containers: RSS `item`, Atom `entry`.
const ENTRY_ELEMENTS: [&[u8]; 2] = [b"item", b"entry"];

/// Publish date elements by local name: RSS 2.0 `pubDate`, Atom
/// `published`, RSS 1.0 `dc:date`. Atom `updated` is not a publish date.
const DATE_ELEMENTS: [&[u8]; 3] = [b"pubDate", b"published", b"date"];

/// [`FeedFetcher`] backed by HTTP.
#[derive(Debug, Clone)]
pub struct RssFetcher {
    client: Client,
}

impl RssFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl FeedFetcher for RssFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| NewsError::feed_fetch(url, e))?
            .bytes()
            .await
            .map_err(|e| NewsError::feed_fetch(url, e))?;
        debug!(bytes = body.len(), "Downloaded feed");

        let entries = parse_feed(&body).map_err(|e| NewsError::feed_fetch(url, e))?;
        info!(count = entries.len(), "Parsed feed");
        Ok(entries)
    }
}

/// Parse a feed document into entries.
pub fn parse_feed(body: &[u8]) -> std::result::Result<Vec<FeedEntry>, ParseFeedError> {
    let feed = parser::parse(body)?;
    let mut dates = raw_publish_dates(body).unwrap_or_default();
    if dates.len() != feed.entries.len() {
        debug!(
            entries = feed.entries.len(),
            dates = dates.len(),
            "Publish dates do not line up with entries; dropping them"
        );
        dates = vec![None; feed.entries.len()];
    }

    Ok(feed
        .entries
        .into_iter()
        .zip(dates)
        .map(|(entry, published)| to_feed_entry(entry, published))
        .collect())
}

/// The publish date text of every entry, in document order.
///
/// `None` when the document cannot be read this way.
pub fn raw_publish_dates(body: &[u8]) -> Option<Vec<Option<String>>> {
    if body.trim_ascii_start().starts_with(b"{") {
        return json_publish_dates(body);
    }

    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut dates: Vec<Option<String>> = Vec::new();
    let mut in_entry = false;
    let mut capture: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).ok()? {
            Event::Start(e) => {
                let name = e.local_name();
                if !in_entry && ENTRY_ELEMENTS.contains(&name.as_ref()) {
                    in_entry = true;
                    dates.push(None);
                } else if in_entry && DATE_ELEMENTS.contains(&name.as_ref()) {
                    capture = Some(String::new());
                }
            }
            Event::Empty(e) => {
                if !in_entry && ENTRY_ELEMENTS.contains(&e.local_name().as_ref()) {
                    dates.push(None);
                }
            }
            Event::Text(text) => {
                if let Some(value) = capture.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(text) => {
                if let Some(value) = capture.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if in_entry && ENTRY_ELEMENTS.contains(&name.as_ref()) {
                    in_entry = false;
                    capture = None;
                } else if DATE_ELEMENTS.contains(&name.as_ref()) {
                    if let (Some(value), Some(slot)) = (capture.take(), dates.last_mut()) {
                        if slot.is_none() {
                            *slot = non_empty(value.trim().to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Some(dates)
}

fn json_publish_dates(body: &[u8]) -> Option<Vec<Option<String>>> {
    let feed: serde_json::Value = serde_json::from_slice(body).ok()?;
    let items = feed.get("items")?.as_array()?;
    Some(
        items
            .iter()
            .map(|item| {
                item.get("date_published")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
                    .and_then(non_empty)
            })
            .collect(),
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// The article link: the `alternate` link (or one without a `rel`), else
/// whatever link comes first.
fn article_link(links: Vec<feed_rs::model::Link>) -> Option<String> {
    let alternate = links
        .iter()
        .position(|l| matches!(l.rel.as_deref(), None | Some("alternate")));
    links
        .into_iter()
        .nth(alternate.unwrap_or(0))
        .map(|l| l.href)
        .and_then(non_empty)
}

fn to_feed_entry(entry: feed_rs::model::Entry, published: Option<String>) -> FeedEntry {
    let title = entry.title.map(|t| t.content).and_then(non_empty);
    let link = article_link(entry.links);
    let content = entry
        .summary
        .map(|s| s.content)
        .and_then(non_empty)
        .or_else(|| entry.content.and_then(|c| c.body).and_then(non_empty));

    FeedEntry {
        title,
        link,
        content,
        published,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Press Releases</title>
    <link>https://example.com</link>
    <description>Test feed</description>
    <item>
      <title>Senate passes budget</title>
      <link>https://example.com/budget</link>
      <description>Hello world</description>
      <pubDate>Tue, 10 Jun 2025 14:30:00 GMT</pubDate>
    </item>
    <item>
      <title>No body here</title>
      <link>https://example.com/empty</link>
    </item>
    <item>
      <description>Untitled and unlinked</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test</title>
  <id>urn:test</id>
  <updated>2025-06-10T14:30:00Z</updated>
  <entry>
    <title>Market update</title>
    <id>urn:test:1</id>
    <link href="https://example.com/market"/>
    <updated>2025-06-10T14:30:00Z</updated>
    <content type="text">Stocks rose.</content>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_entries() {
        let entries = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].title.as_deref(), Some("Senate passes budget"));
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/budget"));
        assert_eq!(entries[0].content.as_deref(), Some("Hello world"));
        assert_eq!(
            entries[0].published.as_deref(),
            Some("Tue, 10 Jun 2025 14:30:00 GMT")
        );

        assert_eq!(entries[1].content, None);
        assert_eq!(entries[1].published, None);

        assert_eq!(entries[2].title, None);
        assert_eq!(entries[2].link, None);
    }

    #[test]
    fn test_parse_atom_falls_back_to_content() {
        let entries = parse_feed(ATOM.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/market"));
        assert_eq!(entries[0].content.as_deref(), Some("Stocks rose."));
        // `updated` is not a publish date.
        assert_eq!(entries[0].published, None);
    }

    #[test]
    fn test_rss_dates_are_kept_verbatim() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Dates</title>
    <link>https://example.com</link>
    <description>d</description>
    <pubDate>Mon, 09 Jun 2025 00:00:00 GMT</pubDate>
    <item>
      <title>Eastern</title>
      <link>https://example.com/1</link>
      <pubDate>Tue, 10 Jun 2025 10:30:00 EDT</pubDate>
    </item>
    <item>
      <title>Free-form</title>
      <link>https://example.com/2</link>
      <pubDate>June 10th 2025</pubDate>
    </item>
    <item>
      <title>Undated</title>
      <link>https://example.com/3</link>
    </item>
  </channel>
</rss>"#;
        let entries = parse_feed(rss.as_bytes()).unwrap();
        let dates: Vec<Option<&str>> = entries.iter().map(|e| e.published.as_deref()).collect();
        assert_eq!(
            dates,
            vec![
                Some("Tue, 10 Jun 2025 10:30:00 EDT"),
                Some("June 10th 2025"),
                None
            ]
        );
    }

    #[test]
    fn test_atom_published_is_kept_verbatim() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Dates</title>
  <id>urn:dates</id>
  <updated>2025-06-11T00:00:00Z</updated>
  <entry>
    <title>Published</title>
    <id>urn:dates:1</id>
    <link href="https://example.com/1"/>
    <published>2025-06-10T14:30:00Z</published>
    <updated>2025-06-11T09:00:00+02:00</updated>
  </entry>
</feed>"#;
        let entries = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(entries[0].published.as_deref(), Some("2025-06-10T14:30:00Z"));
    }

    #[test]
    fn test_atom_link_prefers_alternate() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Links</title>
  <id>urn:links</id>
  <updated>2025-06-10T14:30:00Z</updated>
  <entry>
    <title>Comments first</title>
    <id>urn:links:1</id>
    <link rel="replies" href="https://example.com/x/comments"/>
    <link rel="alternate" href="https://example.com/x"/>
    <updated>2025-06-10T14:30:00Z</updated>
  </entry>
  <entry>
    <title>Only an edit link</title>
    <id>urn:links:2</id>
    <link rel="edit" href="https://example.com/y/edit"/>
    <updated>2025-06-10T14:30:00Z</updated>
  </entry>
</feed>"#;
        let entries = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/x"));
        assert_eq!(entries[1].link.as_deref(), Some("https://example.com/y/edit"));
    }

    #[test]
    fn test_json_feed_dates_are_kept_verbatim() {
        let json = r#"{
  "version": "https://jsonfeed.org/version/1.1",
  "title": "JSON",
  "items": [
    { "id": "1", "url": "https://example.com/1", "title": "One",
      "content_text": "x", "date_published": "2025-06-10T10:30:00-04:00" },
    { "id": "2", "url": "https://example.com/2", "title": "Two", "content_text": "y" }
  ]
}"#;
        let entries = parse_feed(json.as_bytes()).unwrap();
        assert_eq!(entries[0].published.as_deref(), Some("2025-06-10T10:30:00-04:00"));
        assert_eq!(entries[1].published, None);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_feed(b"this is not a feed").is_err());
    }

    #[tokio::test]
    async fn test_fetch_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = RssFetcher::new(Client::new());
        let entries = fetcher.fetch(&format!("{}/rss", server.uri())).await.unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_feed_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = RssFetcher::new(Client::new());
        let err = fetcher
            .fetch(&format!("{}/rss", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::FeedFetch { .. }));
    }

    #[tokio::test]
    async fn test_fetch_unparsable_body_is_feed_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let fetcher = RssFetcher::new(Client::new());
        let err = fetcher
            .fetch(&format!("{}/rss", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::FeedFetch { .. }));
    }
}
