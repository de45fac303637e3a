//! The fetch → extract → categorize → filter pipeline.
//!
//! An [`Aggregator`] owns everything a request needs: the read-only source
//! registry, a feed fetcher, a content extractor and a categorizer. It is
//! built once at startup and shared by all requests.
//!
//! # Steps, per selected source
//!
//! 1. Fetch the feed and keep the first [`MAX_ENTRIES_PER_SOURCE`] entries
//! 2. Drop entries without a link
//! 3. Use the entry's inline text, or scrape the linked page when it has none
//! 4. Categorize title + text and build an [`Article`]
//! 5. Keep the article if it passes the category filter
//!
//! Sources, entries and scrapes run one after another.
//!
//! # Failures
//!
//! Failures are collected into [`Aggregation::failures`] instead of being
//! propagated. A feed that cannot be fetched contributes nothing; a page
//! that cannot be scraped drops only its own entry. Only an unknown source
//! name is an error for the whole call.

use crate::categorize::Categorizer;
use crate::config::SourceRegistry;
use crate::error::{NewsError, Result};
use crate::models::{Article, DEFAULT_TITLE, FeedEntry, FeedProbe, Source};
use crate::scrapers::{ContentExtractor, FeedFetcher};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Entries considered per feed. Bounds outbound requests per call.
pub const MAX_ENTRIES_PER_SOURCE: usize = 5;

/// The literal that selects everything.
pub const ALL: &str = "all";

/// A `source` or `category` request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Only(String),
}

impl Filter {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        if value == ALL {
            Filter::All
        } else {
            Filter::Only(value.to_string())
        }
    }
}

/// Something that went wrong for one source or one entry.
#[derive(Debug)]
pub struct Failure {
    pub source: String,
    /// Set when the failure concerns a single entry rather than the feed.
    pub link: Option<String>,
    pub error: NewsError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.link {
            Some(link) => write!(f, "{} ({}): {}", self.source, link, self.error),
            None => write!(f, "{}: {}", self.source, self.error),
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub articles: Vec<Article>,
    pub failures: Vec<Failure>,
}

/// Summary text for an article. Identity: the full text is served as is.
pub fn summarize(content: String) -> String {
    content
}

pub struct Aggregator<F, E> {
    registry: Arc<SourceRegistry>,
    fetcher: F,
    extractor: E,
    categorizer: Box<dyn Categorizer>,
}

impl<F, E> Aggregator<F, E>
where
    F: FeedFetcher,
    E: ContentExtractor,
{
    pub fn new(
        registry: Arc<SourceRegistry>,
        fetcher: F,
        extractor: E,
        categorizer: Box<dyn Categorizer>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            extractor,
            categorizer,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    fn select_sources(&self, filter: &Filter) -> Result<Vec<&Source>> {
        match filter {
            Filter::All => Ok(self.registry.iter().collect()),
            Filter::Only(name) => self
                .registry
                .get(name)
                .map(|source| vec![source])
                .ok_or_else(|| NewsError::UnknownSource(name.clone())),
        }
    }

    /// Run the pipeline for the selected sources and keep the articles
    /// whose category passes `category`.
    #[instrument(level = "info", skip(self))]
    pub async fn aggregate(&self, source: &Filter, category: &Filter) -> Result<Aggregation> {
        let sources = self.select_sources(source)?;
        let mut aggregation = Aggregation::default();

        for source in sources {
            self.collect_source(source, category, &mut aggregation).await;
        }

        info!(
            articles = aggregation.articles.len(),
            failures = aggregation.failures.len(),
            "Aggregation complete"
        );
        Ok(aggregation)
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn collect_source(&self, source: &Source, category: &Filter, out: &mut Aggregation) {
        let entries = match self.fetcher.fetch(&source.url).await {
            Ok(entries) => entries,
            Err(error) => {
                error!(source = %source.name, error = %error, "Feed fetch failed; skipping source");
                out.failures.push(Failure {
                    source: source.name.clone(),
                    link: None,
                    error,
                });
                return;
            }
        };

        let total = entries.len();
        let mut kept = 0usize;
        for entry in entries.into_iter().take(MAX_ENTRIES_PER_SOURCE) {
            match self.build_article(source, entry).await {
                Ok(Some(article)) => {
                    if category.matches(article.category.as_str()) {
                        kept += 1;
                        out.articles.push(article);
                    }
                }
                Ok(None) => {}
                Err((link, error)) => {
                    warn!(source = %source.name, %link, error = %error, "Scrape failed; skipping entry");
                    out.failures.push(Failure {
                        source: source.name.clone(),
                        link: Some(link),
                        error,
                    });
                }
            }
        }
        debug!(total, kept, "Processed source");
    }

    /// `Ok(None)` for entries without a link.
    async fn build_article(
        &self,
        source: &Source,
        entry: FeedEntry,
    ) -> std::result::Result<Option<Article>, (String, NewsError)> {
        let Some(link) = entry.link else {
            debug!(title = ?entry.title, "Entry has no link; dropping");
            return Ok(None);
        };

        let content = match entry.content.filter(|c| !c.is_empty()) {
            Some(inline) => inline,
            None => match self.extractor.extract(&link).await {
                Ok(text) => text,
                Err(error) => return Err((link, error)),
            },
        };

        let category = self
            .categorizer
            .categorize(entry.title.as_deref().unwrap_or(""), &content);
        let title = entry.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(Some(Article {
            title,
            source: source.name.clone(),
            summary: summarize(content),
            category,
            link,
            timestamp: entry.published.unwrap_or_default(),
        }))
    }

    /// Fetch one registered feed and report how many entries it has.
    #[instrument(level = "info", skip(self))]
    pub async fn probe(&self, name: &str) -> Result<FeedProbe> {
        let source = self
            .registry
            .get(name)
            .ok_or_else(|| NewsError::UnknownSource(name.to_string()))?;

        match self.fetcher.fetch(&source.url).await {
            Ok(entries) => {
                info!(count = entries.len(), "Probed feed");
                Ok(FeedProbe::from_entries(source, entries.len()))
            }
            Err(error) => {
                warn!(error = %error, "Probe could not read feed");
                Ok(FeedProbe::from_error(source, error.to_string()))
            }
        }
    }
}
