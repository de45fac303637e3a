//! # newsdesk
//!
//! Aggregates articles from a fixed set of RSS/Atom feeds, assigns each a
//! coarse topic category by keyword matching, and serves the result as
//! JSON to a small web front end.
//!
//! ## Usage
//!
//! ```sh
//! newsdesk --bind 127.0.0.1:5000
//! curl 'http://127.0.0.1:5000/fetch_news?source=SEC&category=finance'
//! ```
//!
//! ## Architecture
//!
//! Each `/fetch_news` request runs one pass of the pipeline:
//! 1. **Fetching**: download and parse the selected feeds (first 5 entries each)
//! 2. **Extraction**: scrape the linked page for entries without inline text
//! 3. **Categorizing**: first-match keyword lookup over title and text
//! 4. **Filtering**: keep the requested category and return JSON
//!
//! Nothing is cached or persisted between requests.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod categorize;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod test_utils;
mod utils;

use categorize::{Categorizer, KeywordCategorizer, TokenCategorizer};
use cli::{CategorizerKind, Cli};
use config::SourceRegistry;
use pipeline::Aggregator;
use scrapers::{feed::RssFetcher, http_client, page::PageExtractor};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "newsdesk starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let registry = Arc::new(SourceRegistry::load(args.sources.as_deref()).await?);
    info!(sources = ?registry.names().collect::<Vec<_>>(), "Serving sources");

    let client = http_client(Duration::from_secs(args.timeout_secs))?;
    let categorizer: Box<dyn Categorizer> = match args.categorizer {
        CategorizerKind::Keyword => Box::new(KeywordCategorizer),
        CategorizerKind::Token => Box::new(TokenCategorizer),
    };
    info!(categorizer = ?args.categorizer, timeout_secs = args.timeout_secs, "Pipeline configured");

    let aggregator = Aggregator::new(
        registry,
        RssFetcher::new(client.clone()),
        PageExtractor::new(client),
        categorizer,
    );

    api::serve(args.bind, api::router(aggregator)).await?;

    info!("newsdesk stopped");
    Ok(())
}
