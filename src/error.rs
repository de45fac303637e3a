//! Error types for fetching, scraping and source lookup.
//!
//! Every failure the pipeline can run into is a [`NewsError`]. The pipeline
//! records feed and scrape failures instead of propagating them; only
//! [`NewsError::UnknownSource`] normally reaches an HTTP handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum NewsError {
    /// The feed could not be downloaded or parsed.
    #[error("failed to fetch feed {url}: {source}")]
    FeedFetch {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The fallback page fetch failed.
    #[error("failed to scrape {url}: {source}")]
    Scrape {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("unknown source: {0}")]
    UnknownSource(String),
}

impl NewsError {
    pub fn feed_fetch(url: &str, source: impl Into<BoxError>) -> Self {
        NewsError::FeedFetch {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn scrape(url: &str, source: impl Into<BoxError>) -> Self {
        NewsError::Scrape {
            url: url.to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;

impl IntoResponse for NewsError {
    fn into_response(self) -> Response {
        match self {
            NewsError::UnknownSource(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Source not found" })),
            )
                .into_response(),
            other => {
                warn!(error = %other, "Upstream failure reached handler");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
