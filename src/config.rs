//! The feed source registry.
//!
//! A [`SourceRegistry`] is built once at startup, either from the built-in
//! defaults or from a YAML file, validated, and then shared read-only by
//! every request. There is no way to mutate it afterwards.
//!
//! # File format
//!
//! ```yaml
//! sources:
//!   - name: SEC
//!     url: https://www.sec.gov/news/pressreleases.rss
//! ```

use crate::models::Source;
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

/// Feeds served when no registry file is given.
pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("CNN Money", "https://money.cnn.com/services/rss/"),
    (
        "New York Times",
        "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
    ),
    (
        "Fox News",
        "https://moxie.foxnews.com/google-publisher/latest.xml",
    ),
    ("SEC", "https://www.sec.gov/news/pressreleases.rss"),
    (
        "Federal Reserve",
        "https://www.federalreserve.gov/feeds/press_all.xml",
    ),
];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read registry file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse registry file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("registry has no sources")]
    Empty,

    #[error("duplicate source names: {0}")]
    DuplicateNames(String),

    #[error("source {name:?} has an invalid feed URL {url:?}: {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    sources: Vec<Source>,
}

/// Ordered, immutable mapping from source name to feed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// Validate and wrap a list of sources, keeping their order.
    pub fn new(sources: Vec<Source>) -> Result<Self, RegistryError> {
        if sources.is_empty() {
            return Err(RegistryError::Empty);
        }

        let duplicates = sources.iter().map(|s| s.name.as_str()).duplicates().join(", ");
        if !duplicates.is_empty() {
            return Err(RegistryError::DuplicateNames(duplicates));
        }

        for source in &sources {
            validate_feed_url(source)?;
        }

        Ok(Self { sources })
    }

    /// The built-in registry.
    pub fn with_defaults() -> Self {
        Self {
            sources: DEFAULT_SOURCES
                .iter()
                .map(|(name, url)| Source::new(*name, *url))
                .collect(),
        }
    }

    /// Parse a registry from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_yaml::from_str(text)?;
        Self::new(file.sources)
    }

    /// Load the registry file at `path`, or the defaults when there is none.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, RegistryError> {
        let registry = match path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| RegistryError::Io {
                        path: path.to_string(),
                        source,
                    })?;
                Self::from_yaml(&text)?
            }
            None => Self::with_defaults(),
        };
        info!(count = registry.len(), "Loaded source registry");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

fn validate_feed_url(source: &Source) -> Result<(), RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidUrl {
        name: source.name.clone(),
        url: source.url.clone(),
        reason,
    };
    let parsed = Url::parse(&source.url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}
