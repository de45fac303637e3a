//! Keyword-based topic classification.
//!
//! Both strategies walk [`CATEGORY_KEYWORDS`] in declaration order and
//! return the first category with a matching keyword, falling back to
//! [`Category::Other`]. They differ only in what counts as a match:
//!
//! | Strategy | Match rule | `"warm weather"` |
//! |----------|------------|------------------|
//! | [`KeywordCategorizer`] (default) | case-insensitive substring | `war` |
//! | [`TokenCategorizer`] | whole token, stopwords dropped | `other` |

use crate::models::Category;
use std::collections::HashSet;

/// Keyword lists in match order. `Other` is the fallback and never listed.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Politics,
        &["government", "election", "president", "congress", "senate"],
    ),
    (
        Category::War,
        &["conflict", "military", "troops", "battle", "war"],
    ),
    (
        Category::Finance,
        &["economy", "stock", "market", "investment", "bank"],
    ),
];

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "her", "his", "i", "in", "is", "it", "its", "of", "on", "or", "she", "that", "the", "their",
    "they", "this", "to", "was", "were", "will", "with",
];

/// Assigns a [`Category`] to an article from its title and body.
///
/// Implementations must be pure: the same input always yields the same
/// category.
pub trait Categorizer: Send + Sync {
    fn categorize(&self, title: &str, content: &str) -> Category;
}

/// Lower-cased `title + " " + content`.
fn haystack(title: &str, content: &str) -> String {
    format!("{title} {content}").to_lowercase()
}

/// Substring matching over the lower-cased text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCategorizer;

impl Categorizer for KeywordCategorizer {
    fn categorize(&self, title: &str, content: &str) -> Category {
        let text = haystack(title, content);
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

/// Whole-token matching with English stopwords removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCategorizer;

impl TokenCategorizer {
    fn tokens(text: &str) -> HashSet<&str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
            .collect()
    }
}

impl Categorizer for TokenCategorizer {
    fn categorize(&self, title: &str, content: &str) -> Category {
        let text = haystack(title, content);
        let tokens = Self::tokens(&text);
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| tokens.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}
