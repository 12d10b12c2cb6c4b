//! Tag analytics models
//!
//! Tags are plain string labels on articles. These types carry the derived
//! views computed over them: usage counts, view totals, co-occurrence weights
//! and relevance-scored related articles.

use serde::{Deserialize, Serialize};

use super::Article;

/// Number of published articles carrying a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

impl TagCount {
    pub fn new(tag: impl Into<String>, count: u64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Summed view counter of a tag across published articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagViews {
    pub tag: String,
    pub views: u64,
}

impl TagViews {
    pub fn new(tag: impl Into<String>, views: u64) -> Self {
        Self {
            tag: tag.into(),
            views,
        }
    }
}

/// Co-occurrence weight of a tag relative to a seed article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedTag {
    pub tag: String,
    /// Fraction of the candidate pool carrying the tag, in `[0, 1]`
    pub weight: f64,
}

/// A candidate article with its tag-overlap relevance to a seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    /// Candidate tag occurrences shared with the seed, over the seed's tag count
    pub relevance: f64,
}
