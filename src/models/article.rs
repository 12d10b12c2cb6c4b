//! Article model
//!
//! This module provides:
//! - `Article` entity representing a blog article with its tag analytics
//! - `Category` closed enumeration
//! - Input and patch types for creating and updating articles
//! - Filter, sort and pagination types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Article entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Store-assigned identifier, increasing with insertion order
    pub id: i64,
    /// URL-friendly slug, unique across all articles
    pub slug: String,
    /// Article title
    pub title: String,
    /// Article body
    pub content: String,
    /// Short summary
    pub description: String,
    /// Author display name
    pub author: String,
    /// Category
    pub category: Category,
    /// Cover image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Search-engine metadata
    #[serde(default)]
    pub seo: Seo,
    /// Ordered tag labels; duplicates are allowed
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the article is publicly visible
    #[serde(default)]
    pub published: bool,
    /// Cumulative views per tag
    #[serde(default)]
    pub tag_views: BTreeMap<String, u64>,
    /// Co-occurrence weights in `[0, 1]`, recomputed on demand
    #[serde(default)]
    pub related_tags: BTreeMap<String, f64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Distinct tags of this article, in first-occurrence order
    pub fn distinct_tags(&self) -> Vec<&str> {
        let mut seen = std::collections::BTreeSet::new();
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }
}

/// SEO metadata attached to an article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: Vec<String>,
}

/// Article category
///
/// The set is closed; anything else is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Frontend Development")]
    FrontendDevelopment,
    #[serde(rename = "Backend Development")]
    BackendDevelopment,
    #[serde(rename = "DevOps")]
    DevOps,
    #[serde(rename = "Web Design")]
    WebDesign,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "Database")]
    Database,
    #[serde(rename = "Security")]
    Security,
    #[serde(rename = "Best Practices")]
    BestPractices,
    #[serde(rename = "Architecture")]
    Architecture,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 10] = [
        Category::FrontendDevelopment,
        Category::BackendDevelopment,
        Category::DevOps,
        Category::WebDesign,
        Category::MobileDevelopment,
        Category::CloudComputing,
        Category::Database,
        Category::Security,
        Category::BestPractices,
        Category::Architecture,
    ];

    /// Display name, also used as the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FrontendDevelopment => "Frontend Development",
            Category::BackendDevelopment => "Backend Development",
            Category::DevOps => "DevOps",
            Category::WebDesign => "Web Design",
            Category::MobileDevelopment => "Mobile Development",
            Category::CloudComputing => "Cloud Computing",
            Category::Database => "Database",
            Category::Security => "Security",
            Category::BestPractices => "Best Practices",
            Category::Architecture => "Architecture",
        }
    }

    /// Comma-separated list of every display name
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not one of the known categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Input for creating a new article
#[derive(Debug, Clone, PartialEq)]
pub struct CreateArticleInput {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub author: String,
    pub category: Category,
    pub image_url: Option<String>,
    pub seo: Seo,
    pub tags: Vec<String>,
    /// Defaults to unpublished
    pub published: bool,
}

impl CreateArticleInput {
    /// Create an unpublished, untagged article input
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            content: content.into(),
            description: description.into(),
            author: author.into(),
            category,
            image_url: None,
            seo: Seo::default(),
            tags: Vec::new(),
            published: false,
        }
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the published flag
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Set the SEO metadata
    pub fn with_seo(mut self, seo: Seo) -> Self {
        self.seo = seo;
        self
    }

    /// Set the cover image
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Client-supplied partial update of an article
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateArticleInput {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub category: Option<Category>,
    /// `Some(None)` clears the cover image
    pub image_url: Option<Option<String>>,
    pub seo: Option<Seo>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl UpdateArticleInput {
    /// Create a new empty UpdateArticleInput
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Some(image_url);
        self
    }
}

/// Store-level partial update.
///
/// Unlike [`UpdateArticleInput`] this can also replace the derived
/// `tag_views` and `related_tags` mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticlePatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub category: Option<Category>,
    pub image_url: Option<Option<String>>,
    pub seo: Option<Seo>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub tag_views: Option<BTreeMap<String, u64>>,
    pub related_tags: Option<BTreeMap<String, f64>>,
}

impl ArticlePatch {
    /// Patch that only replaces the tag view counters
    pub fn tag_views(tag_views: BTreeMap<String, u64>) -> Self {
        Self {
            tag_views: Some(tag_views),
            ..Self::default()
        }
    }

    /// Patch that only replaces the related tag weights
    pub fn related_tags(related_tags: BTreeMap<String, f64>) -> Self {
        Self {
            related_tags: Some(related_tags),
            ..Self::default()
        }
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.slug.is_some()
            || self.title.is_some()
            || self.content.is_some()
            || self.description.is_some()
            || self.author.is_some()
            || self.category.is_some()
            || self.image_url.is_some()
            || self.seo.is_some()
            || self.tags.is_some()
            || self.published.is_some()
            || self.tag_views.is_some()
            || self.related_tags.is_some()
    }
}

impl From<UpdateArticleInput> for ArticlePatch {
    fn from(input: UpdateArticleInput) -> Self {
        Self {
            slug: input.slug,
            title: input.title,
            content: input.content,
            description: input.description,
            author: input.author,
            category: input.category,
            image_url: input.image_url,
            seo: input.seo,
            tags: input.tags,
            published: input.published,
            tag_views: None,
            related_tags: None,
        }
    }
}

/// Selection criteria for article queries. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    pub published: Option<bool>,
    /// Exact membership in the tag list
    pub tag: Option<String>,
    pub category: Option<Category>,
    pub author: Option<String>,
    /// Case-insensitive substring of title, content or description
    pub search: Option<String>,
    /// Article must carry at least one of these tags
    pub any_tags: Option<Vec<String>>,
    /// Slug to leave out of the result
    pub exclude_slug: Option<String>,
}

impl ArticleFilter {
    /// Published articles other than `seed` sharing at least one of its tags
    pub fn related_to(seed: &Article) -> Self {
        Self {
            published: Some(true),
            any_tags: Some(seed.distinct_tags().into_iter().map(str::to_string).collect()),
            exclude_slug: Some(seed.slug.clone()),
            ..Self::default()
        }
    }

    /// Published articles only
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }
}

/// Result ordering for article queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleSort {
    /// `created_at` descending, later insertions first on ties
    #[default]
    Newest,
    /// `created_at` ascending, earlier insertions first on ties
    Oldest,
}

impl ArticleSort {
    /// Parse a sort order from its query spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

/// Largest page size a list query may use
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters, clamped to valid ranges
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * (self.per_page as i64)
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 || self.total <= 0 {
            return 0;
        }
        let per_page = self.per_page as i64;
        ((self.total + per_page - 1) / per_page) as u32
    }
}
