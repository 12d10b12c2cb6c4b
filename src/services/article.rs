//! Article service
//!
//! Implements business logic for article management:
//! - Create, read, update, delete articles
//! - Validation
//! - View accounting on fetch-by-slug
//! - Related articles and related-tag weights
//! - Tag usage and popularity reports
//!
//! The analytics themselves live in [`crate::services::analytics`]; this
//! service loads their inputs from the store and writes their results back.

use crate::config::{ArticlesConfig, RelatedScope};
use crate::db::repositories::{ArticleRepository, StoreError};
use crate::models::{
    Article, ArticleFilter, ArticlePatch, ArticleSort, CreateArticleInput, ListParams, PagedResult,
    RelatedTag, ScoredArticle, TagCount, TagViews, UnknownCategory, UpdateArticleInput,
};
use crate::services::analytics;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Article slug already exists: {0}")]
    DuplicateSlug(String),

    /// Category outside the fixed set
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<StoreError> for ArticleServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(slug) => ArticleServiceError::DuplicateSlug(slug),
            StoreError::Unavailable(e) => ArticleServiceError::InternalError(e),
        }
    }
}

impl From<UnknownCategory> for ArticleServiceError {
    fn from(err: UnknownCategory) -> Self {
        ArticleServiceError::InvalidCategory(err.0)
    }
}

/// First phase of a view: the snapshot read plus the counters it will write.
///
/// Produced by [`ArticleService::begin_view`] and consumed by
/// [`ArticleService::commit_view`]. The commit overwrites the whole counter
/// map without checking for writes made since the snapshot, so two views
/// interleaved between their phases lose one increment.
#[derive(Debug, Clone)]
pub struct PendingView {
    slug: String,
    tag_views: BTreeMap<String, u64>,
}

impl PendingView {
    /// Slug of the viewed article
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Counters that the commit will store
    pub fn tag_views(&self) -> &BTreeMap<String, u64> {
        &self.tag_views
    }
}

/// Article service for managing blog articles and their tag analytics
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    config: ArticlesConfig,
}

impl ArticleService {
    /// Create a new article service with default analytics settings
    ///
    /// # Arguments
    /// * `repo` - Article repository for database operations
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self::with_config(repo, ArticlesConfig::default())
    }

    /// Create a new article service with explicit analytics settings
    pub fn with_config(repo: Arc<dyn ArticleRepository>, config: ArticlesConfig) -> Self {
        Self { repo, config }
    }

    /// Default number of related articles
    pub fn related_limit(&self) -> usize {
        self.config.related_limit
    }

    /// Default number of popular tags
    pub fn popular_limit(&self) -> usize {
        self.config.popular_limit
    }

    /// Default page size for lists
    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Create a new article
    ///
    /// The article starts with empty `tag_views` and `related_tags`.
    ///
    /// # Errors
    /// - `ValidationError` if a required field is empty or the slug is malformed
    /// - `DuplicateSlug` if the slug already exists
    pub async fn create(&self, input: CreateArticleInput) -> Result<Article, ArticleServiceError> {
        self.validate_create_input(&input)?;

        let article = self.repo.insert(&input).await?;

        tracing::info!(slug = %article.slug, id = article.id, "Article created");
        Ok(article)
    }

    /// List articles matching `filter`, one page at a time
    ///
    /// # Arguments
    /// * `filter` - Selection criteria
    /// * `sort` - Result ordering
    /// * `params` - Pagination parameters
    pub async fn list(
        &self,
        filter: &ArticleFilter,
        sort: ArticleSort,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let (articles, total) = futures::try_join!(
            self.repo.find_many(filter, sort, params.offset(), Some(params.limit())),
            self.repo.count(filter),
        )?;

        Ok(PagedResult::new(articles, total, params))
    }

    /// Get article by slug without counting a view
    ///
    /// # Errors
    /// - `NotFound` if no article has the slug
    pub async fn peek(&self, slug: &str) -> Result<Article, ArticleServiceError> {
        self.repo
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(slug.to_string()))
    }

    /// Read phase of a view: load the article and compute its next counters
    ///
    /// # Errors
    /// - `NotFound` if no article has the slug
    pub async fn begin_view(&self, slug: &str) -> Result<PendingView, ArticleServiceError> {
        let snapshot = self.peek(slug).await?;
        let viewed = analytics::record_view(snapshot);

        Ok(PendingView {
            slug: viewed.slug,
            tag_views: viewed.tag_views,
        })
    }

    /// Write phase of a view: store the counters computed by [`begin_view`]
    ///
    /// # Errors
    /// - `NotFound` if the article was deleted or renamed since the read
    ///
    /// [`begin_view`]: ArticleService::begin_view
    pub async fn commit_view(&self, pending: PendingView) -> Result<Article, ArticleServiceError> {
        let PendingView { slug, tag_views } = pending;

        let article = self
            .repo
            .update_by_slug(&slug, &ArticlePatch::tag_views(tag_views))
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(slug.clone()))?;

        tracing::debug!(slug = %slug, "Article view recorded");
        Ok(article)
    }

    /// Fetch an article by slug, counting one view of each of its tags
    ///
    /// Every successful call performs exactly one write.
    pub async fn view(&self, slug: &str) -> Result<Article, ArticleServiceError> {
        let pending = self.begin_view(slug).await?;
        self.commit_view(pending).await
    }

    /// Apply a partial update
    ///
    /// # Errors
    /// - `NotFound` if no article has the slug
    /// - `ValidationError` if a supplied required field is empty
    /// - `DuplicateSlug` if renaming onto another article's slug
    pub async fn update(
        &self,
        slug: &str,
        input: UpdateArticleInput,
    ) -> Result<Article, ArticleServiceError> {
        self.validate_update_input(&input)?;

        let article = self
            .repo
            .update_by_slug(slug, &ArticlePatch::from(input))
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(slug.to_string()))?;

        tracing::info!(slug = %slug, new_slug = %article.slug, "Article updated");
        Ok(article)
    }

    /// Delete an article
    ///
    /// # Errors
    /// - `NotFound` if nothing was deleted
    pub async fn delete(&self, slug: &str) -> Result<(), ArticleServiceError> {
        if !self.repo.delete_by_slug(slug).await? {
            return Err(ArticleServiceError::NotFound(slug.to_string()));
        }

        tracing::info!(slug = %slug, "Article deleted");
        Ok(())
    }

    /// Most relevant published articles sharing a tag with `slug`
    ///
    /// The seed is fetched through [`view`](ArticleService::view), so every
    /// successful call counts one view of it, whatever the `limit`.
    ///
    /// # Errors
    /// - `NotFound` if no article has the slug
    pub async fn related_articles(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Vec<ScoredArticle>, ArticleServiceError> {
        let seed = self.view(slug).await?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.candidates(&seed).await?;
        Ok(analytics::rank_related(&seed, candidates, limit))
    }

    /// Recompute and store the related-tag weights of an article
    ///
    /// Idempotent while the neighbourhood is unchanged.
    ///
    /// # Errors
    /// - `NotFound` if no article has the slug, or it disappears before the write
    pub async fn refresh_related_tags(
        &self,
        slug: &str,
    ) -> Result<Vec<RelatedTag>, ArticleServiceError> {
        let seed = self.peek(slug).await?;
        let candidates = self.candidates(&seed).await?;
        let related = analytics::compute_related_tags(&seed, &candidates);

        self.repo
            .update_by_slug(slug, &ArticlePatch::related_tags(analytics::related_tags_map(&related)))
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(slug.to_string()))?;

        tracing::info!(slug = %slug, pool = candidates.len(), tags = related.len(), "Related tags refreshed");
        Ok(related)
    }

    /// How many published articles carry each tag
    pub async fn tag_usage_counts(&self) -> Result<Vec<TagCount>, ArticleServiceError> {
        let published = self.published_articles().await?;
        Ok(analytics::tag_usage_counts(&published))
    }

    /// Tags with the most accumulated views across published articles
    pub async fn popular_tags(&self, limit: usize) -> Result<Vec<TagViews>, ArticleServiceError> {
        let published = self.published_articles().await?;
        Ok(analytics::popular_tags(&published, limit))
    }

    /// Candidate pool for related computations, newest first
    async fn candidates(&self, seed: &Article) -> Result<Vec<Article>, ArticleServiceError> {
        let mut filter = ArticleFilter::related_to(seed);
        if self.config.related_scope == RelatedScope::SameCategory {
            filter.category = Some(seed.category);
        }

        Ok(self.repo.find_many(&filter, ArticleSort::Newest, 0, None).await?)
    }

    async fn published_articles(&self) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self
            .repo
            .find_many(&ArticleFilter::published(), ArticleSort::Newest, 0, None)
            .await?)
    }

    /// Validate article creation input
    fn validate_create_input(&self, input: &CreateArticleInput) -> Result<(), ArticleServiceError> {
        validate_slug(&input.slug)?;
        require_text("title", &input.title)?;
        require_text("content", &input.content)?;
        require_text("description", &input.description)?;
        require_text("author", &input.author)?;
        validate_tags(&input.tags)
    }

    /// Validate article update input
    fn validate_update_input(&self, input: &UpdateArticleInput) -> Result<(), ArticleServiceError> {
        if let Some(ref slug) = input.slug {
            validate_slug(slug)?;
        }
        let texts = [
            ("title", &input.title),
            ("content", &input.content),
            ("description", &input.description),
            ("author", &input.author),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        if let Some(ref tags) = input.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ArticleServiceError> {
    if value.trim().is_empty() {
        return Err(ArticleServiceError::ValidationError(format!(
            "Article {} cannot be empty",
            field
        )));
    }
    Ok(())
}

/// Slugs are non-empty runs of ASCII letters, digits, `-` and `_`
fn validate_slug(slug: &str) -> Result<(), ArticleServiceError> {
    if slug.is_empty() {
        return Err(ArticleServiceError::ValidationError(
            "Article slug cannot be empty".to_string(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ArticleServiceError::ValidationError(format!(
            "Article slug must be URL-safe: {}",
            slug
        )));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), ArticleServiceError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ArticleServiceError::ValidationError(
            "Article tags cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxArticleRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::Category;

    async fn setup_test_service_with(config: ArticlesConfig) -> ArticleService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repo = SqlxArticleRepository::boxed(pool);
        ArticleService::with_config(repo, config)
    }

    async fn setup_test_service() -> ArticleService {
        setup_test_service_with(ArticlesConfig::default()).await
    }

    fn input(slug: &str, tags: &[&str], published: bool) -> CreateArticleInput {
        CreateArticleInput::new(
            slug,
            format!("Title {}", slug),
            format!("Body of {}", slug),
            format!("About {}", slug),
            "Ada",
            Category::BackendDevelopment,
        )
        .with_tags(tags.iter().copied())
        .with_published(published)
    }

    async fn create(service: &ArticleService, slug: &str, tags: &[&str], published: bool) -> Article {
        service
            .create(input(slug, tags, published))
            .await
            .expect("Failed to create article")
    }

    fn ranked_slugs(ranked: &[ScoredArticle]) -> Vec<&str> {
        ranked.iter().map(|s| s.article.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_article_success() {
        let service = setup_test_service().await;
        let article = create(&service, "hello-rust", &["rust"], false).await;

        assert!(article.id > 0);
        assert_eq!(article.slug, "hello-rust");
        assert!(!article.published);
        assert!(article.tag_views.is_empty());
        assert!(article.related_tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_article_duplicate_slug_fails() {
        let service = setup_test_service().await;
        create(&service, "duplicate-slug", &[], false).await;

        let result = service.create(input("duplicate-slug", &[], false)).await;
        assert!(matches!(result, Err(ArticleServiceError::DuplicateSlug(ref s)) if s == "duplicate-slug"));
    }

    #[tokio::test]
    async fn test_create_article_validation() {
        let service = setup_test_service().await;

        let mut blank_title = input("blank-title", &[], false);
        blank_title.title = "   ".to_string();
        assert!(matches!(
            service.create(blank_title).await,
            Err(ArticleServiceError::ValidationError(_))
        ));

        assert!(matches!(
            service.create(input("", &[], false)).await,
            Err(ArticleServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.create(input("has space", &[], false)).await,
            Err(ArticleServiceError::ValidationError(_))
        ));
        assert!(matches!(
            service.create(input("empty-tag", &["ok", " "], false)).await,
            Err(ArticleServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_category_maps_to_invalid_category() {
        let err: ArticleServiceError = "Gardening"
            .parse::<Category>()
            .map_err(ArticleServiceError::from)
            .unwrap_err();
        assert!(matches!(err, ArticleServiceError::InvalidCategory(ref c) if c == "Gardening"));
    }

    #[tokio::test]
    async fn test_view_twice_counts_each_tag() {
        let service = setup_test_service().await;
        create(&service, "x", &["go", "backend"], true).await;

        service.view("x").await.expect("First view failed");
        let article = service.view("x").await.expect("Second view failed");

        assert_eq!(article.tag_views.get("go"), Some(&2));
        assert_eq!(article.tag_views.get("backend"), Some(&2));

        let stored = service.peek("x").await.expect("Article missing");
        assert_eq!(stored.tag_views, article.tag_views);
    }

    #[tokio::test]
    async fn test_view_not_found() {
        let service = setup_test_service().await;
        assert!(matches!(
            service.view("nope").await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_peek_does_not_count_views() {
        let service = setup_test_service().await;
        create(&service, "quiet", &["a"], true).await;

        service.peek("quiet").await.unwrap();
        service.peek("quiet").await.unwrap();

        assert!(service.peek("quiet").await.unwrap().tag_views.is_empty());
    }

    #[tokio::test]
    async fn test_interleaved_views_lose_an_increment() {
        let service = setup_test_service().await;
        create(&service, "race", &["rust", "web"], true).await;

        let first = service.begin_view("race").await.unwrap();
        let second = service.begin_view("race").await.unwrap();
        assert_eq!(first.slug(), "race");
        assert_eq!(first.tag_views(), second.tag_views());

        service.commit_view(first).await.unwrap();
        let article = service.commit_view(second).await.unwrap();

        // Two views, one survives: an under-count, never a corrupted map.
        assert_eq!(article.tag_views.get("rust"), Some(&1));
        assert_eq!(article.tag_views.get("web"), Some(&1));
        assert_eq!(article.tag_views.len(), 2);
    }

    #[tokio::test]
    async fn test_commit_view_after_delete_is_not_found() {
        let service = setup_test_service().await;
        create(&service, "gone", &["a"], true).await;

        let pending = service.begin_view("gone").await.unwrap();
        service.delete("gone").await.unwrap();

        assert!(matches!(
            service.commit_view(pending).await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_related_articles_tie_break_newest_first() {
        let service = setup_test_service().await;
        create(&service, "a", &["x", "y"], true).await;
        create(&service, "b", &["x"], true).await;
        create(&service, "c", &["y", "z"], true).await;

        let related = service.related_articles("a", 2).await.expect("Failed to rank");

        assert_eq!(ranked_slugs(&related), vec!["c", "b"]);
        assert!(related.iter().all(|s| s.relevance == 0.5));
    }

    #[tokio::test]
    async fn test_related_articles_filters_candidates() {
        let service = setup_test_service().await;
        create(&service, "seed", &["rust", "web"], false).await;
        create(&service, "draft", &["rust"], false).await;
        create(&service, "other", &["go"], true).await;
        create(&service, "both", &["rust", "web"], true).await;
        create(&service, "half", &["web"], true).await;

        let related = service.related_articles("seed", 3).await.unwrap();
        assert_eq!(ranked_slugs(&related), vec!["both", "half"]);
        assert_eq!(related[0].relevance, 1.0);
        assert_eq!(related[1].relevance, 0.5);

        assert!(service.related_articles("seed", 0).await.unwrap().is_empty());

        // Each ranking fetches the seed by slug, which counts as a view
        let seed = service.peek("seed").await.unwrap();
        assert_eq!(seed.tag_views.get("rust"), Some(&2));
        assert_eq!(seed.tag_views.get("web"), Some(&2));
        assert!(matches!(
            service.related_articles("missing", 3).await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_related_articles_same_category_scope() {
        let config = ArticlesConfig {
            related_scope: RelatedScope::SameCategory,
            ..ArticlesConfig::default()
        };
        let service = setup_test_service_with(config).await;
        create(&service, "seed", &["k8s"], true).await;
        create(&service, "same", &["k8s"], true).await;
        let mut elsewhere = input("elsewhere", &["k8s"], true);
        elsewhere.category = Category::DevOps;
        service.create(elsewhere).await.unwrap();

        let related = service.related_articles("seed", 5).await.unwrap();
        assert_eq!(ranked_slugs(&related), vec!["same"]);
    }

    #[tokio::test]
    async fn test_refresh_related_tags_persists_weights() {
        let service = setup_test_service().await;
        create(&service, "seed", &["rust"], true).await;
        create(&service, "a", &["rust", "tokio"], true).await;
        create(&service, "b", &["rust", "tokio", "axum"], true).await;
        create(&service, "hidden", &["rust", "secret"], false).await;

        let related = service.refresh_related_tags("seed").await.unwrap();
        assert_eq!(
            related,
            vec![
                RelatedTag { tag: "tokio".into(), weight: 1.0 },
                RelatedTag { tag: "axum".into(), weight: 0.5 },
            ]
        );

        let stored = service.peek("seed").await.unwrap();
        assert_eq!(stored.related_tags.len(), 2);
        assert_eq!(stored.related_tags.get("axum"), Some(&0.5));
        assert!(!stored.related_tags.contains_key("rust"));

        // Idempotent
        assert_eq!(service.refresh_related_tags("seed").await.unwrap(), related);
    }

    #[tokio::test]
    async fn test_refresh_related_tags_empty_pool() {
        let service = setup_test_service().await;
        create(&service, "lonely", &["niche"], true).await;

        assert!(service.refresh_related_tags("lonely").await.unwrap().is_empty());
        assert!(service.peek("lonely").await.unwrap().related_tags.is_empty());
    }

    #[tokio::test]
    async fn test_tag_usage_counts_only_published() {
        let service = setup_test_service().await;
        create(&service, "a", &["rust", "web"], true).await;
        create(&service, "b", &["rust"], true).await;
        create(&service, "c", &["rust", "draft"], false).await;

        let counts = service.tag_usage_counts().await.unwrap();
        assert_eq!(counts, vec![TagCount::new("rust", 2), TagCount::new("web", 1)]);
        assert_eq!(service.tag_usage_counts().await.unwrap(), counts);
    }

    #[tokio::test]
    async fn test_popular_tags_from_views() {
        let service = setup_test_service().await;
        create(&service, "a", &["go", "rust"], true).await;
        create(&service, "b", &["rust"], true).await;
        create(&service, "c", &["go"], false).await;

        service.view("a").await.unwrap();
        service.view("b").await.unwrap();
        service.view("b").await.unwrap();
        service.view("c").await.unwrap();

        let popular = service.popular_tags(1).await.unwrap();
        assert_eq!(popular, vec![TagViews::new("rust", 3)]);

        let popular = service.popular_tags(5).await.unwrap();
        assert_eq!(popular, vec![TagViews::new("rust", 3), TagViews::new("go", 1)]);
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let service = setup_test_service().await;
        for i in 0..5 {
            create(&service, &format!("post-{}", i), &["rust"], i % 2 == 0).await;
        }

        let page = service
            .list(&ArticleFilter::default(), ArticleSort::Newest, &ListParams::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].slug, "post-4");

        let published = service
            .list(&ArticleFilter::published(), ArticleSort::Newest, &ListParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(published.total, 3);

        let last = service
            .list(&ArticleFilter::default(), ArticleSort::Newest, &ListParams::new(3, 2))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].slug, "post-0");
    }

    #[tokio::test]
    async fn test_update_article() {
        let service = setup_test_service().await;
        create(&service, "draft-post", &["a"], false).await;

        let updated = service
            .update(
                "draft-post",
                UpdateArticleInput::new()
                    .with_slug("final-post")
                    .with_published(true)
                    .with_tags(["a", "b"]),
            )
            .await
            .expect("Failed to update");

        assert_eq!(updated.slug, "final-post");
        assert!(updated.published);
        assert_eq!(updated.tags, vec!["a", "b"]);
        assert!(matches!(
            service.peek("draft-post").await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_article_errors() {
        let service = setup_test_service().await;
        create(&service, "one", &[], false).await;
        create(&service, "two", &[], false).await;

        assert!(matches!(
            service.update("ghost", UpdateArticleInput::new().with_title("x")).await,
            Err(ArticleServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.update("one", UpdateArticleInput::new().with_slug("two")).await,
            Err(ArticleServiceError::DuplicateSlug(_))
        ));
        assert!(matches!(
            service.update("one", UpdateArticleInput::new().with_title("")).await,
            Err(ArticleServiceError::ValidationError(_))
        ));

        // Keeping its own slug is not a conflict
        let same = service
            .update("one", UpdateArticleInput::new().with_slug("one").with_title("Still one"))
            .await
            .unwrap();
        assert_eq!(same.title, "Still one");
    }

    #[tokio::test]
    async fn test_update_keeps_view_counters() {
        let service = setup_test_service().await;
        create(&service, "counted", &["a"], true).await;
        service.view("counted").await.unwrap();

        let updated = service
            .update("counted", UpdateArticleInput::new().with_title("Renamed"))
            .await
            .unwrap();
        assert_eq!(updated.tag_views.get("a"), Some(&1));
    }

    #[tokio::test]
    async fn test_update_clears_image_url() {
        let service = setup_test_service().await;
        service
            .create(input("framed", &[], true).with_image_url("https://img/a.png"))
            .await
            .unwrap();

        let updated = service
            .update("framed", UpdateArticleInput::new().with_image_url(None))
            .await
            .unwrap();
        assert!(updated.image_url.is_none());
    }

    #[tokio::test]
    async fn test_delete_article() {
        let service = setup_test_service().await;
        create(&service, "bye", &[], false).await;

        service.delete("bye").await.expect("Failed to delete");
        assert!(matches!(
            service.delete("bye").await,
            Err(ArticleServiceError::NotFound(_))
        ));
    }
}
