//! Article API endpoints
//!
//! Handles HTTP requests for articles and their tag analytics:
//! - GET /api/v1/articles - List articles with pagination and filters
//! - POST /api/v1/articles - Create new article
//! - GET /api/v1/articles/tags - Tag usage counts
//! - GET /api/v1/articles/tags/popular - Most viewed tags
//! - GET /api/v1/articles/{slug} - Get article by slug (counts a view)
//! - PATCH /api/v1/articles/{slug} - Update article
//! - DELETE /api/v1/articles/{slug} - Delete article
//! - GET /api/v1/articles/{slug}/related - Related articles by tag overlap
//! - POST /api/v1/articles/{slug}/related-tags - Recompute related tag weights

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::{default_page, deserialize_nullable, LimitQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    Article, ArticleFilter, ArticleSort, Category, CreateArticleInput, ListParams, RelatedTag,
    ScoredArticle, Seo, TagCount, TagViews, UnknownCategory, UpdateArticleInput,
};
use crate::services::ArticleServiceError;

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size; the configured default when absent, at most [`MAX_PAGE_SIZE`]
    ///
    /// [`MAX_PAGE_SIZE`]: crate::models::MAX_PAGE_SIZE
    pub limit: Option<u32>,
    pub published: Option<bool>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub search_term: Option<String>,
    /// `newest` (default) or `oldest`
    pub sort: Option<String>,
}

impl ListArticlesQuery {
    fn filter(&self) -> Result<ArticleFilter, ApiError> {
        let category = non_empty(&self.category)
            .map(|c| c.parse::<Category>())
            .transpose()
            .map_err(ArticleServiceError::from)?;

        Ok(ArticleFilter {
            published: self.published,
            tag: non_empty(&self.tag).map(str::to_string),
            category,
            author: non_empty(&self.author).map(str::to_string),
            search: non_empty(&self.search_term).map(str::to_string),
            ..ArticleFilter::default()
        })
    }

    fn sort(&self) -> Result<ArticleSort, ApiError> {
        match non_empty(&self.sort) {
            None => Ok(ArticleSort::default()),
            Some(s) => ArticleSort::parse(s).ok_or_else(|| {
                ApiError::validation_error(format!(
                    "Invalid sort order: {}. Allowed: newest, oldest",
                    s
                ))
            }),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Response for article list
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListResponse {
    pub articles: Vec<Article>,
    pub total: i64,
    pub page: u32,
    pub total_pages: u32,
}

/// Request body for creating an article
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub description: String,
    pub author: String,
    /// Display name of one of the fixed categories
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub seo: Seo,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

impl TryFrom<CreateArticleRequest> for CreateArticleInput {
    type Error = UnknownCategory;

    fn try_from(body: CreateArticleRequest) -> Result<Self, Self::Error> {
        let category = body.category.parse::<Category>()?;

        let mut input = CreateArticleInput::new(
            body.slug,
            body.title,
            body.content,
            body.description,
            body.author,
            category,
        )
        .with_tags(body.tags)
        .with_published(body.published)
        .with_seo(body.seo);
        input.image_url = body.image_url;

        Ok(input)
    }
}

/// Request body for updating an article
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    /// `null` removes the cover image
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub image_url: Option<Option<String>>,
    pub seo: Option<Seo>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl TryFrom<UpdateArticleRequest> for UpdateArticleInput {
    type Error = UnknownCategory;

    fn try_from(body: UpdateArticleRequest) -> Result<Self, Self::Error> {
        let category = body
            .category
            .map(|c| c.parse::<Category>())
            .transpose()?;

        Ok(UpdateArticleInput {
            slug: body.slug,
            title: body.title,
            content: body.content,
            description: body.description,
            author: body.author,
            category,
            image_url: body.image_url,
            seo: body.seo,
            tags: body.tags,
            published: body.published,
        })
    }
}

/// Build the articles router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/tags", get(tag_usage_counts))
        .route("/articles/tags/popular", get(popular_tags))
        .route(
            "/articles/{slug}",
            get(get_article).patch(update_article).delete(delete_article),
        )
        .route("/articles/{slug}/related", get(related_articles))
        .route("/articles/{slug}/related-tags", post(refresh_related_tags))
}

/// GET /api/v1/articles - List articles with pagination and filters
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let filter = query.filter()?;
    let sort = query.sort()?;
    let per_page = match query.limit {
        Some(0) => return Err(ApiError::validation_error("limit must be at least 1")),
        Some(limit) => limit,
        None => state.article_service.page_size(),
    };
    let params = ListParams::new(query.page, per_page);

    let result = state.article_service.list(&filter, sort, &params).await?;
    let total_pages = result.total_pages();

    Ok(Json(ArticleListResponse {
        articles: result.items,
        total: result.total,
        page: result.page,
        total_pages,
    }))
}

/// POST /api/v1/articles - Create new article
pub async fn create_article(
    State(state): State<AppState>,
    Json(body): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let input = CreateArticleInput::try_from(body).map_err(ArticleServiceError::from)?;
    let article = state.article_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(article)))
}

/// GET /api/v1/articles/{slug} - Get article by slug
///
/// Every successful fetch counts one view of each of the article's tags.
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.article_service.view(&slug).await?))
}

/// PATCH /api/v1/articles/{slug} - Update article
pub async fn update_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    let input = UpdateArticleInput::try_from(body).map_err(ArticleServiceError::from)?;

    Ok(Json(state.article_service.update(&slug, input).await?))
}

/// DELETE /api/v1/articles/{slug} - Delete article
pub async fn delete_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.article_service.delete(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/articles/{slug}/related - Related articles, most relevant first
pub async fn related_articles(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ScoredArticle>>, ApiError> {
    let limit = query.resolve(state.article_service.related_limit());

    Ok(Json(state.article_service.related_articles(&slug, limit).await?))
}

/// POST /api/v1/articles/{slug}/related-tags - Recompute and store related tag weights
pub async fn refresh_related_tags(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<RelatedTag>>, ApiError> {
    Ok(Json(state.article_service.refresh_related_tags(&slug).await?))
}

/// GET /api/v1/articles/tags - Number of published articles per tag
pub async fn tag_usage_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagCount>>, ApiError> {
    Ok(Json(state.article_service.tag_usage_counts().await?))
}

/// GET /api/v1/articles/tags/popular - Tags with the most views
pub async fn popular_tags(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TagViews>>, ApiError> {
    let limit = query.resolve(state.article_service.popular_limit());

    Ok(Json(state.article_service.popular_tags(limit).await?))
}
