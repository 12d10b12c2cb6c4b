//! Article repository
//!
//! Database operations for articles.
//!
//! This module provides:
//! - `ArticleRepository` trait, the document-collection interface the article
//!   service works against
//! - `SqlxArticleRepository` implementing the trait for SQLite
//!
//! Tags and the `tag_views` / `related_tags` mappings are stored as JSON text.

use crate::db::repositories::{like_pattern, map_write_error, StoreResult};
use crate::db::DynDatabasePool;
use crate::models::{Article, ArticleFilter, ArticlePatch, ArticleSort, Category, CreateArticleInput};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Get article by slug
    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<Article>>;

    /// List articles matching `filter`.
    ///
    /// `limit` of `None` returns every match after `offset`.
    async fn find_many(
        &self,
        filter: &ArticleFilter,
        sort: ArticleSort,
        offset: i64,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Article>>;

    /// Count articles matching `filter`
    async fn count(&self, filter: &ArticleFilter) -> StoreResult<i64>;

    /// Insert a new article with empty tag mappings.
    ///
    /// Fails with `StoreError::DuplicateKey` if the slug is taken.
    async fn insert(&self, input: &CreateArticleInput) -> StoreResult<Article>;

    /// Apply a partial update to the article identified by `slug`.
    ///
    /// Returns `None` if no article has that slug. A rename onto a taken slug
    /// fails with `StoreError::DuplicateKey`.
    async fn update_by_slug(&self, slug: &str, patch: &ArticlePatch) -> StoreResult<Option<Article>>;

    /// Delete an article, returning whether anything was deleted
    async fn delete_by_slug(&self, slug: &str) -> StoreResult<bool>;
}

/// SQLx-based article repository implementation
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<Article>> {
        get_article_by_slug_sqlite(self.pool.sqlite(), slug).await
    }

    async fn find_many(
        &self,
        filter: &ArticleFilter,
        sort: ArticleSort,
        offset: i64,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Article>> {
        find_articles_sqlite(self.pool.sqlite(), filter, sort, offset, limit).await
    }

    async fn count(&self, filter: &ArticleFilter) -> StoreResult<i64> {
        count_articles_sqlite(self.pool.sqlite(), filter).await
    }

    async fn insert(&self, input: &CreateArticleInput) -> StoreResult<Article> {
        insert_article_sqlite(self.pool.sqlite(), input).await
    }

    async fn update_by_slug(&self, slug: &str, patch: &ArticlePatch) -> StoreResult<Option<Article>> {
        update_article_sqlite(self.pool.sqlite(), slug, patch).await
    }

    async fn delete_by_slug(&self, slug: &str) -> StoreResult<bool> {
        delete_article_sqlite(self.pool.sqlite(), slug).await
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

const ARTICLE_COLUMNS: &str = "id, slug, title, content, description, author, category, image_url, seo, tags, published, tag_views, related_tags, created_at, updated_at";

async fn get_article_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> StoreResult<Option<Article>> {
    let row = sqlx::query(&format!("SELECT {} FROM articles WHERE slug = ?", ARTICLE_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get article by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn find_articles_sqlite(
    pool: &SqlitePool,
    filter: &ArticleFilter,
    sort: ArticleSort,
    offset: i64,
    limit: Option<i64>,
) -> StoreResult<Vec<Article>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM articles", ARTICLE_COLUMNS));
    push_article_filter(&mut qb, filter);

    qb.push(match sort {
        ArticleSort::Newest => " ORDER BY created_at DESC, id DESC",
        ArticleSort::Oldest => " ORDER BY created_at ASC, id ASC",
    });

    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);
    } else if offset > 0 {
        qb.push(" LIMIT -1 OFFSET ").push_bind(offset);
    }

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;

    let mut articles = Vec::with_capacity(rows.len());
    for row in rows {
        articles.push(row_to_article_sqlite(&row)?);
    }

    Ok(articles)
}

async fn count_articles_sqlite(pool: &SqlitePool, filter: &ArticleFilter) -> StoreResult<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) as count FROM articles");
    push_article_filter(&mut qb, filter);

    let row = qb
        .build()
        .fetch_one(pool)
        .await
        .context("Failed to count articles")?;

    Ok(row.get("count"))
}

async fn insert_article_sqlite(pool: &SqlitePool, input: &CreateArticleInput) -> StoreResult<Article> {
    let now = Utc::now();
    let seo = serde_json::to_string(&input.seo).context("Failed to encode seo")?;
    let tags = serde_json::to_string(&input.tags).context("Failed to encode tags")?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO articles (slug, title, content, description, author, category, image_url, seo, tags, published, tag_views, related_tags, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '{{}}', '{{}}', ?, ?)
        RETURNING {}
        "#,
        ARTICLE_COLUMNS
    ))
    .bind(&input.slug)
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.description)
    .bind(&input.author)
    .bind(input.category.as_str())
    .bind(&input.image_url)
    .bind(&seo)
    .bind(&tags)
    .bind(input.published)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, &input.slug, "Failed to create article"))?;

    row_to_article_sqlite(&row)
}

async fn update_article_sqlite(pool: &SqlitePool, slug: &str, patch: &ArticlePatch) -> StoreResult<Option<Article>> {
    if !patch.has_changes() {
        return get_article_by_slug_sqlite(pool, slug).await;
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE articles SET updated_at = ");
    qb.push_bind(Utc::now());

    if let Some(ref new_slug) = patch.slug {
        qb.push(", slug = ").push_bind(new_slug.clone());
    }
    if let Some(ref title) = patch.title {
        qb.push(", title = ").push_bind(title.clone());
    }
    if let Some(ref content) = patch.content {
        qb.push(", content = ").push_bind(content.clone());
    }
    if let Some(ref description) = patch.description {
        qb.push(", description = ").push_bind(description.clone());
    }
    if let Some(ref author) = patch.author {
        qb.push(", author = ").push_bind(author.clone());
    }
    if let Some(category) = patch.category {
        qb.push(", category = ").push_bind(category.as_str());
    }
    if let Some(ref image_url) = patch.image_url {
        qb.push(", image_url = ").push_bind(image_url.clone());
    }
    if let Some(ref seo) = patch.seo {
        let seo = serde_json::to_string(seo).context("Failed to encode seo")?;
        qb.push(", seo = ").push_bind(seo);
    }
    if let Some(ref tags) = patch.tags {
        let tags = serde_json::to_string(tags).context("Failed to encode tags")?;
        qb.push(", tags = ").push_bind(tags);
    }
    if let Some(published) = patch.published {
        qb.push(", published = ").push_bind(published);
    }
    if let Some(ref tag_views) = patch.tag_views {
        let tag_views = serde_json::to_string(tag_views).context("Failed to encode tag views")?;
        qb.push(", tag_views = ").push_bind(tag_views);
    }
    if let Some(ref related_tags) = patch.related_tags {
        let related_tags = serde_json::to_string(related_tags).context("Failed to encode related tags")?;
        qb.push(", related_tags = ").push_bind(related_tags);
    }

    qb.push(" WHERE slug = ").push_bind(slug.to_string());
    qb.push(" RETURNING ").push(ARTICLE_COLUMNS);

    let key = patch.slug.as_deref().unwrap_or(slug);
    let row = qb
        .build()
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, key, "Failed to update article"))?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn delete_article_sqlite(pool: &SqlitePool, slug: &str) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM articles WHERE slug = ?")
        .bind(slug)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(result.rows_affected() > 0)
}

/// Append the `WHERE` clause for `filter` to `qb`
fn push_article_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ArticleFilter) {
    let mut has_where = false;
    let mut next_clause = |qb: &mut QueryBuilder<'_, Sqlite>| {
        qb.push(if std::mem::replace(&mut has_where, true) { " AND " } else { " WHERE " });
    };

    if let Some(published) = filter.published {
        next_clause(qb);
        qb.push("published = ").push_bind(published);
    }
    if let Some(ref tag) = filter.tag {
        next_clause(qb);
        qb.push("EXISTS (SELECT 1 FROM json_each(articles.tags) WHERE json_each.value = ")
            .push_bind(tag.clone())
            .push(")");
    }
    if let Some(category) = filter.category {
        next_clause(qb);
        qb.push("category = ").push_bind(category.as_str());
    }
    if let Some(ref author) = filter.author {
        next_clause(qb);
        qb.push("author = ").push_bind(author.clone());
    }
    if let Some(ref search) = filter.search {
        let pattern = like_pattern(search);
        next_clause(qb);
        qb.push("(title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR content LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(ref any_tags) = filter.any_tags {
        next_clause(qb);
        if any_tags.is_empty() {
            qb.push("0 = 1");
        } else {
            qb.push("EXISTS (SELECT 1 FROM json_each(articles.tags) WHERE json_each.value IN (");
            let mut separated = qb.separated(", ");
            for tag in any_tags {
                separated.push_bind(tag.clone());
            }
            separated.push_unseparated("))");
        }
    }
    if let Some(ref exclude_slug) = filter.exclude_slug {
        next_clause(qb);
        qb.push("slug <> ").push_bind(exclude_slug.clone());
    }
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Article> {
    let category_str: String = row.get("category");
    let category: Category = category_str
        .parse()
        .with_context(|| format!("Invalid article category: {}", category_str))?;

    let seo: String = row.get("seo");
    let tags: String = row.get("tags");
    let tag_views: String = row.get("tag_views");
    let related_tags: String = row.get("related_tags");

    Ok(Article {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        content: row.get("content"),
        description: row.get("description"),
        author: row.get("author"),
        category,
        image_url: row.get("image_url"),
        seo: serde_json::from_str(&seo).context("Invalid seo column")?,
        tags: serde_json::from_str(&tags).context("Invalid tags column")?,
        published: row.get("published"),
        tag_views: serde_json::from_str(&tag_views).context("Invalid tag_views column")?,
        related_tags: serde_json::from_str(&related_tags).context("Invalid related_tags column")?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
