//! Data models
//!
//! This module contains the data structures used throughout the Devsite API:
//! - Database entities (Article, Position)
//! - Derived tag analytics (TagCount, TagViews, RelatedTag, ScoredArticle)
//! - Inputs, patches, filters and pagination types

mod article;
mod position;
mod tag;

pub use article::{
    Article, ArticleFilter, ArticlePatch, ArticleSort, Category, CreateArticleInput, ListParams,
    PagedResult, Seo, UnknownCategory, UpdateArticleInput, MAX_PAGE_SIZE,
};
pub use position::{CreatePositionInput, Position, PositionFilter, UpdatePositionInput};
pub use tag::{RelatedTag, ScoredArticle, TagCount, TagViews};
