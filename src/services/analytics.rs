//! Tag analytics and relevance engine
//!
//! Pure functions over already-loaded articles. Nothing here touches the
//! store; [`crate::services::ArticleService`] loads the inputs and persists
//! the outputs.
//!
//! - [`record_view`]: per-tag view accounting
//! - [`compute_related_tags`]: co-occurrence weights of neighbouring tags
//! - [`rank_related`]: tag-overlap ranking of related articles
//! - [`tag_usage_counts`] / [`popular_tags`]: aggregations over published articles

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Article, RelatedTag, ScoredArticle, TagCount, TagViews};

/// Count one view of `article`.
///
/// Every tag occurrence increments its counter by one, so a tag listed twice
/// gains two. Tags without a counter start from zero.
pub fn record_view(mut article: Article) -> Article {
    for tag in &article.tags {
        let views = article.tag_views.entry(tag.clone()).or_insert(0);
        *views = views.saturating_add(1);
    }
    article
}

/// Weight the tags that co-occur with `article` in its candidate pool.
///
/// The pool is `candidates` minus the article itself. For every tag that a
/// pool member carries but `article` does not, the weight is the fraction of
/// pool members carrying it. Each member counts at most once per tag, so
/// weights stay within `[0, 1]`.
///
/// Sorted by descending weight, then tag name. An empty pool yields an empty
/// result.
pub fn compute_related_tags(article: &Article, candidates: &[Article]) -> Vec<RelatedTag> {
    let own_tags: BTreeSet<&str> = article.tags.iter().map(String::as_str).collect();
    let pool: Vec<&Article> = candidates
        .iter()
        .filter(|c| c.slug != article.slug)
        .collect();

    if pool.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for candidate in &pool {
        for tag in candidate.distinct_tags() {
            if !own_tags.contains(tag) {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
    }

    let pool_size = pool.len() as f64;
    let mut related: Vec<RelatedTag> = counts
        .into_iter()
        .map(|(tag, count)| RelatedTag {
            tag: tag.to_string(),
            weight: count as f64 / pool_size,
        })
        .collect();

    // BTreeMap iteration already gives tag order, so a stable sort on weight
    // leaves ties alphabetical.
    related.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    related
}

/// Collapse a weight list into the mapping stored on the article
pub fn related_tags_map(related: &[RelatedTag]) -> BTreeMap<String, f64> {
    related
        .iter()
        .map(|r| (r.tag.clone(), r.weight))
        .collect()
}

/// Relevance of `candidate` to `seed`: the candidate's tag occurrences found
/// among the seed's tags, over the number of seed tag occurrences.
///
/// Duplicates count on both sides, so a candidate repeating a shared tag can
/// score above 1. Zero when the seed has no tags.
pub fn relevance(seed: &Article, candidate: &Article) -> f64 {
    if seed.tags.is_empty() {
        return 0.0;
    }

    let seed_tags: BTreeSet<&str> = seed.tags.iter().map(String::as_str).collect();
    let shared = candidate
        .tags
        .iter()
        .filter(|tag| seed_tags.contains(tag.as_str()))
        .count();

    shared as f64 / seed.tags.len() as f64
}

/// Rank `candidates` by relevance to `seed` and keep the best `limit`.
///
/// The seed itself is never returned. The sort is stable: equally relevant
/// candidates keep the order they were given in, which for store-loaded
/// candidates is newest first.
pub fn rank_related(seed: &Article, candidates: Vec<Article>, limit: usize) -> Vec<ScoredArticle> {
    if limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredArticle> = candidates
        .into_iter()
        .filter(|c| c.slug != seed.slug)
        .map(|article| ScoredArticle {
            relevance: relevance(seed, &article),
            article,
        })
        .collect();

    scored.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    scored.truncate(limit);
    scored
}

/// Number of published articles carrying each tag.
///
/// An article counts once per distinct tag. Sorted by descending count, then
/// tag name.
pub fn tag_usage_counts(articles: &[Article]) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for article in articles.iter().filter(|a| a.published) {
        for tag in article.distinct_tags() {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount::new(tag, count))
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Tags with the most accumulated views across published articles.
///
/// Sorted by descending views, then tag name, truncated to `limit`.
pub fn popular_tags(articles: &[Article], limit: usize) -> Vec<TagViews> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for article in articles.iter().filter(|a| a.published) {
        for (tag, views) in &article.tag_views {
            let total = totals.entry(tag.as_str()).or_insert(0);
            *total = total.saturating_add(*views);
        }
    }

    let mut result: Vec<TagViews> = totals
        .into_iter()
        .map(|(tag, views)| TagViews::new(tag, views))
        .collect();
    result.sort_by(|a, b| b.views.cmp(&a.views));
    result.truncate(limit);
    result
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{Category, Seo};
    use chrono::{TimeZone, Utc};

    /// Build an in-memory article. `id` doubles as the creation second.
    pub fn article(id: i64, slug: &str, tags: &[&str], published: bool) -> Article {
        let created = Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap();
        Article {
            id,
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            content: String::new(),
            description: String::new(),
            author: "Ada".to_string(),
            category: Category::BackendDevelopment,
            image_url: None,
            seo: Seo::default(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published,
            tag_views: BTreeMap::new(),
            related_tags: BTreeMap::new(),
            created_at: created,
            updated_at: created,
        }
    }

    pub fn with_views(mut article: Article, views: &[(&str, u64)]) -> Article {
        article.tag_views = views.iter().map(|(t, v)| (t.to_string(), *v)).collect();
        article
    }
}


/// Property-based tests for the engine
#[cfg(test)]
mod property_tests {
    use super::test_support::article;
    use super::*;
    use proptest::prelude::*;

    const TAG_POOL: &[&str] = &["rust", "go", "web", "db", "ops", "ui"];

    fn tags_strategy() -> impl Strategy<Value = Vec<&'static str>> {
        proptest::collection::vec(proptest::sample::select(TAG_POOL), 0..5)
    }

    fn candidates_strategy() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
        proptest::collection::vec(tags_strategy(), 0..10)
    }

    fn build(seed_tags: &[&str], candidate_tags: &[Vec<&str>]) -> (Article, Vec<Article>) {
        let seed = article(0, "seed", seed_tags, true);
        let mut candidates: Vec<Article> = candidate_tags
            .iter()
            .enumerate()
            .map(|(i, tags)| article(i as i64 + 1, &format!("c{}", i), tags, true))
            .collect();
        // The seed can sneak into a store result; the engine must drop it
        candidates.push(seed.clone());
        (seed, candidates)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every counter grows by the number of times its tag occurs.
        #[test]
        fn record_view_increments_by_occurrence(tags in tags_strategy()) {
            let before = article(1, "a", &tags, true);
            let after = record_view(before.clone());

            for tag in &tags {
                let occurrences = tags.iter().filter(|t| **t == *tag).count() as u64;
                let old = before.tag_views.get(*tag).copied().unwrap_or(0);
                prop_assert_eq!(after.tag_views.get(*tag).copied(), Some(old + occurrences));
            }
        }

        /// Ranking excludes the seed, respects the limit, and is sorted with
        /// scores between 0 and the candidate's tag count over the seed's.
        #[test]
        fn rank_related_bounds(
            seed_tags in tags_strategy(),
            candidate_tags in candidates_strategy(),
            limit in 0usize..6,
        ) {
            let (seed, candidates) = build(&seed_tags, &candidate_tags);
            let ranked = rank_related(&seed, candidates, limit);

            prop_assert!(ranked.len() <= limit);
            prop_assert!(ranked.iter().all(|s| s.article.slug != "seed"));
            for s in &ranked {
                let ceiling = if seed_tags.is_empty() {
                    0.0
                } else {
                    s.article.tags.len() as f64 / seed_tags.len() as f64
                };
                prop_assert!(s.relevance >= 0.0 && s.relevance <= ceiling);
            }
            prop_assert!(ranked.windows(2).all(|w| w[0].relevance >= w[1].relevance));
            if seed_tags.is_empty() {
                prop_assert!(ranked.iter().all(|s| s.relevance == 0.0));
            }
        }

        /// Related-tag weights stay in [0, 1] and never name the seed's tags.
        #[test]
        fn related_tag_weights_bounded(
            seed_tags in tags_strategy(),
            candidate_tags in candidates_strategy(),
        ) {
            let (seed, candidates) = build(&seed_tags, &candidate_tags);
            let related = compute_related_tags(&seed, &candidates);

            for r in &related {
                prop_assert!(r.weight > 0.0 && r.weight <= 1.0);
                prop_assert!(!seed_tags.contains(&r.tag.as_str()));
            }
            prop_assert!(related.windows(2).all(|w| w[0].weight >= w[1].weight));
            if candidate_tags.is_empty() {
                prop_assert!(related.is_empty());
            }
        }

        /// Usage counts never exceed the number of published articles.
        #[test]
        fn tag_usage_counts_bounded(candidate_tags in candidates_strategy()) {
            let articles: Vec<Article> = candidate_tags
                .iter()
                .enumerate()
                .map(|(i, tags)| article(i as i64, &format!("a{}", i), tags, i % 2 == 0))
                .collect();
            let published = articles.iter().filter(|a| a.published).count() as u64;

            let counts = tag_usage_counts(&articles);
            prop_assert!(counts.iter().all(|c| c.count >= 1 && c.count <= published));
            prop_assert_eq!(tag_usage_counts(&articles), counts);
        }
    }
}
