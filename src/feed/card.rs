use chrono::{DateTime, Utc};

use super::types::Article;
use crate::util::format_timestamp;

/// Title shown when an article has none.
pub const TITLE_PLACEHOLDER: &str = "No Title Available";
/// Source shown when an article does not name one.
pub const SOURCE_PLACEHOLDER: &str = "Unknown source";

/// Display-ready view of one article.
///
/// Cards are rebuilt from scratch for every frame from the current page; they
/// hold no state of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub source: String,
    pub timestamp: String,
    pub category: Option<String>,
    pub reading_time: Option<String>,
}

impl ArticleCard {
    pub fn from_article(article: &Article, now: DateTime<Utc>) -> Self {
        let title = if article.title.is_empty() {
            TITLE_PLACEHOLDER.to_string()
        } else {
            article.title.clone()
        };

        Self {
            title,
            url: article.url.clone(),
            description: article.description.clone(),
            source: article
                .source
                .clone()
                .unwrap_or_else(|| SOURCE_PLACEHOLDER.to_string()),
            timestamp: format_timestamp(article.published_at.as_deref(), now),
            category: article.category.clone(),
            reading_time: article
                .reading_time
                .filter(|&m| m > 0)
                .map(|m| format!("{} min read", m)),
        }
    }
}
