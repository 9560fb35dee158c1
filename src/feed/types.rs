use serde::Deserialize;

/// One news entry from the feed file.
///
/// Only `url` is expected to always be present, and even that is tolerated
/// missing: the card renders and opening it reports "Article has no URL".
/// Every other field degrades to placeholder text when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    /// Raw timestamp as written by the feed generator; parsed at render time.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Estimated minutes to read.
    #[serde(default)]
    pub reading_time: Option<u32>,
}

impl Article {
    /// Case-insensitive substring match over title, description, source and category.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let hit = |field: &str| field.to_lowercase().contains(needle);
        hit(&self.title)
            || self.description.as_deref().is_some_and(hit)
            || self.source.as_deref().is_some_and(hit)
            || self.category.as_deref().is_some_and(hit)
    }

    /// Whether this article belongs to `category` (exact, case-insensitive).
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

/// The canonical feed document: an envelope around the article list.
///
/// ```json
/// { "articles": [ ... ], "lastUpdated": "2026-03-04 10:00:00", "totalArticles": 30 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDocument {
    pub articles: Vec<Article>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub total_articles: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: Some("A new model for code review".to_string()),
            url: "https://example.com/a".to_string(),
            source: Some("TechCrunch".to_string()),
            published_at: None,
            category: Some("industry".to_string()),
            image: None,
            reading_time: None,
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let a = article("OpenAI launches tool");
        assert!(a.matches_search("ai"));
        assert!(a.matches_search("launches"));
        assert!(!a.matches_search("robotics"));
    }

    #[test]
    fn test_search_covers_all_text_fields() {
        let a = article("Headline");
        assert!(a.matches_search("code review"));
        assert!(a.matches_search("techcrunch"));
        assert!(a.matches_search("industry"));
    }

    #[test]
    fn test_empty_needle_matches() {
        assert!(article("x").matches_search(""));
    }

    #[test]
    fn test_in_category() {
        let a = article("x");
        assert!(a.in_category("industry"));
        assert!(a.in_category("Industry"));
        assert!(!a.in_category("research"));

        let mut uncategorized = article("y");
        uncategorized.category = None;
        assert!(!uncategorized.in_category("industry"));
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r#"{
            "title": "T",
            "url": "https://example.com",
            "publishedAt": "2026-03-04T10:00:00Z",
            "readingTime": 4
        }"#;
        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.published_at.as_deref(), Some("2026-03-04T10:00:00Z"));
        assert_eq!(a.reading_time, Some(4));
        assert!(a.description.is_none());
    }
}
