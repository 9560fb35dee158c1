//! In-memory feed state: loading lifecycle, filtering, search and pagination.
//!
//! The controller performs no I/O. The UI starts a fetch with
//! [`NewsFeedController::begin_fetch`], runs [`FeedFetcher::fetch`](super::FeedFetcher::fetch)
//! in a background task and hands the outcome back through
//! [`NewsFeedController::finish_fetch`].

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

use super::card::ArticleCard;
use super::fetcher::FetchError;
use super::types::{Article, FeedDocument};

/// Articles per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;
/// Filter value that matches every category.
pub const ALL_CATEGORIES: &str = "all";

/// Where the controller is in its fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading,
    /// At least one article loaded.
    Loaded,
    /// The feed loaded but contains no articles.
    Empty,
    /// The last fetch failed; holds the user-facing message.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Next,
    Prev,
}

/// The mutable view over the loaded feed.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub articles: Vec<Article>,
    /// 1-based.
    pub current_page: usize,
    pub page_size: usize,
    /// A category name or [`ALL_CATEGORIES`].
    pub active_filter: String,
    pub search_term: String,
    /// Time of the last successful fetch.
    pub last_fetch_time: Option<Instant>,
    /// `lastUpdated` from the feed envelope.
    pub last_updated: Option<String>,
    /// `totalArticles` from the feed envelope.
    pub total_articles: Option<usize>,
}

/// Owns the feed state for one session.
///
/// Created at startup and dropped on exit; nothing is persisted.
pub struct NewsFeedController {
    state: FeedState,
    load_state: LoadState,
    /// Indices into `state.articles` that pass the filter and search, in source order.
    visible: Vec<usize>,
    refresh_interval: Option<Duration>,
    generation: u64,
}

impl NewsFeedController {
    /// `page_size` of 0 is treated as 1. `refresh_interval` of `None` disables
    /// scheduled refresh.
    pub fn new(page_size: usize, refresh_interval: Option<Duration>) -> Self {
        Self {
            state: FeedState {
                articles: Vec::new(),
                current_page: 1,
                page_size: page_size.max(1),
                active_filter: ALL_CATEGORIES.to_string(),
                search_term: String::new(),
                last_fetch_time: None,
                last_updated: None,
                total_articles: None,
            },
            load_state: LoadState::Idle,
            visible: Vec::new(),
            refresh_interval,
            generation: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    // ------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------

    /// Marks a fetch as started and returns its generation number.
    ///
    /// Only the result carrying the latest generation is applied by
    /// [`finish_fetch`](Self::finish_fetch).
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.load_state = LoadState::Loading;
        tracing::debug!(generation = self.generation, "Feed fetch started");
        self.generation
    }

    /// Applies a fetch outcome. Returns `false` if the result was stale and ignored.
    ///
    /// Success replaces the article list, resets to page 1 and records the
    /// fetch time. Failure clears the list so no stale cards remain; the
    /// previous fetch time is kept.
    pub fn finish_fetch(
        &mut self,
        generation: u64,
        result: Result<FeedDocument, FetchError>,
        now: Instant,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale feed result"
            );
            return false;
        }

        match result {
            Ok(doc) => {
                tracing::info!(articles = doc.articles.len(), "Feed state replaced");
                self.state.articles = doc.articles;
                self.state.last_updated = doc.last_updated;
                self.state.total_articles = doc.total_articles;
                self.state.last_fetch_time = Some(now);
                self.state.current_page = 1;

                // Drop a category filter that no longer has any articles.
                if !self.filter_is_all() && !self.has_category(&self.state.active_filter) {
                    self.state.active_filter = ALL_CATEGORIES.to_string();
                }

                self.load_state = if self.state.articles.is_empty() {
                    LoadState::Empty
                } else {
                    LoadState::Loaded
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Feed fetch failed");
                self.state.articles.clear();
                self.state.last_updated = None;
                self.state.total_articles = None;
                self.state.current_page = 1;
                self.load_state = LoadState::Error(format!("Failed to load news: {}", e));
            }
        }

        self.recompute_visible();
        true
    }

    /// Whether a scheduled refresh should fetch now.
    ///
    /// True when scheduling is enabled and either no fetch has succeeded yet or
    /// at least one full interval has passed since the last successful fetch.
    pub fn refresh_due(&self, now: Instant) -> bool {
        let Some(interval) = self.refresh_interval else {
            return false;
        };
        match self.state.last_fetch_time {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= interval,
        }
    }

    // ------------------------------------------------------------------
    // Filter / search / pagination
    // ------------------------------------------------------------------

    /// Restricts the view to one category (or [`ALL_CATEGORIES`]) and returns to page 1.
    pub fn apply_filter(&mut self, category: &str) {
        let category = category.trim();
        self.state.active_filter = if category.is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            category.to_string()
        };
        self.state.current_page = 1;
        self.recompute_visible();
    }

    /// Sets the search term and returns to page 1.
    pub fn apply_search(&mut self, term: &str) {
        self.state.search_term = term.trim().to_string();
        self.state.current_page = 1;
        self.recompute_visible();
    }

    pub fn clear_search(&mut self) {
        self.apply_search("");
    }

    /// Steps to the next filter in `["all", categories...]`, wrapping around.
    /// Returns the new filter.
    pub fn cycle_filter(&mut self) -> String {
        let mut options = vec![ALL_CATEGORIES.to_string()];
        options.extend(self.categories());

        let current = options
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&self.state.active_filter))
            .unwrap_or(0);
        let next = options[(current + 1) % options.len()].clone();
        self.apply_filter(&next);
        next
    }

    /// Moves one page forward or back, clamped to `[1, total_pages]`.
    /// Returns whether the page changed.
    pub fn paginate(&mut self, direction: PageDirection) -> bool {
        let before = self.state.current_page;
        self.state.current_page = match direction {
            PageDirection::Next => (before + 1).min(self.total_pages()),
            PageDirection::Prev => before.saturating_sub(1).max(1),
        };
        before != self.state.current_page
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of articles passing the current filter and search.
    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    /// Always at least 1, so page 1 exists even when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.state.page_size).max(1)
    }

    pub fn has_next_page(&self) -> bool {
        self.state.current_page < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.state.current_page > 1
    }

    /// Articles on the current page, in source order.
    pub fn visible_page(&self) -> Vec<&Article> {
        let start = (self.state.current_page - 1) * self.state.page_size;
        self.visible
            .iter()
            .skip(start)
            .take(self.state.page_size)
            .map(|&i| &self.state.articles[i])
            .collect()
    }

    /// Cards for the current page, rebuilt from scratch.
    pub fn cards(&self, now: DateTime<Utc>) -> Vec<ArticleCard> {
        self.visible_page()
            .into_iter()
            .map(|a| ArticleCard::from_article(a, now))
            .collect()
    }

    /// Distinct categories in first-seen order (case-insensitive de-duplication).
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for category in self.state.articles.iter().filter_map(|a| a.category.as_deref()) {
            if !seen.iter().any(|s| s.eq_ignore_ascii_case(category)) {
                seen.push(category.to_string());
            }
        }
        seen
    }

    /// True when the feed has articles but the filter/search hides all of them.
    pub fn no_matches(&self) -> bool {
        self.load_state == LoadState::Loaded && self.visible.is_empty()
    }

    fn filter_is_all(&self) -> bool {
        self.state.active_filter.eq_ignore_ascii_case(ALL_CATEGORIES)
    }

    fn has_category(&self, category: &str) -> bool {
        self.state.articles.iter().any(|a| a.in_category(category))
    }

    fn recompute_visible(&mut self) {
        let needle = self.state.search_term.to_lowercase();
        let all = self.filter_is_all();
        let filter = &self.state.active_filter;

        self.visible = self
            .state
            .articles
            .iter()
            .enumerate()
            .filter(|(_, a)| all || a.in_category(filter))
            .filter(|(_, a)| a.matches_search(&needle))
            .map(|(i, _)| i)
            .collect();

        let pages = self.total_pages();
        if self.state.current_page > pages {
            self.state.current_page = pages;
        }
        debug_assert!(self.state.current_page >= 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(title: &str, category: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            source: Some("Wire".to_string()),
            published_at: None,
            category: Some(category.to_string()),
            image: None,
            reading_time: None,
        }
    }

    fn doc(articles: Vec<Article>) -> FeedDocument {
        FeedDocument {
            articles,
            last_updated: Some("2026-03-04 10:00:00".to_string()),
            total_articles: None,
        }
    }

    fn loaded(articles: Vec<Article>, page_size: usize) -> NewsFeedController {
        let mut c = NewsFeedController::new(page_size, None);
        let generation = c.begin_fetch();
        assert!(c.finish_fetch(generation, Ok(doc(articles)), Instant::now()));
        c
    }

    fn numbered(n: usize) -> Vec<Article> {
        (1..=n)
            .map(|i| article(&format!("Article {}", i), "tech"))
            .collect()
    }

    fn titles(c: &NewsFeedController) -> Vec<String> {
        c.visible_page().iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn test_new_controller_is_idle() {
        let c = NewsFeedController::new(DEFAULT_PAGE_SIZE, None);
        assert_eq!(c.load_state(), &LoadState::Idle);
        assert_eq!(c.state().current_page, 1);
        assert_eq!(c.total_pages(), 1);
        assert!(c.visible_page().is_empty());
    }

    #[test]
    fn test_begin_fetch_sets_loading() {
        let mut c = NewsFeedController::new(DEFAULT_PAGE_SIZE, None);
        c.begin_fetch();
        assert!(c.is_loading());
    }

    #[test]
    fn test_pagination_thirteen_articles() {
        let mut c = loaded(numbered(13), 6);
        assert_eq!(c.total_pages(), 3);
        assert_eq!(
            titles(&c),
            (1..=6).map(|i| format!("Article {}", i)).collect::<Vec<_>>()
        );
        assert!(!c.has_prev_page());

        assert!(c.paginate(PageDirection::Next));
        assert!(c.paginate(PageDirection::Next));
        assert_eq!(c.state().current_page, 3);
        assert_eq!(titles(&c), vec!["Article 13".to_string()]);
        assert!(!c.has_next_page());

        // Clamped at the last page
        assert!(!c.paginate(PageDirection::Next));
        assert_eq!(c.state().current_page, 3);
    }

    #[test]
    fn test_paginate_prev_clamps_at_one() {
        let mut c = loaded(numbered(3), 6);
        assert!(!c.paginate(PageDirection::Prev));
        assert_eq!(c.state().current_page, 1);
    }

    #[test]
    fn test_filter_all_is_identity() {
        let articles = vec![
            article("A", "research"),
            article("B", "industry"),
            article("C", "research"),
        ];
        let mut c = loaded(articles, 10);
        c.apply_filter("research");
        assert_eq!(titles(&c), vec!["A", "C"]);
        c.apply_filter(ALL_CATEGORIES);
        assert_eq!(titles(&c), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_search_case_insensitive() {
        let articles = vec![
            article("OpenAI launches tool", "industry"),
            article("Rust 2.0 released", "tech"),
        ];
        let mut c = loaded(articles, 10);
        c.apply_search("AI");
        assert_eq!(titles(&c), vec!["OpenAI launches tool"]);
    }

    #[test]
    fn test_filter_and_search_intersect() {
        let articles = vec![
            article("AI chip", "industry"),
            article("AI paper", "research"),
            article("Funding round", "industry"),
        ];
        let mut c = loaded(articles, 10);
        c.apply_filter("industry");
        c.apply_search("ai");
        assert_eq!(titles(&c), vec!["AI chip"]);
    }

    #[test]
    fn test_filter_and_search_reset_page() {
        let mut c = loaded(numbered(13), 6);
        c.paginate(PageDirection::Next);
        c.apply_search("article");
        assert_eq!(c.state().current_page, 1);
        c.paginate(PageDirection::Next);
        c.apply_filter("tech");
        assert_eq!(c.state().current_page, 1);
    }

    #[test]
    fn test_no_matches_keeps_page_one() {
        let mut c = loaded(numbered(4), 2);
        c.apply_search("nothing matches this");
        assert_eq!(c.filtered_count(), 0);
        assert_eq!(c.state().current_page, 1);
        assert!(c.visible_page().is_empty());
        assert!(c.no_matches());
        assert!(!c.has_next_page());
    }

    #[test]
    fn test_empty_feed_state() {
        let c = loaded(Vec::new(), 6);
        assert_eq!(c.load_state(), &LoadState::Empty);
        assert!(!c.no_matches());
        assert!(c.state().last_fetch_time.is_some());
    }

    #[test]
    fn test_error_clears_previous_articles() {
        let mut c = loaded(numbered(3), 6);
        let last_fetch = c.state().last_fetch_time;
        let generation = c.begin_fetch();
        c.finish_fetch(generation, Err(FetchError::HttpStatus(404)), Instant::now());

        assert!(matches!(c.load_state(), LoadState::Error(msg) if msg.contains("404")));
        assert!(c.visible_page().is_empty());
        assert!(c.state().articles.is_empty());
        assert_eq!(c.state().last_fetch_time, last_fetch);
    }

    #[test]
    fn test_success_after_error_clears_message() {
        let mut c = NewsFeedController::new(6, None);
        let g = c.begin_fetch();
        c.finish_fetch(g, Err(FetchError::Timeout), Instant::now());
        let g = c.begin_fetch();
        c.finish_fetch(g, Ok(doc(numbered(2))), Instant::now());
        assert_eq!(c.load_state(), &LoadState::Loaded);
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut c = NewsFeedController::new(6, None);
        let old = c.begin_fetch();
        let new = c.begin_fetch();
        assert!(!c.finish_fetch(old, Ok(doc(numbered(1))), Instant::now()));
        assert!(c.is_loading());
        assert!(c.finish_fetch(new, Ok(doc(numbered(2))), Instant::now()));
        assert_eq!(c.state().articles.len(), 2);
    }

    #[test]
    fn test_refresh_resets_page_and_drops_vanished_filter() {
        let mut c = loaded(
            vec![article("A", "research"), article("B", "industry")],
            1,
        );
        c.apply_filter("research");
        let g = c.begin_fetch();
        c.finish_fetch(g, Ok(doc(vec![article("C", "industry")])), Instant::now());
        assert_eq!(c.state().active_filter, ALL_CATEGORIES);
        assert_eq!(titles(&c), vec!["C"]);
    }

    #[test]
    fn test_search_survives_refresh() {
        let mut c = loaded(numbered(3), 6);
        c.apply_search("2");
        let g = c.begin_fetch();
        c.finish_fetch(g, Ok(doc(numbered(12))), Instant::now());
        assert_eq!(titles(&c), vec!["Article 2", "Article 12"]);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let c = loaded(
            vec![
                article("A", "research"),
                article("B", "industry"),
                article("C", "Research"),
            ],
            6,
        );
        assert_eq!(c.categories(), vec!["research", "industry"]);
    }

    #[test]
    fn test_cycle_filter_wraps() {
        let mut c = loaded(vec![article("A", "research"), article("B", "industry")], 6);
        assert_eq!(c.cycle_filter(), "research");
        assert_eq!(c.cycle_filter(), "industry");
        assert_eq!(c.cycle_filter(), ALL_CATEGORIES);
    }

    #[test]
    fn test_cards_match_visible_page() {
        let c = loaded(numbered(8), 6);
        let cards = c.cards(Utc::now());
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].title, "Article 1");
        assert_eq!(cards[5].title, "Article 6");
    }

    #[test]
    fn test_refresh_due_disabled_without_interval() {
        let c = NewsFeedController::new(6, None);
        assert!(!c.refresh_due(Instant::now()));
    }

    #[test]
    fn test_refresh_due_before_first_fetch() {
        let c = NewsFeedController::new(6, Some(Duration::from_secs(300)));
        assert!(c.refresh_due(Instant::now()));
    }

    #[test]
    fn test_refresh_due_respects_interval() {
        let mut c = NewsFeedController::new(6, Some(Duration::from_secs(300)));
        let fetched_at = Instant::now();
        let g = c.begin_fetch();
        c.finish_fetch(g, Ok(doc(numbered(1))), fetched_at);

        assert!(!c.refresh_due(fetched_at + Duration::from_secs(60)));
        assert!(!c.refresh_due(fetched_at + Duration::from_secs(299)));
        assert!(c.refresh_due(fetched_at + Duration::from_secs(300)));
        assert!(c.refresh_due(fetched_at + Duration::from_secs(900)));
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let c = loaded(numbered(3), 0);
        assert_eq!(c.state().page_size, 1);
        assert_eq!(c.total_pages(), 3);
    }
}
