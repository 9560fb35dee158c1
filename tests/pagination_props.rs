//! Property tests for filtering and pagination invariants.

use newsdeck::feed::{
    Article, FeedDocument, NewsFeedController, PageDirection, ALL_CATEGORIES,
};
use proptest::prelude::*;
use tokio::time::Instant;

const CATEGORIES: [&str; 3] = ["research", "industry", "policy"];

fn article(i: usize, category: usize) -> Article {
    Article {
        title: format!("Article {}", i),
        description: None,
        url: format!("https://example.com/{}", i),
        source: None,
        published_at: None,
        category: Some(CATEGORIES[category].to_string()),
        image: None,
        reading_time: None,
    }
}

fn loaded(categories: &[usize], page_size: usize) -> NewsFeedController {
    let mut c = NewsFeedController::new(page_size, None);
    let generation = c.begin_fetch();
    let doc = FeedDocument {
        articles: categories
            .iter()
            .enumerate()
            .map(|(i, &cat)| article(i, cat))
            .collect(),
        last_updated: None,
        total_articles: None,
    };
    c.finish_fetch(generation, Ok(doc), Instant::now());
    c
}

proptest! {
    /// Walking every page yields each visible article exactly once, in source
    /// order, and the page stays within `[1, total_pages]`.
    #[test]
    fn pages_partition_the_visible_list(
        categories in prop::collection::vec(0usize..3, 0..40),
        page_size in 1usize..10,
        filter in prop::option::of(0usize..3),
        moves in prop::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut c = loaded(&categories, page_size);
        if let Some(f) = filter {
            c.apply_filter(CATEGORIES[f]);
        }

        let expected: Vec<String> = categories
            .iter()
            .enumerate()
            .filter(|(_, &cat)| filter.map_or(true, |f| f == cat))
            .map(|(i, _)| format!("Article {}", i))
            .collect();

        let mut seen = Vec::new();
        loop {
            let page = c.visible_page();
            prop_assert!(page.len() <= page_size);
            seen.extend(page.iter().map(|a| a.title.clone()));
            if !c.paginate(PageDirection::Next) {
                break;
            }
        }
        prop_assert_eq!(&seen, &expected);
        prop_assert_eq!(c.total_pages(), expected.len().div_ceil(page_size).max(1));

        for next in moves {
            let dir = if next { PageDirection::Next } else { PageDirection::Prev };
            c.paginate(dir);
            let page = c.state().current_page;
            prop_assert!(page >= 1 && page <= c.total_pages());
        }
    }

    /// The "all" filter never hides anything, whatever filter came before.
    #[test]
    fn all_filter_is_identity(
        categories in prop::collection::vec(0usize..3, 0..30),
        first in 0usize..3,
    ) {
        let mut c = loaded(&categories, 6);
        c.apply_filter(CATEGORIES[first]);
        c.apply_filter(ALL_CATEGORIES);
        prop_assert_eq!(c.filtered_count(), categories.len());
        prop_assert_eq!(c.state().current_page, 1);
    }

    /// Search is case-insensitive: any casing of a title substring finds it.
    #[test]
    fn search_ignores_case(idx in 0usize..20, upper in any::<bool>()) {
        let categories = vec![0usize; 20];
        let mut c = loaded(&categories, 6);
        let needle = format!("article {}", idx);
        let needle = if upper { needle.to_uppercase() } else { needle };
        c.apply_search(&needle);
        let target = format!("Article {}", idx);
        prop_assert!(c.visible_page().iter().any(|a| a.title == target));
    }
}
