//! News feed loading and the in-memory view over it.
//!
//! - [`types`] - `Article` and the canonical `FeedDocument` envelope
//! - [`parser`] - JSON decoding and text sanitising
//! - [`fetcher`] - HTTP retrieval with size limits and backoff
//! - [`controller`] - filter, search, pagination and refresh scheduling
//! - [`card`] - display-ready article cards
//!
//! # Example
//!
//! ```ignore
//! use newsdeck::feed::{FeedFetcher, NewsFeedController, PageDirection};
//!
//! let fetcher = FeedFetcher::new(reqwest::Client::new(), "http://localhost:8000/ai_news.json");
//! let mut controller = NewsFeedController::new(6, None);
//!
//! let generation = controller.begin_fetch();
//! let result = fetcher.fetch(None).await;
//! controller.finish_fetch(generation, result, tokio::time::Instant::now());
//!
//! controller.apply_search("openai");
//! controller.paginate(PageDirection::Next);
//! ```

mod card;
mod controller;
mod fetcher;
mod parser;
mod types;

pub use card::{ArticleCard, SOURCE_PLACEHOLDER, TITLE_PLACEHOLDER};
pub use controller::{
    FeedState, LoadState, NewsFeedController, PageDirection, ALL_CATEGORIES, DEFAULT_PAGE_SIZE,
};
pub use fetcher::{FeedFetcher, FetchError, RetryPolicy};
pub use parser::parse_feed;
pub use types::{Article, FeedDocument};
