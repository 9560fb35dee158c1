//! Utility functions shared by the feed layer and the UI.
//!
//! - **Text processing**: control-character stripping and width-aware truncation
//! - **Time formatting**: relative ages ("5m ago") and feed timestamp parsing
//! - **URL validation**: scheme and host checks before fetching or opening links
//!
//! # Examples
//!
//! ```
//! use newsdeck::util::{relative_time, truncate_to_width};
//! use chrono::{Duration, Utc};
//!
//! let now = Utc::now();
//! assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
//! assert_eq!(truncate_to_width("Long article title", 10), "Long ar...");
//! ```

mod text;
mod time;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use time::{format_timestamp, parse_timestamp, relative_time, DATE_PLACEHOLDER};
pub use url_validator::{validate_url, validate_url_for_open, UrlValidationError};

/// Maximum allowed search query length
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
