use anyhow::{bail, Context, Result};

use super::types::{Article, FeedDocument};
use crate::util::strip_control_chars;

/// Parses a feed document from raw response bytes.
///
/// The body must be the envelope object (`{"articles": [...], ...}`). A bare
/// top-level array is rejected rather than guessed at. All text fields are
/// stripped of terminal control sequences.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedDocument> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).context("Response is not valid JSON")?;

    if value.is_array() {
        bail!("Feed is a bare array; expected an object with an \"articles\" field");
    }

    let mut doc: FeedDocument =
        serde_json::from_value(value).context("Feed document has an unexpected shape")?;

    for article in &mut doc.articles {
        sanitize(article);
    }
    doc.last_updated = doc.last_updated.map(|s| clean(&s));

    Ok(doc)
}

fn clean(s: &str) -> String {
    strip_control_chars(s.trim()).into_owned()
}

fn clean_opt(field: &mut Option<String>) {
    *field = field
        .take()
        .map(|s| clean(&s))
        .filter(|s| !s.is_empty());
}

fn sanitize(article: &mut Article) {
    article.title = clean(&article.title);
    article.url = clean(&article.url);
    clean_opt(&mut article.description);
    clean_opt(&mut article.source);
    clean_opt(&mut article.published_at);
    clean_opt(&mut article.category);
    clean_opt(&mut article.image);
}
