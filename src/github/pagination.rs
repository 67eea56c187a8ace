//! Next-page cursor extraction for paginated GitHub responses.
//!
//! GitHub advertises further pages through the `Link` response header, whose
//! value is a comma-separated list of `<url>; rel="name"` segments. Only the
//! `next` relation matters for walking a collection forward.

use http::HeaderMap;
use http::header::LINK;

const NEXT_RELATION: &str = "rel=\"next\"";

/// Computes the locator of the page following a response.
pub trait CursorExtractor: Send + Sync {
    /// Returns the next page locator, or `None` once the collection is
    /// exhausted.
    fn next_page(&self, headers: &HeaderMap) -> Option<String>;
}

/// Cursor extractor reading the RFC 8288 `Link` header.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkHeaderCursor;

impl CursorExtractor for LinkHeaderCursor {
    fn next_page(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_link)
    }
}

/// Extracts the `rel="next"` URL from a `Link` header value.
///
/// Segments that do not split into exactly a URL part and a relation part,
/// or whose URL is not wrapped in angle brackets, are skipped.
///
/// # Example
///
/// ```
/// use pullfetch::github::pagination::next_link;
///
/// let header = r#"<https://api.github.com/repositories/1/pulls?page=2>; rel="next", <https://api.github.com/repositories/1/pulls?page=9>; rel="last""#;
/// assert_eq!(
///     next_link(header).as_deref(),
///     Some("https://api.github.com/repositories/1/pulls?page=2")
/// );
/// assert_eq!(next_link(r#"<https://x.invalid/?page=9>; rel="last""#), None);
/// ```
#[must_use]
pub fn next_link(header_value: &str) -> Option<String> {
    header_value.split(',').find_map(next_segment_url)
}

fn next_segment_url(segment: &str) -> Option<String> {
    let mut parts = segment.split(';');
    let target = parts.next()?.trim();
    let relation = parts.next()?.trim();
    if parts.next().is_some() || relation != NEXT_RELATION {
        return None;
    }

    target
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map(ToOwned::to_owned)
}
