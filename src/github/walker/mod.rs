//! Cursor-following paginator over remote entity collections.
//!
//! [`PageWalker::fetch_paged`] requests successive pages, optionally re-sorts
//! everything accumulated so far by recency, and trims the oldest tail to
//! enforce a size cap and an update-time cutoff. Either trim ends the walk,
//! even when the provider advertised another page.
//!
//! Cutoff trimming scans from the tail and stops at the first entity newer
//! than the cutoff, so it is only exact when the accumulated entities are in
//! descending update-time order. With `sort_required` off this relies on the
//! provider returning pages newest first.

use serde::de::DeserializeOwned;
use url::Url;

use super::error::FetchError;
use super::gateway::{HttpTransport, decode_body, get_success};
use super::pagination::CursorExtractor;

/// GitHub caps `per_page` at 100.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Entities that expose an update time for ordering and cutoff trimming.
pub trait UpdateTime {
    /// Update time in UTC epoch milliseconds; 0 when unknown.
    fn update_time(&self) -> i64;
}

/// Size and recency bounds for one paginated fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchBounds {
    page_size: u32,
    max_total: usize,
    min_update_time: i64,
    sort_required: bool,
}

impl FetchBounds {
    /// Creates bounds with no cutoff and no re-sorting.
    #[must_use]
    pub const fn new(page_size: u32, max_total: usize) -> Self {
        Self {
            page_size,
            max_total,
            min_update_time: 0,
            sort_required: false,
        }
    }

    /// Sets the exclusive update-time cutoff in epoch milliseconds.
    ///
    /// Values of zero or below disable the cutoff.
    #[must_use]
    pub const fn with_min_update_time(mut self, min_update_time: i64) -> Self {
        self.min_update_time = min_update_time;
        self
    }

    /// Requests a descending update-time sort after every page.
    ///
    /// Needed for endpoints that return oldest entities first, since the
    /// trims always remove from the tail.
    #[must_use]
    pub const fn with_sort_required(mut self, sort_required: bool) -> Self {
        self.sort_required = sort_required;
        self
    }

    /// Items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Maximum number of entities returned.
    #[must_use]
    pub const fn max_total(&self) -> usize {
        self.max_total
    }

    /// Exclusive update-time cutoff; 0 when disabled.
    #[must_use]
    pub const fn min_update_time(&self) -> i64 {
        self.min_update_time
    }

    /// Whether the accumulator is re-sorted after every page.
    #[must_use]
    pub const fn sort_required(&self) -> bool {
        self.sort_required
    }

    fn validate(&self) -> Result<(), FetchError> {
        if self.page_size == 0 {
            return Err(FetchError::InvalidParameters {
                message: "page size must be at least 1".to_owned(),
            });
        }

        if self.page_size > MAX_PAGE_SIZE {
            return Err(FetchError::InvalidParameters {
                message: format!("page size must not exceed {MAX_PAGE_SIZE}"),
            });
        }

        Ok(())
    }
}

/// Where a walk stands after a page has been merged and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WalkState {
    /// Another page exists at this locator.
    MorePages(String),
    /// The size cap removed entities.
    TrimmedByCap,
    /// The update-time cutoff removed entities.
    TrimmedByCutoff,
    /// The provider advertised no further page.
    Exhausted,
}

/// Paginated reader over a transport.
pub struct PageWalker<'a> {
    transport: &'a dyn HttpTransport,
    cursor: &'a dyn CursorExtractor,
}

impl<'a> PageWalker<'a> {
    /// Creates a walker that follows cursors produced by `cursor`.
    #[must_use]
    pub const fn new(transport: &'a dyn HttpTransport, cursor: &'a dyn CursorExtractor) -> Self {
        Self { transport, cursor }
    }

    /// Fetches a collection page by page until it is exhausted or trimmed.
    ///
    /// `operation` names the call in errors and logs.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidParameters`] for an out-of-range page
    /// size, [`FetchError::InvalidUrl`] when `locator` cannot be parsed, and
    /// [`FetchError::Fetch`] when any page request or decode fails. No
    /// partial result is returned.
    pub async fn fetch_paged<T>(
        &self,
        operation: &str,
        locator: &str,
        bounds: &FetchBounds,
    ) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned + UpdateTime,
    {
        bounds.validate()?;

        let mut accumulated: Vec<T> = Vec::new();
        let mut url = with_page_size(locator, bounds.page_size())?;
        let mut pages = 0_u32;

        loop {
            let response = get_success(self.transport, operation, &url).await?;
            let page: Vec<T> = decode_body(operation, &url, &response.body)?;
            pages += 1;
            tracing::debug!(
                operation,
                page = pages,
                received = page.len(),
                "fetched page from {url}"
            );
            accumulated.extend(page);

            let state = settle_page(&mut accumulated, bounds, self.cursor.next_page(&response.headers));
            match state {
                WalkState::MorePages(next) => url = next,
                terminal => {
                    tracing::debug!(
                        operation,
                        pages,
                        total = accumulated.len(),
                        "walk finished: {terminal:?}"
                    );
                    break;
                }
            }
        }

        Ok(accumulated)
    }
}

/// Sorts and trims the accumulator after a page and decides whether to
/// continue.
fn settle_page<T: UpdateTime>(
    accumulated: &mut Vec<T>,
    bounds: &FetchBounds,
    next_page: Option<String>,
) -> WalkState {
    let mut state = next_page.map_or(WalkState::Exhausted, WalkState::MorePages);

    if bounds.sort_required() {
        accumulated.sort_by(|left, right| right.update_time().cmp(&left.update_time()));
    }

    if accumulated.len() > bounds.max_total() {
        accumulated.truncate(bounds.max_total());
        state = WalkState::TrimmedByCap;
    }

    if trim_outdated(accumulated, bounds.min_update_time()) {
        state = WalkState::TrimmedByCutoff;
    }

    state
}

/// Pops entities at or below the cutoff from the tail. Returns true when
/// anything was removed.
fn trim_outdated<T: UpdateTime>(accumulated: &mut Vec<T>, min_update_time: i64) -> bool {
    if min_update_time <= 0 {
        return false;
    }

    let mut trimmed = false;
    while accumulated
        .last()
        .is_some_and(|entity| entity.update_time() <= min_update_time)
    {
        accumulated.pop();
        trimmed = true;
    }
    trimmed
}

/// Appends `per_page` to the locator's query string.
fn with_page_size(locator: &str, page_size: u32) -> Result<String, FetchError> {
    let mut url =
        Url::parse(locator).map_err(|error| FetchError::InvalidUrl(format!("{locator}: {error}")))?;
    url.query_pairs_mut()
        .append_pair("per_page", &page_size.to_string());
    Ok(url.into())
}

#[cfg(test)]
mod tests;
