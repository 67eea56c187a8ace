//! Unit tests for the page walker.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use http::{HeaderMap, HeaderValue, StatusCode};
use rstest::rstest;
use serde::Deserialize;
use serde_json::json;

use super::{FetchBounds, PageWalker, UpdateTime, settle_page, with_page_size};
use crate::github::error::{FetchCause, FetchError};
use crate::github::gateway::{HttpTransport, MockHttpTransport, TransportResponse};
use crate::github::pagination::LinkHeaderCursor;

const FIRST_PAGE: &str = "https://api.test/items?per_page=30";
const SECOND_PAGE: &str = "https://api.test/items?page=2";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Item {
    id: u32,
    updated: i64,
}

impl UpdateTime for Item {
    fn update_time(&self) -> i64 {
        self.updated
    }
}

fn item(id: u32, updated: i64) -> Item {
    Item { id, updated }
}

fn ids(items: &[Item]) -> Vec<u32> {
    items.iter().map(|entry| entry.id).collect()
}

/// Serves canned pages by URL and records every request.
#[derive(Default)]
struct StubTransport {
    pages: HashMap<String, TransportResponse>,
    requests: Mutex<Vec<String>>,
}

impl StubTransport {
    fn page(mut self, url: &str, items: &[(u32, i64)], next: Option<&str>) -> Self {
        let body: Vec<_> = items
            .iter()
            .map(|(id, updated)| json!({ "id": id, "updated": updated }))
            .collect();
        let mut headers = HeaderMap::new();
        if let Some(next_url) = next {
            let link = format!("<{next_url}>; rel=\"next\", <{next_url}>; rel=\"last\"");
            headers.insert(
                "link",
                HeaderValue::from_str(&link).expect("link header should be valid"),
            );
        }
        self.pages.insert(
            url.to_owned(),
            TransportResponse::new(StatusCode::OK, json!(body).to_string()).with_headers(headers),
        );
        self
    }

    fn status(mut self, url: &str, status: StatusCode, body: &str) -> Self {
        self.pages
            .insert(url.to_owned(), TransportResponse::new(status, body));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("requests mutex should be available")
            .clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchCause> {
        self.requests
            .lock()
            .expect("requests mutex should be available")
            .push(url.to_owned());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchCause::Network {
                message: format!("no stub for {url}"),
            })
    }
}

async fn walk(
    transport: &dyn HttpTransport,
    bounds: FetchBounds,
) -> Result<Vec<Item>, FetchError> {
    let cursor = LinkHeaderCursor;
    PageWalker::new(transport, &cursor)
        .fetch_paged("list items", "https://api.test/items", &bounds)
        .await
}

#[tokio::test]
async fn cap_reached_on_final_page_returns_exactly_the_cap() {
    let first: Vec<(u32, i64)> = (0..35).map(|id| (id, 1_000 - i64::from(id))).collect();
    let second: Vec<(u32, i64)> = (35..40).map(|id| (id, 1_000 - i64::from(id))).collect();
    let transport = StubTransport::default()
        .page(FIRST_PAGE, &first, Some(SECOND_PAGE))
        .page(SECOND_PAGE, &second, None);

    let items = walk(&transport, FetchBounds::new(30, 40))
        .await
        .expect("walk should succeed");

    assert_eq!(items.len(), 40);
    assert_eq!(transport.requests(), vec![FIRST_PAGE, SECOND_PAGE]);
}

#[tokio::test]
async fn cap_stops_paging_even_when_next_page_exists() {
    let transport = StubTransport::default()
        .page(FIRST_PAGE, &[(1, 30), (2, 20), (3, 10)], Some(SECOND_PAGE))
        .page(SECOND_PAGE, &[(4, 5)], None);

    let items = walk(&transport, FetchBounds::new(30, 2))
        .await
        .expect("walk should succeed");

    assert_eq!(ids(&items), vec![1, 2]);
    assert_eq!(transport.requests(), vec![FIRST_PAGE]);
}

#[tokio::test]
async fn ascending_pages_are_sorted_before_cutoff_trim() {
    let transport =
        StubTransport::default().page(FIRST_PAGE, &[(1, 100), (2, 200), (3, 300)], None);
    let bounds = FetchBounds::new(30, 30)
        .with_min_update_time(100)
        .with_sort_required(true);

    let items = walk(&transport, bounds).await.expect("walk should succeed");

    assert_eq!(items, vec![item(3, 300), item(2, 200)]);
}

#[tokio::test]
async fn sorting_spans_every_accumulated_page() {
    let transport = StubTransport::default()
        .page(FIRST_PAGE, &[(1, 100), (2, 200)], Some(SECOND_PAGE))
        .page(SECOND_PAGE, &[(3, 300), (4, 400)], None);
    let bounds = FetchBounds::new(30, 30).with_sort_required(true);

    let items = walk(&transport, bounds).await.expect("walk should succeed");

    assert_eq!(ids(&items), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn cutoff_stops_paging_once_old_entities_appear() {
    let transport = StubTransport::default()
        .page(FIRST_PAGE, &[(1, 500), (2, 400), (3, 100)], Some(SECOND_PAGE))
        .page(SECOND_PAGE, &[(4, 50)], None);
    let bounds = FetchBounds::new(30, 30).with_min_update_time(200);

    let items = walk(&transport, bounds).await.expect("walk should succeed");

    assert_eq!(ids(&items), vec![1, 2]);
    assert_eq!(transport.requests(), vec![FIRST_PAGE]);
}

#[tokio::test]
async fn cutoff_is_exclusive_at_the_boundary() {
    let transport = StubTransport::default().page(FIRST_PAGE, &[(1, 201), (2, 200)], None);
    let bounds = FetchBounds::new(30, 30).with_min_update_time(200);

    let items = walk(&transport, bounds).await.expect("walk should succeed");

    assert_eq!(ids(&items), vec![1]);
}

#[tokio::test]
async fn failed_page_discards_accumulated_results() {
    let transport = StubTransport::default()
        .page(FIRST_PAGE, &[(1, 500)], Some(SECOND_PAGE))
        .status(
            SECOND_PAGE,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message": "Server Error"}"#,
        );

    let error = walk(&transport, FetchBounds::new(30, 30))
        .await
        .expect_err("walk should fail");

    assert_eq!(
        error,
        FetchError::Fetch {
            operation: "list items".to_owned(),
            url: SECOND_PAGE.to_owned(),
            cause: FetchCause::Status {
                status: 500,
                message: "Server Error".to_owned(),
            },
        }
    );
}

#[tokio::test]
async fn undecodable_page_is_a_decode_failure() {
    let mut transport = MockHttpTransport::new();
    transport
        .expect_get()
        .times(1)
        .returning(|_| Ok(TransportResponse::new(StatusCode::OK, r#"{"not": "a list"}"#)));

    let error = walk(&transport, FetchBounds::new(30, 30))
        .await
        .expect_err("walk should fail");

    assert!(
        matches!(
            error.remote_cause(),
            Some(FetchCause::Decode { .. })
        ),
        "expected decode failure, got {error:?}"
    );
}

#[tokio::test]
async fn transport_failure_carries_operation_and_url() {
    let mut transport = MockHttpTransport::new();
    transport.expect_get().times(1).returning(|_| {
        Err(FetchCause::Network {
            message: "connection reset".to_owned(),
        })
    });

    let error = walk(&transport, FetchBounds::new(30, 30))
        .await
        .expect_err("walk should fail");

    assert_eq!(
        error.to_string(),
        format!("list items failed for {FIRST_PAGE}: network error: connection reset")
    );
}

#[rstest]
#[case::zero(0)]
#[case::above_maximum(101)]
#[tokio::test]
async fn rejects_out_of_range_page_sizes(#[case] page_size: u32) {
    let transport = MockHttpTransport::new();

    let error = walk(&transport, FetchBounds::new(page_size, 30))
        .await
        .expect_err("walk should fail");

    assert!(
        matches!(error, FetchError::InvalidParameters { .. }),
        "expected InvalidParameters, got {error:?}"
    );
}

#[rstest]
#[case::no_query("https://api.test/items", "https://api.test/items?per_page=30")]
#[case::existing_query(
    "https://api.test/pulls?state=all",
    "https://api.test/pulls?state=all&per_page=30"
)]
fn page_size_is_appended_to_the_query(#[case] locator: &str, #[case] expected: &str) {
    assert_eq!(
        with_page_size(locator, 30).expect("locator should parse"),
        expected
    );
}

#[test]
fn sort_is_stable_for_equal_update_times() {
    let mut accumulated = vec![item(1, 10), item(2, 20), item(3, 10), item(4, 20)];
    let bounds = FetchBounds::new(30, 30).with_sort_required(true);

    settle_page(&mut accumulated, &bounds, None);

    assert_eq!(ids(&accumulated), vec![2, 4, 1, 3]);
}

#[test]
fn unsorted_input_only_trims_the_old_tail() {
    // Cutoff trimming assumes newest-first order; an old entity ahead of a
    // newer one survives.
    let mut accumulated = vec![item(1, 50), item(2, 500), item(3, 40)];
    let bounds = FetchBounds::new(30, 30).with_min_update_time(100);

    settle_page(&mut accumulated, &bounds, None);

    assert_eq!(ids(&accumulated), vec![1, 2]);
}
