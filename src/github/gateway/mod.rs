//! Outbound HTTP transport used by the fetch engine.
//!
//! The engine only ever issues GET requests and consumes each response as a
//! `(status, headers, body)` triple. The [`HttpTransport`] trait is the seam
//! for that exchange so the paging logic can be tested against mocks while
//! [`OctocrabTransport`] handles authenticated requests in production.

mod client;
mod error_mapping;
mod http_utils;
mod transport;

pub use transport::OctocrabTransport;

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::github::error::{FetchCause, FetchError};

use error_mapping::map_http_error;
use http_utils::extract_github_message;

/// Raw response to a GET request.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers, including pagination and rate limit headers.
    pub headers: HeaderMap,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response with empty headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Adds headers to the response.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Transport that can issue authenticated GET requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a GET request against an absolute URL.
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// failures to obtain a response at all are reported as a
    /// [`FetchCause`].
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchCause>;
}

/// Issues a GET and rejects any non-success status.
pub(crate) async fn get_success(
    transport: &dyn HttpTransport,
    operation: &str,
    url: &str,
) -> Result<TransportResponse, FetchError> {
    let response = transport
        .get(url)
        .await
        .map_err(|cause| FetchError::fetch(operation, url, cause))?;

    if response.status.is_success() {
        return Ok(response);
    }

    let cause = map_http_error(
        response.status,
        &response.headers,
        extract_github_message(&response.body),
    );
    Err(FetchError::fetch(operation, url, cause))
}

/// Decodes a JSON response body.
pub(crate) fn decode_body<T: DeserializeOwned>(
    operation: &str,
    url: &str,
    body: &str,
) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|error| {
        FetchError::fetch(
            operation,
            url,
            FetchCause::Decode {
                message: error.to_string(),
            },
        )
    })
}
