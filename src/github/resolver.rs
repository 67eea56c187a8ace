//! Single-entity reads by URL.

use serde::de::DeserializeOwned;

use super::error::FetchError;
use super::gateway::{HttpTransport, decode_body, get_success};

/// Fetches individual entities referenced by absolute URL.
///
/// There is no caching or retry at this layer; callers that look up the
/// same entity repeatedly keep their own cache.
pub struct EntityResolver<'a> {
    transport: &'a dyn HttpTransport,
}

impl<'a> EntityResolver<'a> {
    /// Creates a resolver over the transport.
    #[must_use]
    pub const fn new(transport: &'a dyn HttpTransport) -> Self {
        Self { transport }
    }

    /// Fetches and decodes the entity at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Fetch`] naming `operation` and `url` when the
    /// request fails, the status is not a success, or the body does not
    /// decode as `T`.
    pub async fn fetch_entity<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
    ) -> Result<T, FetchError> {
        let response = get_success(self.transport, operation, url).await?;
        tracing::debug!(operation, "fetched entity from {url}");
        decode_body(operation, url, &response.body)
    }
}
