//! Octocrab implementation of the HTTP transport.

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;

use crate::github::error::{FetchCause, FetchError};
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{HttpTransport, TransportResponse};

/// Octocrab-backed transport.
///
/// Octocrab supplies authentication and the GitHub media type headers; the
/// response is read raw so pagination headers remain visible to the caller.
pub struct OctocrabTransport {
    client: Octocrab,
}

impl OctocrabTransport {
    /// Creates a new transport from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a transport for the repository's API host.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` when the base URI cannot be parsed or
    /// `FetchError::Configuration` when Octocrab fails to construct a client.
    pub fn for_repository(
        token: Option<&PersonalAccessToken>,
        locator: &RepositoryLocator,
    ) -> Result<Self, FetchError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl HttpTransport for OctocrabTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchCause> {
        let uri: Uri = url.parse::<Uri>().map_err(|error| FetchCause::Network {
            message: format!("invalid request URI {url}: {error}"),
        })?;

        let response = self
            .client
            ._get(uri)
            .await
            .map_err(|error| map_octocrab_error(&error))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| FetchCause::Network {
                message: format!("reading response body failed: {error}"),
            })?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
