//! Octocrab client construction for the HTTP transport.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::FetchError;
use crate::github::locator::PersonalAccessToken;

/// Builds an Octocrab client for the given API base URL.
///
/// Requests are anonymous when no token is supplied.
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` when the base URI cannot be parsed or
/// `FetchError::Configuration` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: Option<&PersonalAccessToken>,
    api_base: &str,
) -> Result<Octocrab, FetchError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| FetchError::InvalidUrl(error.to_string()))?;

    let builder = match token {
        Some(value) => Octocrab::builder().personal_token(value.as_ref()),
        None => Octocrab::builder(),
    };

    builder
        .base_uri(base_uri)
        .map_err(|error| FetchError::Configuration {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| FetchError::Configuration {
            message: format!("build client failed: {error}"),
        })
}
