//! Error types exposed by the pull request fetch engine.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Underlying reason a single remote call failed.
///
/// Every remote failure is classified into one of these causes and then
/// wrapped by [`FetchError`] together with the operation and URL that were
/// being attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchCause {
    /// The request never produced a response.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The provider rejected the credentials (401/403).
    #[error("authentication rejected with status {status}: {message}")]
    Authentication {
        /// HTTP status code returned.
        status: u16,
        /// Provider error message returned with the response.
        message: String,
    },

    /// The provider refused the request because the rate limit was reached.
    #[error("rate limit exceeded: {message}")]
    RateLimited {
        /// Rate limit headers from the response, when present.
        rate_limit: Option<RateLimitInfo>,
        /// Provider error message, including the reset time when known.
        message: String,
    },

    /// The provider answered with any other non-success status.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code returned.
        status: u16,
        /// Provider error message, or `unknown error` when the body had none.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },
}

/// Errors surfaced while configuring or running a pull request fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The initial reachability check failed; no paging was attempted.
    #[error("repository at {url} is not reachable: {cause}")]
    Connectivity {
        /// Repository API URL that was pinged.
        url: String,
        /// Why the ping failed.
        cause: FetchCause,
    },

    /// A paginated or single-entity GET failed.
    #[error("{operation} failed for {url}: {cause}")]
    Fetch {
        /// Name of the remote operation, e.g. `list commits`.
        operation: String,
        /// URL that was being requested.
        url: String,
        /// Why the request failed.
        cause: FetchCause,
    },

    /// A pull request author is missing from the resolved actor cache.
    #[error("author {login} of pull request {pull_request} could not be resolved")]
    Resolution {
        /// Login the pull request referenced.
        login: String,
        /// Identifier of the pull request being assembled.
        pull_request: String,
    },

    /// The repository URL could not be parsed.
    #[error("repository URL is invalid: {0}")]
    InvalidUrl(String),

    /// The repository path is incomplete.
    #[error("repository URL must match /owner/repo")]
    MissingPathSegments,

    /// No repository URL was configured.
    #[error("repository URL is required")]
    MissingRepositoryUrl,

    /// A supplied authentication token was blank.
    #[error("personal access token must not be blank")]
    MissingToken,

    /// A branch filter pattern failed to compile.
    #[error("branch filter pattern `{pattern}` is invalid: {message}")]
    InvalidPattern {
        /// The offending pattern as written by the user.
        pattern: String,
        /// Compiler error detail.
        message: String,
    },

    /// A timestamp was not valid ISO-8601.
    #[error("timestamp `{value}` is invalid: {message}")]
    InvalidTimestamp {
        /// The raw timestamp text.
        value: String,
        /// Parser error detail.
        message: String,
    },

    /// Fetch bounds or parameters were out of range.
    #[error("invalid fetch parameters: {message}")]
    InvalidParameters {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The whole fetch exceeded the caller's deadline.
    #[error("fetch did not complete within {seconds} seconds")]
    Timeout {
        /// Deadline that elapsed.
        seconds: u64,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl FetchError {
    /// Wraps a remote failure with the operation and URL being attempted.
    pub(crate) fn fetch(operation: &str, url: &str, cause: FetchCause) -> Self {
        Self::Fetch {
            operation: operation.to_owned(),
            url: url.to_owned(),
            cause,
        }
    }

    /// Returns the underlying remote cause for connectivity and fetch errors.
    #[must_use]
    pub const fn remote_cause(&self) -> Option<&FetchCause> {
        match self {
            Self::Connectivity { cause, .. } | Self::Fetch { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
