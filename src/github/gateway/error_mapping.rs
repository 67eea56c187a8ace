//! Maps failed responses and Octocrab errors into [`FetchCause`] values.

use http::{HeaderMap, StatusCode};

use crate::github::error::FetchCause;
use crate::github::rate_limit::RateLimitInfo;

/// Checks if a status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks whether a refused request was refused because of rate limiting.
///
/// GitHub answers primary rate limits with 403 and secondary limits with 403
/// or 429; the status alone is ambiguous with permission failures, so the
/// message or an exhausted quota header must agree.
pub(super) fn is_rate_limit_error(status: StatusCode, headers: &HeaderMap, message: &str) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    if status != StatusCode::FORBIDDEN {
        return false;
    }

    message.to_lowercase().contains("rate limit")
        || RateLimitInfo::from_headers(headers).is_some_and(|info| info.is_exhausted())
}

/// Classifies a non-success response.
pub(super) fn map_http_error(
    status: StatusCode,
    headers: &HeaderMap,
    maybe_message: Option<String>,
) -> FetchCause {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());

    if is_rate_limit_error(status, headers, &message) {
        let rate_limit = RateLimitInfo::from_headers(headers);
        let detail = match &rate_limit {
            Some(info) => format!("{message} (resets at {reset})", reset = info.reset_at()),
            None => message,
        };
        return FetchCause::RateLimited {
            rate_limit,
            message: detail,
        };
    }

    if is_auth_failure(status) {
        FetchCause::Authentication {
            status: status.as_u16(),
            message,
        }
    } else {
        FetchCause::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Classifies an error raised by Octocrab before a response was read.
pub(super) fn map_octocrab_error(error: &octocrab::Error) -> FetchCause {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            source.status_code,
            &HeaderMap::new(),
            Some(source.message.clone()),
        );
    }

    FetchCause::Network {
        message: error.to_string(),
    }
}
