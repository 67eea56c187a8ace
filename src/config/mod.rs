//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pullfetch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PULLFETCH_REPO_URL`, `PULLFETCH_TOKEN`, or
//!    legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--repo-url`/`-u`, `--token`/`-t`, and
//!    the remaining long flags
//!
//! # Configuration File
//!
//! ```toml
//! repo_url = "https://github.com/octocat/hello-world"
//! token = "ghp_example"
//! page_size = 50
//! max_pull_requests = 200
//! max_commits = 100
//! updated_since = "2025-01-01T00:00:00Z"
//! source_branch_filter = "feature/*|hotfix/*"
//! target_branch_filter = "main"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::FetchError;
use crate::github::intake::{
    DEFAULT_MAX_COMMITS, DEFAULT_MAX_PULL_REQUESTS, DEFAULT_PAGE_SIZE, FetchParameters,
};
use crate::github::locator::PersonalAccessToken;
use crate::github::timestamp::parse_timestamp;
use crate::github::walker::MAX_PAGE_SIZE;

const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PULLFETCH_REPO_URL` or `--repo-url`: Repository URL
/// - `PULLFETCH_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PULLFETCH_PAGE_SIZE` or `--page-size`: Pull request page size
/// - `PULLFETCH_UPDATED_SINCE` or `--updated-since`: ISO-8601 cutoff
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pullfetch::PullfetchConfig;
///
/// let config = PullfetchConfig::load().expect("failed to load configuration");
/// let parameters = config.fetch_parameters().expect("valid parameters");
/// assert!(parameters.page_size <= 100);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PULLFETCH",
    discovery(
        dotfile_name = ".pullfetch.toml",
        config_file_name = "pullfetch.toml",
        app_name = "pullfetch"
    )
)]
pub struct PullfetchConfig {
    /// Repository web URL, such as `https://github.com/owner/repo`.
    ///
    /// Can be provided via:
    /// - CLI: `--repo-url <URL>` or `-u <URL>`
    /// - Environment: `PULLFETCH_REPO_URL`
    /// - Config file: `repo_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub repo_url: Option<String>,

    /// Personal access token. Requests are anonymous when absent.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PULLFETCH_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Pull request page size, between 1 and 100.
    #[ortho_config()]
    pub page_size: u32,

    /// Maximum number of pull requests returned.
    #[ortho_config()]
    pub max_pull_requests: u32,

    /// Commit page size and per-pull-request commit cap, between 1 and 100.
    #[ortho_config()]
    pub max_commits: u32,

    /// Exclusive update-time cutoff in epoch milliseconds. 0 disables it.
    #[ortho_config()]
    pub min_update_time: i64,

    /// ISO-8601 cutoff. Overrides `min_update_time` when set.
    #[ortho_config()]
    pub updated_since: Option<String>,

    /// `|`-separated globs matched against head branches.
    #[ortho_config()]
    pub source_branch_filter: Option<String>,

    /// `|`-separated globs matched against base branches.
    #[ortho_config()]
    pub target_branch_filter: Option<String>,

    /// Deadline for the whole fetch in seconds.
    #[ortho_config()]
    pub timeout_seconds: u64,

    /// Writes progress events to stderr as JSON lines instead of logging
    /// them.
    #[ortho_config()]
    pub progress_jsonl: bool,
}

impl Default for PullfetchConfig {
    fn default() -> Self {
        Self {
            repo_url: None,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pull_requests: DEFAULT_MAX_PULL_REQUESTS,
            max_commits: DEFAULT_MAX_COMMITS,
            min_update_time: 0,
            updated_since: None,
            source_branch_filter: None,
            target_branch_filter: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            progress_jsonl: false,
        }
    }
}

impl PullfetchConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// `None` means requests go out unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingToken`] when a configured token is blank.
    pub fn resolve_token(&self) -> Result<Option<PersonalAccessToken>, FetchError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .map(PersonalAccessToken::new)
            .transpose()
    }

    /// Returns the repository URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingRepositoryUrl`] when no URL is configured.
    pub fn require_repo_url(&self) -> Result<&str, FetchError> {
        self.repo_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(FetchError::MissingRepositoryUrl)
    }

    /// Effective cutoff: `updated_since` when set, else `min_update_time`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidTimestamp`] when `updated_since` is not
    /// ISO-8601.
    pub fn effective_min_update_time(&self) -> Result<i64, FetchError> {
        let parsed = self
            .updated_since
            .as_deref()
            .map(parse_timestamp)
            .transpose()?
            .flatten();
        Ok(parsed.unwrap_or(self.min_update_time))
    }

    /// Validates the configuration and converts it into fetch parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingRepositoryUrl`],
    /// [`FetchError::InvalidParameters`] for out-of-range bounds, or
    /// [`FetchError::InvalidTimestamp`].
    pub fn fetch_parameters(&self) -> Result<FetchParameters, FetchError> {
        let repo_url = self.require_repo_url()?;
        check_page_size("page_size", self.page_size)?;
        check_page_size("max_commits", self.max_commits)?;
        if self.max_pull_requests == 0 {
            return Err(FetchError::InvalidParameters {
                message: "max_pull_requests must be at least 1".to_owned(),
            });
        }
        if self.min_update_time < 0 {
            return Err(FetchError::InvalidParameters {
                message: format!(
                    "min_update_time must not be negative, got {}",
                    self.min_update_time
                ),
            });
        }

        Ok(FetchParameters {
            repo_url: repo_url.to_owned(),
            page_size: self.page_size,
            max_pull_requests: self.max_pull_requests,
            max_commits: self.max_commits,
            min_update_time: self.effective_min_update_time()?,
            source_branch_filter: non_blank(self.source_branch_filter.as_deref()),
            target_branch_filter: non_blank(self.target_branch_filter.as_deref()),
        })
    }
}

fn check_page_size(field: &str, value: u32) -> Result<(), FetchError> {
    if (1..=MAX_PAGE_SIZE).contains(&value) {
        Ok(())
    } else {
        Err(FetchError::InvalidParameters {
            message: format!("{field} must be between 1 and {MAX_PAGE_SIZE}, got {value}"),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests;
