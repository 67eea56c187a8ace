//! Pullfetch library crate for fetching pull requests from GitHub.
//!
//! The library pages through a repository's pull requests in every state,
//! keeps those whose branches match glob filters, attaches each one's
//! commits newest first, and resolves authors once per fetch. Results are
//! returned in a provider-neutral model that serializes to JSON.

pub mod config;
pub mod github;
pub mod telemetry;

pub use config::PullfetchConfig;
pub use github::{
    BranchFilter, FetchCause, FetchError, FetchParameters, GitHubProvider, HttpTransport,
    NormalizedCommit, NormalizedPullRequest, OctocrabTransport, PersonalAccessToken,
    PullRequestIntake, RepositoryLocator, format_timestamp, parse_timestamp,
};
pub use telemetry::{
    NoopProgressSink, ProgressEvent, ProgressSink, StderrJsonlProgressSink, TracingProgressSink,
};
