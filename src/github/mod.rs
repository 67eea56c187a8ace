//! GitHub pull request fetching.
//!
//! This module pages through a repository's pull requests and their commits
//! over the GitHub REST API and converts them into the normalized model in
//! [`models`]. HTTP access goes through the [`HttpTransport`] seam, backed by
//! Octocrab in production. Failures are mapped into [`FetchError`] variants
//! that name the operation and URL involved.

pub mod actors;
pub mod branch_filter;
pub mod error;
pub mod gateway;
pub mod intake;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod provider;
pub mod rate_limit;
pub mod resolver;
pub mod timestamp;
pub mod walker;

pub use actors::ActorCache;
pub use branch_filter::BranchFilter;
pub use error::{FetchCause, FetchError};
pub use gateway::{HttpTransport, OctocrabTransport, TransportResponse};
pub use intake::{FetchParameters, PullRequestIntake};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    Actor, NormalizedCommit, NormalizedPullRequest, RepositoryDescriptor, ScmType,
    UNKNOWN_REPOSITORY,
};
pub use pagination::{CursorExtractor, LinkHeaderCursor, next_link};
pub use provider::{GitHubProvider, PullRequestSource, ScmProvider};
pub use rate_limit::RateLimitInfo;
pub use timestamp::{format_timestamp, parse_timestamp};
pub use walker::{FetchBounds, PageWalker, UpdateTime};

#[cfg(test)]
pub use gateway::MockHttpTransport;
