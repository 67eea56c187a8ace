//! Provider capabilities consumed by the fetch engine.
//!
//! The engine in [`crate::github::intake`] is the same for every hosting
//! service. A provider only supplies collection locators, next-page cursor
//! extraction, and the mapping from its native entities to the normalized
//! model.

use http::HeaderMap;
use serde::de::DeserializeOwned;

use super::locator::RepositoryLocator;
use super::models::github::{GitHubCommit, GitHubPullRequest, GitHubUser};
use super::models::{Actor, NormalizedCommit, NormalizedPullRequest};
use super::pagination::{CursorExtractor, LinkHeaderCursor};
use super::walker::UpdateTime;

/// Read access to the fields of a provider-native pull request that the
/// engine needs before normalization.
pub trait PullRequestSource {
    /// Identifier used in progress events and errors.
    fn identifier(&self) -> String;
    /// Short name of the source (head) branch.
    fn source_branch(&self) -> &str;
    /// Short name of the target (base) branch.
    fn target_branch(&self) -> &str;
    /// Login of the author.
    fn author_login(&self) -> &str;
    /// Absolute URL of the author profile.
    fn author_url(&self) -> &str;
    /// Absolute URL of the pull request's commit collection.
    fn commits_url(&self) -> &str;
}

/// A source control hosting service the engine can fetch from.
pub trait ScmProvider: CursorExtractor {
    /// Native pull request shape.
    type PullRequest: DeserializeOwned + UpdateTime + PullRequestSource + Send;
    /// Native commit shape.
    type Commit: DeserializeOwned + UpdateTime + Send;
    /// Native author profile shape.
    type Actor: DeserializeOwned + Into<Actor> + Send;

    /// URL requested to check that the repository is reachable.
    fn repository_url(&self, repository: &RepositoryLocator) -> String;

    /// URL of the pull request collection, covering every state.
    fn pull_requests_url(&self, repository: &RepositoryLocator) -> String;

    /// Maps a native commit into the normalized model.
    fn normalize_commit(&self, commit: Self::Commit) -> NormalizedCommit;

    /// Maps a native pull request, its resolved author, and its normalized
    /// commits into the normalized model.
    fn normalize_pull_request(
        &self,
        pull_request: Self::PullRequest,
        author: &Actor,
        commits: Vec<NormalizedCommit>,
    ) -> NormalizedPullRequest;
}

/// GitHub REST v3, for both github.com and GitHub Enterprise Server.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHubProvider;

impl CursorExtractor for GitHubProvider {
    fn next_page(&self, headers: &HeaderMap) -> Option<String> {
        LinkHeaderCursor.next_page(headers)
    }
}

impl ScmProvider for GitHubProvider {
    type PullRequest = GitHubPullRequest;
    type Commit = GitHubCommit;
    type Actor = GitHubUser;

    fn repository_url(&self, repository: &RepositoryLocator) -> String {
        repository.repository_url()
    }

    fn pull_requests_url(&self, repository: &RepositoryLocator) -> String {
        repository.pulls_url()
    }

    fn normalize_commit(&self, commit: GitHubCommit) -> NormalizedCommit {
        commit.into()
    }

    fn normalize_pull_request(
        &self,
        pull_request: GitHubPullRequest,
        author: &Actor,
        commits: Vec<NormalizedCommit>,
    ) -> NormalizedPullRequest {
        pull_request.into_normalized(author, commits)
    }
}

impl UpdateTime for GitHubPullRequest {
    fn update_time(&self) -> i64 {
        self.updated_at.unwrap_or(0)
    }
}

impl UpdateTime for GitHubCommit {
    fn update_time(&self) -> i64 {
        self.committed_at().unwrap_or(0)
    }
}

impl PullRequestSource for GitHubPullRequest {
    fn identifier(&self) -> String {
        self.number.to_string()
    }

    fn source_branch(&self) -> &str {
        &self.head.ref_name
    }

    fn target_branch(&self) -> &str {
        &self.base.ref_name
    }

    fn author_login(&self) -> &str {
        &self.user.login
    }

    fn author_url(&self) -> &str {
        &self.user.url
    }

    fn commits_url(&self) -> &str {
        &self.commits_url
    }
}
