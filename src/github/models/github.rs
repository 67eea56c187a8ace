//! GitHub REST v3 response shapes.
//!
//! Only the fields the fetch engine reads are declared; everything else in
//! the payload is ignored during deserialisation. Timestamps are converted to
//! epoch milliseconds while decoding, so a malformed timestamp fails the
//! page decode.

use serde::Deserialize;

use super::{Actor, NormalizedCommit, NormalizedPullRequest, RepositoryDescriptor};
use crate::github::timestamp::deserialize_optional_millis;

/// Pull request as returned by `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title.
    pub title: Option<String>,
    /// Description body.
    pub body: Option<String>,
    /// State, `open` or `closed`.
    pub state: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub created_at: Option<i64>,
    /// Last update time in epoch milliseconds.
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub updated_at: Option<i64>,
    /// Merge time in epoch milliseconds.
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub merged_at: Option<i64>,
    /// Close time in epoch milliseconds.
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub closed_at: Option<i64>,
    /// Web URL.
    pub html_url: Option<String>,
    /// Reference to the author profile.
    pub user: GitHubUserRef,
    /// Source branch.
    pub head: GitHubBranchRef,
    /// Target branch.
    pub base: GitHubBranchRef,
    /// API URL of the pull request's commit collection.
    pub commits_url: String,
}

/// Author reference embedded in a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUserRef {
    /// Login.
    pub login: String,
    /// API URL of the full user profile.
    pub url: String,
}

/// Head or base reference of a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubBranchRef {
    /// Short branch name.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Repository holding the branch; null when it has been deleted.
    pub repo: Option<GitHubRepository>,
}

/// Repository attached to a branch reference.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    /// HTTPS clone URL.
    pub clone_url: Option<String>,
}

/// Full user profile from `GET /users/{login}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    /// Login.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Public email.
    pub email: Option<String>,
}

/// Commit as returned by `GET /repos/{owner}/{repo}/pulls/{number}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommit {
    /// Commit SHA.
    pub sha: String,
    /// Git-level commit data.
    pub commit: GitHubCommitDetail,
    /// Parent commits in Git order.
    #[serde(default)]
    pub parents: Vec<GitHubParent>,
}

/// Git-level portion of a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommitDetail {
    /// Commit message.
    pub message: Option<String>,
    /// Committer signature.
    pub committer: Option<GitHubSignature>,
}

/// Name, email, and date of a Git signature.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubSignature {
    /// Name.
    pub name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Signature time in epoch milliseconds.
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub date: Option<i64>,
}

/// Parent commit reference.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubParent {
    /// Parent SHA.
    pub sha: String,
}

impl GitHubCommit {
    /// Committer time, used as the commit's recency.
    #[must_use]
    pub fn committed_at(&self) -> Option<i64> {
        self.commit.committer.as_ref().and_then(|signature| signature.date)
    }
}

impl From<GitHubUser> for Actor {
    fn from(value: GitHubUser) -> Self {
        Self {
            login: value.login,
            name: value.name,
            email: value.email,
        }
    }
}

impl From<GitHubCommit> for NormalizedCommit {
    fn from(value: GitHubCommit) -> Self {
        let time = value.committed_at();
        let parent_revision_id = value.parents.into_iter().next().map(|parent| parent.sha);
        let (author_name, author_email) = value
            .commit
            .committer
            .map_or((None, None), |signature| (signature.name, signature.email));

        Self {
            revision_id: value.sha,
            message: value.commit.message,
            author_name,
            author_email,
            time,
            parent_revision_id,
        }
    }
}

impl From<GitHubBranchRef> for RepositoryDescriptor {
    fn from(value: GitHubBranchRef) -> Self {
        Self::git(
            value.repo.and_then(|repository| repository.clone_url),
            value.ref_name,
        )
    }
}

impl GitHubPullRequest {
    /// Assembles the normalized record from this pull request, its resolved
    /// author, and its already-normalized commits.
    #[must_use]
    pub fn into_normalized(
        self,
        author: &Actor,
        commits: Vec<NormalizedCommit>,
    ) -> NormalizedPullRequest {
        NormalizedPullRequest {
            id: self.number.to_string(),
            title: self.title,
            description: self.body,
            state: self.state,
            created_time: self.created_at,
            updated_time: self.updated_at,
            merged_time: self.merged_at,
            closed_time: self.closed_at,
            is_merged: self.merged_at.is_some(),
            author_name: author.display_name().to_owned(),
            author_email: author.email.clone(),
            self_url: self.html_url,
            source_repository: self.head.into(),
            target_repository: self.base.into(),
            commits,
        }
    }
}
