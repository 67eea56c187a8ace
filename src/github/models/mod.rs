//! Data models for fetched pull requests.
//!
//! The normalized types in this module are provider-agnostic and are what
//! the fetch engine returns. Provider-native response shapes live in
//! submodules and convert into these types.

use serde::{Deserialize, Serialize};

pub mod github;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Repository URL used when a pull request side has no repository object.
pub const UNKNOWN_REPOSITORY: &str = "unknown repository";

/// Source control system of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScmType {
    /// Git repositories, the only type served by GitHub.
    #[default]
    Git,
}

/// A person resolved from a provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable login the provider references the person by.
    pub login: String,
    /// Display name, when the profile sets one.
    pub name: Option<String>,
    /// Public email, when the profile exposes one.
    pub email: Option<String>,
}

impl Actor {
    /// Display name, falling back to the login when the profile has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.login.as_str())
    }
}

/// One side (source or target) of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Clone URL, or [`UNKNOWN_REPOSITORY`] when the provider omitted it.
    pub url: String,
    /// Short branch name.
    pub branch: String,
    /// Source control system.
    pub scm_type: ScmType,
}

impl RepositoryDescriptor {
    /// Builds a Git descriptor, substituting [`UNKNOWN_REPOSITORY`] for a
    /// missing URL.
    #[must_use]
    pub fn git(url: Option<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.unwrap_or_else(|| UNKNOWN_REPOSITORY.to_owned()),
            branch: branch.into(),
            scm_type: ScmType::Git,
        }
    }
}

/// Provider-agnostic commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCommit {
    /// Revision identifier (commit SHA for Git).
    pub revision_id: String,
    /// Commit message.
    pub message: Option<String>,
    /// Committer name.
    pub author_name: Option<String>,
    /// Committer email.
    pub author_email: Option<String>,
    /// Commit time in UTC epoch milliseconds.
    pub time: Option<i64>,
    /// First parent revision; absent for root commits.
    pub parent_revision_id: Option<String>,
}

/// Provider-agnostic pull request with its commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPullRequest {
    /// Provider identifier of the pull request.
    pub id: String,
    /// Title.
    pub title: Option<String>,
    /// Description body.
    pub description: Option<String>,
    /// Provider state, e.g. `open` or `closed`.
    pub state: Option<String>,
    /// Creation time in UTC epoch milliseconds.
    pub created_time: Option<i64>,
    /// Last update time in UTC epoch milliseconds.
    pub updated_time: Option<i64>,
    /// Merge time in UTC epoch milliseconds.
    pub merged_time: Option<i64>,
    /// Close time in UTC epoch milliseconds.
    pub closed_time: Option<i64>,
    /// True exactly when a merge time is present.
    pub is_merged: bool,
    /// Author display name, or login when no display name is set.
    pub author_name: String,
    /// Author email, when public.
    pub author_email: Option<String>,
    /// Web URL of the pull request.
    pub self_url: Option<String>,
    /// Head side of the pull request.
    pub source_repository: RepositoryDescriptor,
    /// Base side of the pull request.
    pub target_repository: RepositoryDescriptor,
    /// Commits, newest first.
    pub commits: Vec<NormalizedCommit>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Actor, RepositoryDescriptor, ScmType, UNKNOWN_REPOSITORY};

    #[rstest]
    #[case::named(Some("Mona Lisa"), "Mona Lisa")]
    #[case::unnamed(None, "octocat")]
    fn display_name_falls_back_to_login(#[case] name: Option<&str>, #[case] expected: &str) {
        let actor = Actor {
            login: "octocat".to_owned(),
            name: name.map(ToOwned::to_owned),
            email: None,
        };
        assert_eq!(actor.display_name(), expected);
    }

    #[test]
    fn descriptor_without_url_is_unknown_repository() {
        let descriptor = RepositoryDescriptor::git(None, "feature/x");

        assert_eq!(descriptor.url, UNKNOWN_REPOSITORY);
        assert_eq!(descriptor.branch, "feature/x");
        assert_eq!(descriptor.scm_type, ScmType::Git);
    }

    #[test]
    fn scm_type_serialises_as_lowercase() {
        let value = serde_json::to_value(ScmType::Git).expect("should serialise");
        assert_eq!(value, serde_json::json!("git"));
    }
}
