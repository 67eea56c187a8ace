//! Builders for GitHub response payloads used by tests.
//!
//! The builders produce the JSON shapes served by the pull request, commit,
//! and user endpoints, with URLs rooted at a caller-supplied API base so they
//! can point back at a mock server.
//!
//! # Examples
//!
//! ```
//! use pullfetch::github::models::test_support::{PullRequestJson, commit_json, user_json};
//!
//! let pull_request = PullRequestJson::new(7, "feature/x", "main")
//!     .updated_at("2025-01-02T00:00:00Z")
//!     .to_json("http://127.0.0.1:9/api/v3");
//! assert_eq!(pull_request["head"]["ref"], "feature/x");
//!
//! let commit = commit_json("abc", "2025-01-01T00:00:00Z", Some("def"));
//! assert_eq!(commit["parents"][0]["sha"], "def");
//!
//! let user = user_json("octocat", None);
//! assert!(user["name"].is_null());
//! ```

use serde_json::{Value, json};

/// Builder for a pull request listing entry.
#[derive(Debug, Clone)]
pub struct PullRequestJson {
    number: u64,
    head: String,
    base: String,
    author: String,
    updated_at: String,
    merged_at: Option<String>,
    with_repositories: bool,
}

impl PullRequestJson {
    /// Starts a pull request from `head` into `base`, authored by `octocat`.
    #[must_use]
    pub fn new(number: u64, head: &str, base: &str) -> Self {
        Self {
            number,
            head: head.to_owned(),
            base: base.to_owned(),
            author: "octocat".to_owned(),
            updated_at: "2025-01-01T00:00:00Z".to_owned(),
            merged_at: None,
            with_repositories: true,
        }
    }

    /// Sets the author login.
    #[must_use]
    pub fn author(mut self, login: &str) -> Self {
        self.author = login.to_owned();
        self
    }

    /// Sets the last update time.
    #[must_use]
    pub fn updated_at(mut self, timestamp: &str) -> Self {
        self.updated_at = timestamp.to_owned();
        self
    }

    /// Marks the pull request as merged at the given time.
    #[must_use]
    pub fn merged_at(mut self, timestamp: &str) -> Self {
        self.merged_at = Some(timestamp.to_owned());
        self
    }

    /// Drops the repository objects from both head and base.
    #[must_use]
    pub const fn without_repositories(mut self) -> Self {
        self.with_repositories = false;
        self
    }

    /// Renders the JSON payload with URLs rooted at `api_base`.
    #[must_use]
    pub fn to_json(&self, api_base: &str) -> Value {
        let repo = if self.with_repositories {
            json!({ "clone_url": "https://github.com/owner/repo.git" })
        } else {
            Value::Null
        };

        json!({
            "number": self.number,
            "title": format!("Pull request {}", self.number),
            "body": format!("Description of {}", self.number),
            "state": if self.merged_at.is_some() { "closed" } else { "open" },
            "html_url": format!("https://github.com/owner/repo/pull/{}", self.number),
            "created_at": "2024-12-31T00:00:00Z",
            "updated_at": self.updated_at,
            "merged_at": self.merged_at,
            "closed_at": self.merged_at,
            "user": {
                "login": self.author,
                "url": format!("{api_base}/users/{}", self.author)
            },
            "head": { "ref": self.head, "repo": repo.clone() },
            "base": { "ref": self.base, "repo": repo },
            "commits_url": format!("{api_base}/repos/owner/repo/pulls/{}/commits", self.number)
        })
    }
}

/// Renders a commit listing entry committed at `date`.
#[must_use]
pub fn commit_json(sha: &str, date: &str, parent: Option<&str>) -> Value {
    let parents: Vec<Value> = parent
        .map(|sha_value| json!({ "sha": sha_value }))
        .into_iter()
        .collect();

    json!({
        "sha": sha,
        "commit": {
            "message": format!("commit {sha}"),
            "committer": {
                "name": "Monalisa Octocat",
                "email": "support@github.com",
                "date": date
            }
        },
        "parents": parents
    })
}

/// Renders a user profile.
#[must_use]
pub fn user_json(login: &str, name: Option<&str>) -> Value {
    json!({
        "login": login,
        "name": name,
        "email": format!("{login}@example.com")
    })
}
