//! Pull request fetch facade.
//!
//! [`PullRequestIntake::fetch_pull_requests`] runs the whole fetch for one
//! repository:
//!
//! 1. ping the repository API,
//! 2. page through pull requests in every state,
//! 3. keep those whose head and base branches match the filters,
//! 4. resolve every distinct author once into an [`ActorCache`],
//! 5. page through each kept pull request's commits, newest first,
//! 6. assemble the normalized records.
//!
//! Any failure aborts the fetch; nothing partial is returned.

use super::actors::ActorCache;
use super::branch_filter::BranchFilter;
use super::error::FetchError;
use super::gateway::{HttpTransport, get_success};
use super::locator::RepositoryLocator;
use super::models::{NormalizedCommit, NormalizedPullRequest};
use super::provider::{PullRequestSource, ScmProvider};
use super::resolver::EntityResolver;
use super::walker::{FetchBounds, PageWalker};
use crate::telemetry::{ProgressEvent, ProgressSink};

/// Default pull request page size.
pub const DEFAULT_PAGE_SIZE: u32 = 30;
/// Default cap on returned pull requests.
pub const DEFAULT_MAX_PULL_REQUESTS: u32 = 100;
/// Default commit page size and per-pull-request commit cap.
pub const DEFAULT_MAX_COMMITS: u32 = 100;

/// Parameters for one repository fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParameters {
    /// Repository web URL, `https://<host>/<owner>/<repo>`.
    pub repo_url: String,
    /// Pull request page size.
    pub page_size: u32,
    /// Maximum pull requests listed.
    pub max_pull_requests: u32,
    /// Commit page size, also the cap on commits per pull request.
    pub max_commits: u32,
    /// Exclusive update-time cutoff in epoch milliseconds; 0 disables it.
    pub min_update_time: i64,
    /// `|`-separated globs the head branch must match.
    pub source_branch_filter: Option<String>,
    /// `|`-separated globs the base branch must match.
    pub target_branch_filter: Option<String>,
}

impl FetchParameters {
    /// Creates parameters with default bounds and no filters.
    #[must_use]
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pull_requests: DEFAULT_MAX_PULL_REQUESTS,
            max_commits: DEFAULT_MAX_COMMITS,
            min_update_time: 0,
            source_branch_filter: None,
            target_branch_filter: None,
        }
    }

    fn pull_request_bounds(&self) -> FetchBounds {
        FetchBounds::new(self.page_size, usize_from(self.max_pull_requests))
            .with_min_update_time(self.min_update_time)
    }

    /// Commits arrive oldest first, so the whole collection has to be seen
    /// and sorted before the cutoff can trim it; the page size therefore
    /// equals the cap.
    fn commit_bounds(&self) -> FetchBounds {
        FetchBounds::new(self.max_commits, usize_from(self.max_commits))
            .with_min_update_time(self.min_update_time)
            .with_sort_required(true)
    }
}

fn usize_from(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Fetches and normalizes pull requests through a transport and provider.
pub struct PullRequestIntake<'a, Provider>
where
    Provider: ScmProvider,
{
    transport: &'a dyn HttpTransport,
    provider: &'a Provider,
    progress: &'a dyn ProgressSink,
}

impl<'a, Provider> PullRequestIntake<'a, Provider>
where
    Provider: ScmProvider,
{
    /// Create a new intake facade.
    #[must_use]
    pub const fn new(
        transport: &'a dyn HttpTransport,
        provider: &'a Provider,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            transport,
            provider,
            progress,
        }
    }

    /// Fetches the repository's pull requests with their commits.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Connectivity`] when the ping fails,
    /// [`FetchError::Fetch`] when any listing or profile request fails,
    /// [`FetchError::Resolution`] when a kept pull request's author was not
    /// resolved, and parsing errors for the URL or branch filters.
    pub async fn fetch_pull_requests(
        &self,
        parameters: &FetchParameters,
    ) -> Result<Vec<NormalizedPullRequest>, FetchError> {
        let repository = RepositoryLocator::parse(&parameters.repo_url)?;
        let source_filter =
            BranchFilter::compile_patterns(parameters.source_branch_filter.as_deref())?;
        let target_filter =
            BranchFilter::compile_patterns(parameters.target_branch_filter.as_deref())?;

        let base_url = self.provider.repository_url(&repository);
        self.ping(&base_url).await?;

        let pull_requests_url = self.provider.pull_requests_url(&repository);
        self.progress.record(ProgressEvent::FetchStarted {
            base_url,
            pull_requests_url: pull_requests_url.clone(),
            page_size: parameters.page_size,
            max_pull_requests: parameters.max_pull_requests,
            max_commits: parameters.max_commits,
            min_update_time: parameters.min_update_time,
            source_branch_filter: parameters.source_branch_filter.clone(),
            target_branch_filter: parameters.target_branch_filter.clone(),
        });

        let walker = PageWalker::new(self.transport, self.provider);
        let pull_requests: Vec<Provider::PullRequest> = walker
            .fetch_paged(
                "list pull requests",
                &pull_requests_url,
                &parameters.pull_request_bounds(),
            )
            .await?;

        let received = pull_requests.len();
        let authors = ActorCache::resolve_all::<Provider::Actor, _>(
            &EntityResolver::new(self.transport),
            pull_requests.iter().map(PullRequestSource::author_url),
        )
        .await?;

        let matching: Vec<Provider::PullRequest> = pull_requests
            .into_iter()
            .filter(|pull_request| {
                source_filter.matches(pull_request.source_branch())
                    && target_filter.matches(pull_request.target_branch())
            })
            .collect();
        self.progress.record(ProgressEvent::PullRequestsReceived {
            received,
            matching: matching.len(),
        });
        self.progress
            .record(ProgressEvent::AuthorsResolved { count: authors.len() });

        let commit_bounds = parameters.commit_bounds();
        let mut normalized = Vec::with_capacity(matching.len());
        for pull_request in matching {
            let record = self
                .assemble(&walker, &authors, &commit_bounds, pull_request)
                .await?;
            normalized.push(record);
        }

        self.progress.record(ProgressEvent::FetchCompleted {
            pull_requests: normalized.len(),
        });
        Ok(normalized)
    }

    async fn ping(&self, repository_url: &str) -> Result<(), FetchError> {
        match get_success(self.transport, "ping repository", repository_url).await {
            Ok(_) => Ok(()),
            Err(FetchError::Fetch { url, cause, .. }) => {
                Err(FetchError::Connectivity { url, cause })
            }
            Err(other) => Err(other),
        }
    }

    async fn assemble(
        &self,
        walker: &PageWalker<'_>,
        authors: &ActorCache,
        commit_bounds: &FetchBounds,
        pull_request: Provider::PullRequest,
    ) -> Result<NormalizedPullRequest, FetchError> {
        let identifier = pull_request.identifier();
        let author = authors
            .get(pull_request.author_login())
            .ok_or_else(|| FetchError::Resolution {
                login: pull_request.author_login().to_owned(),
                pull_request: identifier.clone(),
            })?;

        let commits: Vec<Provider::Commit> = walker
            .fetch_paged("list commits", pull_request.commits_url(), commit_bounds)
            .await?;
        let normalized_commits: Vec<NormalizedCommit> = commits
            .into_iter()
            .map(|commit| self.provider.normalize_commit(commit))
            .collect();
        self.progress.record(ProgressEvent::CommitsFetched {
            pull_request: identifier,
            count: normalized_commits.len(),
        });

        Ok(self
            .provider
            .normalize_pull_request(pull_request, author, normalized_commits))
    }
}
