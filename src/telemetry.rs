//! Progress events and sinks.
//!
//! A fetch reports its milestones through a [`ProgressSink`] supplied by the
//! caller. The events are structured so they can be logged, printed as JSON
//! lines, or collected by tests.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured progress event emitted during a pull request fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The repository answered the reachability check and paging begins.
    FetchStarted {
        /// Repository API URL.
        base_url: String,
        /// Pull request listing URL.
        pull_requests_url: String,
        /// Pull request page size.
        page_size: u32,
        /// Maximum pull requests returned.
        max_pull_requests: u32,
        /// Maximum commits per pull request.
        max_commits: u32,
        /// Exclusive update-time cutoff in epoch milliseconds.
        min_update_time: i64,
        /// Source branch filter spec.
        source_branch_filter: Option<String>,
        /// Target branch filter spec.
        target_branch_filter: Option<String>,
    },
    /// Pull requests were listed and filtered by branch.
    PullRequestsReceived {
        /// Pull requests returned by the listing.
        received: usize,
        /// Pull requests matching both branch filters.
        matching: usize,
    },
    /// Author profiles were resolved.
    AuthorsResolved {
        /// Distinct authors resolved.
        count: usize,
    },
    /// Commits were fetched for one pull request.
    CommitsFetched {
        /// Pull request identifier.
        pull_request: String,
        /// Commits kept after trimming.
        count: usize,
    },
    /// The fetch finished.
    FetchCompleted {
        /// Normalized pull requests returned.
        pull_requests: usize,
    },
}

/// A sink that can record progress events.
///
/// Any `Fn(ProgressEvent)` closure is a sink.
pub trait ProgressSink: Send + Sync {
    /// Records a progress event.
    fn record(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn record(&self, event: ProgressEvent) {
        self(event);
    }
}

/// Progress sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn record(&self, _event: ProgressEvent) {}
}

/// Forwards progress events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn record(&self, event: ProgressEvent) {
        tracing::info!(?event, "fetch progress");
    }
}

/// Records progress events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlProgressSink;

impl ProgressSink for StderrJsonlProgressSink {
    fn record(&self, event: ProgressEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}
