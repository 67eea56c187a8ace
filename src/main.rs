//! Pullfetch CLI entrypoint.
//!
//! Fetches a repository's pull requests and prints each normalized record as
//! one JSON line on stdout. Logs and progress go to stderr.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pullfetch::{
    FetchError, GitHubProvider, NormalizedPullRequest, OctocrabTransport, ProgressSink,
    PullRequestIntake, PullfetchConfig, RepositoryLocator, StderrJsonlProgressSink,
    TracingProgressSink,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "fetch failed");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` and defaulting to warnings.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), FetchError> {
    let config = load_config()?;
    let parameters = config.fetch_parameters()?;
    let token = config.resolve_token()?;

    let locator = RepositoryLocator::parse(&parameters.repo_url)?;
    let transport = OctocrabTransport::for_repository(token.as_ref(), &locator)?;
    let progress: Box<dyn ProgressSink> = if config.progress_jsonl {
        Box::new(StderrJsonlProgressSink)
    } else {
        Box::new(TracingProgressSink)
    };

    let provider = GitHubProvider;
    let intake = PullRequestIntake::new(&transport, &provider, progress.as_ref());
    let deadline = Duration::from_secs(config.timeout_seconds);
    let pull_requests = tokio::time::timeout(deadline, intake.fetch_pull_requests(&parameters))
        .await
        .map_err(|_elapsed| FetchError::Timeout {
            seconds: config.timeout_seconds,
        })??;

    write_records(&pull_requests)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PullfetchConfig, FetchError> {
    PullfetchConfig::load().map_err(|error| FetchError::Configuration {
        message: error.to_string(),
    })
}

fn write_records(pull_requests: &[NormalizedPullRequest]) -> Result<(), FetchError> {
    let mut stdout = io::stdout().lock();
    for pull_request in pull_requests {
        let line = serde_json::to_string(pull_request).map_err(|error| FetchError::Io {
            message: error.to_string(),
        })?;
        writeln!(stdout, "{line}").map_err(|error| FetchError::Io {
            message: error.to_string(),
        })?;
    }
    Ok(())
}
