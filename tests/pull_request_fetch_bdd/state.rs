//! Scenario state and fetch execution for the pull request fetch BDD tests.

use pullfetch::{
    FetchError, FetchParameters, GitHubProvider, NoopProgressSink, NormalizedPullRequest,
    OctocrabTransport, PullRequestIntake, RepositoryLocator,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::{Mock, MockServer};

use super::runtime::{self, SharedRuntime};

#[derive(ScenarioState, Default)]
pub(crate) struct FetchState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) head_branches: Slot<Vec<String>>,
    pub(crate) base_branch: Slot<String>,
    pub(crate) anonymous_author: Slot<bool>,
    pub(crate) source_filter: Slot<String>,
    pub(crate) max_pull_requests: Slot<u32>,
    pub(crate) result: Slot<Vec<NormalizedPullRequest>>,
    pub(crate) error: Slot<FetchError>,
}

/// Ensures the runtime and server are initialised in `FetchState`.
pub(crate) fn ensure_runtime_and_server(fetch_state: &FetchState) -> SharedRuntime {
    runtime::ensure_runtime_and_server(&fetch_state.runtime, &fetch_state.server)
        .unwrap_or_else(|error| panic!("failed to initialise runtime and server: {error}"))
}

/// Base URI of the mock server.
pub(crate) fn server_uri(fetch_state: &FetchState) -> String {
    fetch_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server URL missing"))
}

/// Mounts a mock on the scenario's server.
pub(crate) fn mount(fetch_state: &FetchState, mock: Mock) {
    let runtime = ensure_runtime_and_server(fetch_state);
    fetch_state
        .server
        .with_ref(|server| {
            runtime.block_on(mock.mount(server));
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Runs a fetch for `owner/repo` on the mock server with the scenario's
/// parameters.
pub(crate) fn run_fetch(
    fetch_state: &FetchState,
    repository: &str,
) -> Result<Vec<NormalizedPullRequest>, FetchError> {
    let runtime = ensure_runtime_and_server(fetch_state);
    let repo_url = format!("{}/{repository}", server_uri(fetch_state));

    let mut parameters = FetchParameters::new(repo_url);
    parameters.source_branch_filter = fetch_state.source_filter.get();
    if let Some(cap) = fetch_state.max_pull_requests.get() {
        parameters.max_pull_requests = cap;
    }

    runtime.block_on(async {
        let locator = RepositoryLocator::parse(&parameters.repo_url)?;
        let transport = OctocrabTransport::for_repository(None, &locator)?;
        PullRequestIntake::new(&transport, &GitHubProvider, &NoopProgressSink)
            .fetch_pull_requests(&parameters)
            .await
    })
}
