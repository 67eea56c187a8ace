//! Support modules for the pull request fetch BDD tests.

#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{FetchState, ensure_runtime_and_server, mount, run_fetch, server_uri};
