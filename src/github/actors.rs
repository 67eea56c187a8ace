//! Per-fetch cache of resolved pull request authors.
//!
//! Authors are resolved in a separate pass before any pull request is
//! assembled: the distinct profile URLs are collected, each is fetched once,
//! and assembly then only reads from the cache. The cache lives for a single
//! fetch and is dropped with it.

use std::collections::{BTreeSet, HashMap};

use serde::de::DeserializeOwned;

use super::error::FetchError;
use super::models::Actor;
use super::resolver::EntityResolver;

const OPERATION: &str = "fetch author";

/// Resolved actors keyed by login.
#[derive(Debug, Clone, Default)]
pub struct ActorCache {
    by_login: HashMap<String, Actor>,
}

impl ActorCache {
    /// Fetches every distinct profile URL once and caches the result.
    ///
    /// `A` is the provider's profile shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] raised while fetching a profile.
    pub async fn resolve_all<'u, A, I>(
        resolver: &EntityResolver<'_>,
        profile_urls: I,
    ) -> Result<Self, FetchError>
    where
        A: DeserializeOwned + Into<Actor>,
        I: IntoIterator<Item = &'u str>,
    {
        let distinct: BTreeSet<&str> = profile_urls.into_iter().collect();
        let mut cache = Self::default();

        for url in distinct {
            let profile: A = resolver.fetch_entity(OPERATION, url).await?;
            cache.insert(profile.into());
        }

        Ok(cache)
    }

    /// Adds or replaces an actor.
    pub fn insert(&mut self, actor: Actor) {
        self.by_login.insert(actor.login.clone(), actor);
    }

    /// Looks up an actor by login.
    #[must_use]
    pub fn get(&self, login: &str) -> Option<&Actor> {
        self.by_login.get(login)
    }

    /// Number of cached actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_login.len()
    }

    /// Returns true when nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_login.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::ActorCache;
    use crate::github::error::FetchError;
    use crate::github::gateway::{MockHttpTransport, TransportResponse};
    use crate::github::models::github::GitHubUser;
    use crate::github::resolver::EntityResolver;

    fn user_body(url: &str) -> String {
        let login = url.rsplit('/').next().unwrap_or_default();
        serde_json::json!({ "login": login, "name": null, "email": null }).to_string()
    }

    #[tokio::test]
    async fn fetches_each_distinct_url_once() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(2)
            .returning(|url| Ok(TransportResponse::new(StatusCode::OK, user_body(url))));
        let resolver = EntityResolver::new(&transport);

        let urls = [
            "https://api.github.com/users/alice",
            "https://api.github.com/users/bob",
            "https://api.github.com/users/alice",
        ];
        let cache = ActorCache::resolve_all::<GitHubUser, _>(&resolver, urls)
            .await
            .expect("authors should resolve");

        assert_eq!(cache.len(), 2);
        assert!(cache.get("alice").is_some(), "alice should be cached");
        assert!(cache.get("bob").is_some(), "bob should be cached");
        assert!(cache.get("carol").is_none(), "carol was never referenced");
    }

    #[tokio::test]
    async fn failed_profile_aborts_resolution() {
        let mut transport = MockHttpTransport::new();
        transport.expect_get().returning(|_| {
            Ok(TransportResponse::new(
                StatusCode::NOT_FOUND,
                r#"{"message": "Not Found"}"#,
            ))
        });
        let resolver = EntityResolver::new(&transport);

        let result = ActorCache::resolve_all::<GitHubUser, _>(
            &resolver,
            ["https://api.github.com/users/ghost"],
        )
        .await;

        assert!(
            matches!(result, Err(FetchError::Fetch { ref operation, .. }) if operation == "fetch author"),
            "expected fetch author failure, got {result:?}"
        );
    }
}
