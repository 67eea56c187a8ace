//! Repository URL parsing and identity wrappers.

use url::Url;

use super::error::FetchError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, FetchError> {
        if value.is_empty() {
            return Err(FetchError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, FetchError> {
        let name = value.strip_suffix(".git").unwrap_or(value);
        if name.is_empty() {
            return Err(FetchError::MissingPathSegments);
        }
        Ok(Self(name.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, FetchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, FetchError> {
    if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com") {
        Url::parse("https://api.github.com")
            .map_err(|error| FetchError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| FetchError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| FetchError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Parsed repository URL with derived API base.
///
/// # Example
///
/// ```
/// use pullfetch::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("https://github.com/octo/repo.git")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// assert_eq!(locator.repository_url(), "https://api.github.com/repos/octo/repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Parses a repository URL in the form `https://<host>/<owner>/<repo>`.
    ///
    /// `github.com` maps to the public API; any other host is treated as
    /// GitHub Enterprise Server and served from `/api/v3` on that host.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` when parsing fails or
    /// `MissingPathSegments` when the URL path is not `/owner/repo`.
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let parsed =
            Url::parse(input).map_err(|error| FetchError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(FetchError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(FetchError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(FetchError::MissingPathSegments)?;

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("URL must include a host".to_owned()))?;
        let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Absolute API URL of the repository resource.
    #[must_use]
    pub fn repository_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    /// Absolute API URL listing pull requests in every state, most recently
    /// updated first.
    #[must_use]
    pub fn pulls_url(&self) -> String {
        format!("{}/pulls?state=all&sort=updated&direction=desc", self.repository_url())
    }
}
