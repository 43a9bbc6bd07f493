//! Release host access for the upstream Vineflower project.
//!
//! Provides a trait-based abstraction over the three requests the packager
//! makes (release listing, asset listing, artifact download), enabling
//! dependency injection for testing, and a blocking `ureq` implementation
//! against the GitHub REST API.

use crate::error::{PackagerError, Result};
use crate::release::{Asset, ReleaseRecord};
use log::debug;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;

/// The upstream repository packaged by default.
pub const DEFAULT_REPOSITORY: &str = "Vineflower/vineflower";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default per-request network timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT_JSON: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("vineflower-packager/", env!("CARGO_PKG_VERSION"));

/// Source of releases, asset listings and artifact bytes.
///
/// # Examples
///
/// ```
/// use vineflower_packager::github::{GithubClient, ReleaseSource};
///
/// let client = GithubClient::new("Vineflower/vineflower");
/// // Use client.list_releases() in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseSource {
    /// List the releases published for the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a release
    /// listing.
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>>;

    /// List the assets attached to the release with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an asset
    /// listing.
    fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>>;

    /// Download the body behind `url` in full.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the body read fails.
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Errors arising from HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error reading the response body.
    #[error("I/O error reading response: {0}")]
    Io(#[from] std::io::Error),
}

/// GitHub REST API client using a blocking `ureq` agent.
pub struct GithubClient {
    repository: String,
    api_base: String,
    agent: ureq::Agent,
}

impl GithubClient {
    /// Create a client for `owner/name` with the default timeout.
    #[must_use]
    pub fn new(repository: &str) -> Self {
        Self::with_timeout(repository, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(repository: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            repository: repository.to_owned(),
            api_base: GITHUB_API_BASE.to_owned(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// Point the client at another API root, such as a GitHub Enterprise host.
    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        api_base.trim_end_matches('/').clone_into(&mut self.api_base);
        self
    }

    /// URL of the release listing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vineflower_packager::github::GithubClient;
    ///
    /// let client = GithubClient::new("Vineflower/vineflower");
    /// assert_eq!(
    ///     client.releases_url(),
    ///     "https://api.github.com/repos/Vineflower/vineflower/releases"
    /// );
    /// ```
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!("{}/repos/{}/releases", self.api_base, self.repository)
    }

    /// URL of the asset listing for one release.
    #[must_use]
    pub fn assets_url(&self, release_id: u64) -> String {
        format!("{}/{release_id}/assets", self.releases_url())
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {url}");
        let body = self
            .agent
            .get(url)
            .header("Accept", ACCEPT_JSON)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::HttpError {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|source| PackagerError::MalformedResponse {
            url: url.to_owned(),
            source,
        })
    }
}

impl ReleaseSource for GithubClient {
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>> {
        self.get_json(&self.releases_url())
    }

    fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>> {
        self.get_json(&self.assets_url(release_id))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {url}");
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut bytes = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut bytes)
            .map_err(DownloadError::Io)?;
        debug!("downloaded {} byte(s) from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
