//! # HTTP Fetcher
//!
//! `fetch(url) -> bytes` over `reqwest::blocking` with a fixed request
//! timeout. URLs are validated before the request goes out; non-success
//! statuses and transport failures both surface as `ContentResolution`
//! errors.

use std::time::Duration;

use kpkg_core::{KpkgError, Result};
use kpkg_model::{ContentFetcher, ReleaseIndex};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A blocking HTTP content fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// A fetcher with the default timeout.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl ContentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = url::Url::parse(url).map_err(|e| KpkgError::ContentResolution {
            url: url.to_string(),
            reason: format!("invalid url: {e}"),
        })?;
        tracing::debug!(%parsed, "fetching remote content");

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| KpkgError::ContentResolution {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(KpkgError::ContentResolution {
                url: url.to_string(),
                reason: format!("http status {}", response.status()),
            });
        }
        let body = response.bytes().map_err(|e| KpkgError::ContentResolution {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(body.to_vec())
    }
}

/// Retrieve and parse a remote helm-style `index.yaml`.
pub fn fetch_index(fetcher: &dyn ContentFetcher, url: &str) -> Result<ReleaseIndex> {
    let bytes = fetcher.fetch(url)?;
    let yaml = String::from_utf8(bytes)
        .map_err(|e| KpkgError::Encoding(format!("index is not valid UTF-8: {e}")))?;
    ReleaseIndex::from_yaml(&yaml)
}
