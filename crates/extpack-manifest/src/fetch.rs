//! Fetching manifests and archives from local paths or URLs.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::locator::with_raw_content;
use crate::token::is_url;

/// Resolves a location string to raw bytes.
pub trait Fetch: Send + Sync {
    /// Fetch `location`: a URL is downloaded, anything else is read from disk.
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// HTTP settings for [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header sent with remote requests.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            user_agent: format!("extpack/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Default [`Fetch`] implementation: blocking HTTP or local file reads.
///
/// The HTTP client is only built on the first remote fetch.
#[derive(Debug, Default)]
pub struct Fetcher {
    options: FetchOptions,
    client: OnceLock<reqwest::blocking::Client>,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self {
            options,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.options.timeout)
            .user_agent(self.options.user_agent.clone())
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;
        // If another thread won the race, use their client
        let _ = self.client.set(client);
        self.client
            .get()
            .ok_or_else(|| Error::HttpClient("client initialisation failed".to_string()))
    }

    fn fetch_remote(&self, location: &str) -> Result<Vec<u8>> {
        let url = with_raw_content(location);
        tracing::info!(url = %url, "fetching");
        let response = self
            .client()?
            .get(&url)
            .send()
            .map_err(|e| Error::Fetch {
                location: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                location: url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| Error::Fetch {
            location: url.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(url = %url, bytes = bytes.len(), "fetched");
        Ok(bytes.to_vec())
    }

    fn fetch_local(&self, location: &str) -> Result<Vec<u8>> {
        let path = Path::new(location);
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "reading local file");
        Ok(extpack_fs::io::read_bytes(path)?)
    }
}

impl Fetch for Fetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if is_url(location) {
            self.fetch_remote(location)
        } else {
            self.fetch_local(location)
        }
    }
}
