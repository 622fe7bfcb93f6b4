//! Fetching manifest content by URL.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches the content behind `file`, `http` and `https` URLs.
///
/// Used for URL-addressed channel manifests, which are identified by
/// content hash rather than by version.
#[derive(Debug)]
pub struct UrlFetcher {
    client: reqwest::blocking::Client,
}

impl UrlFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { client })
    }

    /// Fetch the content behind a URL as text.
    pub fn fetch(&self, url: &Url) -> Result<String> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|()| Error::InvalidUrl {
                    url: url.to_string(),
                })?;
                std::fs::read_to_string(&path).map_err(|e| Error::Io { path, source: e })
            }
            "http" | "https" => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .and_then(|response| response.error_for_status())
                    .map_err(|e| Error::RemoteResolution {
                        url: url.to_string(),
                        source: e,
                    })?;
                response.text().map_err(|e| Error::RemoteResolution {
                    url: url.to_string(),
                    source: e,
                })
            }
            scheme => Err(Error::UnsupportedScheme {
                url: url.to_string(),
                scheme: scheme.to_string(),
            }),
        }
    }

    /// Parse and fetch a URL given as a string.
    pub fn fetch_str(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|_| Error::InvalidUrl {
            url: url.to_string(),
        })?;
        self.fetch(&parsed)
    }
}
