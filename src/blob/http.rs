//! HTTP implementation of the blob fetch port.

use crate::blob::BlobFetcher;
use crate::error::BlobError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout for gateway fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Blob fetcher backed by a plain HTTP client
pub struct HttpBlobFetcher {
    http: reqwest::Client,
}

impl HttpBlobFetcher {
    pub fn new() -> Result<Self, BlobError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, BlobError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlobError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, BlobError> {
        debug!(url = %url, "fetching blob");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::Http(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| BlobError::Transport(e.to_string()))
    }
}
