//! Pinning service client.
//!
//! Uploads metadata documents and files to the pinning API so records can
//! reference them by gateway URL. This is the crate's only write path and
//! it targets the blob store, never the ledger. Credentials are sent as
//! request headers; keep them server-side.

use crate::blob::gateway::gateway_url;
use crate::error::PinError;
use crate::metadata::AgentMetadataDocument;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Default pinning API base (no trailing slash)
pub const DEFAULT_API_BASE: &str = "https://api.pinata.cloud";

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a successful pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinReceipt {
    pub cid: String,
    /// Gateway URL for the pinned content
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// `pinataMetadata` form field naming the upload on the pinning service.
fn file_metadata_field(file_name: &str) -> String {
    serde_json::json!({ "name": file_name }).to_string()
}

/// `pinataOptions` form field. CID version 0 keeps pinned hashes
/// compatible with already-published gateway URLs.
fn file_options_field() -> String {
    serde_json::json!({ "cidVersion": 0 }).to_string()
}

/// Parse a pin API response body into a CID.
pub fn parse_pin_response(body: &[u8]) -> Result<String, PinError> {
    let response: PinResponse =
        serde_json::from_slice(body).map_err(|e| PinError::Decode(e.to_string()))?;
    if response.ipfs_hash.is_empty() {
        return Err(PinError::Decode("empty IpfsHash in pin response".to_string()));
    }
    Ok(response.ipfs_hash)
}

/// Client for the pinning service's upload endpoints
pub struct PinningClient {
    http: reqwest::Client,
    api_base: String,
    gateway_base: String,
    api_key: String,
    api_secret: String,
}

impl PinningClient {
    pub fn new(
        api_base: impl Into<String>,
        gateway_base: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, PinError> {
        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| PinError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            gateway_base: gateway_base.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        })
    }

    /// Pin a metadata document as JSON.
    pub async fn pin_json(&self, document: &AgentMetadataDocument) -> Result<PinReceipt, PinError> {
        let endpoint = format!("{}/pinning/pinJSONToIPFS", self.api_base);
        let response = self
            .http
            .post(&endpoint)
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.api_secret)
            .json(document)
            .send()
            .await
            .map_err(|e| PinError::Transport(e.to_string()))?;

        self.receipt_from(response).await
    }

    /// Pin an arbitrary file body under `file_name`.
    pub async fn pin_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<PinReceipt, PinError> {
        let endpoint = format!("{}/pinning/pinFileToIPFS", self.api_base);
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("pinataMetadata", file_metadata_field(file_name))
            .text("pinataOptions", file_options_field());

        let response = self
            .http
            .post(&endpoint)
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.api_secret)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PinError::Transport(e.to_string()))?;

        self.receipt_from(response).await
    }

    async fn receipt_from(&self, response: reqwest::Response) -> Result<PinReceipt, PinError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PinError::Http(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| PinError::Transport(e.to_string()))?;
        let cid = parse_pin_response(&body)?;
        info!(cid = %cid, "content pinned");
        Ok(PinReceipt {
            url: gateway_url(&self.gateway_base, &cid),
            cid,
        })
    }
}
