//! Blob store read capability and gateway helpers.
//!
//! Metadata documents and images live in a content-addressed store reached
//! through an HTTP gateway. The fetch port is one method; everything else
//! (URL shaping, CID extraction) is pure.

pub mod gateway;
pub mod http;

use crate::error::BlobError;
use async_trait::async_trait;

/// Fetch capability for off-ledger documents.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    /// GET `url` and return the response body.
    async fn get(&self, url: &str) -> Result<Vec<u8>, BlobError>;
}

pub use http::HttpBlobFetcher;
