//! Error types for the agent directory client.
//!
//! Failures are split by collaborator: `LedgerError` for account reads,
//! `BlobError` for metadata/document fetches, and `DirectoryError` for the
//! single fatal condition that crosses the component boundary. Per-record
//! and per-metadata failures never surface as errors; they degrade the
//! result instead.

use thiserror::Error;

/// Errors from the ledger read capability
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No account exists at the requested address
    #[error("account not found: {0}")]
    NotFound(String),

    /// Account bytes could not be decoded into the expected schema
    #[error("account decode failed: {0}")]
    Decode(String),

    /// Network or RPC-level failure
    #[error("ledger transport error: {0}")]
    Transport(String),
}

impl LedgerError {
    /// Transport failures are the only class worth retrying; NotFound and
    /// Decode are deterministic for a given ledger state.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Transport(_))
    }
}

/// Errors from the blob fetch capability
#[derive(Debug, Error)]
pub enum BlobError {
    /// Network-level failure before a response arrived
    #[error("blob transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the gateway
    #[error("blob fetch returned status {0}")]
    Http(u16),

    /// Body was not a valid metadata document
    #[error("blob decode failed: {0}")]
    Decode(String),
}

/// Errors from the pinning (upload) client
#[derive(Debug, Error)]
pub enum PinError {
    #[error("pin upload transport error: {0}")]
    Transport(String),

    #[error("pin upload returned status {0}")]
    Http(u16),

    #[error("pin receipt decode failed: {0}")]
    Decode(String),
}

/// Errors surfaced to directory callers
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The registry singleton could not be read or decoded. Fatal to the
    /// whole listing: without the count there is nothing to probe.
    #[error("registry unavailable: {0}")]
    RegistryUnavailable(#[source] LedgerError),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_is_transient() {
        assert!(LedgerError::Transport("timeout".to_string()).is_transient());
        assert!(!LedgerError::NotFound("abc".to_string()).is_transient());
        assert!(!LedgerError::Decode("bad tag".to_string()).is_transient());
    }

    #[test]
    fn test_registry_unavailable_keeps_source() {
        let err = DirectoryError::RegistryUnavailable(LedgerError::NotFound("reg".to_string()));
        assert!(err.to_string().contains("registry unavailable"));
    }
}
