//! Ledger read capability.
//!
//! The external program's accounts are reached through a single read port.
//! The production implementation speaks JSON-RPC over HTTP; tests swap in
//! in-memory fakes.

pub mod rpc;

use crate::error::LedgerError;
use crate::types::Address;
use async_trait::async_trait;

/// Read capability against the ledger. Read-only; no authentication.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch the raw bytes of the account at `address`.
    ///
    /// Async because it makes a network round trip. Callers decode the
    /// bytes with the schema they expect.
    async fn read_account(&self, address: &Address) -> Result<Vec<u8>, LedgerError>;
}

pub use rpc::RpcLedgerClient;
