//! Agentdir: Client-Side Agent Directory Reader
//!
//! Read-side client for an on-chain agent registry: derives deterministic
//! account addresses, probes every registered record, and joins each with
//! its pinned metadata document into a render-ready listing.

pub mod address;
pub mod blob;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod metadata;
pub mod pinning;
pub mod record;
pub mod types;

pub use directory::{AgentDirectoryReader, AgentView, DirectorySnapshot, ReaderOptions};
pub use error::{BlobError, DirectoryError, LedgerError, PinError};
pub use types::{Address, ProgramId};
