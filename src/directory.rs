//! Agent directory reader.
//!
//! Discovers every registered agent by probing deterministic record
//! addresses up to the registry's count, joining each record with its
//! optional off-ledger metadata document. Best-effort by design: a single
//! unreadable record is omitted, a failed metadata fetch degrades that
//! entry, and only an unreadable registry fails the whole call.

use crate::address::{agent_record_address, registry_address};
use crate::blob::BlobFetcher;
use crate::error::{DirectoryError, LedgerError};
use crate::ledger::LedgerClient;
use crate::metadata::AgentMetadataDocument;
use crate::record::{AgentRecord, Registry};
use crate::types::{Address, ProgramId};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Tuning knobs for a directory read.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// How many per-index fetches may be in flight at once. 1 reproduces
    /// the strictly sequential reference behavior. Output order is by
    /// index regardless.
    pub concurrency: usize,

    /// Overall deadline. Once elapsed, no new reads are issued; pending
    /// indices count as per-index failures and the accumulated prefix is
    /// returned. None means no deadline.
    pub deadline: Option<Duration>,

    /// Extra attempts for the registry read on transient failures. The
    /// registry read is fatal when it fails, so it alone gets retried.
    pub registry_retries: u32,

    /// Fixed pause between registry retry attempts.
    pub retry_backoff: Duration,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            deadline: None,
            registry_retries: 2,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// One agent record joined with its optional metadata, flattened for
/// rendering. Synthesized fresh on every call; owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AgentView {
    /// Record account address (stable display key alongside `index`)
    pub address: Address,
    /// Registration index the record was found at
    pub index: u64,
    pub agent_id: u64,
    pub name: String,
    pub description: String,
    pub metadata_uri: String,
    pub owner: Address,
    pub total_staked: u64,
    pub reputation_score: i64,
    pub feedback_count: u64,
    pub is_active: bool,
    pub created_at: i64,
    /// Pulled from the metadata document when present
    pub image_url: Option<String>,
    pub metadata: Option<AgentMetadataDocument>,
}

/// Listing result with the suppressed per-index failures made visible.
#[derive(Debug, Clone, Serialize)]
pub struct DirectorySnapshot {
    /// Registry count at read time (upper bound on `agents.len()`)
    pub agent_count: u64,
    /// Discovered agents in ascending index order
    pub agents: Vec<AgentView>,
    /// Indices whose record read failed and was omitted
    pub skipped: Vec<u64>,
}

/// Read-side orchestrator over the ledger and blob capabilities.
pub struct AgentDirectoryReader {
    ledger: Arc<dyn LedgerClient>,
    blobs: Arc<dyn BlobFetcher>,
    program: ProgramId,
    options: ReaderOptions,
}

impl AgentDirectoryReader {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        blobs: Arc<dyn BlobFetcher>,
        program: ProgramId,
    ) -> Self {
        Self::with_options(ledger, blobs, program, ReaderOptions::default())
    }

    pub fn with_options(
        ledger: Arc<dyn LedgerClient>,
        blobs: Arc<dyn BlobFetcher>,
        program: ProgramId,
        options: ReaderOptions,
    ) -> Self {
        Self {
            ledger,
            blobs,
            program,
            options,
        }
    }

    /// List all discoverable agents in ascending index order.
    ///
    /// Fails only with `RegistryUnavailable`; per-record failures are
    /// omitted and per-metadata failures degrade the entry.
    pub async fn list_agents(&self) -> Result<Vec<AgentView>, DirectoryError> {
        Ok(self.snapshot().await?.agents)
    }

    /// Like `list_agents`, but also reports which indices were skipped.
    pub async fn snapshot(&self) -> Result<DirectorySnapshot, DirectoryError> {
        let deadline = self.options.deadline.map(|d| Instant::now() + d);

        let registry = self
            .read_registry(deadline)
            .await
            .map_err(DirectoryError::RegistryUnavailable)?;

        info!(agent_count = registry.agent_count, "listing agents");

        if registry.agent_count == 0 {
            return Ok(DirectorySnapshot {
                agent_count: 0,
                agents: Vec::new(),
                skipped: Vec::new(),
            });
        }

        // `buffered` yields in submission order, so ascending-index output
        // holds for any concurrency level.
        let concurrency = self.options.concurrency.max(1);
        let results: Vec<(u64, Result<AgentView, LedgerError>)> =
            stream::iter(0..registry.agent_count)
                .map(|index| async move { (index, self.fetch_indexed(index, deadline).await) })
                .buffered(concurrency)
                .collect()
                .await;

        let mut agents = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (index, result) in results {
            match result {
                Ok(view) => agents.push(view),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable agent record");
                    skipped.push(index);
                }
            }
        }

        info!(
            fetched = agents.len(),
            skipped = skipped.len(),
            "directory listing complete"
        );

        Ok(DirectorySnapshot {
            agent_count: registry.agent_count,
            agents,
            skipped,
        })
    }

    /// Fetch a single agent by registration index. Returns None on any
    /// per-record failure, mirroring the omission rule of `list_agents`.
    pub async fn fetch_agent(&self, index: u64) -> Option<AgentView> {
        match self.fetch_indexed(index, None).await {
            Ok(view) => Some(view),
            Err(e) => {
                warn!(index, error = %e, "agent record unavailable");
                None
            }
        }
    }

    /// Read and decode the registry singleton, retrying transient
    /// transport failures a bounded number of times.
    async fn read_registry(&self, deadline: Option<Instant>) -> Result<Registry, LedgerError> {
        let address = registry_address(&self.program);
        let mut attempt = 0u32;
        loop {
            let result = self
                .read_bounded(&address, deadline)
                .await
                .and_then(|bytes| Registry::decode(&bytes));
            match result {
                Ok(registry) => return Ok(registry),
                Err(e) if e.is_transient() && attempt < self.options.registry_retries => {
                    attempt += 1;
                    debug!(attempt, error = %e, "retrying registry read");
                    time::sleep(self.options.retry_backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_indexed(
        &self,
        index: u64,
        deadline: Option<Instant>,
    ) -> Result<AgentView, LedgerError> {
        let address = agent_record_address(&self.program, index);
        let bytes = self.read_bounded(&address, deadline).await?;
        let record = AgentRecord::decode(&bytes)?;

        let metadata = if record.metadata_uri.is_empty() {
            None
        } else {
            self.resolve_metadata(index, &record.metadata_uri, deadline)
                .await
        };
        let image_url = metadata.as_ref().and_then(|doc| doc.image.clone());

        Ok(AgentView {
            address,
            index,
            agent_id: record.agent_id,
            name: record.name,
            description: record.description,
            metadata_uri: record.metadata_uri,
            owner: record.owner,
            total_staked: record.total_staked,
            reputation_score: record.reputation_score,
            feedback_count: record.feedback_count,
            is_active: record.is_active,
            created_at: record.created_at,
            image_url,
            metadata,
        })
    }

    /// Best-effort metadata resolution: any failure degrades to None.
    async fn resolve_metadata(
        &self,
        index: u64,
        uri: &str,
        deadline: Option<Instant>,
    ) -> Option<AgentMetadataDocument> {
        let fetch = self.blobs.get(uri);
        let bytes = match deadline {
            Some(at) => {
                if Instant::now() >= at {
                    debug!(index, "deadline elapsed before metadata fetch");
                    return None;
                }
                match time::timeout_at(at, fetch).await {
                    Ok(result) => result,
                    Err(_) => {
                        debug!(index, uri, "metadata fetch hit deadline");
                        return None;
                    }
                }
            }
            None => fetch.await,
        };

        match bytes.and_then(|b| AgentMetadataDocument::decode(&b)) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!(index, uri, error = %e, "metadata unavailable, degrading entry");
                None
            }
        }
    }

    /// Ledger read bounded by the call deadline. A deadline hit looks
    /// like a transport failure to the caller.
    async fn read_bounded(
        &self,
        address: &Address,
        deadline: Option<Instant>,
    ) -> Result<Vec<u8>, LedgerError> {
        match deadline {
            Some(at) => {
                if Instant::now() >= at {
                    return Err(LedgerError::Transport("deadline elapsed".to_string()));
                }
                match time::timeout_at(at, self.ledger.read_account(address)).await {
                    Ok(result) => result,
                    Err(_) => Err(LedgerError::Transport("deadline elapsed".to_string())),
                }
            }
            None => self.ledger.read_account(address).await,
        }
    }
}
