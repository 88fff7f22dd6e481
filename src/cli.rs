//! CLI Tooling
//!
//! Command-line interface over the directory reader and pinning client.
//! Commands print to stdout; logs go to stderr by default.

use crate::address::registry_address;
use crate::blob::HttpBlobFetcher;
use crate::config::{ConfigLoader, DirectoryConfig};
use crate::directory::{AgentDirectoryReader, AgentView};
use crate::ledger::{LedgerClient, RpcLedgerClient};
use crate::metadata::AgentMetadataDocument;
use crate::pinning::{PinningClient, DEFAULT_API_BASE};
use crate::record::Registry;
use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;

/// Agentdir CLI - browse an on-chain agent registry
#[derive(Parser)]
#[command(name = "agentdir")]
#[command(about = "Client-side directory reader for on-chain agent registries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ledger RPC endpoint (overrides config)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Registry program identity, hex (overrides config)
    #[arg(long)]
    pub program_id: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all registered agents
    List {
        /// Emit the listing as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one agent by registration index
    Show { index: u64 },

    /// Show the registry singleton (address and count)
    Registry,

    /// Pin a metadata JSON document and print its gateway URL
    PinMetadata { file: PathBuf },
}

/// Resolved configuration plus the capabilities commands run against.
pub struct CliContext {
    config: DirectoryConfig,
}

impl CliContext {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;
        if let Some(rpc_url) = &cli.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(program_id) = &cli.program_id {
            config.program_id = program_id.clone();
        }
        if let Some(level) = &cli.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            config.logging.format = format.clone();
        }
        Ok(Self { config })
    }

    pub fn logging(&self) -> &crate::logging::LoggingConfig {
        &self.config.logging
    }

    fn reader(&self) -> Result<AgentDirectoryReader> {
        let ledger =
            RpcLedgerClient::with_timeout(&self.config.rpc_url, self.config.request_timeout())?;
        let blobs = HttpBlobFetcher::with_timeout(self.config.request_timeout())?;
        Ok(AgentDirectoryReader::with_options(
            Arc::new(ledger),
            Arc::new(blobs),
            self.config.program()?,
            self.config.reader_options(),
        ))
    }

    pub async fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::List { json } => self.list(*json).await,
            Commands::Show { index } => self.show(*index).await,
            Commands::Registry => self.registry().await,
            Commands::PinMetadata { file } => self.pin_metadata(file).await,
        }
    }

    async fn list(&self, json: bool) -> Result<String> {
        let snapshot = self.reader()?.snapshot().await?;

        if json {
            return Ok(serde_json::to_string_pretty(&snapshot)?);
        }

        let mut table = Table::new();
        table.set_header(vec![
            "Index", "Name", "Staked", "Reputation", "Feedback", "Status", "Image",
        ]);
        for agent in &snapshot.agents {
            table.add_row(vec![
                agent.index.to_string(),
                agent.name.clone(),
                agent.total_staked.to_string(),
                agent.reputation_score.to_string(),
                agent.feedback_count.to_string(),
                status_label(agent),
                agent.image_url.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut output = table.to_string();
        if snapshot.agents.is_empty() {
            output = "No agents registered yet".to_string();
        }
        if !snapshot.skipped.is_empty() {
            output.push_str(&format!(
                "\n{} of {} records unavailable (indices: {})",
                snapshot.skipped.len(),
                snapshot.agent_count,
                snapshot
                    .skipped
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        Ok(output)
    }

    async fn show(&self, index: u64) -> Result<String> {
        let view = self
            .reader()?
            .fetch_agent(index)
            .await
            .ok_or_else(|| anyhow!("agent record at index {} is unavailable", index))?;
        Ok(format_agent_detail(&view))
    }

    async fn registry(&self) -> Result<String> {
        let program = self.config.program()?;
        let address = registry_address(&program);
        let ledger =
            RpcLedgerClient::with_timeout(&self.config.rpc_url, self.config.request_timeout())?;
        let registry = Registry::decode(&ledger.read_account(&address).await?)?;
        Ok(format!(
            "Registry {}\n  authority:   {}\n  agent count: {}",
            address, registry.authority, registry.agent_count
        ))
    }

    async fn pin_metadata(&self, file: &PathBuf) -> Result<String> {
        let body = std::fs::read(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let document = AgentMetadataDocument::decode(&body)
            .map_err(|e| anyhow!("{} is not a valid metadata document: {}", file.display(), e))?;

        let pinning = &self.config.pinning;
        let (api_key, api_secret) = match (&pinning.api_key, &pinning.api_secret) {
            (Some(key), Some(secret)) => (key.clone(), secret.clone()),
            _ => {
                return Err(anyhow!(
                    "pinning credentials not configured (set pinning.api_key and pinning.api_secret)"
                ))
            }
        };
        let api_base = pinning
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = PinningClient::new(api_base, &self.config.gateway_url, api_key, api_secret)?;
        let receipt = client.pin_json(&document).await?;
        Ok(format!("Pinned {}\n{}", receipt.cid, receipt.url))
    }
}

fn status_label(agent: &AgentView) -> String {
    if agent.is_active {
        "active".green().to_string()
    } else {
        "inactive".red().to_string()
    }
}

fn format_agent_detail(view: &AgentView) -> String {
    let registered = DateTime::from_timestamp(view.created_at, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| view.created_at.to_string());
    let mut out = format!(
        "Agent #{} ({})\n  address:      {}\n  owner:        {}\n  description:  {}\n  staked:       {}\n  reputation:   {}\n  feedback:     {}\n  status:       {}\n  registered:   {}",
        view.agent_id,
        view.name,
        view.address,
        view.owner,
        view.description,
        view.total_staked,
        view.reputation_score,
        view.feedback_count,
        if view.is_active { "active" } else { "inactive" },
        registered,
    );
    if !view.metadata_uri.is_empty() {
        out.push_str(&format!("\n  metadata:     {}", view.metadata_uri));
    }
    if let Some(image) = &view.image_url {
        out.push_str(&format!("\n  image:        {}", image));
    }
    out
}
