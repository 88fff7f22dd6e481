//! Configuration loading.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `AGENTDIR_*` environment variables (double underscore
//! for nesting, e.g. `AGENTDIR_LOGGING__LEVEL=debug`).

use crate::directory::ReaderOptions;
use crate::error::DirectoryError;
use crate::logging::LoggingConfig;
use crate::types::ProgramId;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Program identity the public directory deployment registers against.
pub const DEFAULT_PROGRAM_ID: &str =
    "6fb1b8f4a2d34c7e90ab5c11d2e83f6a47c0de92b35a18e4f7c26d095b83a1ce";

fn default_rpc_url() -> String {
    "http://127.0.0.1:8899".to_string()
}

fn default_program_id() -> String {
    DEFAULT_PROGRAM_ID.to_string()
}

fn default_gateway_url() -> String {
    crate::blob::gateway::DEFAULT_GATEWAY.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    1
}

fn default_registry_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    200
}

/// Pinning service credentials and endpoint. Only needed for uploads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinningConfig {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

/// Top-level configuration for the directory client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Ledger RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Hex-encoded identity of the registry program
    #[serde(default = "default_program_id")]
    pub program_id: String,

    /// Gateway base URL for metadata and image blobs
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// In-flight per-index fetches (1 = sequential reference behavior)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Overall listing deadline in milliseconds; absent means none
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    /// Registry read retries on transient failures
    #[serde(default = "default_registry_retries")]
    pub registry_retries: u32,

    /// Pause between registry retries in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub pinning: PinningConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            program_id: default_program_id(),
            gateway_url: default_gateway_url(),
            request_timeout_secs: default_request_timeout_secs(),
            concurrency: default_concurrency(),
            deadline_ms: None,
            registry_retries: default_registry_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            pinning: PinningConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DirectoryConfig {
    /// Parse the configured program identity.
    pub fn program(&self) -> Result<ProgramId, DirectoryError> {
        self.program_id
            .parse()
            .map_err(|e| DirectoryError::Config(format!("invalid program_id: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reader tuning derived from this configuration.
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            concurrency: self.concurrency.max(1),
            deadline: self.deadline_ms.map(Duration::from_millis),
            registry_retries: self.registry_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file plus environment.
    pub fn load(path: Option<&Path>) -> Result<DirectoryConfig, DirectoryError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("AGENTDIR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DirectoryError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.registry_retries, 2);
        assert!(config.deadline_ms.is_none());
        assert!(config.program().is_ok());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.rpc_url, default_rpc_url());
        assert_eq!(config.gateway_url, default_gateway_url());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "rpc_url = \"https://rpc.example.org\"\nconcurrency = 8\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.example.org");
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.logging.level, "debug");
        // untouched fields keep defaults
        assert_eq!(config.registry_retries, 2);
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "deadline_ms = 100").unwrap();

        // single underscore after the prefix, double underscore for nesting
        std::env::set_var("AGENTDIR_DEADLINE_MS", "1500");
        std::env::set_var("AGENTDIR_LOGGING__FORMAT", "json");
        let result = ConfigLoader::load(Some(file.path()));
        std::env::remove_var("AGENTDIR_DEADLINE_MS");
        std::env::remove_var("AGENTDIR_LOGGING__FORMAT");

        let config = result.unwrap();
        assert_eq!(config.deadline_ms, Some(1500));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_program_id_is_config_error() {
        let config = DirectoryConfig {
            program_id: "not-hex".to_string(),
            ..DirectoryConfig::default()
        };
        assert!(matches!(
            config.program(),
            Err(DirectoryError::Config(_))
        ));
    }

    #[test]
    fn test_reader_options_mapping() {
        let config = DirectoryConfig {
            concurrency: 0,
            deadline_ms: Some(1500),
            ..DirectoryConfig::default()
        };
        let options = config.reader_options();
        assert_eq!(options.concurrency, 1); // floor at sequential
        assert_eq!(options.deadline, Some(Duration::from_millis(1500)));
    }
}
