//! Logging System
//!
//! Structured logging via the `tracing` crate. Level comes from the
//! `AGENTDIR_LOG` environment variable when set, otherwise from
//! configuration; output is text or JSON on stdout or stderr.

use crate::error::DirectoryError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr (default: stderr, so command
    /// output on stdout stays machine-readable)
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest): `AGENTDIR_LOG` / `AGENTDIR_LOG_FORMAT`
/// environment variables, configuration, defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), DirectoryError> {
    let disabled = config.map(|c| !c.enabled).unwrap_or(false);
    if disabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .init();
        return Ok(());
    }

    let filter = build_env_filter(config);
    let format = determine_format(config)?;
    let to_stdout = determine_output(config)? == OutputDestination::Stdout;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    if format == "json" {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339());
        if to_stdout {
            base_subscriber.with(layer.with_writer(std::io::stdout)).init();
        } else {
            base_subscriber.with(layer.with_writer(std::io::stderr)).init();
        }
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(use_color);
        if to_stdout {
            base_subscriber.with(layer.with_writer(std::io::stdout)).init();
        } else {
            base_subscriber.with(layer.with_writer(std::io::stderr)).init();
        }
    }

    Ok(())
}

/// Build environment filter from config or the AGENTDIR_LOG variable
fn build_env_filter(config: Option<&LoggingConfig>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("AGENTDIR_LOG") {
        return filter;
    }
    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    EnvFilter::new(level)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, DirectoryError> {
    let format = match std::env::var("AGENTDIR_LOG_FORMAT") {
        Ok(value) => value,
        Err(_) => config
            .map(|c| c.format.clone())
            .unwrap_or_else(default_format),
    };
    if format != "json" && format != "text" {
        return Err(DirectoryError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format)
}

#[derive(Debug, PartialEq, Eq)]
enum OutputDestination {
    Stdout,
    Stderr,
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestination, DirectoryError> {
    let output = match std::env::var("AGENTDIR_LOG_OUTPUT") {
        Ok(value) => value,
        Err(_) => config
            .map(|c| c.output.clone())
            .unwrap_or_else(default_output),
    };
    match output.as_str() {
        "stdout" => Ok(OutputDestination::Stdout),
        "stderr" => Ok(OutputDestination::Stderr),
        _ => Err(DirectoryError::Config(format!(
            "Invalid log output: {} (must be 'stdout' or 'stderr')",
            output
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert!(config.color);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        assert!(determine_format(Some(&config)).is_err());
    }

    #[test]
    fn test_invalid_format_from_env_rejected() {
        std::env::set_var("AGENTDIR_LOG_FORMAT", "xml");
        let result = determine_format(Some(&LoggingConfig::default()));
        std::env::remove_var("AGENTDIR_LOG_FORMAT");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_output_rejected() {
        let config = LoggingConfig {
            output: "syslog".to_string(),
            ..LoggingConfig::default()
        };
        assert!(determine_output(Some(&config)).is_err());
    }

    #[test]
    fn test_output_destinations() {
        let config = LoggingConfig {
            output: "stdout".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(
            determine_output(Some(&config)).unwrap(),
            OutputDestination::Stdout
        );
        assert_eq!(
            determine_output(None).unwrap(),
            OutputDestination::Stderr
        );
    }
}
