//! Configuration schema types
//!
//! Defines the structure of the TOML configuration file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SecretString;
use crate::domain::VersionRequirement;
use crate::source::OrchestratorSettings;

/// Upstream server mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ServerMode {
    /// Remote server reached over the network
    #[default]
    Remote,
    /// In-process server used for local testing and replay
    InProcess,
}

/// Main claimflow configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimflowConfig {
    /// Upstream change-stream API settings
    pub source: SourceApiConfig,

    /// Ingestion loop settings
    pub ingestion: IngestionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClaimflowConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()?;
        self.ingestion.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds orchestrator settings from the validated configuration.
    pub fn orchestrator_settings(&self) -> Result<OrchestratorSettings, String> {
        let version_requirement: VersionRequirement = self
            .ingestion
            .version_requirement
            .parse()
            .map_err(|e: crate::domain::IngestError| e.to_string())?;
        Ok(OrchestratorSettings {
            version_requirement,
            starting_sequence_number: self.ingestion.starting_sequence_number,
            min_idle_before_connection_drop: Duration::from_millis(
                self.source.min_idle_millis_before_connection_drop,
            ),
            max_per_batch: self.ingestion.max_per_batch,
            remote_server: self.source.server == ServerMode::Remote,
        })
    }
}

/// Upstream change-stream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceApiConfig {
    /// Server mode (remote or in-process)
    #[serde(default)]
    pub server: ServerMode,

    /// Hostname of the remote server
    #[serde(default)]
    pub host: String,

    /// Port of the remote server
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name of the in-process server (server = "in-process" only)
    #[serde(default)]
    pub in_process_server_name: String,

    /// Idle time after which the server is expected to drop the connection
    #[serde(default = "default_max_idle_millis")]
    pub max_idle_millis: u64,

    /// Minimum idle time for a dropped connection to count as benign
    #[serde(default = "default_min_idle_millis")]
    pub min_idle_millis_before_connection_drop: u64,

    /// Bearer token for authentication (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub auth_token: Option<SecretString>,
}

impl SourceApiConfig {
    fn validate(&self) -> Result<(), String> {
        match self.server {
            ServerMode::Remote => {
                if self.host.is_empty() {
                    return Err("source.host is required when server = 'remote'".to_string());
                }
                if self.port == 0 {
                    return Err("source.port must be non-zero".to_string());
                }
            }
            ServerMode::InProcess => {
                if self.in_process_server_name.is_empty() {
                    return Err(
                        "source.in_process_server_name is required when server = 'in-process'"
                            .to_string(),
                    );
                }
            }
        }
        if self.max_idle_millis == 0 {
            return Err("source.max_idle_millis must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Ingestion loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Maximum records coalesced into one batch
    #[serde(default = "default_max_per_batch")]
    pub max_per_batch: usize,

    /// Operator override for the starting sequence number (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_sequence_number: Option<u64>,

    /// Version requirement the upstream must satisfy, e.g. "^0.15.0"
    pub version_requirement: String,

    /// Dead-letter entries older than this many days are pruned
    #[serde(default = "default_max_dead_letter_age_days")]
    pub max_dead_letter_age_days: i64,
}

impl IngestionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_per_batch == 0 {
            return Err("ingestion.max_per_batch must be at least 1".to_string());
        }
        self.version_requirement
            .parse::<VersionRequirement>()
            .map_err(|e| format!("Invalid ingestion.version_requirement: {}", e))?;
        if self.max_dead_letter_age_days < 1 {
            return Err("ingestion.max_dead_letter_age_days must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to write rolling log files in addition to stdout
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for rolling log files
    #[serde(default = "default_log_path")]
    pub local_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: default_true(),
            local_path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    443
}

fn default_max_idle_millis() -> u64 {
    600_000
}

fn default_min_idle_millis() -> u64 {
    120_000
}

fn default_max_per_batch() -> usize {
    100
}

fn default_max_dead_letter_age_days() -> i64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "./logs".to_string()
}
