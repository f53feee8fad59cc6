//! Exporter configuration.
//!
//! Loaded from an optional TOML file and then overridden field by field
//! from the command line / environment by the daemon.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_API_URL: &str = "https://screeps.com";
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8080;

/// How per-shard stats are published upstream, and therefore how they
/// must be fetched and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Plain JSON stats written to a memory segment.
    Segment,
    /// Gzip + base64 compressed `Memory.stats.history` blob.
    #[default]
    History,
}

impl fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeMode::Segment => f.write_str("segment"),
            DecodeMode::History => f.write_str("history"),
        }
    }
}

impl FromStr for DecodeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "segment" => Ok(DecodeMode::Segment),
            "history" | "memory" => Ok(DecodeMode::History),
            other => Err(ConfigError::Invalid(format!("unknown mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Auth token sent as `X-Token` on every request.
    pub token: String,
    /// Optional `X-Username` header (private servers).
    pub username: Option<String>,
    pub shards: Vec<String>,
    pub mode: DecodeMode,
    /// Memory segment holding the stats (segment mode).
    pub segment: u32,
    /// Memory path holding the stats blob (history mode). The whole
    /// memory is fetched when unset.
    pub memory_path: Option<String>,
    pub api_url: String,
    pub interval_secs: u64,
    /// Port of the `/metrics` listener.
    pub port: u16,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            username: None,
            shards: Vec::new(),
            mode: DecodeMode::default(),
            segment: 0,
            memory_path: None,
            api_url: DEFAULT_API_URL.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            port: DEFAULT_PORT,
        }
    }
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check the fatal start-up conditions: a token and at least one
    /// non-empty shard name.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.shards.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::NoShards);
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid("interval must be at least 1s".into()));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Configured shard names, trimmed, with blanks and duplicates removed.
    pub fn shard_names(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for shard in &self.shards {
            let shard = shard.trim();
            if !shard.is_empty() && !out.iter().any(|s| s == shard) {
                out.push(shard.to_string());
            }
        }
        out
    }
}
