//! Command line and environment handling.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use screeps_core::{DecodeMode, ExporterConfig};

#[derive(Debug, Parser)]
#[command(name = "screepsd", about = "Screeps Prometheus exporter", version)]
pub struct Cli {
    /// TOML config file. Command line flags override its values.
    #[arg(long, env = "SCREEPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// API token, sent as X-Token.
    #[arg(long, env = "SCREEPS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Username, sent as X-Username (private servers).
    #[arg(long, env = "SCREEPS_USERNAME")]
    pub username: Option<String>,

    /// Shard to collect. Repeat or comma-separate for several.
    #[arg(long = "shard", env = "SCREEPS_SHARD", value_delimiter = ',')]
    pub shards: Vec<String>,

    /// How stats are published: `segment` or `history`.
    #[arg(long, env = "SCREEPS_MODE")]
    pub mode: Option<DecodeMode>,

    /// Memory segment holding the stats (segment mode).
    #[arg(long, env = "SCREEPS_SEGMENT")]
    pub segment: Option<u32>,

    /// Memory path holding the stats blob (history mode).
    #[arg(long, env = "SCREEPS_MEMORY_PATH")]
    pub memory_path: Option<String>,

    /// Base URL of the game API.
    #[arg(long, env = "SCREEPS_API_URL")]
    pub api_url: Option<String>,

    /// Poll interval in seconds.
    #[arg(long, env = "SCREEPS_INTERVAL")]
    pub interval: Option<u64>,

    /// Port to serve /metrics on.
    #[arg(long, env = "SCREEPS_PORT")]
    pub port: Option<u16>,

    /// Positional shard, kept for `screepsd <shard> <token>` invocations.
    #[arg(value_name = "SHARD")]
    pub positional_shard: Option<String>,

    /// Positional token, kept for `screepsd <shard> <token>` invocations.
    #[arg(value_name = "TOKEN")]
    pub positional_token: Option<String>,
}

impl Cli {
    /// Merge the config file (if any) with command line overrides.
    ///
    /// Does not validate; see [`ExporterConfig::validate`].
    pub fn into_config(self) -> anyhow::Result<ExporterConfig> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExporterConfig::default(),
        };

        if let Some(token) = self.positional_token.or(self.token) {
            config.token = token;
        }
        if self.username.is_some() {
            config.username = self.username;
        }
        if let Some(shard) = self.positional_shard {
            config.shards = vec![shard];
        } else if !self.shards.is_empty() {
            config.shards = self.shards;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(segment) = self.segment {
            config.segment = segment;
        }
        if self.memory_path.is_some() {
            config.memory_path = self.memory_path;
        }
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        Ok(config)
    }
}
