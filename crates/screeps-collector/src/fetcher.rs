//! Authenticated fetches against the upstream game API.
//!
//! One request per logical resource. The fetcher never retries; a failed
//! resource is retried on the next scheduled cycle.

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use tracing::debug;

use screeps_core::{DecodeMode, ExporterConfig};

use crate::error::{FetchError, FetchResult};

/// A logical upstream resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    AccountSummary,
    MarketOrders,
    ShardStats { shard: String },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::AccountSummary => f.write_str("account summary"),
            Resource::MarketOrders => f.write_str("market orders"),
            Resource::ShardStats { shard } => write!(f, "stats for {shard}"),
        }
    }
}

/// Retrieves raw response bodies for upstream resources.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, resource: &Resource) -> impl Future<Output = FetchResult<Bytes>> + Send;
}

/// [`Fetcher`] backed by the upstream HTTP API.
///
/// Requests use the transport's default timeouts; a request that never
/// completes stalls the collection loop.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    api_url: String,
    token: String,
    username: Option<String>,
    mode: DecodeMode,
    segment: u32,
    memory_path: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &ExporterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            username: config.username.clone(),
            mode: config.mode,
            segment: config.segment,
            memory_path: config.memory_path.clone(),
        }
    }

    /// Endpoint path and query parameters for a resource.
    pub fn endpoint(&self, resource: &Resource) -> (&'static str, Vec<(&'static str, String)>) {
        match resource {
            Resource::AccountSummary => ("/api/auth/me", Vec::new()),
            Resource::MarketOrders => ("/api/game/market/my-orders", Vec::new()),
            Resource::ShardStats { shard } => match self.mode {
                DecodeMode::Segment => (
                    "/api/user/memory-segment",
                    vec![
                        ("segment", self.segment.to_string()),
                        ("shard", shard.clone()),
                    ],
                ),
                DecodeMode::History => {
                    let mut query = vec![("shard", shard.clone())];
                    if let Some(path) = &self.memory_path {
                        query.push(("path", path.clone()));
                    }
                    ("/api/user/memory", query)
                }
            },
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, resource: &Resource) -> FetchResult<Bytes> {
        let (path, query) = self.endpoint(resource);
        let url = format!("{}{path}", self.api_url);

        let mut request = self
            .client
            .get(&url)
            .query(&query)
            .header("X-Token", &self.token);
        if let Some(username) = &self.username {
            request = request.header("X-Username", username);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(%resource, bytes = body.len(), "fetched");
        Ok(body)
    }
}
