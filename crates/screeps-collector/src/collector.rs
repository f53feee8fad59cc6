//! Collection loop — fetch, decode, project and publish on a fixed timer.

use std::time::{Duration, Instant};

use futures_util::future::try_join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use screeps_core::{AccountSummary, DecodeMode, GameState, MarketOrder, ShardName, ShardState};
use screeps_decode::{ShardDecoder, decode_account, decode_market_orders};
use screeps_metrics::{MetricStore, project};

use crate::error::{CollectError, CollectResult};
use crate::fetcher::{Fetcher, Resource};

/// Summary of a successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub shards: usize,
    pub rooms: usize,
    pub orders: usize,
    pub writes: usize,
    pub elapsed: Duration,
}

/// Drives collection cycles against one upstream account and publishes
/// into a [`MetricStore`].
pub struct Collector<F> {
    fetcher: F,
    mode: DecodeMode,
    shards: Vec<ShardName>,
    store: MetricStore,
    interval: Duration,
}

impl<F: Fetcher> Collector<F> {
    pub fn new(
        fetcher: F,
        mode: DecodeMode,
        shards: Vec<ShardName>,
        store: MetricStore,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            mode,
            shards,
            store,
            interval,
        }
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    async fn fetch_account(&self) -> CollectResult<AccountSummary> {
        let resource = Resource::AccountSummary;
        let body = self.fetch(&resource).await?;
        decode_account(&body).map_err(|source| CollectError::Decode { resource, source })
    }

    async fn fetch_market_orders(&self) -> CollectResult<Vec<(ShardName, Vec<MarketOrder>)>> {
        let resource = Resource::MarketOrders;
        let body = self.fetch(&resource).await?;
        decode_market_orders(&body)
            .map(|orders| orders.into_iter().collect())
            .map_err(|source| CollectError::Decode { resource, source })
    }

    async fn fetch_shard(&self, shard: &str) -> CollectResult<(ShardName, ShardState)> {
        let resource = Resource::ShardStats {
            shard: shard.to_string(),
        };
        let body = self.fetch(&resource).await?;
        let state = self
            .mode
            .decode_shard(&body)
            .map_err(|source| CollectError::Decode { resource, source })?;
        Ok((shard.to_string(), state))
    }

    async fn fetch(&self, resource: &Resource) -> CollectResult<bytes::Bytes> {
        self.fetcher
            .fetch(resource)
            .await
            .map_err(|source| CollectError::Fetch {
                resource: resource.clone(),
                source,
            })
    }

    /// Fetch and decode every resource of one cycle into a fresh state.
    ///
    /// All fetches are joined before returning; the first failure is
    /// returned and nothing is published.
    pub async fn gather(&self) -> CollectResult<GameState> {
        let (account, market_orders) =
            tokio::try_join!(self.fetch_account(), self.fetch_market_orders())?;

        let shards = try_join_all(self.shards.iter().map(|shard| self.fetch_shard(shard))).await?;

        Ok(GameState {
            account,
            shards: shards.into_iter().collect(),
            market_orders: market_orders.into_iter().collect(),
        })
    }

    /// Run one full cycle: gather, project, publish.
    ///
    /// The processing-time histogram is only observed when the cycle
    /// succeeds; aborted cycles leave no trace in the store.
    pub async fn collect_once(&self) -> CollectResult<CycleReport> {
        let start = Instant::now();

        let state = self.gather().await?;
        let projection = project(&state);
        let writes = self.store.publish(&projection).await?;

        let elapsed = start.elapsed();
        self.store
            .observe_processing_time(elapsed.as_secs_f64())
            .await;

        Ok(CycleReport {
            shards: state.shards.len(),
            rooms: state.room_count(),
            orders: state.order_count(),
            writes,
            elapsed,
        })
    }

    /// Run cycles until shutdown.
    ///
    /// The first cycle starts immediately; each following cycle starts one
    /// interval after the previous one finished. Shutdown is observed
    /// between cycles, not during one.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            shards = self.shards.len(),
            mode = %self.mode,
            "stats collector started"
        );

        loop {
            match self.collect_once().await {
                Ok(report) => {
                    debug!(
                        shards = report.shards,
                        rooms = report.rooms,
                        orders = report.orders,
                        writes = report.writes,
                        elapsed_ms = report.elapsed.as_millis() as u64,
                        "stats cycle complete"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "stats cycle aborted, keeping previous values");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("stats collector shutting down");
                    break;
                }
            }
        }
    }
}
