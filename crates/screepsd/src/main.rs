//! screepsd — the Screeps exporter daemon.
//!
//! Single binary that assembles the exporter:
//! - Metric store
//! - Stats collector (background task, fixed interval)
//! - `/metrics` scrape endpoint
//!
//! # Usage
//!
//! ```text
//! screepsd --token $TOKEN --shard shard0,shard3 --mode segment --port 8080
//! screepsd shard0 $TOKEN
//! ```

mod cli;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};

use screeps_collector::{Collector, HttpFetcher};
use screeps_core::ExporterConfig;
use screeps_metrics::MetricStore;

use crate::cli::Cli;

/// How long a shutdown waits for an in-flight cycle before abandoning it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,screepsd=debug,screeps=debug".into()),
        )
        .init();

    let config = Cli::parse().into_config()?;
    // The only fatal check: refuse to start without a token or shard.
    config.validate().context("invalid config")?;

    run(config).await
}

async fn run(config: ExporterConfig) -> anyhow::Result<()> {
    info!(
        shards = ?config.shard_names(),
        mode = %config.mode,
        api_url = %config.api_url,
        "screeps exporter starting"
    );

    // ── Initialize subsystems ──────────────────────────────────

    let store = MetricStore::new();

    let collector = Collector::new(
        HttpFetcher::new(&config),
        config.mode,
        config.shard_names(),
        store.clone(),
        config.interval(),
    );
    info!(interval = config.interval_secs, "stats collector initialized");

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Start background tasks ─────────────────────────────────

    let mut collector_handle = tokio::spawn(async move {
        collector.run(shutdown_rx).await;
    });

    // ── Start scrape server ────────────────────────────────────

    let router = screeps_api::build_router(store);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!(%addr, "metrics server starting");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    // A cycle stuck on a hung fetch never observes the signal.
    if tokio::time::timeout(SHUTDOWN_GRACE, &mut collector_handle)
        .await
        .is_err()
    {
        warn!("stats cycle still running, abandoning it");
        collector_handle.abort();
    }

    info!("screeps exporter stopped");
    Ok(())
}
