//! screeps-api — the scrape surface of the Screeps exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition of the metric store |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use screeps_metrics::MetricStore;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: MetricStore,
}

/// Build the scrape router.
pub fn build_router(store: MetricStore) -> Router {
    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(ApiState { store })
}
