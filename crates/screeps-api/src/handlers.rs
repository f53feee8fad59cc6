//! Scrape handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::trace;

use crate::ApiState;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = state.store.render().await;
    trace!(bytes = body.len(), "metrics scraped");
    (StatusCode::OK, [("content-type", CONTENT_TYPE)], body)
}
