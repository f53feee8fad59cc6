//! End-to-end pipeline tests.
//!
//! Runs a fake upstream game API on a local port, drives real HTTP
//! collection cycles against it, and scrapes the result through the
//! `/metrics` router.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use tower::ServiceExt;

use screeps_collector::{CollectError, Collector, FetchError, HttpFetcher};
use screeps_core::{DecodeMode, ExporterConfig};
use screeps_decode::encode_history;
use screeps_decode::wire::{Room, Stats, WireProgress};
use screeps_metrics::MetricStore;

const TOKEN: &str = "test-token";

/// Canned upstream responses, keyed by shard for the memory endpoints.
#[derive(Default)]
struct Upstream {
    account: String,
    orders: String,
    memory: HashMap<String, Vec<u8>>,
    segments: HashMap<String, Vec<u8>>,
}

type Shared = Arc<Mutex<Upstream>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-token").and_then(|v| v.to_str().ok()) == Some(TOKEN)
}

async fn auth_me(State(up): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Vec::new());
    }
    (StatusCode::OK, up.lock().unwrap().account.clone().into_bytes())
}

async fn my_orders(State(up): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Vec::new());
    }
    (StatusCode::OK, up.lock().unwrap().orders.clone().into_bytes())
}

async fn memory(
    State(up): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Vec::new());
    }
    let shard = query.get("shard").cloned().unwrap_or_default();
    match up.lock().unwrap().memory.get(&shard) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, Vec::new()),
    }
}

async fn memory_segment(
    State(up): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) || query.get("segment").map(String::as_str) != Some("5") {
        return (StatusCode::UNAUTHORIZED, Vec::new());
    }
    let shard = query.get("shard").cloned().unwrap_or_default();
    match up.lock().unwrap().segments.get(&shard) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, Vec::new()),
    }
}

async fn start_upstream(upstream: Upstream) -> (SocketAddr, Shared) {
    let shared: Shared = Arc::new(Mutex::new(upstream));
    let router = Router::new()
        .route("/api/auth/me", get(auth_me))
        .route("/api/game/market/my-orders", get(my_orders))
        .route("/api/user/memory", get(memory))
        .route("/api/user/memory-segment", get(memory_segment))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, shared)
}

fn stats_with_room(room: Option<&str>) -> Stats {
    let mut stats = Stats {
        tick: 12345.0,
        ms: 1_700_000_000_000.0,
        ..Default::default()
    };
    if let Some(name) = room {
        stats.rooms.insert(
            name.to_string(),
            Room {
                rcl: WireProgress {
                    level: 3.0,
                    progress: 500.0,
                    progress_total: 135000.0,
                },
                creeps: 5.0,
                energy_available: 200.0,
                energy_capacity_available: 500.0,
                structures: [("spawn".to_string(), 1.0)].into_iter().collect(),
                storage: [("energy".to_string(), 700.0)].into_iter().collect(),
                terminal: None,
            },
        );
    }
    stats
}

fn base_upstream() -> Upstream {
    Upstream {
        account: r#"{"ok":1,"money":100,"resources":{"energy":50},"cpuShard":{"shard0":20}}"#
            .to_string(),
        orders: "{}".to_string(),
        ..Default::default()
    }
}

fn config(addr: SocketAddr, mode: DecodeMode, token: &str) -> ExporterConfig {
    ExporterConfig {
        token: token.to_string(),
        shards: vec!["shard0".to_string()],
        mode,
        segment: 5,
        api_url: format!("http://{addr}"),
        ..Default::default()
    }
}

fn collector(config: &ExporterConfig, store: MetricStore) -> Collector<HttpFetcher> {
    Collector::new(
        HttpFetcher::new(config),
        config.mode,
        config.shard_names(),
        store,
        Duration::from_secs(60),
    )
}

async fn scrape(store: &MetricStore) -> String {
    let router = screeps_api::build_router(store.clone());
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn history_mode_end_to_end() {
    let mut upstream = base_upstream();
    upstream.memory.insert(
        "shard0".to_string(),
        encode_history(&[stats_with_room(None), stats_with_room(Some("W1N1"))], true).unwrap(),
    );
    let (addr, _) = start_upstream(upstream).await;

    let store = MetricStore::new();
    let collector = collector(&config(addr, DecodeMode::History, TOKEN), store.clone());
    collector.collect_once().await.unwrap();

    let text = scrape(&store).await;
    for line in [
        "screeps_resources{shard=\"intershard\",type=\"money\"} 100\n",
        "screeps_resources{shard=\"intershard\",type=\"energy\"} 50\n",
        "screeps_cpu_shard{shard=\"shard0\"} 20\n",
        "screeps_rcl{shard=\"shard0\",room=\"W1N1\",type=\"level\"} 3\n",
        "screeps_creeps{shard=\"shard0\",room=\"W1N1\"} 5\n",
        "screeps_energy{shard=\"shard0\",room=\"W1N1\",type=\"available\"} 200\n",
        "screeps_energy{shard=\"shard0\",room=\"W1N1\",type=\"capacityAvailable\"} 500\n",
        "screeps_tick{shard=\"shard0\"} 12345\n",
        "screeps_stats_processing_time_count 1\n",
    ] {
        assert!(text.contains(line), "missing {line:?} in:\n{text}");
    }
    assert!(!text.contains("screeps_last_reset_tick{"));
}

#[tokio::test]
async fn segment_mode_end_to_end() {
    let mut upstream = base_upstream();
    let data = serde_json::json!({
        "tick": 777,
        "ms": 10,
        "lastGlobalResetTick": 700,
        "lastGlobalResetMs": 5,
        "rooms": {
            "E5N5": {
                "rcl": { "level": 8.0, "progress": 0, "progressTotal": 0 },
                "creeps": 12,
                "terminal": { "energy": 30000 }
            }
        }
    })
    .to_string();
    upstream.segments.insert(
        "shard0".to_string(),
        serde_json::to_vec(&serde_json::json!({ "ok": 1, "data": data })).unwrap(),
    );
    let (addr, _) = start_upstream(upstream).await;

    let store = MetricStore::new();
    let collector = collector(&config(addr, DecodeMode::Segment, TOKEN), store.clone());
    collector.collect_once().await.unwrap();

    let text = scrape(&store).await;
    assert!(text.contains("screeps_last_reset_tick{shard=\"shard0\"} 700\n"));
    assert!(text.contains("screeps_rcl{shard=\"shard0\",room=\"E5N5\",type=\"level\"} 8\n"));
    assert!(text.contains("screeps_terminal{shard=\"shard0\",room=\"E5N5\",type=\"energy\"} 30000\n"));
    assert!(text.contains("screeps_creeps{shard=\"shard0\",room=\"E5N5\"} 12\n"));
}

#[tokio::test]
async fn room_removed_between_cycles() {
    let mut upstream = base_upstream();
    upstream.memory.insert(
        "shard0".to_string(),
        encode_history(&[stats_with_room(Some("W1N1"))], false).unwrap(),
    );
    let (addr, shared) = start_upstream(upstream).await;

    let store = MetricStore::new();
    let collector = collector(&config(addr, DecodeMode::History, TOKEN), store.clone());
    collector.collect_once().await.unwrap();
    assert!(scrape(&store).await.contains("room=\"W1N1\""));

    shared.lock().unwrap().memory.insert(
        "shard0".to_string(),
        encode_history(&[stats_with_room(None)], false).unwrap(),
    );
    collector.collect_once().await.unwrap();

    let text = scrape(&store).await;
    assert!(!text.contains("room=\"W1N1\""), "stale room series in:\n{text}");
    assert!(text.contains("screeps_tick{shard=\"shard0\"} 12345\n"));
}

#[tokio::test]
async fn bad_token_aborts_cycle() {
    let mut upstream = base_upstream();
    upstream.memory.insert(
        "shard0".to_string(),
        encode_history(&[stats_with_room(Some("W1N1"))], true).unwrap(),
    );
    let (addr, _) = start_upstream(upstream).await;

    let store = MetricStore::new();
    let collector = collector(&config(addr, DecodeMode::History, "wrong"), store.clone());
    let err = collector.collect_once().await.unwrap_err();
    assert!(matches!(
        err,
        CollectError::Fetch {
            source: FetchError::Status { status: 401 },
            ..
        }
    ));

    let text = scrape(&store).await;
    assert!(!text.contains("shard=\"shard0\""));
    assert!(text.contains("screeps_stats_processing_time_count 0\n"));
}

#[tokio::test]
async fn missing_shard_keeps_previous_values() {
    let mut upstream = base_upstream();
    upstream.memory.insert(
        "shard0".to_string(),
        encode_history(&[stats_with_room(Some("W1N1"))], true).unwrap(),
    );
    let (addr, shared) = start_upstream(upstream).await;

    let mut cfg = config(addr, DecodeMode::History, TOKEN);
    let store = MetricStore::new();
    collector(&cfg, store.clone()).collect_once().await.unwrap();
    let before = scrape(&store).await;

    // shard1 is configured but the upstream has nothing for it.
    cfg.shards.push("shard1".to_string());
    shared.lock().unwrap().account =
        r#"{"ok":1,"money":999,"resources":{},"cpuShard":{}}"#.to_string();
    assert!(collector(&cfg, store.clone()).collect_once().await.is_err());

    assert_eq!(scrape(&store).await, before);
}
