//! Wire formats of the upstream API.
//!
//! Field names follow the upstream camelCase JSON. Numbers are read as
//! `f64` whether they arrive as integers or floats, and `null` is treated
//! like an absent field.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use screeps_core::{AccountSummary, CpuStats, MarketOrder, Progress, RoomState, ShardState};

/// Deserialize `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_ok() -> i64 {
    1
}

// ── Envelopes ──────────────────────────────────────────────────────

/// `{ok, data, error}` wrapper returned by the memory endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope {
    #[serde(default = "default_ok")]
    pub ok: i64,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `/api/auth/me` response. Only the fields the exporter publishes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[serde(default = "default_ok")]
    pub ok: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub money: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_shard: BTreeMap<String, f64>,
    /// Mixed map upstream; non-numeric entries are dropped on conversion.
    #[serde(default, deserialize_with = "null_default")]
    pub resources: BTreeMap<String, serde_json::Value>,
}

/// `/api/game/market/my-orders` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketOrdersResponse {
    #[serde(default = "default_ok")]
    pub ok: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub shards: BTreeMap<String, Vec<Order>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "type", default)]
    pub order_type: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub remaining_amount: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub total_amount: f64,
}

// ── Stats ──────────────────────────────────────────────────────────

/// Decompressed memory blob of the history variant.
///
/// Accepts the whole `Memory` (`{stats: {history}}`) or just the stats
/// subtree (`{history}`) when a memory path was requested.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Memory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Stats>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatsHistory {
    #[serde(default, deserialize_with = "null_default")]
    pub history: Vec<Stats>,
}

impl Memory {
    /// Chronological stats snapshots, oldest first.
    pub fn into_history(self) -> Vec<Stats> {
        match (self.stats, self.history) {
            (Some(stats), _) => stats.history,
            (None, Some(history)) => history,
            (None, None) => Vec::new(),
        }
    }
}

/// Per-shard stats as written by the in-game code.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default, deserialize_with = "null_default")]
    pub tick: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_global_reset_tick: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_global_reset_ms: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu: Cpu,
    #[serde(default, deserialize_with = "null_default")]
    pub gcl: WireProgress,
    #[serde(default, deserialize_with = "null_default")]
    pub gpl: WireProgress,
    #[serde(default, deserialize_with = "null_default")]
    pub rooms: BTreeMap<String, Room>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Cpu {
    #[serde(default, deserialize_with = "null_default")]
    pub used: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub limit: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub bucket: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireProgress {
    #[serde(default, deserialize_with = "null_default")]
    pub level: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub progress: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub progress_total: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, deserialize_with = "null_default")]
    pub rcl: WireProgress,
    #[serde(default, deserialize_with = "null_default")]
    pub structures: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub creeps: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub energy_available: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub energy_capacity_available: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub storage: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<BTreeMap<String, f64>>,
}

// ── Conversions into the canonical model ───────────────────────────

impl From<WireProgress> for Progress {
    fn from(p: WireProgress) -> Self {
        Progress {
            level: p.level,
            progress: p.progress,
            progress_total: p.progress_total,
        }
    }
}

impl From<Room> for RoomState {
    fn from(room: Room) -> Self {
        RoomState {
            rcl: room.rcl.into(),
            creeps: room.creeps,
            energy_available: room.energy_available,
            energy_capacity_available: room.energy_capacity_available,
            structures: room.structures,
            storage: room.storage,
            terminal: room.terminal,
        }
    }
}

impl From<Stats> for ShardState {
    fn from(stats: Stats) -> Self {
        ShardState {
            tick: stats.tick,
            ms: stats.ms,
            last_reset_tick: stats.last_global_reset_tick,
            last_reset_ms: stats.last_global_reset_ms,
            cpu: CpuStats {
                used: stats.cpu.used,
                limit: stats.cpu.limit,
                bucket: stats.cpu.bucket,
            },
            gcl: stats.gcl.into(),
            gpl: stats.gpl.into(),
            rooms: stats
                .rooms
                .into_iter()
                .map(|(name, room)| (name, room.into()))
                .collect(),
        }
    }
}

impl From<AccountResponse> for AccountSummary {
    fn from(resp: AccountResponse) -> Self {
        AccountSummary {
            money: resp.money,
            resources: resp
                .resources
                .into_iter()
                .filter_map(|(kind, value)| value.as_f64().map(|v| (kind, v)))
                .collect(),
            cpu_shard: resp.cpu_shard,
        }
    }
}

impl From<Order> for MarketOrder {
    fn from(order: Order) -> Self {
        MarketOrder {
            active: order.active,
            order_type: order.order_type,
            resource_type: order.resource_type,
            room_name: order.room_name,
            price: order.price,
            amount: order.amount,
            remaining_amount: order.remaining_amount,
            total_amount: order.total_amount,
        }
    }
}
