//! Canonical game state.
//!
//! Every payload variant the upstream API produces is normalized into
//! these types before projection. A fresh [`GameState`] is built each
//! collection cycle and dropped once its metrics are published.

use std::collections::BTreeMap;

/// Opaque shard identifier (e.g. `shard0`).
pub type ShardName = String;

/// Opaque room identifier (e.g. `W1N1`).
pub type RoomName = String;

/// Snapshot of the whole account for one collection cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub account: AccountSummary,
    /// Per-shard simulation state, keyed by shard name.
    pub shards: BTreeMap<ShardName, ShardState>,
    /// Open market orders grouped by shard.
    pub market_orders: BTreeMap<ShardName, Vec<MarketOrder>>,
}

/// Account-level totals that are not tied to a single shard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSummary {
    pub money: f64,
    /// Account-bound resources (pixels, cpu unlocks, access keys, ...).
    pub resources: BTreeMap<String, f64>,
    /// CPU allocated to each shard.
    pub cpu_shard: BTreeMap<ShardName, f64>,
}

// ── Shard ──────────────────────────────────────────────────────────

/// State of a single shard at its latest reported tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardState {
    pub tick: f64,
    pub ms: f64,
    /// Tick of the last global reset. Not reported by the history variant.
    pub last_reset_tick: Option<f64>,
    /// Timestamp (ms) of the last global reset. Not reported by the history variant.
    pub last_reset_ms: Option<f64>,
    pub cpu: CpuStats,
    /// Global Control Level.
    pub gcl: Progress,
    /// Global Power Level.
    pub gpl: Progress,
    pub rooms: BTreeMap<RoomName, RoomState>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuStats {
    pub used: f64,
    pub limit: f64,
    pub bucket: f64,
}

/// Level plus progress towards the next level.
///
/// Levels are whole numbers upstream but are kept as `f64` so integer and
/// float encodings of the same level compare equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub level: f64,
    pub progress: f64,
    pub progress_total: f64,
}

// ── Room ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomState {
    /// Room Control Level.
    pub rcl: Progress,
    pub creeps: f64,
    pub energy_available: f64,
    pub energy_capacity_available: f64,
    /// Structure type → count.
    pub structures: BTreeMap<String, f64>,
    /// Resource type → amount held in the room storage.
    pub storage: BTreeMap<String, f64>,
    /// Resource type → amount held in the terminal. Only the segment
    /// variant reports it.
    pub terminal: Option<BTreeMap<String, f64>>,
}

// ── Market ─────────────────────────────────────────────────────────

/// A standing buy/sell order owned by the account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketOrder {
    pub active: bool,
    /// `buy` or `sell`.
    pub order_type: String,
    pub resource_type: String,
    pub room_name: RoomName,
    pub price: f64,
    pub amount: f64,
    pub remaining_amount: f64,
    pub total_amount: f64,
}

impl GameState {
    /// Number of rooms across all shards.
    pub fn room_count(&self) -> usize {
        self.shards.values().map(|s| s.rooms.len()).sum()
    }

    /// Number of open market orders across all shards.
    pub fn order_count(&self) -> usize {
        self.market_orders.values().map(Vec::len).sum()
    }
}
