//! The exported gauge table.
//!
//! Names and label sets here are what dashboards query against; changing
//! either breaks consumers.

use std::fmt;

/// Namespace prefix of every exported series.
pub const METRIC_PREFIX: &str = "screeps_";

const SHARD: &[&str] = &["shard"];
const SHARD_TYPED: &[&str] = &["shard", "type"];
const ROOM: &[&str] = &["shard", "room"];
const ROOM_TYPED: &[&str] = &["shard", "room", "type"];
const MARKET_ORDER: &[&str] = &["shard", "room", "type", "order_type", "metric"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gauge {
    Resources,
    CpuShard,
    MarketOrders,
    Tick,
    Ms,
    LastResetTick,
    LastResetMs,
    Cpu,
    Gcl,
    Gpl,
    Rcl,
    Energy,
    Creeps,
    Structures,
    Storage,
    Terminal,
}

impl Gauge {
    pub const ALL: [Gauge; 16] = [
        Gauge::Resources,
        Gauge::CpuShard,
        Gauge::MarketOrders,
        Gauge::Tick,
        Gauge::Ms,
        Gauge::LastResetTick,
        Gauge::LastResetMs,
        Gauge::Cpu,
        Gauge::Gcl,
        Gauge::Gpl,
        Gauge::Rcl,
        Gauge::Energy,
        Gauge::Creeps,
        Gauge::Structures,
        Gauge::Storage,
        Gauge::Terminal,
    ];

    /// Name without the namespace prefix.
    pub fn short_name(self) -> &'static str {
        match self {
            Gauge::Resources => "resources",
            Gauge::CpuShard => "cpu_shard",
            Gauge::MarketOrders => "market_orders",
            Gauge::Tick => "tick",
            Gauge::Ms => "ms",
            Gauge::LastResetTick => "last_reset_tick",
            Gauge::LastResetMs => "last_reset_ms",
            Gauge::Cpu => "cpu",
            Gauge::Gcl => "gcl",
            Gauge::Gpl => "gpl",
            Gauge::Rcl => "rcl",
            Gauge::Energy => "energy",
            Gauge::Creeps => "creeps",
            Gauge::Structures => "structures",
            Gauge::Storage => "storage",
            Gauge::Terminal => "terminal",
        }
    }

    /// Fully qualified series name, e.g. `screeps_rcl`.
    pub fn name(self) -> String {
        format!("{METRIC_PREFIX}{}", self.short_name())
    }

    pub fn help(self) -> &'static str {
        match self {
            Gauge::Resources => "Account resources",
            Gauge::CpuShard => "CPU allocated per shard",
            Gauge::MarketOrders => "Market orders",
            Gauge::Tick => "Current tick",
            Gauge::Ms => "Current time",
            Gauge::LastResetTick => "Tick of the last global reset",
            Gauge::LastResetMs => "Time of the last global reset",
            Gauge::Cpu => "CPU statistics",
            Gauge::Gcl => "Global Control Level",
            Gauge::Gpl => "Global Power Level",
            Gauge::Rcl => "Room Control Level",
            Gauge::Energy => "Energy statistics",
            Gauge::Creeps => "Creep counts",
            Gauge::Structures => "Structure counts",
            Gauge::Storage => "Storage contents",
            Gauge::Terminal => "Terminal contents",
        }
    }

    /// Label names in exposition order.
    pub fn label_names(self) -> &'static [&'static str] {
        match self {
            Gauge::Resources | Gauge::Cpu | Gauge::Gcl | Gauge::Gpl => SHARD_TYPED,
            Gauge::CpuShard
            | Gauge::Tick
            | Gauge::Ms
            | Gauge::LastResetTick
            | Gauge::LastResetMs => SHARD,
            Gauge::MarketOrders => MARKET_ORDER,
            Gauge::Creeps => ROOM,
            Gauge::Rcl | Gauge::Energy | Gauge::Structures | Gauge::Storage | Gauge::Terminal => {
                ROOM_TYPED
            }
        }
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{METRIC_PREFIX}{}", self.short_name())
    }
}
