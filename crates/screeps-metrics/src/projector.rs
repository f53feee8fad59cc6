//! Projects canonical game state onto the gauge table.
//!
//! Projection is pure: it produces the full list of resets and writes for
//! one cycle, and [`crate::MetricStore::publish`] applies it. Every gauge
//! family is reset before it is repopulated, so shards and rooms that are
//! missing from the current state drop out of the exposition.

use screeps_core::{GameState, MarketOrder, Progress, RoomState, ShardState};

use crate::gauge::Gauge;
use crate::labels::LabelSet;

/// Value of the `metric` label on market order series.
pub const ORDER_METRICS: [&str; 4] = ["price", "amount", "remainingAmount", "totalAmount"];

/// One series upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricWrite {
    pub gauge: Gauge,
    pub labels: LabelSet,
    pub value: f64,
}

/// Store mutations for one collection cycle, applied resets first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub resets: Vec<Gauge>,
    pub writes: Vec<MetricWrite>,
}

impl Projection {
    fn push(&mut self, gauge: Gauge, labels: LabelSet, value: f64) {
        self.writes.push(MetricWrite {
            gauge,
            labels,
            value,
        });
    }

    /// Writes targeting one gauge family.
    pub fn writes_for(&self, gauge: Gauge) -> impl Iterator<Item = &MetricWrite> {
        self.writes.iter().filter(move |w| w.gauge == gauge)
    }
}

/// Project a game state into store mutations.
///
/// Shards and rooms are visited in name order, so the output is
/// reproducible for a given state.
pub fn project(state: &GameState) -> Projection {
    let mut out = Projection {
        resets: Gauge::ALL.to_vec(),
        writes: Vec::new(),
    };

    let account = &state.account;
    out.push(Gauge::Resources, LabelSet::intershard("money"), account.money);
    for (kind, amount) in &account.resources {
        out.push(Gauge::Resources, LabelSet::intershard(kind), *amount);
    }
    for (shard, cpu) in &account.cpu_shard {
        out.push(Gauge::CpuShard, LabelSet::shard(shard), *cpu);
    }

    for (shard, orders) in &state.market_orders {
        for order in orders {
            project_order(&mut out, shard, order);
        }
    }

    for (name, shard) in &state.shards {
        project_shard(&mut out, name, shard);
    }

    out
}

fn project_order(out: &mut Projection, shard: &str, order: &MarketOrder) {
    let values = [
        order.price,
        order.amount,
        order.remaining_amount,
        order.total_amount,
    ];
    for (metric, value) in ORDER_METRICS.iter().zip(values) {
        out.push(
            Gauge::MarketOrders,
            LabelSet::market_order(
                shard,
                &order.room_name,
                &order.resource_type,
                &order.order_type,
                metric,
            ),
            value,
        );
    }
}

fn project_progress(
    out: &mut Projection,
    gauge: Gauge,
    progress: &Progress,
    labels: impl Fn(&str) -> LabelSet,
) {
    out.push(gauge, labels("level"), progress.level);
    out.push(gauge, labels("progress"), progress.progress);
    out.push(gauge, labels("progressTotal"), progress.progress_total);
}

fn project_shard(out: &mut Projection, name: &str, shard: &ShardState) {
    out.push(Gauge::Tick, LabelSet::shard(name), shard.tick);
    out.push(Gauge::Ms, LabelSet::shard(name), shard.ms);
    if let Some(tick) = shard.last_reset_tick {
        out.push(Gauge::LastResetTick, LabelSet::shard(name), tick);
    }
    if let Some(ms) = shard.last_reset_ms {
        out.push(Gauge::LastResetMs, LabelSet::shard(name), ms);
    }

    out.push(Gauge::Cpu, LabelSet::shard_typed(name, "used"), shard.cpu.used);
    out.push(Gauge::Cpu, LabelSet::shard_typed(name, "limit"), shard.cpu.limit);
    out.push(Gauge::Cpu, LabelSet::shard_typed(name, "bucket"), shard.cpu.bucket);

    project_progress(out, Gauge::Gcl, &shard.gcl, |kind| LabelSet::shard_typed(name, kind));
    project_progress(out, Gauge::Gpl, &shard.gpl, |kind| LabelSet::shard_typed(name, kind));

    for (room_name, room) in &shard.rooms {
        project_room(out, name, room_name, room);
    }
}

fn project_room(out: &mut Projection, shard: &str, name: &str, room: &RoomState) {
    let typed = |kind: &str| LabelSet::room_typed(shard, name, kind);

    project_progress(out, Gauge::Rcl, &room.rcl, typed);

    out.push(Gauge::Energy, typed("available"), room.energy_available);
    out.push(
        Gauge::Energy,
        typed("capacityAvailable"),
        room.energy_capacity_available,
    );

    out.push(Gauge::Creeps, LabelSet::room(shard, name), room.creeps);

    for (structure, count) in &room.structures {
        out.push(Gauge::Structures, typed(structure), *count);
    }
    for (resource, amount) in &room.storage {
        out.push(Gauge::Storage, typed(resource), *amount);
    }
    if let Some(terminal) = &room.terminal {
        for (resource, amount) in terminal {
            out.push(Gauge::Terminal, typed(resource), *amount);
        }
    }
}
