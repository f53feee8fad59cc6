//! Decoding strategies.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

use screeps_core::{AccountSummary, DecodeMode, MarketOrder, ShardName, ShardState};

use crate::error::{DecodeError, DecodeResult};
use crate::wire::{AccountResponse, Envelope, MarketOrdersResponse, Memory, Stats};

/// Marker prefixed to compressed memory payloads.
pub const GZIP_PREFIX: &str = "gz:";

/// Decodes one shard stats response into canonical state.
pub trait ShardDecoder {
    fn decode_shard(&self, payload: &[u8]) -> DecodeResult<ShardState>;
}

impl ShardDecoder for DecodeMode {
    fn decode_shard(&self, payload: &[u8]) -> DecodeResult<ShardState> {
        let stats = match self {
            DecodeMode::Segment => decode_segment_stats(payload)?,
            DecodeMode::History => decode_history_stats(payload)?,
        };
        Ok(stats.into())
    }
}

fn check_ok(ok: i64, error: Option<String>) -> DecodeResult<()> {
    if ok == 1 {
        Ok(())
    } else {
        Err(DecodeError::Rejected(
            error.unwrap_or_else(|| format!("ok={ok}")),
        ))
    }
}

fn envelope_data(payload: &[u8]) -> DecodeResult<String> {
    let envelope: Envelope = serde_json::from_slice(payload)?;
    check_ok(envelope.ok, envelope.error)?;
    envelope.data.ok_or(DecodeError::MissingData)
}

/// Decode a memory segment response: `data` holds the stats as a JSON string.
pub fn decode_segment_stats(payload: &[u8]) -> DecodeResult<Stats> {
    let data = envelope_data(payload)?;
    if data.trim().is_empty() {
        return Err(DecodeError::MissingData);
    }
    Ok(serde_json::from_str(&data)?)
}

/// Decode a compressed memory response and return the newest stats entry.
pub fn decode_history_stats(payload: &[u8]) -> DecodeResult<Stats> {
    let data = envelope_data(payload)?;
    let data = data.strip_prefix(GZIP_PREFIX).unwrap_or(&data);

    let compressed = STANDARD.decode(data.trim())?;
    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(DecodeError::Gzip)?;

    let memory: Memory = serde_json::from_slice(&json)?;
    let mut history = memory.into_history();
    debug!(
        entries = history.len(),
        compressed_bytes = compressed.len(),
        "decoded stats history"
    );
    // Older entries are past ticks; only the newest is published.
    history.pop().ok_or(DecodeError::EmptyHistory)
}

/// Build a history-variant response body for the given stats entries.
///
/// This is the inverse of [`decode_history_stats`] and is used to produce
/// fixtures for the fake upstream.
pub fn encode_history(history: &[Stats], with_prefix: bool) -> DecodeResult<Vec<u8>> {
    let memory = serde_json::json!({ "stats": { "history": history } });
    let json = serde_json::to_vec(&memory)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(DecodeError::Gzip)?;
    let compressed = encoder.finish().map_err(DecodeError::Gzip)?;

    let mut data = STANDARD.encode(compressed);
    if with_prefix {
        data.insert_str(0, GZIP_PREFIX);
    }
    let envelope = Envelope {
        ok: 1,
        data: Some(data),
        error: None,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode the `/api/auth/me` account summary.
pub fn decode_account(payload: &[u8]) -> DecodeResult<AccountSummary> {
    let resp: AccountResponse = serde_json::from_slice(payload)?;
    check_ok(resp.ok, resp.error.clone())?;
    Ok(resp.into())
}

/// Decode the market orders response into per-shard order lists.
pub fn decode_market_orders(payload: &[u8]) -> DecodeResult<BTreeMap<ShardName, Vec<MarketOrder>>> {
    let resp: MarketOrdersResponse = serde_json::from_slice(payload)?;
    check_ok(resp.ok, resp.error)?;
    Ok(resp
        .shards
        .into_iter()
        .map(|(shard, orders)| (shard, orders.into_iter().map(MarketOrder::from).collect()))
        .collect())
}
