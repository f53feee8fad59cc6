//! screeps-decode — turns upstream API payloads into canonical state.
//!
//! The upstream API publishes per-shard stats in two shapes, selected by
//! deployment configuration ([`DecodeMode`]):
//!
//! ```text
//! Segment  {ok, data: "<json Stats>"}
//!            └── serde_json → Stats
//! History  {ok, data: "gz:<base64(gzip(json Memory))>"}
//!            └── strip "gz:" → base64 → gunzip → Memory.stats.history.last()
//! ```
//!
//! Both converge on the wire [`wire::Stats`] shape, which converts into
//! [`screeps_core::ShardState`]. Account summary and market order payloads
//! have their own decoders.

pub mod decoder;
pub mod error;
pub mod wire;

pub use decoder::{
    ShardDecoder, decode_account, decode_history_stats, decode_market_orders,
    decode_segment_stats, encode_history,
};
pub use error::{DecodeError, DecodeResult};
pub use screeps_core::DecodeMode;
