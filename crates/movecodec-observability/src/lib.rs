//! # movecodec-observability
//!
//! Structured logging for MoveCodec. The decode engine and fetch adapter
//! emit `tracing` events at `debug`/`trace` level under the targets
//! `movecodec_core` and `movecodec_rpc`; this crate installs a subscriber
//! that filters and formats them.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
