//! Lightweight in-process metrics (dependency-free).
//!
//! Counters are stored as atomics keyed by label sets and rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod metrics;
pub mod middleware;

pub use metrics::{CounterVec, GatewayMetrics};
