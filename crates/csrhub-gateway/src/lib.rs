//! csrhub gateway library entry.
//!
//! Wires config, the in-memory store, token identity, the policy engine, and
//! the REST routes into one axum application. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod identity;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
pub mod views;
