//! csrhub core: data model, caller identity, and the visibility policy engine.
//!
//! This crate decides which rows a caller may read and which mutations a
//! caller may apply. It carries no transport, storage, or runtime
//! dependencies: the gateway supplies collections and callers, and acts on the
//! decisions returned here.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `CsrError`/`Result`, and policy evaluation itself is total: a
//! denial is a `false`, never an error.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod policy;

/// Shared result type.
pub use error::{CsrError, Result};
