//! Top-level facade crate for csrhub.
//!
//! Re-exports the core model/policy types and the gateway library so users can
//! depend on a single crate.

pub mod core {
    pub use csrhub_core::*;
}

pub mod gateway {
    pub use csrhub_gateway::*;
}
