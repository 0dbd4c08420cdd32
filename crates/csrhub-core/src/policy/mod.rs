//! Visibility policy engine.
//!
//! A declarative rule table keyed by entity kind (reads) and by
//! (entity kind, operation) (mutations), plus two evaluators that consult only
//! that table. Evaluation is pure: no I/O, no interior mutability, no errors.

pub mod engine;
pub mod owner;
pub mod rules;

pub use engine::PolicyEngine;
pub use owner::assign_owner;
pub use rules::{PolicyTable, ReadRule, Rule};
