//! # Muleflow Score
//!
//! Scoring and grouping passes for the muleflow detection engine.
//!
//! The three passes here are the only mutators of the node table, and they
//! run in a fixed order:
//!
//! 1. `Scorer` - folds detector findings into per-account tags and scores
//! 2. `PayrollFilter` - lifts fan-out flags off payroll-shaped senders
//! 3. `RingAssembler` - groups flagged accounts into disjoint fraud rings

#![warn(missing_docs)]

pub mod payroll;
pub mod rings;
pub mod scoring;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::payroll::PayrollFilter;
    pub use crate::rings::{FraudRing, RingAssembler, RingPattern};
    pub use crate::scoring::Scorer;
}

pub use payroll::PayrollFilter;
pub use rings::{FraudRing, RingAssembler, RingPattern};
pub use scoring::Scorer;
