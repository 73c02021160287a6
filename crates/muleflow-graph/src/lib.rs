//! # Muleflow Graph
//!
//! Transaction multigraph model for the muleflow detection engine.
//!
//! This crate provides:
//! - `Transaction` - the validated input record
//! - `AccountNode` - the mutable per-account analysis record
//! - `PatternTag` - the closed enumeration of detection patterns
//! - `TransactionGraph` - the directed multigraph with adjacency indices

#![warn(missing_docs)]

pub mod build;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::build::TransactionGraph;
    pub use crate::types::{AccountNode, EdgeRecord, PatternTag, Transaction};
}

pub use build::TransactionGraph;
pub use types::{AccountNode, EdgeRecord, PatternTag, Transaction};
