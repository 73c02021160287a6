//! # Muleflow
//!
//! Money-muling detection engine for batch transaction analysis.
//!
//! Muleflow lifts a validated transaction batch into a directed multigraph
//! and mines four structural patterns:
//!
//! - **Cycles**: money routed back to its origin through 3-5 accounts
//! - **Smurfing**: fan-in/fan-out bursts across many counterparties
//! - **Shell chains**: forwarding paths through low-activity accounts
//! - **High velocity**: senders firing many transfers in a day
//!
//! Each account receives a bounded suspicion score in [0, 100], payroll-shaped
//! fan-out is exempted, and flagged accounts are grouped into fraud rings with
//! deterministic `RING_ddd` identifiers.
//!
//! ## Quick Start
//!
//! ```rust
//! use muleflow::prelude::*;
//!
//! let transactions = vec![
//!     Transaction::new("T1", "A", "B", 1500.0, 3_600_000),
//!     Transaction::new("T2", "B", "C", 1400.0, 7_200_000),
//!     Transaction::new("T3", "C", "A", 1350.0, 10_800_000),
//! ];
//!
//! let engine = AnalysisEngine::with_defaults();
//! let outcome = engine.analyze(&transactions).expect("analysis succeeds");
//!
//! assert_eq!(outcome.report.fraud_rings[0].ring_id, "RING_001");
//! ```
//!
//! ## Pipeline
//!
//! `analyze` runs a fixed synchronous pipeline: graph build, the four
//! detectors, scoring, the payroll filter, ring assembly, an invariant
//! self-check, and report emission. Detector outputs and every ordering the
//! report depends on are deterministic, so repeated runs over the same batch
//! differ only in `processing_time_seconds`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;

// Re-export the component crates under stable names.
pub use muleflow_core as core;
pub use muleflow_detect as detect;
pub use muleflow_graph as graph;
pub use muleflow_report as report;
pub use muleflow_score as score;

pub use engine::{AnalysisEngine, AnalysisOutcome};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use muleflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{AnalysisEngine, AnalysisOutcome};
    pub use muleflow_core::config::DetectionConfig;
    pub use muleflow_core::error::{EngineError, Result};
    pub use muleflow_graph::{AccountNode, PatternTag, Transaction, TransactionGraph};
    pub use muleflow_report::{AnalysisReport, ReportSummary, SuspiciousAccount};
    pub use muleflow_score::{FraudRing, RingPattern};
}

/// Version information.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
