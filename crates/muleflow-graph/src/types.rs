//! Graph types and data structures.

use muleflow_core::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Transaction Types
// ============================================================================

/// A validated financial transaction.
///
/// Timestamps are epoch milliseconds, UTC. The boundary layer resolves the
/// wire format (`YYYY-MM-DD HH:MM:SS`) before the engine sees the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID within the batch.
    pub transaction_id: String,
    /// Sending account ID.
    pub sender_id: String,
    /// Receiving account ID. May equal `sender_id` (self-loop).
    pub receiver_id: String,
    /// Transaction amount. Strictly positive.
    pub amount: f64,
    /// Timestamp in epoch milliseconds (UTC).
    pub timestamp: i64,
}

impl Transaction {
    /// Create a new transaction record.
    pub fn new(
        transaction_id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: f64,
        timestamp: i64,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp,
        }
    }

    /// Check the input contract. The boundary layer validates rows before the
    /// engine runs; this guard catches programmer errors behind it.
    pub fn validate(&self) -> Result<()> {
        if self.transaction_id.is_empty() {
            return Err(EngineError::invalid_transaction(
                "<unknown>",
                "empty transaction_id",
            ));
        }
        if self.sender_id.is_empty() || self.receiver_id.is_empty() {
            return Err(EngineError::invalid_transaction(
                &self.transaction_id,
                "empty account id",
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(EngineError::invalid_transaction(
                &self.transaction_id,
                format!("amount must be strictly positive, got {}", self.amount),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Pattern Tags
// ============================================================================

/// Detection pattern tags, in canonical order.
///
/// The derived `Ord` follows declaration order, which is the canonical
/// ordering used for tag lists everywhere in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternTag {
    /// Member of a directed cycle of length 3.
    #[serde(rename = "cycle_length_3")]
    CycleLength3,
    /// Member of a directed cycle of length 4.
    #[serde(rename = "cycle_length_4")]
    CycleLength4,
    /// Member of a directed cycle of length 5.
    #[serde(rename = "cycle_length_5")]
    CycleLength5,
    /// Fan-in smurfing burst receiver.
    #[serde(rename = "fan_in")]
    FanIn,
    /// Fan-out smurfing burst sender.
    #[serde(rename = "fan_out")]
    FanOut,
    /// Node on a shell forwarding chain.
    #[serde(rename = "shell_chain")]
    ShellChain,
    /// High-velocity sender.
    #[serde(rename = "high_velocity")]
    HighVelocity,
}

impl PatternTag {
    /// All tags in canonical order.
    pub const ALL: &'static [PatternTag] = &[
        PatternTag::CycleLength3,
        PatternTag::CycleLength4,
        PatternTag::CycleLength5,
        PatternTag::FanIn,
        PatternTag::FanOut,
        PatternTag::ShellChain,
        PatternTag::HighVelocity,
    ];

    /// The cycle tag for a given cycle length.
    ///
    /// Returns `None` for lengths outside the reported range [3, 5].
    #[must_use]
    pub fn for_cycle_length(len: usize) -> Option<Self> {
        match len {
            3 => Some(PatternTag::CycleLength3),
            4 => Some(PatternTag::CycleLength4),
            5 => Some(PatternTag::CycleLength5),
            _ => None,
        }
    }

    /// Returns true for any of the three cycle tags.
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(
            self,
            PatternTag::CycleLength3 | PatternTag::CycleLength4 | PatternTag::CycleLength5
        )
    }

    /// Returns the tag name as emitted in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PatternTag::CycleLength3 => "cycle_length_3",
            PatternTag::CycleLength4 => "cycle_length_4",
            PatternTag::CycleLength5 => "cycle_length_5",
            PatternTag::FanIn => "fan_in",
            PatternTag::FanOut => "fan_out",
            PatternTag::ShellChain => "shell_chain",
            PatternTag::HighVelocity => "high_velocity",
        }
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Node and Edge Records
// ============================================================================

/// Per-account analysis record, owned by the node table.
///
/// Created by the graph builder; the analysis fields are mutated by the
/// scorer, the false-positive filter, and the ring assembler, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNode {
    /// Account ID.
    pub id: String,
    /// Transactions this account took part in, counted per endpoint role.
    /// A self-loop counts twice.
    pub total_transactions: u64,
    /// Sum of outbound amounts.
    pub total_sent: f64,
    /// Sum of inbound amounts.
    pub total_received: f64,
    /// Distinct accounts that sent to this one.
    pub unique_senders: BTreeSet<String>,
    /// Distinct accounts this one sent to.
    pub unique_receivers: BTreeSet<String>,
    /// True iff `suspicion_score > 0`.
    pub is_suspicious: bool,
    /// Bounded suspicion score in [0, 100].
    pub suspicion_score: f64,
    /// Detected pattern tags in canonical order.
    pub detected_patterns: Vec<PatternTag>,
    /// Assigned fraud ring, if any.
    pub ring_id: Option<String>,
}

impl AccountNode {
    /// Create an empty node for an account.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            total_transactions: 0,
            total_sent: 0.0,
            total_received: 0.0,
            unique_senders: BTreeSet::new(),
            unique_receivers: BTreeSet::new(),
            is_suspicious: false,
            suspicion_score: 0.0,
            detected_patterns: Vec::new(),
            ring_id: None,
        }
    }

    /// Returns true if the node carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: PatternTag) -> bool {
        self.detected_patterns.contains(&tag)
    }

    /// Returns true if the node carries any cycle tag.
    #[must_use]
    pub fn has_cycle_tag(&self) -> bool {
        self.detected_patterns.iter().any(PatternTag::is_cycle)
    }
}

/// A directed edge in the transaction multigraph.
///
/// Parallel edges are allowed; one transaction produces exactly one edge.
/// Endpoints are indices into the graph's node table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Node-table index of the sender.
    pub source: usize,
    /// Node-table index of the receiver.
    pub target: usize,
    /// Transaction amount.
    pub amount: f64,
    /// Timestamp in epoch milliseconds (UTC).
    pub timestamp: i64,
    /// Originating transaction ID.
    pub transaction_id: String,
}
