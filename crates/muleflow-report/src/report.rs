//! Report projection.

use muleflow_graph::{PatternTag, TransactionGraph};
use muleflow_score::FraudRing;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One flagged account in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account ID.
    pub account_id: String,
    /// Suspicion score rounded to one decimal.
    pub suspicion_score: f64,
    /// Pattern tags in canonical order.
    pub detected_patterns: Vec<PatternTag>,
    /// Assigned ring, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_id: Option<String>,
}

/// Batch-level totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Accounts seen in the batch.
    pub total_accounts_analyzed: usize,
    /// Accounts with a positive suspicion score.
    pub suspicious_accounts_flagged: usize,
    /// Assembled fraud rings.
    pub fraud_rings_detected: usize,
    /// Wall-clock analysis time, rounded to two decimals.
    pub processing_time_seconds: f64,
}

/// The external analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Flagged accounts, descending by score, ties in node-table order.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings in assignment order.
    pub fraud_rings: Vec<FraudRing>,
    /// Batch totals.
    pub summary: ReportSummary,
}

impl AnalysisReport {
    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> muleflow_core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Projects internal state into the external report structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEmitter;

impl ReportEmitter {
    /// Emit the report from an analyzed graph.
    ///
    /// Sorting is stable, so accounts with equal scores keep node-table
    /// (insertion) order and repeated runs serialize identically.
    #[must_use]
    pub fn emit(graph: &TransactionGraph, rings: &[FraudRing], elapsed: Duration) -> AnalysisReport {
        let mut suspicious_accounts: Vec<SuspiciousAccount> = graph
            .nodes
            .iter()
            .filter(|node| node.is_suspicious)
            .map(|node| SuspiciousAccount {
                account_id: node.id.clone(),
                suspicion_score: round1(node.suspicion_score),
                detected_patterns: node.detected_patterns.clone(),
                ring_id: node.ring_id.clone(),
            })
            .collect();

        suspicious_accounts.sort_by(|a, b| {
            b.suspicion_score
                .partial_cmp(&a.suspicion_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let summary = ReportSummary {
            total_accounts_analyzed: graph.node_count(),
            suspicious_accounts_flagged: suspicious_accounts.len(),
            fraud_rings_detected: rings.len(),
            processing_time_seconds: round2(elapsed.as_secs_f64()),
        };

        AnalysisReport {
            suspicious_accounts,
            fraud_rings: rings.to_vec(),
            summary,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
