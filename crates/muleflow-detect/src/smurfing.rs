//! Fan-in/fan-out burst (smurfing) detection.
//!
//! Structuring rarely shows in a single transfer; it shows as a burst of
//! small transfers spread over many counterparties inside a short window.
//! The detector slides a window over each account's time-ordered edges and
//! counts distinct counterparties.

use crate::types::SmurfFindings;
use muleflow_core::config::DetectionConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_graph::TransactionGraph;
use std::collections::HashMap;

/// Which edge direction a burst scan walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Incoming,
    Outgoing,
}

/// Smurfing burst detector.
///
/// Fan-in: some 72-hour window holds at least `smurf_threshold` edges into
/// the account from at least `smurf_threshold` distinct senders. Fan-out is
/// symmetric over outgoing edges. Window width is inclusive on both ends.
#[derive(Debug, Clone)]
pub struct SmurfingDetector {
    metadata: DetectorMetadata,
}

impl Default for SmurfingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetector {
    /// Create a new smurfing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::temporal("detect/smurfing")
                .with_description("Fan-in/fan-out distinct-counterparty burst detection"),
        }
    }

    /// Scan every account in both directions.
    #[must_use]
    pub fn compute(graph: &TransactionGraph, config: &DetectionConfig) -> SmurfFindings {
        let mut findings = SmurfFindings::default();

        for idx in 0..graph.node_count() {
            if Self::has_burst(graph, config, idx, Direction::Incoming) {
                findings.fan_in.push(idx);
            }
            if Self::has_burst(graph, config, idx, Direction::Outgoing) {
                findings.fan_out.push(idx);
            }
        }

        tracing::debug!(
            fan_in = findings.fan_in.len(),
            fan_out = findings.fan_out.len(),
            "smurfing scan complete"
        );

        findings
    }

    /// Two-pointer window over one account's time-ordered edges, maintaining
    /// counterparty multiplicities incrementally. Returns on the first
    /// satisfying window.
    fn has_burst(
        graph: &TransactionGraph,
        config: &DetectionConfig,
        idx: usize,
        direction: Direction,
    ) -> bool {
        let edge_ids = match direction {
            Direction::Incoming => graph.incoming_edges(idx),
            Direction::Outgoing => graph.outgoing_edges(idx),
        };
        if edge_ids.len() < config.smurf_threshold {
            return false;
        }

        let counterparty = |edge_idx: usize| {
            let edge = graph.edge(edge_idx);
            match direction {
                Direction::Incoming => edge.source,
                Direction::Outgoing => edge.target,
            }
        };

        let window = config.smurf_window_ms();
        let mut counts: HashMap<usize, usize> = HashMap::new();
        let mut left = 0;

        for right in 0..edge_ids.len() {
            *counts.entry(counterparty(edge_ids[right])).or_insert(0) += 1;

            while graph.edge(edge_ids[right]).timestamp - graph.edge(edge_ids[left]).timestamp
                > window
            {
                let cp = counterparty(edge_ids[left]);
                match counts.get_mut(&cp) {
                    Some(count) if *count > 1 => *count -= 1,
                    _ => {
                        counts.remove(&cp);
                    }
                }
                left += 1;
            }

            if counts.len() >= config.smurf_threshold {
                return true;
            }
        }

        false
    }
}

impl Detector for SmurfingDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muleflow_graph::Transaction;

    const HOUR: i64 = 3_600_000;

    fn graph(txs: &[Transaction]) -> TransactionGraph {
        TransactionGraph::from_transactions(txs)
    }

    fn fan_in_batch(senders: usize, span_hours: i64) -> Vec<Transaction> {
        (0..senders)
            .map(|i| {
                Transaction::new(
                    format!("T{i}"),
                    format!("S{i}"),
                    "HUB",
                    50.0,
                    i as i64 * span_hours * HOUR / senders.max(1) as i64,
                )
            })
            .collect()
    }

    #[test]
    fn test_fan_in_at_threshold() {
        let g = graph(&fan_in_batch(10, 48));
        let findings = SmurfingDetector::compute(&g, &DetectionConfig::default());

        let hub = g.index_of("HUB").unwrap();
        assert_eq!(findings.fan_in, vec![hub]);
        assert!(findings.fan_out.is_empty());
    }

    #[test]
    fn test_nine_distinct_senders_not_flagged() {
        let g = graph(&fan_in_batch(9, 48));
        let findings = SmurfingDetector::compute(&g, &DetectionConfig::default());
        assert!(findings.fan_in.is_empty());
    }

    #[test]
    fn test_repeat_sender_not_distinct() {
        // 10 edges but only 9 distinct senders.
        let mut txs = fan_in_batch(9, 10);
        txs.push(Transaction::new("T9", "S0", "HUB", 50.0, 11 * HOUR));
        let g = graph(&txs);
        let findings = SmurfingDetector::compute(&g, &DetectionConfig::default());
        assert!(findings.fan_in.is_empty());
    }

    #[test]
    fn test_window_boundary_inclusive() {
        // 10 senders spread exactly across the 72 h width.
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                Transaction::new(
                    format!("T{i}"),
                    format!("S{i}"),
                    "HUB",
                    50.0,
                    i as i64 * 8 * HOUR, // last at exactly 72 h after first
                )
            })
            .collect();
        let g = graph(&txs);
        let findings = SmurfingDetector::compute(&g, &DetectionConfig::default());
        assert_eq!(findings.fan_in.len(), 1);
    }

    #[test]
    fn test_spread_outside_window_not_flagged() {
        // 10 senders but 8.01 h apart, so any 72 h window holds at most 9.
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                Transaction::new(
                    format!("T{i}"),
                    format!("S{i}"),
                    "HUB",
                    50.0,
                    i as i64 * (8 * HOUR + 36_000),
                )
            })
            .collect();
        let g = graph(&txs);
        let findings = SmurfingDetector::compute(&g, &DetectionConfig::default());
        assert!(findings.fan_in.is_empty());
    }

    #[test]
    fn test_fan_out_symmetric() {
        let txs: Vec<Transaction> = (0..12)
            .map(|i| {
                Transaction::new(
                    format!("T{i}"),
                    "SRC",
                    format!("R{i}"),
                    50.0,
                    i as i64 * HOUR,
                )
            })
            .collect();
        let g = graph(&txs);
        let findings = SmurfingDetector::compute(&g, &DetectionConfig::default());

        let src = g.index_of("SRC").unwrap();
        assert_eq!(findings.fan_out, vec![src]);
        assert!(findings.fan_in.is_empty());
    }

    #[test]
    fn test_metadata() {
        let detector = SmurfingDetector::new();
        assert_eq!(detector.id(), "detect/smurfing");
        assert!(detector.stage().is_temporal());
    }
}
