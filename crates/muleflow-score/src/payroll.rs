//! Payroll false-positive filter.
//!
//! Salary and subscription runs look exactly like fan-out smurfing to the
//! window detector: one sender, many counterparties, short span. What
//! separates them is amount dispersion. Repeated near-identical amounts are
//! payouts, not structuring. Cycle participation overrides the exemption.

use muleflow_core::config::DetectionConfig;
use muleflow_graph::{PatternTag, TransactionGraph};

/// Lifts fan-out flags off payroll-shaped senders.
///
/// A sender qualifies when its outbound amounts number at least
/// `payroll_min_count` and their coefficient of variation (population
/// standard deviation over mean) is strictly below `payroll_cv_cap`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayrollFilter;

impl PayrollFilter {
    /// Apply the filter to every flagged sender. Runs after the scorer and
    /// before ring assembly.
    pub fn apply(graph: &mut TransactionGraph, config: &DetectionConfig) {
        let mut exempted = 0usize;

        for idx in 0..graph.node_count() {
            if !graph.node(idx).is_suspicious || graph.node(idx).has_cycle_tag() {
                continue;
            }
            if !Self::is_payroll_sender(graph, config, idx) {
                continue;
            }

            let node = graph.node_mut(idx);
            if let Some(pos) = node
                .detected_patterns
                .iter()
                .position(|&tag| tag == PatternTag::FanOut)
            {
                node.detected_patterns.remove(pos);
                node.suspicion_score = (node.suspicion_score - config.fan_out_weight).max(0.0);
                if node.detected_patterns.is_empty() {
                    node.is_suspicious = false;
                    node.suspicion_score = 0.0;
                }
                exempted += 1;
            }
        }

        if exempted > 0 {
            tracing::info!(exempted, "payroll exemptions applied");
        }
    }

    /// The payroll predicate over a sender's outbound amounts.
    fn is_payroll_sender(graph: &TransactionGraph, config: &DetectionConfig, idx: usize) -> bool {
        let edge_ids = graph.outgoing_edges(idx);
        if edge_ids.len() < config.payroll_min_count {
            return false;
        }

        let amounts: Vec<f64> = edge_ids.iter().map(|&e| graph.edge(e).amount).collect();
        let n = amounts.len() as f64;
        let mean = amounts.iter().sum::<f64>() / n;
        if mean <= 0.0 {
            return false;
        }

        let variance = amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
        let cv = variance.sqrt() / mean;

        cv < config.payroll_cv_cap
    }
}
