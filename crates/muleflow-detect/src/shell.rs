//! Shell-chain detection.
//!
//! Layering chains are thin and disposable: a few pass-through accounts,
//! each touched two or three times, strung between an origin and a
//! collection point. High-activity endpoints may terminate a chain
//! legitimately, so endpoints are flagged regardless of their own activity.

use muleflow_core::config::DetectionConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_graph::{AccountNode, TransactionGraph};
use std::collections::BTreeSet;

/// Shell forwarding-chain detector.
///
/// From each node, a depth-capped DFS descends forward adjacency through
/// shell intermediates only (`total_transactions` in `[2,
/// shell_max_intermediate_tx]`). Every simple path of at least
/// `shell_min_hops` edges flags all nodes on it, endpoints included.
#[derive(Debug, Clone)]
pub struct ShellChainDetector {
    metadata: DetectorMetadata,
}

impl Default for ShellChainDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellChainDetector {
    /// Create a new shell-chain detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::structural("detect/shell-chains")
                .with_description("Forwarding chains through low-activity intermediates"),
        }
    }

    /// Scan the graph. Returns flagged node indices, ascending and
    /// deduplicated: overlapping chains collapse here, before scoring.
    #[must_use]
    pub fn compute(graph: &TransactionGraph, config: &DetectionConfig) -> Vec<usize> {
        let mut flagged: BTreeSet<usize> = BTreeSet::new();

        for seed in 0..graph.node_count() {
            let mut path = vec![seed];
            Self::walk(graph, config, &mut path, &mut flagged);
        }

        tracing::debug!(flagged = flagged.len(), "shell-chain scan complete");

        flagged.into_iter().collect()
    }

    /// A node qualifies as a pass-through hop.
    fn is_shell_intermediate(node: &AccountNode, config: &DetectionConfig) -> bool {
        node.total_transactions >= 2 && node.total_transactions <= config.shell_max_intermediate_tx
    }

    fn walk(
        graph: &TransactionGraph,
        config: &DetectionConfig,
        path: &mut Vec<usize>,
        flagged: &mut BTreeSet<usize>,
    ) {
        let current = *path.last().expect("path always holds the seed");

        for &next in graph.forward_neighbors(current) {
            if path.contains(&next) {
                continue;
            }

            let hops = path.len();
            if hops >= config.shell_min_hops {
                flagged.extend(path.iter().copied());
                flagged.insert(next);
            }

            // Only shell intermediates carry the chain further.
            if hops < config.shell_depth_cap
                && Self::is_shell_intermediate(graph.node(next), config)
            {
                path.push(next);
                Self::walk(graph, config, path, flagged);
                path.pop();
            }
        }
    }
}

impl Detector for ShellChainDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
