//! High-velocity sender detection.

use muleflow_core::config::DetectionConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_graph::TransactionGraph;

/// High-velocity sender detector.
///
/// Flags senders issuing at least `velocity_threshold` outbound transactions
/// inside some 24-hour window, counterparties ignored.
#[derive(Debug, Clone)]
pub struct VelocityDetector {
    metadata: DetectorMetadata,
}

impl Default for VelocityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityDetector {
    /// Create a new velocity detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::temporal("detect/velocity")
                .with_description("High-frequency outbound sender detection"),
        }
    }

    /// Scan every sender. Returns flagged node indices in ascending order.
    #[must_use]
    pub fn compute(graph: &TransactionGraph, config: &DetectionConfig) -> Vec<usize> {
        let flagged: Vec<usize> = (0..graph.node_count())
            .filter(|&idx| Self::has_burst(graph, config, idx))
            .collect();

        tracing::debug!(flagged = flagged.len(), "velocity scan complete");

        flagged
    }

    fn has_burst(graph: &TransactionGraph, config: &DetectionConfig, idx: usize) -> bool {
        let edge_ids = graph.outgoing_edges(idx);
        if edge_ids.len() < config.velocity_threshold {
            return false;
        }

        let window = config.velocity_window_ms();
        let mut left = 0;

        for right in 0..edge_ids.len() {
            while graph.edge(edge_ids[right]).timestamp - graph.edge(edge_ids[left]).timestamp
                > window
            {
                left += 1;
            }
            if right - left + 1 >= config.velocity_threshold {
                return true;
            }
        }

        false
    }
}

impl Detector for VelocityDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
