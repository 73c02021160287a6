//! Short directed cycle enumeration.
//!
//! Money routed back to its origin through a short chain of accounts is the
//! strongest single muling indicator this engine knows. The detector
//! enumerates all simple directed cycles of length 3-5 and keeps one
//! representative per member set.

use crate::types::{Cycle, CycleFindings};
use muleflow_core::config::DetectionConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_graph::TransactionGraph;
use std::collections::{HashMap, HashSet};

/// Simple directed cycle detector.
///
/// From each seed node, a depth-limited DFS walks forward adjacency carrying
/// the current path and a visited set; a cycle is emitted when a neighbor
/// equals the seed and the path length is within the reported range.
/// Deduplication key is the sorted set of member indices, so the two
/// directions of the same member set collapse to the first one found.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    metadata: DetectorMetadata,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetector {
    /// Create a new cycle detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::structural("detect/cycles")
                .with_description("Simple directed cycle enumeration (length 3-5)"),
        }
    }

    /// Enumerate canonical cycles in the graph.
    ///
    /// Seeds are visited in node-table order, so the retained representative
    /// per member set is deterministic.
    #[must_use]
    pub fn enumerate(graph: &TransactionGraph, config: &DetectionConfig) -> CycleFindings {
        let mut cycles = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();

        for seed in 0..graph.node_count() {
            let mut path = vec![seed];
            let mut visited: HashSet<usize> = HashSet::new();
            visited.insert(seed);
            Self::walk(
                graph,
                config,
                seed,
                &mut path,
                &mut visited,
                &mut seen,
                &mut cycles,
            );
        }

        let mut shortest_len: HashMap<usize, usize> = HashMap::new();
        for cycle in &cycles {
            for &member in &cycle.members {
                shortest_len
                    .entry(member)
                    .and_modify(|len| *len = (*len).min(cycle.len()))
                    .or_insert(cycle.len());
            }
        }

        tracing::debug!(
            cycles = cycles.len(),
            nodes = shortest_len.len(),
            "cycle enumeration complete"
        );

        CycleFindings {
            cycles,
            shortest_len,
        }
    }

    fn walk(
        graph: &TransactionGraph,
        config: &DetectionConfig,
        seed: usize,
        path: &mut Vec<usize>,
        visited: &mut HashSet<usize>,
        seen: &mut HashSet<Vec<usize>>,
        cycles: &mut Vec<Cycle>,
    ) {
        let current = *path.last().expect("path always holds the seed");

        for &next in graph.forward_neighbors(current) {
            if next == seed {
                // Closing edge back to the seed. The length guard rejects
                // self-loops and 2-cycles.
                if path.len() >= config.cycle_min_len && path.len() <= config.cycle_max_len {
                    let mut key = path.clone();
                    key.sort_unstable();
                    if seen.insert(key) {
                        cycles.push(Cycle {
                            members: path.clone(),
                        });
                    }
                }
            } else if !visited.contains(&next) && path.len() < config.cycle_max_len {
                visited.insert(next);
                path.push(next);
                Self::walk(graph, config, seed, path, visited, seen, cycles);
                path.pop();
                visited.remove(&next);
            }
        }
    }
}

impl Detector for CycleDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
