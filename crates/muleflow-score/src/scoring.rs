//! Suspicion scoring.

use muleflow_core::config::DetectionConfig;
use muleflow_detect::DetectorFindings;
use muleflow_graph::{PatternTag, TransactionGraph};
use std::collections::HashSet;

/// Folds detector findings into per-account pattern tags and bounded scores.
///
/// Contributions are additive and applied once each, in canonical tag order,
/// so tag lists come out ordered without a separate sort. The final score is
/// capped at 100; `is_suspicious` tracks `score > 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer;

impl Scorer {
    /// Apply detector findings to the node table.
    pub fn apply(graph: &mut TransactionGraph, findings: &DetectorFindings, config: &DetectionConfig) {
        let fan_in: HashSet<usize> = findings.smurf.fan_in.iter().copied().collect();
        let fan_out: HashSet<usize> = findings.smurf.fan_out.iter().copied().collect();
        let shell: HashSet<usize> = findings.shell.iter().copied().collect();
        let velocity: HashSet<usize> = findings.velocity.iter().copied().collect();

        let mut suspicious = 0usize;

        for idx in 0..graph.node_count() {
            let mut score = 0.0;
            let mut tags = Vec::new();

            if let Some(&len) = findings.cycles.shortest_len.get(&idx) {
                // Lengths outside [3, 5] cannot come out of the detector.
                let tag = PatternTag::for_cycle_length(len)
                    .expect("cycle detector emits lengths 3-5 only");
                score += config.cycle_weight;
                tags.push(tag);
            }
            if fan_in.contains(&idx) {
                score += config.fan_in_weight;
                tags.push(PatternTag::FanIn);
            }
            if fan_out.contains(&idx) {
                score += config.fan_out_weight;
                tags.push(PatternTag::FanOut);
            }
            if shell.contains(&idx) {
                score += config.shell_weight;
                tags.push(PatternTag::ShellChain);
            }
            if velocity.contains(&idx) {
                score += config.velocity_weight;
                tags.push(PatternTag::HighVelocity);
            }

            let node = graph.node_mut(idx);
            node.suspicion_score = score.min(100.0);
            node.is_suspicious = node.suspicion_score > 0.0;
            node.detected_patterns = tags;
            if node.is_suspicious {
                suspicious += 1;
            }
        }

        tracing::info!(
            accounts = graph.node_count(),
            suspicious,
            "scoring pass complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muleflow_detect::{CycleDetector, ShellChainDetector, SmurfingDetector, VelocityDetector};
    use muleflow_graph::Transaction;

    const HOUR: i64 = 3_600_000;

    fn run_all(txs: &[Transaction]) -> (TransactionGraph, DetectorFindings) {
        let config = DetectionConfig::default();
        let mut graph = TransactionGraph::from_transactions(txs);
        let findings = DetectorFindings {
            cycles: CycleDetector::enumerate(&graph, &config),
            smurf: SmurfingDetector::compute(&graph, &config),
            shell: ShellChainDetector::compute(&graph, &config),
            velocity: VelocityDetector::compute(&graph, &config),
        };
        Scorer::apply(&mut graph, &findings, &config);
        (graph, findings)
    }

    #[test]
    fn test_triangle_scores_forty() {
        let (graph, _) = run_all(&[
            Transaction::new("T1", "A", "B", 1500.0, HOUR),
            Transaction::new("T2", "B", "C", 1400.0, 2 * HOUR),
            Transaction::new("T3", "C", "A", 1350.0, 3 * HOUR),
        ]);

        for id in ["A", "B", "C"] {
            let node = graph.node_by_id(id).unwrap();
            assert!(node.is_suspicious);
            assert_eq!(node.suspicion_score, 40.0);
            assert_eq!(node.detected_patterns, vec![PatternTag::CycleLength3]);
        }
    }

    #[test]
    fn test_unflagged_nodes_stay_clean() {
        let (graph, _) = run_all(&[Transaction::new("T1", "A", "B", 100.0, HOUR)]);

        for id in ["A", "B"] {
            let node = graph.node_by_id(id).unwrap();
            assert!(!node.is_suspicious);
            assert_eq!(node.suspicion_score, 0.0);
            assert!(node.detected_patterns.is_empty());
        }
    }

    #[test]
    fn test_combined_tags_in_canonical_order() {
        // H fans out to 25 receivers inside 12 h: fan_out + high_velocity.
        let txs: Vec<Transaction> = (0..25)
            .map(|i| {
                Transaction::new(
                    format!("T{i}"),
                    "H",
                    format!("R{i}"),
                    200.0,
                    i as i64 * 28 * 60_000,
                )
            })
            .collect();
        let (graph, _) = run_all(&txs);

        let node = graph.node_by_id("H").unwrap();
        assert_eq!(
            node.detected_patterns,
            vec![PatternTag::FanOut, PatternTag::HighVelocity]
        );
        assert_eq!(node.suspicion_score, 35.0);
    }

    #[test]
    fn test_score_capped_at_hundred() {
        let mut config = DetectionConfig::default();
        config.cycle_weight = 90.0;
        config.fan_out_weight = 90.0;

        let mut graph = TransactionGraph::from_transactions(&[
            Transaction::new("T1", "A", "B", 100.0, HOUR),
            Transaction::new("T2", "B", "C", 100.0, 2 * HOUR),
            Transaction::new("T3", "C", "A", 100.0, 3 * HOUR),
        ]);
        let findings = DetectorFindings {
            cycles: CycleDetector::enumerate(&graph, &config),
            smurf: muleflow_detect::SmurfFindings {
                fan_in: vec![],
                fan_out: vec![graph.index_of("A").unwrap()],
            },
            shell: vec![],
            velocity: vec![],
        };
        Scorer::apply(&mut graph, &findings, &config);

        let node = graph.node_by_id("A").unwrap();
        assert_eq!(node.suspicion_score, 100.0);
    }
}
