//! The analysis pipeline.

use muleflow_core::config::DetectionConfig;
use muleflow_core::error::{EngineError, Result};
use muleflow_detect::{
    CycleDetector, DetectorFindings, ShellChainDetector, SmurfingDetector, VelocityDetector,
};
use muleflow_graph::{Transaction, TransactionGraph};
use muleflow_report::{AnalysisReport, ReportEmitter};
use muleflow_score::{FraudRing, PayrollFilter, RingAssembler, Scorer};
use std::collections::HashSet;
use std::time::Instant;

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The external report.
    pub report: AnalysisReport,
    /// The analyzed graph, handed to the visualization layer. Never persisted.
    pub graph: TransactionGraph,
}

/// The batch analysis engine.
///
/// A pure batch function over its input: transactions in, report and graph
/// out.
/// Each invocation owns its graph and ring counter, so runs are isolated and
/// repeated runs over the same batch are byte-identical except for the
/// reported processing time.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    config: DetectionConfig,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AnalysisEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run the full pipeline over a transaction batch.
    ///
    /// The batch must already be validated at the ingestion boundary; a
    /// contract violation here is a programmer error and fails the run
    /// without a partial report.
    pub fn analyze(&self, transactions: &[Transaction]) -> Result<AnalysisOutcome> {
        let started = Instant::now();

        for tx in transactions {
            tx.validate()?;
        }

        let mut graph = TransactionGraph::from_transactions(transactions);
        tracing::info!(
            accounts = graph.node_count(),
            edges = graph.edge_count(),
            "graph built"
        );

        let findings = DetectorFindings {
            cycles: CycleDetector::enumerate(&graph, &self.config),
            smurf: SmurfingDetector::compute(&graph, &self.config),
            shell: ShellChainDetector::compute(&graph, &self.config),
            velocity: VelocityDetector::compute(&graph, &self.config),
        };

        Scorer::apply(&mut graph, &findings, &self.config);
        PayrollFilter::apply(&mut graph, &self.config);
        let rings = RingAssembler::assemble(&mut graph, &findings);

        Self::verify_invariants(&graph, &rings)?;

        let report = ReportEmitter::emit(&graph, &rings, started.elapsed());
        tracing::info!(
            suspicious = report.summary.suspicious_accounts_flagged,
            rings = report.summary.fraud_rings_detected,
            seconds = report.summary.processing_time_seconds,
            "analysis complete"
        );

        Ok(AnalysisOutcome { report, graph })
    }

    /// Check the report-emission invariants. A breach is an engine bug and
    /// aborts the run with a diagnostic naming the invariant.
    fn verify_invariants(graph: &TransactionGraph, rings: &[FraudRing]) -> Result<()> {
        let mut ring_ids: HashSet<&str> = HashSet::new();
        let mut ring_members: HashSet<&str> = HashSet::new();

        for (i, ring) in rings.iter().enumerate() {
            let expected = format!("RING_{:03}", i + 1);
            if ring.ring_id != expected {
                return Err(EngineError::invariant(format!(
                    "ring id {} out of sequence, expected {expected}",
                    ring.ring_id
                )));
            }
            ring_ids.insert(ring.ring_id.as_str());

            for member in &ring.member_accounts {
                if !ring_members.insert(member.as_str()) {
                    return Err(EngineError::invariant(format!(
                        "account {member} assigned to more than one ring"
                    )));
                }
            }
        }

        for node in &graph.nodes {
            if let Some(ring_id) = &node.ring_id {
                if !ring_ids.contains(ring_id.as_str()) {
                    return Err(EngineError::invariant(format!(
                        "account {} references missing ring {ring_id}",
                        node.id
                    )));
                }
            }

            let positive = node.suspicion_score > 0.0;
            let tagged = !node.detected_patterns.is_empty();
            if node.is_suspicious != positive || node.is_suspicious != tagged {
                return Err(EngineError::invariant(format!(
                    "account {} flag/score/tag mismatch (suspicious={}, score={}, tags={})",
                    node.id,
                    node.is_suspicious,
                    node.suspicion_score,
                    node.detected_patterns.len()
                )));
            }
            if !(0.0..=100.0).contains(&node.suspicion_score) {
                return Err(EngineError::invariant(format!(
                    "account {} score {} outside [0, 100]",
                    node.id, node.suspicion_score
                )));
            }
            if node.detected_patterns.windows(2).any(|w| w[0] >= w[1]) {
                return Err(EngineError::invariant(format!(
                    "account {} tags not in canonical order",
                    node.id
                )));
            }
        }

        Ok(())
    }
}
