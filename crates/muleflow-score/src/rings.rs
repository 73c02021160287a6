//! Fraud ring assembly.
//!
//! Flagged accounts are partitioned into named rings by dominant pattern.
//! Assignment order fixes the ring IDs: cycle rings first (in cycle emission
//! order, merging transitively through shared members), then one categorical
//! ring each for fan-in, fan-out, and shell accounts not already placed.

use muleflow_detect::DetectorFindings;
use muleflow_graph::{PatternTag, TransactionGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dominant pattern of a fraud ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingPattern {
    /// Ring grown from one or more overlapping cycles.
    Cycle,
    /// Fan-in burst receivers.
    FanIn,
    /// Fan-out burst senders.
    FanOut,
    /// Shell-chain members.
    ShellChain,
}

impl RingPattern {
    /// Returns the pattern name as emitted in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RingPattern::Cycle => "cycle",
            RingPattern::FanIn => "fan_in",
            RingPattern::FanOut => "fan_out",
            RingPattern::ShellChain => "shell_chain",
        }
    }
}

impl fmt::Display for RingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An assembled fraud ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRing {
    /// Ring identifier, `RING_` plus a zero-padded three-digit counter.
    pub ring_id: String,
    /// Member account IDs in assignment order.
    pub member_accounts: Vec<String>,
    /// Dominant pattern of the ring.
    pub pattern_type: RingPattern,
    /// Mean member suspicion score, rounded to one decimal.
    pub risk_score: f64,
}

/// Groups flagged accounts into disjoint rings with deterministic IDs.
///
/// The ID counter is local to one `assemble` call; repeated analyses start
/// over at `RING_001`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingAssembler;

struct RingDraft {
    pattern: RingPattern,
    members: Vec<usize>,
}

impl RingAssembler {
    /// Assemble rings from post-filter node state and detector findings.
    /// Writes each member's `ring_id` back into the node table.
    #[must_use]
    pub fn assemble(graph: &mut TransactionGraph, findings: &DetectorFindings) -> Vec<FraudRing> {
        let mut drafts: Vec<RingDraft> = Vec::new();
        let mut assignment: HashMap<usize, usize> = HashMap::new();

        // Cycle rings. A cycle joins the ring of its first already-assigned
        // member; members accumulate transitively across overlapping cycles.
        for cycle in &findings.cycles.cycles {
            let existing = cycle
                .members
                .iter()
                .find_map(|m| assignment.get(m).copied());

            let ring_idx = existing.unwrap_or_else(|| {
                drafts.push(RingDraft {
                    pattern: RingPattern::Cycle,
                    members: Vec::new(),
                });
                drafts.len() - 1
            });

            for &member in &cycle.members {
                if !assignment.contains_key(&member) {
                    assignment.insert(member, ring_idx);
                    drafts[ring_idx].members.push(member);
                }
            }
        }

        // Categorical rings, one per pattern, in fixed order. Candidates are
        // read off the post-filter tag state in node-table order, so a
        // payroll-exempted sender never lands in the fan-out ring.
        for (pattern, tag) in [
            (RingPattern::FanIn, PatternTag::FanIn),
            (RingPattern::FanOut, PatternTag::FanOut),
            (RingPattern::ShellChain, PatternTag::ShellChain),
        ] {
            let members: Vec<usize> = (0..graph.node_count())
                .filter(|idx| graph.node(*idx).has_tag(tag) && !assignment.contains_key(idx))
                .collect();

            if members.is_empty() {
                continue;
            }

            let ring_idx = drafts.len();
            for &member in &members {
                assignment.insert(member, ring_idx);
            }
            drafts.push(RingDraft { pattern, members });
        }

        let rings: Vec<FraudRing> = drafts
            .iter()
            .enumerate()
            .map(|(i, draft)| {
                let ring_id = format!("RING_{:03}", i + 1);
                let mean = draft
                    .members
                    .iter()
                    .map(|&m| graph.node(m).suspicion_score)
                    .sum::<f64>()
                    / draft.members.len() as f64;

                for &member in &draft.members {
                    graph.node_mut(member).ring_id = Some(ring_id.clone());
                }

                FraudRing {
                    ring_id,
                    member_accounts: draft
                        .members
                        .iter()
                        .map(|&m| graph.node(m).id.clone())
                        .collect(),
                    pattern_type: draft.pattern,
                    risk_score: (mean * 10.0).round() / 10.0,
                }
            })
            .collect();

        tracing::info!(rings = rings.len(), "ring assembly complete");

        rings
    }
}
