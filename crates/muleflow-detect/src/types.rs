//! Detector result types.

use std::collections::HashMap;

/// One emitted cycle. Members are node-table indices in path order,
/// starting at the seed.
#[derive(Debug, Clone)]
pub struct Cycle {
    /// Node indices along the cycle.
    pub members: Vec<usize>,
}

impl Cycle {
    /// Cycle length (number of nodes, equal to the number of edges).
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True for the degenerate empty cycle (never produced by the detector).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Cycle detector output.
#[derive(Debug, Clone, Default)]
pub struct CycleFindings {
    /// Deduplicated cycles in emission order.
    pub cycles: Vec<Cycle>,
    /// Shortest cycle length per participating node.
    pub shortest_len: HashMap<usize, usize>,
}

impl CycleFindings {
    /// True if the node participates in any cycle.
    #[must_use]
    pub fn is_member(&self, node: usize) -> bool {
        self.shortest_len.contains_key(&node)
    }
}

/// Smurfing detector output. Both lists are in ascending node-index order.
#[derive(Debug, Clone, Default)]
pub struct SmurfFindings {
    /// Accounts flagged as fan-in burst receivers.
    pub fan_in: Vec<usize>,
    /// Accounts flagged as fan-out burst senders.
    pub fan_out: Vec<usize>,
}

/// Combined output of all four detectors, consumed by the scorer and the
/// ring assembler.
#[derive(Debug, Clone, Default)]
pub struct DetectorFindings {
    /// Cycle detector output.
    pub cycles: CycleFindings,
    /// Smurfing detector output.
    pub smurf: SmurfFindings,
    /// Shell-chain flagged nodes, ascending and deduplicated.
    pub shell: Vec<usize>,
    /// High-velocity flagged nodes, ascending.
    pub velocity: Vec<usize>,
}
