//! Transaction graph construction.
//!
//! Folds a transaction batch into a directed multigraph with the indices the
//! detectors share: a node table in first-appearance order, the raw edge
//! list, node-level deduplicated forward/reverse adjacency, and per-account
//! timestamp-ordered edge sequences.

use crate::types::{AccountNode, EdgeRecord, Transaction};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// The directed transaction multigraph.
///
/// Node-table order is insertion order of first appearance, which makes every
/// downstream iteration deterministic. Nodes and edges are never removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionGraph {
    /// Account nodes in first-appearance order.
    pub nodes: Vec<AccountNode>,
    /// All edges in input order. One transaction = one edge.
    pub edges: Vec<EdgeRecord>,

    /// Account ID to node-table index.
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    /// Deduplicated forward adjacency (node index to neighbor indices, in
    /// first-appearance order).
    #[serde(skip)]
    forward: Vec<Vec<usize>>,
    /// Deduplicated reverse adjacency.
    #[serde(skip)]
    reverse: Vec<Vec<usize>>,
    /// Outbound edge indices per node, sorted by ascending timestamp.
    #[serde(skip)]
    outgoing: Vec<Vec<usize>>,
    /// Inbound edge indices per node, sorted by ascending timestamp.
    #[serde(skip)]
    incoming: Vec<Vec<usize>>,
}

impl TransactionGraph {
    /// Build the graph from a validated transaction batch.
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut graph = Self::default();
        let mut forward_seen: HashSet<(usize, usize)> = HashSet::new();
        let mut reverse_seen: HashSet<(usize, usize)> = HashSet::new();

        for tx in transactions {
            let source = graph.intern(&tx.sender_id);
            let target = graph.intern(&tx.receiver_id);

            {
                let sender = &mut graph.nodes[source];
                sender.total_transactions += 1;
                sender.total_sent += tx.amount;
                sender.unique_receivers.insert(tx.receiver_id.clone());
            }
            {
                let receiver = &mut graph.nodes[target];
                receiver.total_transactions += 1;
                receiver.total_received += tx.amount;
                receiver.unique_senders.insert(tx.sender_id.clone());
            }

            if forward_seen.insert((source, target)) {
                graph.forward[source].push(target);
            }
            if reverse_seen.insert((target, source)) {
                graph.reverse[target].push(source);
            }

            let edge_idx = graph.edges.len();
            graph.edges.push(EdgeRecord {
                source,
                target,
                amount: tx.amount,
                timestamp: tx.timestamp,
                transaction_id: tx.transaction_id.clone(),
            });
            graph.outgoing[source].push(edge_idx);
            graph.incoming[target].push(edge_idx);
        }

        // Stable sort keeps input order among equal timestamps, so repeated
        // runs see identical sequences.
        let edges = &graph.edges;
        for list in graph.outgoing.iter_mut().chain(graph.incoming.iter_mut()) {
            list.sort_by_key(|&idx| edges[idx].timestamp);
        }

        graph
    }

    fn intern(&mut self, account_id: &str) -> usize {
        if let Some(&idx) = self.node_index.get(account_id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(AccountNode::new(account_id));
        self.node_index.insert(account_id.to_string(), idx);
        self.forward.push(Vec::new());
        self.reverse.push(Vec::new());
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    /// Number of accounts.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node-table index for an account ID.
    #[must_use]
    pub fn index_of(&self, account_id: &str) -> Option<usize> {
        self.node_index.get(account_id).copied()
    }

    /// The node at a given index.
    #[must_use]
    pub fn node(&self, idx: usize) -> &AccountNode {
        &self.nodes[idx]
    }

    /// Mutable access to the node at a given index.
    pub fn node_mut(&mut self, idx: usize) -> &mut AccountNode {
        &mut self.nodes[idx]
    }

    /// Node by account ID.
    #[must_use]
    pub fn node_by_id(&self, account_id: &str) -> Option<&AccountNode> {
        self.index_of(account_id).map(|idx| &self.nodes[idx])
    }

    /// Deduplicated forward neighbors of a node.
    #[must_use]
    pub fn forward_neighbors(&self, idx: usize) -> &[usize] {
        &self.forward[idx]
    }

    /// Deduplicated reverse neighbors of a node.
    #[must_use]
    pub fn reverse_neighbors(&self, idx: usize) -> &[usize] {
        &self.reverse[idx]
    }

    /// Outbound edge indices of a node, ascending by timestamp.
    #[must_use]
    pub fn outgoing_edges(&self, idx: usize) -> &[usize] {
        &self.outgoing[idx]
    }

    /// Inbound edge indices of a node, ascending by timestamp.
    #[must_use]
    pub fn incoming_edges(&self, idx: usize) -> &[usize] {
        &self.incoming[idx]
    }

    /// The edge at a given index.
    #[must_use]
    pub fn edge(&self, idx: usize) -> &EdgeRecord {
        &self.edges[idx]
    }
}
