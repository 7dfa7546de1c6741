//! Preflow bookkeeping: per-node excess and the active node set
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeSet;

use crate::algorithm::graph::labels::HeightFunction;
use crate::algorithm::traits::NodeId;

/// Signed excess per node: inflow minus outflow so far.
///
/// Every transfer moves an amount between two entries, so the total stays zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcessVector {
    values: Vec<f64>,
}

impl ExcessVector {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            values: vec![0.0; num_nodes],
        }
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> f64 {
        self.values[node.as_usize()]
    }

    /// Moves `amount` of excess from `from` to `to`
    #[inline]
    pub fn transfer(&mut self, from: NodeId, to: NodeId, amount: f64) {
        self.values[from.as_usize()] -= amount;
        self.values[to.as_usize()] += amount;
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Nodes with strictly positive excess, the sink excluded.
///
/// Iteration order is ascending node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSet {
    nodes: BTreeSet<NodeId>,
    sink: NodeId,
}

impl ActiveSet {
    pub fn new(sink: NodeId) -> Self {
        Self {
            nodes: BTreeSet::new(),
            sink,
        }
    }

    /// Collects every non-sink node with positive excess
    pub fn from_excess(excess: &ExcessVector, sink: NodeId) -> Self {
        let mut active = Self::new(sink);
        for (i, &value) in excess.as_slice().iter().enumerate() {
            if value > 0.0 {
                active.insert(NodeId(i));
            }
        }
        active
    }

    /// Inserts `node` unless it is the sink; duplicates collapse
    pub fn insert(&mut self, node: NodeId) -> bool {
        node != self.sink && self.nodes.insert(node)
    }

    pub fn remove(&mut self, node: NodeId) -> bool {
        self.nodes.remove(&node)
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Highest-label active node; ties go to the lowest node id
    pub fn select_highest(&self, heights: &HeightFunction) -> Option<NodeId> {
        self.nodes.iter().copied().fold(None, |best, node| match best {
            Some(b) if heights.get(b) >= heights.get(node) => Some(b),
            _ => Some(node),
        })
    }
}
