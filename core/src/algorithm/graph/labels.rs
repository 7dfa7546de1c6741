//! Distance labels for push-relabel
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::graph::residual::ResidualGraph;
use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::GraphError;

/// Distance label type for push-relabel algorithm
pub type DistanceLabel = usize;

/// Height function `psi`: one label per node.
///
/// The source starts at `n`, every other node at `0`. Labels only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightFunction {
    labels: Vec<DistanceLabel>,
}

impl HeightFunction {
    pub fn new(num_nodes: usize, source: NodeId) -> Self {
        let mut labels = vec![0; num_nodes];
        labels[source.as_usize()] = num_nodes;
        Self { labels }
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> DistanceLabel {
        self.labels[node.as_usize()]
    }

    /// Arc `from -> to` is admissible iff `psi(from) == psi(to) + 1`
    #[inline]
    pub fn is_admissible(&self, from: NodeId, to: NodeId) -> bool {
        self.get(from) == self.get(to) + 1
    }

    /// Label used when a node has no residual neighbor at all
    #[inline]
    pub fn fallback_label(&self) -> DistanceLabel {
        (2 * self.labels.len()).saturating_sub(1)
    }

    /// Sets `psi(node)` to one more than the lowest residual neighbor.
    ///
    /// All residual neighbors count, not only admissible ones. A node without
    /// residual neighbors is lifted to `2n - 1 + 1`. Returns the new label.
    pub fn relabel(
        &mut self,
        node: NodeId,
        residual: &ResidualGraph,
    ) -> Result<DistanceLabel, GraphError> {
        let lowest = residual
            .neighbors(node)?
            .iter()
            .map(|n| self.get(n.id()))
            .fold(self.fallback_label(), DistanceLabel::min);

        self.labels[node.as_usize()] = lowest + 1;
        Ok(lowest + 1)
    }

    pub fn max_label(&self) -> DistanceLabel {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[DistanceLabel] {
        &self.labels
    }
}
