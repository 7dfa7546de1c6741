//! Flow result: per-arc usage over a network
//!
//! A [`Flow`] records, for every ordered network pair that carries flow, the
//! aggregate amount routed along it. Usage always refers to real network arcs:
//! pushing along a backward residual arc cancels opposite usage first.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::Network;
use crate::algorithm::graph::residual::ResidualGraph;
use crate::algorithm::traits::{FlowError, NodeId};
use crate::data_structures::graph::{DirType, Edge, Graph, GraphError};

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of push operations
    pub pushes: usize,
    /// Number of relabel operations
    pub relabels: usize,
    /// Main loop iterations
    pub iterations: usize,
    /// Augmenting paths used (path-based solvers only)
    pub augmentations: usize,
    /// Highest label assigned during the run
    pub max_height: usize,
}

/// Usage of one ordered network pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcUsage {
    pub start: NodeId,
    pub end: NodeId,
    pub usage: f64,
}

/// Serializable snapshot of a computed flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub source: NodeId,
    pub sink: NodeId,
    pub value: f64,
    pub edges: Vec<ArcUsage>,
    pub metrics: FlowMetrics,
}

/// Flow from `source` to `sink` over a borrowed network
#[derive(Debug, Clone)]
pub struct Flow<'a> {
    network: &'a Network,
    source: NodeId,
    sink: NodeId,
    usage: Graph,
    metrics: FlowMetrics,
}

impl<'a> Flow<'a> {
    /// Creates the zero flow; source and sink must be distinct valid nodes
    pub fn new(network: &'a Network, source: NodeId, sink: NodeId) -> Result<Self, FlowError> {
        network.graph().check_node(source)?;
        network.graph().check_node(sink)?;
        if source == sink {
            return Err(FlowError::SourceIsSink(source));
        }

        Ok(Self {
            network,
            source,
            sink,
            usage: Graph::new(network.num_nodes(), DirType::Directed),
            metrics: FlowMetrics::default(),
        })
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    #[inline]
    pub fn network(&self) -> &'a Network {
        self.network
    }

    #[inline]
    pub fn metrics(&self) -> &FlowMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut FlowMetrics {
        &mut self.metrics
    }

    /// Raw usage graph: one edge per used ordered pair
    pub fn usage_graph(&self) -> &Graph {
        &self.usage
    }

    /// Replaces the usage of `a -> b`; zero clears it
    pub fn set_usage(&mut self, a: NodeId, b: NodeId, usage: f64) -> Result<(), FlowError> {
        if !usage.is_finite() || usage < 0.0 {
            return Err(FlowError::InvariantViolated(format!(
                "usage {} on {} -> {} must be finite and non-negative",
                usage, a, b
            )));
        }

        self.usage.remove_edge(a, b)?;
        if usage > 0.0 {
            self.usage.add_edge(a, b, usage)?;
        }
        Ok(())
    }

    /// Aggregate usage of `a -> b`, zero if none is recorded
    pub fn usage(&self, a: NodeId, b: NodeId) -> Result<f64, GraphError> {
        self.usage.aggregate_weight(a, b)
    }

    /// Records `amount` pushed along residual arc `from -> to`.
    ///
    /// Opposite usage `to -> from` is cancelled first; only the remainder is
    /// added as usage on `from -> to`.
    pub(crate) fn record_push(
        &mut self,
        from: NodeId,
        to: NodeId,
        amount: f64,
    ) -> Result<(), FlowError> {
        let reverse = self.usage(to, from)?;
        let cancelled = reverse.min(amount);
        if cancelled > 0.0 {
            self.set_usage(to, from, reverse - cancelled)?;
        }

        let forward = amount - cancelled;
        if forward > 0.0 {
            let current = self.usage(from, to)?;
            self.set_usage(from, to, current + forward)?;
        }
        Ok(())
    }

    /// Total usage entering `node`
    pub fn inflow(&self, node: NodeId) -> Result<f64, GraphError> {
        self.usage.check_node(node)?;
        Ok(self
            .usage
            .edges()
            .iter()
            .filter(|e| e.end() == node)
            .map(Edge::weight)
            .sum())
    }

    /// Total usage leaving `node`
    pub fn outflow(&self, node: NodeId) -> Result<f64, GraphError> {
        Ok(self
            .usage
            .neighbors(node)?
            .iter()
            .map(|n| n.edge_weight())
            .sum())
    }

    /// Inflow minus outflow at `node`
    pub fn excess(&self, node: NodeId) -> Result<f64, GraphError> {
        Ok(self.inflow(node)? - self.outflow(node)?)
    }

    /// Flow value: the negated excess of the source
    pub fn value(&self) -> f64 {
        // source was validated on construction
        self.excess(self.source).map(|e| 0.0 - e).unwrap_or(0.0)
    }

    /// Residual graph of the network under the current usage
    pub fn residual_graph(&self) -> Result<ResidualGraph, GraphError> {
        ResidualGraph::from_usage(self.network.graph(), &self.usage)
    }

    /// Network pairs with nonzero usage, weight = aggregate usage.
    ///
    /// Pairs appear once, in network edge order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut seen = HashSet::new();
        self.network
            .edges()
            .into_iter()
            .filter(|e| seen.insert((e.start(), e.end())))
            .filter_map(|e| {
                let used = self.usage(e.start(), e.end()).ok()?;
                (used != 0.0).then(|| Edge::directed(e.start(), e.end(), used))
            })
            .collect()
    }

    /// Source side of a minimum cut: nodes reachable from the source in the
    /// residual graph, in ascending order
    pub fn min_cut(&self) -> Result<Vec<NodeId>, GraphError> {
        let reachable = self.residual_graph()?.reachable_from(self.source)?;
        Ok(reachable
            .iter()
            .enumerate()
            .filter(|(_, &r)| r)
            .map(|(i, _)| NodeId(i))
            .collect())
    }

    pub fn summary(&self) -> FlowSummary {
        FlowSummary {
            source: self.source,
            sink: self.sink,
            value: self.value(),
            edges: self
                .edges()
                .into_iter()
                .map(|e| ArcUsage {
                    start: e.start(),
                    end: e.end(),
                    usage: e.weight(),
                })
                .collect(),
            metrics: self.metrics,
        }
    }
}

impl fmt::Display for Flow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.value())?;
        for e in self.edges() {
            writeln!(f, "{} {}", e.start(), e.end())?;
        }
        Ok(())
    }
}
