//! Capacitated networks and maximum flow dispatch
//!
//! This module defines the [`Network`] a flow is computed on and the selection
//! of maximum flow algorithms available for it. Capacities are stored as edge
//! weights of a directed [`Graph`]; parallel edges between the same ordered
//! pair add up to one aggregate capacity.
//!
//! # Concurrency
//! Computations only borrow the network immutably, so several may read the
//! same network at once. Mutating capacities while a [`Flow`] borrows the
//! network is ruled out by the borrow checker.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::edmonds_karp::EdmondsKarp;
use crate::algorithm::graph::flow::Flow;
use crate::algorithm::graph::push_relabel::PushRelabel;
use crate::algorithm::traits::{FlowError, MaxFlowSolver, NodeId};
use crate::data_structures::graph::{DirType, Edge, Graph};

/// Flow capacity type
pub type Capacity = f64;

/// Maximum flow algorithm variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFlowAlgorithm {
    /// Push-relabel with highest label selection
    #[default]
    PushRelabelHighestLabel,
    /// Edmonds-Karp with BFS shortest augmenting paths
    EdmondsKarp,
}

impl MaxFlowAlgorithm {
    /// Fresh solver with default parameters
    pub fn solver(self) -> Box<dyn MaxFlowSolver> {
        match self {
            MaxFlowAlgorithm::PushRelabelHighestLabel => Box::new(PushRelabel::new()),
            MaxFlowAlgorithm::EdmondsKarp => Box::new(EdmondsKarp::new()),
        }
    }
}

/// Directed network whose edge weights are capacities
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    graph: Graph,
}

impl Network {
    /// Creates a network with `num_nodes` nodes and no arcs
    pub fn new(num_nodes: usize) -> Self {
        Self {
            graph: Graph::new(num_nodes, DirType::Directed),
        }
    }

    /// Wraps a directed graph after validating its capacities
    pub fn from_graph(graph: Graph) -> Result<Self, FlowError> {
        if graph.dirtype() != DirType::Directed {
            return Err(FlowError::InvariantViolated(
                "a network must be a directed graph".into(),
            ));
        }
        for edge in graph.edges() {
            validate_capacity(edge.start(), edge.end(), edge.weight())?;
        }
        Ok(Self { graph })
    }

    /// Reads a network from an edge-list file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FlowError> {
        Self::from_graph(Graph::from_file(path, DirType::Directed)?)
    }

    /// Parses a network from edge-list text
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FlowError> {
        Self::from_graph(Graph::from_reader(reader, DirType::Directed)?)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// All arcs in node-index order, then adjacency order
    pub fn edges(&self) -> Vec<Edge> {
        self.graph.edges()
    }

    /// Sets the capacity of `a -> b`, replacing any existing arcs for the pair
    pub fn set_capacity(&mut self, a: NodeId, b: NodeId, capacity: Capacity) -> Result<(), FlowError> {
        validate_capacity(a, b, capacity)?;
        if self.capacity(a, b)? != 0.0 {
            self.graph.remove_edge(a, b)?;
        }
        self.graph.add_edge(a, b, capacity)?;
        Ok(())
    }

    /// Adds a parallel arc; its capacity adds to the pair's aggregate
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, capacity: Capacity) -> Result<(), FlowError> {
        validate_capacity(a, b, capacity)?;
        self.graph.add_edge(a, b, capacity)?;
        Ok(())
    }

    /// Aggregate capacity of all arcs `a -> b`
    pub fn capacity(&self, a: NodeId, b: NodeId) -> Result<Capacity, FlowError> {
        Ok(self.graph.aggregate_weight(a, b)?)
    }

    /// Maximum flow by highest-label push-relabel with default parameters
    pub fn push_relabel(&self, source: NodeId, sink: NodeId) -> Result<Flow<'_>, FlowError> {
        PushRelabel::new().solve(self, source, sink)
    }

    /// Maximum flow using the selected algorithm
    pub fn max_flow(
        &self,
        source: NodeId,
        sink: NodeId,
        algorithm: MaxFlowAlgorithm,
    ) -> Result<Flow<'_>, FlowError> {
        algorithm.solver().solve(self, source, sink)
    }
}

fn validate_capacity(from: NodeId, to: NodeId, capacity: Capacity) -> Result<(), FlowError> {
    if capacity.is_finite() && capacity >= 0.0 {
        Ok(())
    } else {
        Err(FlowError::InvalidCapacity { from, to, capacity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::data_structures::graph::GraphError;

    #[test]
    fn test_set_capacity_replaces_parallel_arcs() {
        let mut network = Network::new(3);
        network.add_edge(NodeId(0), NodeId(1), 2.0).unwrap();
        network.add_edge(NodeId(0), NodeId(1), 3.0).unwrap();
        assert_relative_eq!(network.capacity(NodeId(0), NodeId(1)).unwrap(), 5.0);

        network.set_capacity(NodeId(0), NodeId(1), 7.0).unwrap();
        assert_relative_eq!(network.capacity(NodeId(0), NodeId(1)).unwrap(), 7.0);
        assert_eq!(network.edges().len(), 1);
    }

    #[test]
    fn test_invalid_capacities_rejected() {
        let mut network = Network::new(2);

        assert!(matches!(
            network.set_capacity(NodeId(0), NodeId(1), -1.0),
            Err(FlowError::InvalidCapacity { .. })
        ));
        assert!(network.add_edge(NodeId(0), NodeId(1), f64::NAN).is_err());
        assert!(network.capacity(NodeId(0), NodeId(2)).is_err());
        assert!(Network::from_reader("2\n0 1 -3\n".as_bytes()).is_err());
        assert!(Network::from_graph(Graph::new(2, DirType::Undirected)).is_err());
    }

    #[test]
    fn test_loops_rejected() {
        let mut network = Network::new(3);

        assert!(matches!(
            network.set_capacity(NodeId(2), NodeId(2), 1.0),
            Err(FlowError::Graph(GraphError::Loop(NodeId(2))))
        ));
        assert!(matches!(
            network.add_edge(NodeId(0), NodeId(0), 4.0),
            Err(FlowError::Graph(GraphError::Loop(NodeId(0))))
        ));
        assert!(network.edges().is_empty());
    }

    #[test]
    fn test_diamond_scenario() {
        let network = Network::from_reader("4\n0 1 3\n0 2 2\n1 3 2\n2 3 3\n1 2 1\n".as_bytes()).unwrap();

        for algorithm in [MaxFlowAlgorithm::PushRelabelHighestLabel, MaxFlowAlgorithm::EdmondsKarp] {
            let flow = network.max_flow(NodeId(0), NodeId(3), algorithm).unwrap();
            assert_relative_eq!(flow.value(), 5.0);
        }
    }

    #[test]
    fn test_single_arc_scenario() {
        let mut network = Network::new(2);
        network.set_capacity(NodeId(0), NodeId(1), 5.0).unwrap();

        let flow = network.push_relabel(NodeId(0), NodeId(1)).unwrap();
        assert_relative_eq!(flow.value(), 5.0);
        assert_relative_eq!(flow.usage(NodeId(0), NodeId(1)).unwrap(), 5.0);
    }

    #[test]
    fn test_disconnected_sink_scenario() {
        let mut network = Network::new(4);
        network.set_capacity(NodeId(0), NodeId(1), 5.0).unwrap();
        network.set_capacity(NodeId(2), NodeId(3), 5.0).unwrap();

        let flow = network.push_relabel(NodeId(0), NodeId(3)).unwrap();
        assert_relative_eq!(flow.value(), 0.0);
        assert!(flow.edges().is_empty());
        assert_eq!(flow.to_string(), "0\n");
    }

    #[test]
    fn test_invalid_terminals_rejected() {
        let network = Network::new(2);
        assert!(matches!(
            network.push_relabel(NodeId(0), NodeId(0)),
            Err(FlowError::SourceIsSink(_))
        ));
        assert!(network.max_flow(NodeId(0), NodeId(9), MaxFlowAlgorithm::EdmondsKarp).is_err());
    }
}
