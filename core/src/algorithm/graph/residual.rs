//! Residual graph with aggregate arc capacities
//!
//! The residual graph holds, for every ordered network pair `(a, b)` with
//! capacity `cap` and usage `u`, a backward arc `(b, a, u)` when `u > 0` and a
//! forward arc `(a, b, cap - u)` when `cap > u`. Arcs with zero weight are never
//! stored. Parallel arcs are allowed and always read in aggregate.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashSet, VecDeque};

use crate::algorithm::traits::{FlowError, NodeId};
use crate::data_structures::graph::{DirType, Edge, Graph, GraphError, Neighbor};

/// Live residual graph of a flow computation
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualGraph {
    graph: Graph,
}

impl ResidualGraph {
    /// Builds the residual graph of `network` under the usage recorded in `usage`.
    ///
    /// Pairs are visited in network edge order; each ordered pair contributes
    /// once no matter how many parallel edges carry it.
    pub fn from_usage(network: &Graph, usage: &Graph) -> Result<Self, GraphError> {
        let mut graph = Graph::new(network.num_nodes(), DirType::Directed);
        let mut seen = HashSet::new();

        for edge in network.edges() {
            let (a, b) = (edge.start(), edge.end());
            if !seen.insert((a, b)) {
                continue;
            }

            let cap = network.aggregate_weight(a, b)?;
            let used = usage.aggregate_weight(a, b)?;

            if used > 0.0 {
                graph.add_edge(b, a, used)?;
            }
            if cap > used {
                graph.add_edge(a, b, cap - used)?;
            }
        }

        Ok(Self { graph })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// Residual arcs leaving `node` in adjacency order
    pub fn neighbors(&self, node: NodeId) -> Result<&[Neighbor], GraphError> {
        self.graph.neighbors(node)
    }

    /// Aggregate residual capacity of all arcs `from -> to`
    pub fn capacity(&self, from: NodeId, to: NodeId) -> Result<f64, GraphError> {
        self.graph.aggregate_weight(from, to)
    }

    /// All residual arcs
    pub fn edges(&self) -> Vec<Edge> {
        self.graph.edges()
    }

    pub fn as_graph(&self) -> &Graph {
        &self.graph
    }

    /// Moves `amount` units of residual capacity from `from -> to` onto `to -> from`.
    ///
    /// Every arc `from -> to` is removed and, if capacity remains, re-added as a
    /// single arc holding the remainder. Returns the aggregate capacity the arc
    /// had before the push.
    pub fn push(&mut self, from: NodeId, to: NodeId, amount: f64) -> Result<f64, FlowError> {
        let res_cap = self.capacity(from, to)?;
        if !(amount > 0.0) || amount > res_cap {
            return Err(FlowError::InvalidPush {
                from,
                to,
                reason: format!("amount {} outside residual capacity {}", amount, res_cap),
            });
        }

        self.graph.add_edge(to, from, amount)?;
        self.graph.remove_edge(from, to)?;
        if res_cap > amount {
            self.graph.add_edge(from, to, res_cap - amount)?;
        }
        Ok(res_cap)
    }

    /// Nodes reachable from `start` along arcs with positive capacity
    pub fn reachable_from(&self, start: NodeId) -> Result<Vec<bool>, GraphError> {
        self.graph.check_node(start)?;

        let mut visited = vec![false; self.num_nodes()];
        let mut queue = VecDeque::new();
        visited[start.as_usize()] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for n in self.graph.neighbors(node)? {
                let next = n.id().as_usize();
                if n.edge_weight() > 0.0 && !visited[next] {
                    visited[next] = true;
                    queue.push_back(n.id());
                }
            }
        }
        Ok(visited)
    }
}
