//! Dense-index directed/undirected multigraph
//!
//! This module implements the adjacency-list graph that every flow structure in
//! the crate is built on. Nodes are numbered `0..num_nodes()`, each node owns an
//! ordered list of neighbors, and parallel edges are kept as separate entries.
//!
//! # Aggregate Semantics
//! Parallel edges between the same ordered pair are never merged on insertion.
//! Callers that treat weights as capacities or usages query them through
//! [`Graph::aggregate_weight`], which sums every entry for the pair.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::TryReserveError;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;

/// Structural graph errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid node {node}: graph has {num_nodes} nodes")]
    InvalidNode { node: NodeId, num_nodes: usize },

    #[error("No edge from {0} to {1}")]
    EdgeNotFound(NodeId, NodeId),

    #[error("Invalid file format at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid file format at line {line}: loops not allowed")]
    SelfLoop { line: usize },

    #[error("Loops are not allowed: {0} -> {0}")]
    Loop(NodeId),

    #[error("Cannot read graph: {0}")]
    Io(#[from] std::io::Error),
}

/// Edge orientation of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirType {
    Directed,
    Undirected,
}

/// Adjacency entry: target node and weight of the connecting edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    id: NodeId,
    edge_weight: f64,
}

impl Neighbor {
    #[inline]
    pub fn new(id: NodeId, edge_weight: f64) -> Self {
        Self { id, edge_weight }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn edge_weight(&self) -> f64 {
        self.edge_weight
    }
}

/// Weighted edge with orientation tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    start: NodeId,
    end: NodeId,
    weight: f64,
    dirtype: DirType,
}

impl Edge {
    pub fn new(start: NodeId, end: NodeId, weight: f64, dirtype: DirType) -> Self {
        Self {
            start,
            end,
            weight,
            dirtype,
        }
    }

    /// Directed edge shorthand
    pub fn directed(start: NodeId, end: NodeId, weight: f64) -> Self {
        Self::new(start, end, weight, DirType::Directed)
    }

    #[inline]
    pub fn start(&self) -> NodeId {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NodeId {
        self.end
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn dirtype(&self) -> DirType {
        self.dirtype
    }

    /// Endpoint equality; undirected edges match in either orientation
    pub fn same_endpoints(&self, other: &Edge) -> bool {
        if self.dirtype == DirType::Undirected || other.dirtype == DirType::Undirected {
            (self.start == other.start && self.end == other.end)
                || (self.start == other.end && self.end == other.start)
        } else {
            self.start == other.start && self.end == other.end
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.dirtype {
            DirType::Directed => "->",
            DirType::Undirected => "<->",
        };
        write!(f, "{}{}{}", self.start, arrow, self.end)
    }
}

/// Node storage: ordered adjacency list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    neighbors: Vec<Neighbor>,
}

impl Node {
    /// Neighbors in insertion order, parallel entries included
    #[inline]
    pub fn adjacent_nodes(&self) -> &[Neighbor] {
        &self.neighbors
    }

    fn add_neighbor(&mut self, id: NodeId, weight: f64) {
        self.neighbors.push(Neighbor::new(id, weight));
    }

    fn remove_neighbor(&mut self, id: NodeId) {
        self.neighbors.retain(|n| n.id != id);
    }
}

/// Adjacency-list multigraph over dense node ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
    dirtype: DirType,
}

impl Graph {
    /// Creates a graph with `num_nodes` isolated nodes
    pub fn new(num_nodes: usize, dirtype: DirType) -> Self {
        Self {
            nodes: vec![Node::default(); num_nodes],
            dirtype,
        }
    }

    /// Like [`Graph::new`], but reports a node count that cannot be allocated
    pub fn try_new(num_nodes: usize, dirtype: DirType) -> Result<Self, TryReserveError> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(num_nodes)?;
        nodes.resize_with(num_nodes, Node::default);
        Ok(Self { nodes, dirtype })
    }

    /// Reads an edge-list file, see [`Graph::from_reader`]
    pub fn from_file<P: AsRef<Path>>(path: P, dirtype: DirType) -> Result<Self, GraphError> {
        let file = File::open(path)?;
        Self::from_reader(file, dirtype)
    }

    /// Parses the edge-list format: a node count line followed by
    /// `tail head [weight]` lines. The weight defaults to `1.0`.
    pub fn from_reader<R: Read>(reader: R, dirtype: DirType) -> Result<Self, GraphError> {
        let mut lines = BufReader::new(reader)
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line));

        let (header_line, header) = loop {
            match lines.next() {
                Some((number, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break (number, line);
                    }
                }
                None => {
                    return Err(GraphError::Parse {
                        line: 1,
                        reason: "missing node count".into(),
                    })
                }
            }
        };

        let mut tokens = header.split_whitespace();
        let num_nodes = parse_field::<usize>(tokens.next(), header_line, "node count")?;
        if tokens.next().is_some() {
            return Err(GraphError::Parse {
                line: header_line,
                reason: "unexpected token after node count".into(),
            });
        }

        let mut graph = Self::try_new(num_nodes, dirtype).map_err(|e| GraphError::Parse {
            line: header_line,
            reason: format!("node count {} too large: {}", num_nodes, e),
        })?;
        for (number, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let tail = parse_field::<usize>(tokens.next(), number, "tail")?;
            let head = parse_field::<usize>(tokens.next(), number, "head")?;
            let weight = match tokens.next() {
                Some(token) => parse_field::<f64>(Some(token), number, "weight")?,
                None => 1.0,
            };
            if tokens.next().is_some() {
                return Err(GraphError::Parse {
                    line: number,
                    reason: "unexpected token after weight".into(),
                });
            }
            if tail == head {
                return Err(GraphError::SelfLoop { line: number });
            }

            graph.add_edge(NodeId(tail), NodeId(head), weight)?;
        }

        Ok(graph)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn dirtype(&self) -> DirType {
        self.dirtype
    }

    /// Number of stored edges; undirected edges count once
    pub fn num_edges(&self) -> usize {
        let entries: usize = self.nodes.iter().map(|n| n.neighbors.len()).sum();
        match self.dirtype {
            DirType::Directed => entries,
            DirType::Undirected => entries / 2,
        }
    }

    /// Appends `num_new_nodes` isolated nodes
    pub fn add_nodes(&mut self, num_new_nodes: usize) {
        let target = self.num_nodes() + num_new_nodes;
        self.nodes.resize_with(target, Node::default);
    }

    /// Fails with [`GraphError::InvalidNode`] unless `node` is in range
    #[inline]
    pub fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node.as_usize() < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::InvalidNode {
                node,
                num_nodes: self.nodes.len(),
            })
        }
    }

    pub fn node(&self, node: NodeId) -> Result<&Node, GraphError> {
        self.check_node(node)?;
        Ok(&self.nodes[node.as_usize()])
    }

    /// Adjacency of `node` in insertion order
    pub fn neighbors(&self, node: NodeId) -> Result<&[Neighbor], GraphError> {
        Ok(self.node(node)?.adjacent_nodes())
    }

    /// Appends `tail -> head`; loops are rejected
    pub fn add_edge(&mut self, tail: NodeId, head: NodeId, weight: f64) -> Result<(), GraphError> {
        self.check_node(tail)?;
        self.check_node(head)?;
        if tail == head {
            return Err(GraphError::Loop(tail));
        }

        self.nodes[tail.as_usize()].add_neighbor(head, weight);
        if self.dirtype == DirType::Undirected {
            self.nodes[head.as_usize()].add_neighbor(tail, weight);
        }
        Ok(())
    }

    /// Removes every edge `tail -> head`, parallel entries included
    pub fn remove_edge(&mut self, tail: NodeId, head: NodeId) -> Result<(), GraphError> {
        self.check_node(tail)?;
        self.check_node(head)?;

        self.nodes[tail.as_usize()].remove_neighbor(head);
        if self.dirtype == DirType::Undirected {
            self.nodes[head.as_usize()].remove_neighbor(tail);
        }
        Ok(())
    }

    /// First adjacency entry of `a` pointing at `b`
    pub fn neighbor(&self, a: NodeId, b: NodeId) -> Result<Neighbor, GraphError> {
        self.check_node(b)?;
        self.neighbors(a)?
            .iter()
            .find(|n| n.id == b)
            .copied()
            .ok_or(GraphError::EdgeNotFound(a, b))
    }

    pub fn edge(&self, a: NodeId, b: NodeId) -> Result<Edge, GraphError> {
        let n = self.neighbor(a, b)?;
        Ok(Edge::new(a, b, n.edge_weight, self.dirtype))
    }

    /// Sum of the weights of all edges `a -> b`, zero if there are none
    pub fn aggregate_weight(&self, a: NodeId, b: NodeId) -> Result<f64, GraphError> {
        self.check_node(b)?;
        Ok(self
            .neighbors(a)?
            .iter()
            .filter(|n| n.id == b)
            .map(|n| n.edge_weight)
            .sum())
    }

    /// All edges in node-index order, then adjacency order
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.num_edges());
        for (i, node) in self.nodes.iter().enumerate() {
            for n in &node.neighbors {
                if self.dirtype == DirType::Undirected && i > n.id.as_usize() {
                    continue;
                }
                edges.push(Edge::new(NodeId(i), n.id, n.edge_weight, self.dirtype));
            }
        }
        edges
    }

    /// Copy of the graph with every edge weight mapped through `transform`
    pub fn transform_edge_weights<F>(&self, transform: F) -> Graph
    where
        F: Fn(f64) -> f64,
    {
        let mut graph = Graph::new(self.num_nodes(), self.dirtype);
        for edge in self.edges() {
            graph.nodes[edge.start.as_usize()].add_neighbor(edge.end, transform(edge.weight));
            if self.dirtype == DirType::Undirected {
                graph.nodes[edge.end.as_usize()].add_neighbor(edge.start, transform(edge.weight));
            }
        }
        graph
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, relation) = match self.dirtype {
            DirType::Directed => ("Digraph", "leaving"),
            DirType::Undirected => ("Undirected graph", "incident to"),
        };
        writeln!(
            f,
            "{} with {} vertices, numbered 0,...,{}.",
            kind,
            self.num_nodes(),
            self.num_nodes().saturating_sub(1)
        )?;
        for (i, node) in self.nodes.iter().enumerate() {
            writeln!(f, "The following edges are {} vertex {}:", relation, i)?;
            for n in &node.neighbors {
                writeln!(f, "{} - {} weight = {}", i, n.id, n.edge_weight)?;
            }
        }
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(
    token: Option<&str>,
    line: usize,
    field: &str,
) -> Result<T, GraphError> {
    let token = token.ok_or_else(|| GraphError::Parse {
        line,
        reason: format!("missing {}", field),
    })?;
    token.parse::<T>().map_err(|_| GraphError::Parse {
        line,
        reason: format!("malformed {} '{}'", field, token),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        let mut g = Graph::new(4, DirType::Directed);
        g.add_edge(NodeId(0), NodeId(1), 3.0).unwrap();
        g.add_edge(NodeId(0), NodeId(2), 2.0).unwrap();
        g.add_edge(NodeId(1), NodeId(3), 2.0).unwrap();
        g.add_edge(NodeId(2), NodeId(3), 3.0).unwrap();
        g.add_edge(NodeId(1), NodeId(2), 1.0).unwrap();
        g
    }

    #[test]
    fn test_graph_creation_and_basic_operations() {
        let g = diamond();

        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 5);
        assert_eq!(g.edge(NodeId(0), NodeId(1)).unwrap().weight(), 3.0);
        assert!(matches!(
            g.edge(NodeId(0), NodeId(3)),
            Err(GraphError::EdgeNotFound(NodeId(0), NodeId(3)))
        ));
    }

    #[test]
    fn test_edges_follow_node_then_adjacency_order() {
        let g = diamond();
        let pairs: Vec<(usize, usize)> = g
            .edges()
            .iter()
            .map(|e| (e.start().as_usize(), e.end().as_usize()))
            .collect();

        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_parallel_edges_aggregate() {
        let mut g = Graph::new(2, DirType::Directed);
        g.add_edge(NodeId(0), NodeId(1), 2.0).unwrap();
        g.add_edge(NodeId(0), NodeId(1), 1.5).unwrap();

        assert_eq!(g.neighbors(NodeId(0)).unwrap().len(), 2);
        assert_eq!(g.aggregate_weight(NodeId(0), NodeId(1)).unwrap(), 3.5);
        assert_eq!(g.aggregate_weight(NodeId(1), NodeId(0)).unwrap(), 0.0);

        g.remove_edge(NodeId(0), NodeId(1)).unwrap();
        assert!(g.neighbors(NodeId(0)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_node_rejected() {
        let mut g = Graph::new(2, DirType::Directed);

        assert!(matches!(
            g.add_edge(NodeId(0), NodeId(2), 1.0),
            Err(GraphError::InvalidNode { node: NodeId(2), num_nodes: 2 })
        ));
        assert!(g.remove_edge(NodeId(5), NodeId(0)).is_err());
        assert!(g.node(NodeId(2)).is_err());
        assert!(g.aggregate_weight(NodeId(0), NodeId(7)).is_err());
    }

    #[test]
    fn test_undirected_edges_reported_once() {
        let mut g = Graph::new(3, DirType::Undirected);
        g.add_edge(NodeId(2), NodeId(0), 4.0).unwrap();
        g.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();

        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.neighbors(NodeId(0)).unwrap().len(), 2);
        let edges = g.edges();
        assert_eq!(edges.len(), 2);
        assert!(edges[0].same_endpoints(&Edge::new(NodeId(2), NodeId(0), 4.0, DirType::Undirected)));

        g.remove_edge(NodeId(0), NodeId(2)).unwrap();
        assert!(g.neighbors(NodeId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_transform_edge_weights() {
        let g = diamond().transform_edge_weights(|w| w * 2.0);
        assert_eq!(g.aggregate_weight(NodeId(1), NodeId(2)).unwrap(), 2.0);
        assert_eq!(g.num_edges(), 5);
    }

    #[test]
    fn test_reader_parses_default_weight() {
        let input = "3\n0 1 2.5\n1 2\n\n";
        let g = Graph::from_reader(input.as_bytes(), DirType::Directed).unwrap();

        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.aggregate_weight(NodeId(0), NodeId(1)).unwrap(), 2.5);
        assert_eq!(g.aggregate_weight(NodeId(1), NodeId(2)).unwrap(), 1.0);
    }

    #[test]
    fn test_reader_rejects_self_loop() {
        let input = "2\n0 1\n1 1 3\n";
        let err = Graph::from_reader(input.as_bytes(), DirType::Directed).unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop { line: 3 }));
    }

    #[test]
    fn test_reader_rejects_malformed_fields() {
        for input in ["x\n", "2\n0\n", "2\n0 1 abc\n", "2\n0 -1\n", "2\n0 1 1 1\n", ""] {
            let err = Graph::from_reader(input.as_bytes(), DirType::Directed).unwrap_err();
            assert!(matches!(err, GraphError::Parse { .. }), "input {:?}", input);
        }
    }

    #[test]
    fn test_reader_rejects_unallocatable_node_count() {
        for count in [usize::MAX, usize::MAX / 8] {
            let input = format!("{}\n0 1\n", count);
            let err = Graph::from_reader(input.as_bytes(), DirType::Directed).unwrap_err();
            assert!(matches!(err, GraphError::Parse { line: 1, .. }), "count {}", count);
        }
        assert!(Graph::try_new(usize::MAX, DirType::Undirected).is_err());
        assert_eq!(Graph::try_new(3, DirType::Directed).unwrap(), Graph::new(3, DirType::Directed));
    }

    #[test]
    fn test_loops_rejected() {
        for dirtype in [DirType::Directed, DirType::Undirected] {
            let mut g = Graph::new(2, dirtype);
            assert!(matches!(
                g.add_edge(NodeId(1), NodeId(1), 1.0),
                Err(GraphError::Loop(NodeId(1)))
            ));
            assert_eq!(g.num_edges(), 0);
            assert!(g.edges().is_empty());
        }
    }

    #[test]
    fn test_reader_rejects_out_of_range_endpoint() {
        let err = Graph::from_reader("2\n0 2\n".as_bytes(), DirType::Directed).unwrap_err();
        assert!(matches!(err, GraphError::InvalidNode { .. }));
    }

    #[test]
    fn test_display_lists_edges() {
        let mut g = Graph::new(2, DirType::Directed);
        g.add_edge(NodeId(0), NodeId(1), 1.0).unwrap();
        let text = g.to_string();

        assert!(text.starts_with("Digraph with 2 vertices"));
        assert!(text.contains("0 - 1 weight = 1"));
    }
}
