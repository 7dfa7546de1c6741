//! Core trait and type definitions for the flow engines
//!
//! This module establishes the identifiers, the error taxonomy and the solver
//! interface shared by every maximum flow implementation in the crate.
//!
//! # Error Taxonomy
//! - Structural errors (bad node ids, malformed input) surface as
//!   [`GraphError`] and are wrapped into [`FlowError::Graph`].
//! - Algorithmic precondition failures (a push without excess or residual
//!   capacity) are reported as [`FlowError::InvalidPush`]; the main loops guard
//!   against them, so seeing one indicates a bug rather than bad input.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::{Flow, Network};
use crate::data_structures::graph::GraphError;

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comprehensive error types for flow computations
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Source and sink must differ, both are {0}")]
    SourceIsSink(NodeId),

    #[error("Invalid capacity {capacity} on edge {from} -> {to}")]
    InvalidCapacity {
        from: NodeId,
        to: NodeId,
        capacity: f64,
    },

    #[error("Invalid push {from} -> {to}: {reason}")]
    InvalidPush {
        from: NodeId,
        to: NodeId,
        reason: String,
    },

    #[error("Iteration limit of {limit} exceeded")]
    IterationLimitExceeded { limit: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Flow invariant violated: {0}")]
    InvariantViolated(String),
}

/// Maximum flow solver interface
///
/// Solvers are configured through string parameters before [`MaxFlowSolver::solve`]
/// runs them on a network. A solver never mutates the network it is given.
pub trait MaxFlowSolver: Debug {
    /// Returns the solver's descriptive name
    fn name(&self) -> &'static str;

    /// Sets a solver parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), FlowError>;

    /// Gets a solver parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// Computes a maximum flow from `source` to `sink`
    fn solve<'a>(
        &mut self,
        network: &'a Network,
        source: NodeId,
        sink: NodeId,
    ) -> Result<Flow<'a>, FlowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_type_safety() {
        let node1 = NodeId(42);
        let node2 = NodeId::from(42);
        let node3 = NodeId(43);

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
        assert!(node1 < node3);
        assert_eq!(node1.as_usize(), 42);
        assert_eq!(node3.to_string(), "43");
    }

    #[test]
    fn test_graph_errors_convert() {
        let err: FlowError = GraphError::EdgeNotFound(NodeId(1), NodeId(2)).into();
        assert!(matches!(err, FlowError::Graph(GraphError::EdgeNotFound(_, _))));
        assert_eq!(err.to_string(), "No edge from 1 to 2");
    }
}
