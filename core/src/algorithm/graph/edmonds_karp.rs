//! Edmonds-Karp maximum flow
//!
//! Shortest augmenting paths found by BFS over the same residual graph the
//! push-relabel engine maintains. Serves as the independent reference solver.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use log::{debug, trace};

use crate::algorithm::graph::flow::Flow;
use crate::algorithm::graph::max_flow::Network;
use crate::algorithm::graph::residual::ResidualGraph;
use crate::algorithm::traits::{FlowError, MaxFlowSolver, NodeId};

/// BFS augmenting path solver
#[derive(Debug, Clone, Default)]
pub struct EdmondsKarp {
    max_augmentations: Option<usize>,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<'a>(
        &self,
        network: &'a Network,
        source: NodeId,
        sink: NodeId,
    ) -> Result<Flow<'a>, FlowError> {
        let mut flow = Flow::new(network, source, sink)?;
        let mut residual = flow.residual_graph()?;
        let mut augmentations = 0;

        while let Some(path) = shortest_path(&residual, source, sink)? {
            if let Some(limit) = self.max_augmentations {
                if augmentations >= limit {
                    return Err(FlowError::IterationLimitExceeded { limit });
                }
            }

            let mut bottleneck = f64::INFINITY;
            for arc in path.windows(2) {
                bottleneck = bottleneck.min(residual.capacity(arc[0], arc[1])?);
            }
            for arc in path.windows(2) {
                residual.push(arc[0], arc[1], bottleneck)?;
                flow.record_push(arc[0], arc[1], bottleneck)?;
            }

            augmentations += 1;
            trace!("augmented {} along {} arcs", bottleneck, path.len() - 1);
        }

        flow.metrics_mut().augmentations = augmentations;
        debug!(
            "edmonds-karp {} -> {} finished: value={} augmentations={}",
            source,
            sink,
            flow.value(),
            augmentations
        );
        Ok(flow)
    }
}

/// Fewest-arc residual path from `source` to `sink`, if any
fn shortest_path(
    residual: &ResidualGraph,
    source: NodeId,
    sink: NodeId,
) -> Result<Option<Vec<NodeId>>, FlowError> {
    let mut predecessor: Vec<Option<NodeId>> = vec![None; residual.num_nodes()];
    let mut queue = VecDeque::new();
    queue.push_back(source);

    'search: while let Some(node) = queue.pop_front() {
        for n in residual.neighbors(node)? {
            let next = n.id();
            if next == source || predecessor[next.as_usize()].is_some() || n.edge_weight() <= 0.0 {
                continue;
            }
            predecessor[next.as_usize()] = Some(node);
            if next == sink {
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if predecessor[sink.as_usize()].is_none() {
        return Ok(None);
    }

    let mut path = vec![sink];
    let mut node = sink;
    while let Some(prev) = predecessor[node.as_usize()] {
        path.push(prev);
        node = prev;
    }
    path.reverse();
    Ok(Some(path))
}

impl MaxFlowSolver for EdmondsKarp {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), FlowError> {
        match name {
            "max_augmentations" => {
                let limit = value.parse::<usize>().map_err(|_| FlowError::InvalidParameter {
                    name: name.to_string(),
                    reason: "max_augmentations must be a non-negative integer".to_string(),
                })?;
                self.max_augmentations = Some(limit);
                Ok(())
            }
            _ => Err(FlowError::InvalidParameter {
                name: name.to_string(),
                reason: "unknown parameter".to_string(),
            }),
        }
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "max_augmentations" => self.max_augmentations.map(|limit| limit.to_string()),
            _ => None,
        }
    }

    fn solve<'a>(
        &mut self,
        network: &'a Network,
        source: NodeId,
        sink: NodeId,
    ) -> Result<Flow<'a>, FlowError> {
        self.run(network, source, sink)
    }
}
