//! Highest-label push-relabel maximum flow
//!
//! Goldberg-Tarjan push-relabel without global relabeling. The engine keeps a
//! live residual graph, a height function and the set of active nodes, and
//! repeats until no node other than the sink holds positive excess:
//!
//! 1. select the active node with the highest label (lowest id on ties);
//! 2. push along an admissible residual arc if there is one, preferring the
//!    last admissible arc in adjacency order;
//! 3. otherwise relabel the node.
//!
//! # Termination
//! Labels never decrease and stay below `2n`, every relabel raises a label,
//! and only finitely many pushes fit between two relabels.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashSet;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::flow::Flow;
use crate::algorithm::graph::labels::{DistanceLabel, HeightFunction};
use crate::algorithm::graph::max_flow::Network;
use crate::algorithm::graph::preflow::{ActiveSet, ExcessVector};
use crate::algorithm::graph::residual::ResidualGraph;
use crate::algorithm::traits::{FlowError, MaxFlowSolver, NodeId};
use crate::validation::correctness::{verify_flow, DEFAULT_TOLERANCE};

/// Push-relabel parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushRelabelConfig {
    /// Abort with [`FlowError::IterationLimitExceeded`] after this many loop iterations
    pub max_iterations: Option<usize>,
    /// Check the final flow with the correctness validator
    pub verify: bool,
}

/// Single main-loop decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Push { to: NodeId, amount: f64 },
    Relabel { height: DistanceLabel },
}

/// Engine state observed after one main-loop iteration
#[derive(Debug)]
pub struct IterationTrace<'s> {
    pub iteration: usize,
    pub current: NodeId,
    pub step: Step,
    pub heights: &'s HeightFunction,
    pub excess: &'s ExcessVector,
    pub active: &'s ActiveSet,
}

/// Push-relabel solver with highest-label selection
#[derive(Debug, Clone, Default)]
pub struct PushRelabel {
    config: PushRelabelConfig,
}

impl PushRelabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PushRelabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PushRelabelConfig {
        &self.config
    }

    /// Computes a maximum flow
    pub fn run<'a>(
        &self,
        network: &'a Network,
        source: NodeId,
        sink: NodeId,
    ) -> Result<Flow<'a>, FlowError> {
        self.run_traced(network, source, sink, |_| {})
    }

    /// Computes a maximum flow, handing the engine state to `observer` after
    /// every iteration
    pub fn run_traced<'a, F>(
        &self,
        network: &'a Network,
        source: NodeId,
        sink: NodeId,
        mut observer: F,
    ) -> Result<Flow<'a>, FlowError>
    where
        F: FnMut(&IterationTrace<'_>),
    {
        let mut flow = Flow::new(network, source, sink)?;
        let mut state = Preflow::initialize(&mut flow)?;
        let mut iteration = 0;

        while let Some(current) = state.active.select_highest(&state.heights) {
            if let Some(limit) = self.config.max_iterations {
                if iteration >= limit {
                    return Err(FlowError::IterationLimitExceeded { limit });
                }
            }
            iteration += 1;

            let step = match state.admissible_target(current)? {
                Some(target) => {
                    let amount = state.push(&mut flow, current, target)?;
                    if state.excess.get(current) == 0.0 {
                        state.active.remove(current);
                    }
                    if state.excess.get(target) > 0.0 {
                        state.active.insert(target);
                    }
                    flow.metrics_mut().pushes += 1;
                    Step::Push { to: target, amount }
                }
                None => {
                    // the sink is never active; guard anyway so its label stays frozen
                    if current == sink {
                        state.active.remove(current);
                        continue;
                    }
                    let height = state.relabel(current)?;
                    flow.metrics_mut().relabels += 1;
                    Step::Relabel { height }
                }
            };

            observer(&IterationTrace {
                iteration,
                current,
                step,
                heights: &state.heights,
                excess: &state.excess,
                active: &state.active,
            });
        }

        let metrics = flow.metrics_mut();
        metrics.iterations = iteration;
        metrics.max_height = state.heights.max_label();
        debug!(
            "push-relabel {} -> {} finished: value={} pushes={} relabels={} iterations={}",
            source,
            sink,
            flow.value(),
            flow.metrics().pushes,
            flow.metrics().relabels,
            iteration
        );

        if self.config.verify {
            let report = verify_flow(&flow, DEFAULT_TOLERANCE)?;
            debug!("flow verified: {:?}", report);
        }
        Ok(flow)
    }
}

impl MaxFlowSolver for PushRelabel {
    fn name(&self) -> &'static str {
        "Push-Relabel Highest Label"
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), FlowError> {
        match name {
            "max_iterations" => {
                let limit = value.parse::<usize>().map_err(|_| FlowError::InvalidParameter {
                    name: name.to_string(),
                    reason: "max_iterations must be a non-negative integer".to_string(),
                })?;
                self.config.max_iterations = Some(limit);
                Ok(())
            }
            "verify" => {
                self.config.verify = value.parse::<bool>().map_err(|_| FlowError::InvalidParameter {
                    name: name.to_string(),
                    reason: "verify must be true or false".to_string(),
                })?;
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
            "max_iterations" => self.config.max_iterations.map(|limit| limit.to_string()),
            "verify" => Some(self.config.verify.to_string()),
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

/// Working data of one push-relabel run
#[derive(Debug)]
struct Preflow {
    heights: HeightFunction,
    excess: ExcessVector,
    active: ActiveSet,
    residual: ResidualGraph,
}

impl Preflow {
    /// Labels the source with `n` and saturates every arc leaving it
    fn initialize(flow: &mut Flow<'_>) -> Result<Self, FlowError> {
        let network = flow.network();
        let (source, sink) = (flow.source(), flow.sink());
        let num_nodes = network.num_nodes();

        let heights = HeightFunction::new(num_nodes, source);
        let mut excess = ExcessVector::new(num_nodes);

        let mut saturated = HashSet::new();
        for neighbor in network.graph().neighbors(source)? {
            let target = neighbor.id();
            if !saturated.insert(target) {
                continue;
            }
            let capacity = network.capacity(source, target)?;
            if capacity > 0.0 {
                flow.set_usage(source, target, capacity)?;
                excess.transfer(source, target, capacity);
            }
        }

        let residual = flow.residual_graph()?;
        let active = ActiveSet::from_excess(&excess, sink);
        debug!(
            "preflow initialized: {} nodes, {} arcs saturated, {} active",
            num_nodes,
            saturated.len(),
            active.len()
        );

        Ok(Self {
            heights,
            excess,
            active,
            residual,
        })
    }

    /// Admissible residual neighbor of `node`; the last one in adjacency order wins
    fn admissible_target(&self, node: NodeId) -> Result<Option<NodeId>, FlowError> {
        Ok(self
            .residual
            .neighbors(node)?
            .iter()
            .map(|n| n.id())
            .filter(|&w| self.heights.is_admissible(node, w))
            .last())
    }

    /// Pushes `min(excess, residual capacity)` along `from -> to`
    fn push(&mut self, flow: &mut Flow<'_>, from: NodeId, to: NodeId) -> Result<f64, FlowError> {
        let available = self.excess.get(from);
        if !(available > 0.0) {
            return Err(FlowError::InvalidPush {
                from,
                to,
                reason: format!("excess {} is not positive", available),
            });
        }
        let res_cap = self.residual.capacity(from, to)?;
        if !(res_cap > 0.0) {
            return Err(FlowError::InvalidPush {
                from,
                to,
                reason: "no residual capacity".to_string(),
            });
        }

        let gamma = available.min(res_cap);
        self.residual.push(from, to, gamma)?;
        self.excess.transfer(from, to, gamma);
        flow.record_push(from, to, gamma)?;

        trace!("push {} -> {}: {} of {}", from, to, gamma, res_cap);
        Ok(gamma)
    }

    fn relabel(&mut self, node: NodeId) -> Result<DistanceLabel, FlowError> {
        let height = self.heights.relabel(node, &self.residual)?;
        trace!("relabel {} to {}", node, height);
        Ok(height)
    }
}
