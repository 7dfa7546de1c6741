//! Flow correctness verification
//!
//! Checks a computed [`Flow`] against the defining properties of a maximum
//! flow and produces a certificate:
//!
//! - capacity respect: `usage(a, b) <= capacity(a, b)` for every ordered pair;
//! - conservation: zero excess at every node other than source and sink;
//! - value consistency: what leaves the source arrives at the sink;
//! - optimality: the residual cut around the source has capacity equal to the value.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::Flow;
use crate::algorithm::traits::{FlowError, NodeId};

/// Default relative tolerance for floating-point comparisons
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Certificate produced by a successful verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectnessReport {
    pub value: f64,
    pub cut_capacity: f64,
    pub source_side: Vec<NodeId>,
    pub arcs_checked: usize,
    pub max_conservation_error: f64,
}

#[inline]
fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * (1.0 + a.abs().max(b.abs()))
}

/// Verifies `flow` is a feasible maximum flow
pub fn verify_flow(flow: &Flow<'_>, tolerance: f64) -> Result<CorrectnessReport, FlowError> {
    let network = flow.network();
    let (source, sink) = (flow.source(), flow.sink());

    let used_arcs = flow.usage_graph().edges();
    for arc in &used_arcs {
        let capacity = network.capacity(arc.start(), arc.end())?;
        if arc.weight() < 0.0 || (arc.weight() > capacity && !within(arc.weight(), capacity, tolerance)) {
            return Err(FlowError::InvariantViolated(format!(
                "usage {} on {} exceeds capacity {}",
                arc.weight(),
                arc,
                capacity
            )));
        }
    }

    let mut max_conservation_error: f64 = 0.0;
    for i in 0..network.num_nodes() {
        let node = NodeId(i);
        if node == source || node == sink {
            continue;
        }
        let excess = flow.excess(node)?;
        max_conservation_error = max_conservation_error.max(excess.abs());
        if !within(excess, 0.0, tolerance) {
            return Err(FlowError::InvariantViolated(format!(
                "node {} has excess {}",
                node, excess
            )));
        }
    }

    let value = flow.value();
    let arrived = flow.excess(sink)?;
    if !within(value, arrived, tolerance) {
        return Err(FlowError::InvariantViolated(format!(
            "source sends {} but sink receives {}",
            value, arrived
        )));
    }

    let source_side = flow.min_cut()?;
    if source_side.contains(&sink) {
        return Err(FlowError::InvariantViolated(
            "sink is reachable in the residual graph".into(),
        ));
    }
    let mut on_source_side = vec![false; network.num_nodes()];
    for node in &source_side {
        on_source_side[node.as_usize()] = true;
    }
    let cut_capacity: f64 = network
        .edges()
        .iter()
        .filter(|e| on_source_side[e.start().as_usize()] && !on_source_side[e.end().as_usize()])
        .map(|e| e.weight())
        .sum();
    if !within(cut_capacity, value, tolerance) {
        return Err(FlowError::InvariantViolated(format!(
            "cut capacity {} differs from value {}",
            cut_capacity, value
        )));
    }

    Ok(CorrectnessReport {
        value,
        cut_capacity,
        source_side,
        arcs_checked: used_arcs.len(),
        max_conservation_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::{EdmondsKarp, Network, PushRelabel};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_network(rng: &mut StdRng, num_nodes: usize, density: f64) -> Network {
        let mut network = Network::new(num_nodes);
        for a in 0..num_nodes {
            for b in 0..num_nodes {
                if a != b && rng.gen_bool(density) {
                    let capacity = rng.gen_range(0..10) as f64;
                    network.add_edge(NodeId(a), NodeId(b), capacity).unwrap();
                    if rng.gen_bool(0.1) {
                        // occasional parallel arc
                        network.add_edge(NodeId(a), NodeId(b), 1.0).unwrap();
                    }
                }
            }
        }
        network
    }

    /// Minimum cut capacity over every source/sink bipartition
    fn brute_force_min_cut(network: &Network, source: NodeId, sink: NodeId) -> f64 {
        let n = network.num_nodes();
        let mut best = f64::INFINITY;
        for mask in 0u32..(1 << n) {
            let inside = |v: NodeId| mask & (1 << v.as_usize()) != 0;
            if !inside(source) || inside(sink) {
                continue;
            }
            let cut: f64 = network
                .edges()
                .iter()
                .filter(|e| inside(e.start()) && !inside(e.end()))
                .map(|e| e.weight())
                .sum();
            best = best.min(cut);
        }
        best
    }

    #[test]
    fn test_diamond_certificate() {
        let network = Network::from_reader("4\n0 1 3\n0 2 2\n1 3 2\n2 3 3\n1 2 1\n".as_bytes()).unwrap();
        let flow = PushRelabel::new().run(&network, NodeId(0), NodeId(3)).unwrap();
        let report = verify_flow(&flow, DEFAULT_TOLERANCE).unwrap();

        assert_relative_eq!(report.value, 5.0);
        assert_relative_eq!(report.cut_capacity, 5.0);
        assert!(report.source_side.contains(&NodeId(0)));
        assert!(!report.source_side.contains(&NodeId(3)));
        assert_relative_eq!(report.max_conservation_error, 0.0);
    }

    #[test]
    fn test_capacity_violation_detected() {
        let mut network = Network::new(2);
        network.set_capacity(NodeId(0), NodeId(1), 2.0).unwrap();
        let mut flow = crate::algorithm::graph::Flow::new(&network, NodeId(0), NodeId(1)).unwrap();
        flow.set_usage(NodeId(0), NodeId(1), 3.0).unwrap();

        assert!(matches!(
            verify_flow(&flow, DEFAULT_TOLERANCE),
            Err(FlowError::InvariantViolated(_))
        ));
    }

    #[test]
    fn test_conservation_violation_detected() {
        let mut network = Network::new(3);
        network.set_capacity(NodeId(0), NodeId(1), 2.0).unwrap();
        network.set_capacity(NodeId(1), NodeId(2), 2.0).unwrap();
        let mut flow = crate::algorithm::graph::Flow::new(&network, NodeId(0), NodeId(2)).unwrap();
        flow.set_usage(NodeId(0), NodeId(1), 2.0).unwrap();
        flow.set_usage(NodeId(1), NodeId(2), 1.0).unwrap();

        let err = verify_flow(&flow, DEFAULT_TOLERANCE).unwrap_err();
        assert!(err.to_string().contains("node 1 has excess"));
    }

    #[test]
    fn test_non_maximum_flow_detected() {
        let mut network = Network::new(2);
        network.set_capacity(NodeId(0), NodeId(1), 2.0).unwrap();
        let mut flow = crate::algorithm::graph::Flow::new(&network, NodeId(0), NodeId(1)).unwrap();
        flow.set_usage(NodeId(0), NodeId(1), 1.0).unwrap();

        assert!(verify_flow(&flow, DEFAULT_TOLERANCE).is_err());
    }

    #[test]
    fn test_randomized_cross_check() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for round in 0..200 {
            let n = rng.gen_range(2..=7);
            let density = rng.gen_range(0.2..0.8);
            let network = random_network(&mut rng, n, density);
            let source = NodeId(rng.gen_range(0..n));
            let sink = NodeId((source.as_usize() + rng.gen_range(1..n)) % n);

            let push_relabel = PushRelabel::new().run(&network, source, sink).unwrap();
            let reference = EdmondsKarp::new().run(&network, source, sink).unwrap();
            let brute = brute_force_min_cut(&network, source, sink);

            assert_relative_eq!(push_relabel.value(), reference.value(), epsilon = 1e-9);
            assert_relative_eq!(push_relabel.value(), brute, epsilon = 1e-9);
            verify_flow(&push_relabel, DEFAULT_TOLERANCE)
                .unwrap_or_else(|e| panic!("round {}: {}", round, e));
            verify_flow(&reference, DEFAULT_TOLERANCE)
                .unwrap_or_else(|e| panic!("round {}: {}", round, e));

            let metrics = push_relabel.metrics();
            assert!(metrics.max_height <= 2 * n - 1, "round {}: height {}", round, metrics.max_height);
            assert!(metrics.relabels <= n * (2 * n - 1));
        }
    }

    #[test]
    fn test_adversarial_terminates_within_bound() {
        // wide fan-out into a unit-capacity chain; almost all excess has to return to the source
        let n = 12;
        let mut network = Network::new(n);
        network.set_capacity(NodeId(0), NodeId(n - 1), 100.0).unwrap();
        for i in 1..n - 1 {
            network.set_capacity(NodeId(0), NodeId(i), 100.0).unwrap();
            network.set_capacity(NodeId(i), NodeId(i + 1), 1.0).unwrap();
            network.set_capacity(NodeId(i + 1), NodeId(i), 1.0).unwrap();
        }
        let solver = PushRelabel::with_config(crate::algorithm::graph::PushRelabelConfig {
            max_iterations: Some(n.pow(4)),
            verify: true,
        });
        let flow = solver.run(&network, NodeId(0), NodeId(n - 1)).unwrap();

        assert_relative_eq!(flow.value(), 101.0);
    }
}
