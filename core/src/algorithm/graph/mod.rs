//! Maximum flow algorithms over capacitated networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod edmonds_karp;
pub mod flow;
pub mod labels;
pub mod max_flow;
pub mod preflow;
pub mod push_relabel;
pub mod residual;

pub use self::edmonds_karp::EdmondsKarp;
pub use self::flow::{ArcUsage, Flow, FlowMetrics, FlowSummary};
pub use self::labels::{DistanceLabel, HeightFunction};
pub use self::max_flow::{Capacity, MaxFlowAlgorithm, Network};
pub use self::preflow::{ActiveSet, ExcessVector};
pub use self::push_relabel::{IterationTrace, PushRelabel, PushRelabelConfig, Step};
pub use self::residual::ResidualGraph;
