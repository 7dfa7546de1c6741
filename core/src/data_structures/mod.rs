//! Graph storage shared by the flow algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;

pub use self::graph::{DirType, Edge, Graph, GraphError, Neighbor, Node};
