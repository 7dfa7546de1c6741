//! PREFLOW core - push-relabel maximum flow
//!
//! This crate computes maximum flows on directed capacitated multigraphs with
//! the highest-label push-relabel method. Parallel arcs between the same
//! ordered pair act as one arc whose capacity is their sum.
//!
//! # Layout
//! - [`data_structures`]: the adjacency-list [`Graph`](data_structures::Graph) and its edge-list reader.
//! - [`algorithm`]: networks, residual graphs, height labels, the push-relabel
//!   engine, the Edmonds-Karp reference solver and the [`Flow`](algorithm::Flow) result.
//! - [`validation`]: certificate checks for computed flows.
//!
//! # Example
//! ```
//! use preflow_core::algorithm::{Network, NodeId};
//!
//! let mut network = Network::new(4);
//! network.set_capacity(NodeId(0), NodeId(1), 3.0).unwrap();
//! network.set_capacity(NodeId(0), NodeId(2), 2.0).unwrap();
//! network.set_capacity(NodeId(1), NodeId(3), 2.0).unwrap();
//! network.set_capacity(NodeId(2), NodeId(3), 3.0).unwrap();
//! network.set_capacity(NodeId(1), NodeId(2), 1.0).unwrap();
//!
//! let flow = network.push_relabel(NodeId(0), NodeId(3)).unwrap();
//! assert_eq!(flow.value(), 5.0);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod validation;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
