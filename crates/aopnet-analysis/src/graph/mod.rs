//! Graph module for network analysis.
//!
//! # Overview
//!
//! This module indexes a [`aopnet_core::Network`] as a petgraph directed
//! graph and runs the three structural passes over it. Each pass after
//! feedback detection works on one feedback-free [`EdgeView`]; the network
//! itself is never modified.
//!
//! ## Pipeline
//!
//! ```text
//! Network
//!        ↓  build::NetworkGraph::from_network()
//! NetworkGraph (DiGraph, possibly cyclic)
//!        ↓  feedback::feedback_edges()
//! feedback edge bitset
//!        ↓  view::EdgeView::without()
//! EdgeView (acyclic on the part reachable from roots)
//!   ├─ indirect::indirect_edges()   transitively redundant edges
//!   └─ layers::assign_layers()      ordered biological layers
//! ```
//!
//! ## Cache Invalidation
//!
//! [`NetworkGraph::content_hash`] is a BLAKE3 hash of the event and edge
//! sets. Compare it against a stored value to detect when a cached layout
//! needs to be recomputed.

pub mod build;
pub mod feedback;
pub mod indirect;
pub mod layers;
pub mod view;

pub use build::NetworkGraph;
pub use feedback::feedback_edges;
pub use indirect::indirect_edges;
pub use layers::{Layering, assign_layers};
pub use view::EdgeView;
