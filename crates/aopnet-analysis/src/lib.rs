#![forbid(unsafe_code)]
//! aopnet-analysis library.
//!
//! Structural analysis of Adverse Outcome Pathway networks: feedback
//! (cycle-closing) relationships, indirect (transitively redundant)
//! relationships, and ordered biological layers for staged rendering.
//!
//! # Conventions
//!
//! - **Errors**: every entry point returns
//!   `Result<_, aopnet_core::GraphError>`; a malformed network is rejected
//!   before any algorithm runs.
//! - **Logging**: `tracing` spans on the public entry points, `debug!` for
//!   per-phase counts, `warn!` for root-less networks and unplaced events.
//! - **Determinism**: relationship sets are `BTreeSet`s, layer members are
//!   sorted by id, and traversals follow network order.

pub mod analysis;
pub mod diagnostics;
pub mod graph;
pub mod stats;

pub use analysis::{
    AnalysisOptions, NetworkAnalysis, analyze, analyze_graph, find_feedback_relationships,
    find_feedback_relationships_with, get_indirect_relationships, get_layers,
};
pub use diagnostics::{Finding, diagnose};
pub use stats::NetworkStats;
