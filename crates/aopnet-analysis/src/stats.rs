//! Summary statistics for a network and its analysis.
//!
//! # Statistics Provided
//!
//! - **event_count** / **relationship_count**: size of the network;
//!   relationships are counted once per distinct edge.
//! - **root_count**: events no relationship targets.
//! - **sink_count**: events with no outgoing relationship.
//! - **self_loop_count**: relationships whose endpoints coincide.
//! - **feedback_count**, **indirect_count**, **displayed_count**: the three
//!   edge categories of [`crate::NetworkAnalysis`]; they sum to
//!   `relationship_count`.
//! - **layer_count** / **widest_layer**: number of layers and the size of the
//!   largest one.
//! - **unplaced_count**: events missing from every layer.
//! - **levels**: events per biological level.

use std::collections::BTreeMap;

use aopnet_core::{BiologicalLevel, GraphError, Layer, Network};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::analysis::{AnalysisOptions, NetworkAnalysis, analyze_graph};
use crate::graph::NetworkGraph;

// ---------------------------------------------------------------------------
// NetworkStats
// ---------------------------------------------------------------------------

/// Summary statistics for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub event_count: usize,
    /// Distinct relationships (exact duplicates counted once).
    pub relationship_count: usize,
    pub root_count: usize,
    pub sink_count: usize,
    pub self_loop_count: usize,
    pub feedback_count: usize,
    pub indirect_count: usize,
    pub displayed_count: usize,
    pub layer_count: usize,
    /// Size of the largest layer; zero when there are no layers.
    pub widest_layer: usize,
    pub unplaced_count: usize,
    /// Events per level. Levels without events are omitted.
    pub levels: BTreeMap<BiologicalLevel, usize>,
}

impl NetworkStats {
    /// Analyze `network` and summarize it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Malformed`] for malformed networks.
    pub fn from_network(network: &Network, options: &AnalysisOptions) -> Result<Self, GraphError> {
        let graph = NetworkGraph::from_network(network)?;
        let analysis = analyze_graph(&graph, options)?;
        Ok(Self::from_parts(&graph, &analysis))
    }

    /// Summarize an already indexed and analyzed network.
    #[must_use]
    pub fn from_parts(graph: &NetworkGraph<'_>, analysis: &NetworkAnalysis<'_>) -> Self {
        let g = &graph.graph;
        let has_edge = |node: NodeIndex, dir: Direction| g.edges_directed(node, dir).next().is_some();

        let root_count = g
            .node_indices()
            .filter(|&n| !has_edge(n, Direction::Incoming))
            .count();
        let sink_count = g
            .node_indices()
            .filter(|&n| !has_edge(n, Direction::Outgoing))
            .count();
        let self_loop_count = g
            .edge_indices()
            .filter(|&e| graph.relationship(e).is_self_loop())
            .count();

        let mut levels: BTreeMap<BiologicalLevel, usize> = BTreeMap::new();
        for node in g.node_indices() {
            *levels.entry(graph.event(node).level).or_default() += 1;
        }

        Self {
            event_count: graph.node_count(),
            relationship_count: graph.edge_count(),
            root_count,
            sink_count,
            self_loop_count,
            feedback_count: analysis.feedback.len(),
            indirect_count: analysis.indirect.len(),
            displayed_count: analysis.displayed.len(),
            layer_count: analysis.layers.len(),
            widest_layer: analysis.layers.iter().map(Layer::len).max().unwrap_or(0),
            unplaced_count: analysis.unplaced.len(),
            levels,
        }
    }
}
