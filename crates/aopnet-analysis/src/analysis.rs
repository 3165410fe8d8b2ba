//! Public analysis entry points.
//!
//! The three single-purpose functions ([`find_feedback_relationships`],
//! [`get_indirect_relationships`], [`get_layers`]) each index the network
//! and run feedback detection on their own. [`analyze`] runs feedback
//! detection once and shares the result between the reducer and the layer
//! assigner; [`analyze_graph`] does the same over an existing
//! [`NetworkGraph`].
//!
//! All results borrow from the input [`Network`].

use std::collections::BTreeSet;

use aopnet_core::{Event, FeedbackStrategy, GraphError, Layer, Network, Relationship};
use fixedbitset::FixedBitSet;
use petgraph::graph::EdgeIndex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::{EdgeView, NetworkGraph, assign_layers, feedback_edges, indirect_edges};

/// Tunables for [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub feedback_strategy: FeedbackStrategy,
}

impl AnalysisOptions {
    #[must_use]
    pub const fn with_strategy(strategy: FeedbackStrategy) -> Self {
        Self {
            feedback_strategy: strategy,
        }
    }
}

/// Everything derived from one network in a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkAnalysis<'a> {
    /// Ordered layers; events within a layer are sorted by id.
    pub layers: Vec<Layer<'a>>,
    /// Relationships that close a cycle.
    pub feedback: BTreeSet<&'a Relationship>,
    /// Relationships redundant for display.
    pub indirect: BTreeSet<&'a Relationship>,
    /// Relationships that are neither feedback nor indirect.
    pub displayed: BTreeSet<&'a Relationship>,
    /// Events that are in no layer, in network order.
    pub unplaced: Vec<&'a Event>,
    pub strategy: FeedbackStrategy,
    /// BLAKE3 content hash of the network.
    pub fingerprint: String,
}

impl NetworkAnalysis<'_> {
    /// Index of the layer holding `event_id`, if it was placed.
    #[must_use]
    pub fn layer_of(&self, event_id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.contains(event_id))
    }

    /// Number of events placed in some layer.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }
}

/// Relationships that close a cycle, found with the default path-local walk.
///
/// # Errors
///
/// Returns [`GraphError::Malformed`] if the network is not closed or has
/// duplicate event ids.
pub fn find_feedback_relationships(
    network: &Network,
) -> Result<BTreeSet<&Relationship>, GraphError> {
    find_feedback_relationships_with(network, FeedbackStrategy::default())
}

/// Relationships that close a cycle, found with `strategy`.
///
/// # Errors
///
/// Returns [`GraphError::Malformed`] for malformed networks.
#[instrument(skip(network), fields(network = network.title().unwrap_or_default()))]
pub fn find_feedback_relationships_with(
    network: &Network,
    strategy: FeedbackStrategy,
) -> Result<BTreeSet<&Relationship>, GraphError> {
    let graph = NetworkGraph::from_network(network)?;
    let feedback = feedback_edges(&graph, strategy);
    Ok(graph.relationships_in(&feedback))
}

/// Relationships made redundant by a longer path, ignoring feedback edges.
///
/// # Errors
///
/// Returns [`GraphError::Malformed`] for malformed networks.
#[instrument(skip(network), fields(network = network.title().unwrap_or_default()))]
pub fn get_indirect_relationships(
    network: &Network,
) -> Result<BTreeSet<&Relationship>, GraphError> {
    let graph = NetworkGraph::from_network(network)?;
    let view = EdgeView::without(&graph, feedback_edges(&graph, FeedbackStrategy::default()));
    Ok(graph.relationships_in(&indirect_edges(&view)))
}

/// Ordered biological layers of the network, ignoring feedback edges.
///
/// # Errors
///
/// Returns [`GraphError::Malformed`] for malformed networks.
#[instrument(skip(network), fields(network = network.title().unwrap_or_default()))]
pub fn get_layers(network: &Network) -> Result<Vec<Layer<'_>>, GraphError> {
    let graph = NetworkGraph::from_network(network)?;
    let view = EdgeView::without(&graph, feedback_edges(&graph, FeedbackStrategy::default()));
    Ok(assign_layers(&view)?.layers)
}

/// Run feedback detection once and derive layers, indirect and displayed
/// relationships from it.
///
/// # Errors
///
/// Returns [`GraphError::Malformed`] for malformed networks.
#[instrument(skip(network, options), fields(network = network.title().unwrap_or_default(), strategy = options.feedback_strategy.as_str()))]
pub fn analyze<'a>(
    network: &'a Network,
    options: &AnalysisOptions,
) -> Result<NetworkAnalysis<'a>, GraphError> {
    let graph = NetworkGraph::from_network(network)?;
    analyze_graph(&graph, options)
}

/// [`analyze`] over a graph the caller has already indexed, so the index
/// can be shared with other passes over the same network.
///
/// # Errors
///
/// Propagates [`GraphError`] from layer construction.
pub fn analyze_graph<'a>(
    graph: &NetworkGraph<'a>,
    options: &AnalysisOptions,
) -> Result<NetworkAnalysis<'a>, GraphError> {
    let feedback = feedback_edges(graph, options.feedback_strategy);
    let view = EdgeView::without(graph, feedback.clone());
    let indirect = indirect_edges(&view);
    let layering = assign_layers(&view)?;

    let displayed = displayed_edges(graph, &feedback, &indirect);
    let analysis = NetworkAnalysis {
        layers: layering.layers,
        feedback: graph.relationships_in(&feedback),
        indirect: graph.relationships_in(&indirect),
        displayed: graph.relationships_in(&displayed),
        unplaced: layering
            .unplaced
            .into_iter()
            .map(|node| graph.event(node))
            .collect(),
        strategy: options.feedback_strategy,
        fingerprint: graph.content_hash.clone(),
    };

    debug!(
        layers = analysis.layers.len(),
        feedback = analysis.feedback.len(),
        indirect = analysis.indirect.len(),
        displayed = analysis.displayed.len(),
        unplaced = analysis.unplaced.len(),
        "analysis complete"
    );
    Ok(analysis)
}

fn displayed_edges(
    graph: &NetworkGraph<'_>,
    feedback: &FixedBitSet,
    indirect: &FixedBitSet,
) -> FixedBitSet {
    let mut displayed = graph.edge_set();
    for edge in graph.graph.edge_indices().map(EdgeIndex::index) {
        if !feedback.contains(edge) && !indirect.contains(edge) {
            displayed.insert(edge);
        }
    }
    displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use aopnet_core::{BiologicalLevel, MalformedGraphError};

    /// A → B → C with shortcut A → C, plus a C ⇄ D loop.
    fn looped() -> Network {
        Network::new(
            "looped",
            vec![
                Event::new("A", BiologicalLevel::Molecular),
                Event::new("B", BiologicalLevel::Cellular),
                Event::new("C", BiologicalLevel::Tissue),
                Event::new("D", BiologicalLevel::Individual),
            ],
            vec![
                Relationship::new("A", "B"),
                Relationship::new("B", "C"),
                Relationship::new("A", "C"),
                Relationship::new("C", "D"),
                Relationship::new("D", "C"),
            ],
        )
    }

    fn names(set: &BTreeSet<&Relationship>) -> Vec<String> {
        set.iter().map(|r| r.name().to_string()).collect()
    }

    #[test]
    fn analyze_partitions_relationships() {
        let net = looped();
        let analysis = analyze(&net, &AnalysisOptions::default()).expect("analysis");

        assert_eq!(names(&analysis.feedback), vec!["C>D"]);
        assert_eq!(names(&analysis.indirect), vec!["A>C"]);
        assert_eq!(names(&analysis.displayed), vec!["A>B", "B>C", "D>C"]);
        assert_eq!(
            analysis.feedback.len() + analysis.indirect.len() + analysis.displayed.len(),
            net.relationships.len()
        );
    }

    #[test]
    fn single_purpose_functions_agree_with_analyze() {
        let net = looped();
        let analysis = analyze(&net, &AnalysisOptions::default()).expect("analysis");
        assert_eq!(
            find_feedback_relationships(&net).expect("feedback"),
            analysis.feedback
        );
        assert_eq!(
            get_indirect_relationships(&net).expect("indirect"),
            analysis.indirect
        );
        assert_eq!(get_layers(&net).expect("layers"), analysis.layers);
    }

    #[test]
    fn analyze_graph_matches_analyze() {
        let net = looped();
        let options = AnalysisOptions::with_strategy(FeedbackStrategy::EdgeColoring);
        let graph = NetworkGraph::from_network(&net).expect("graph");
        let shared = analyze_graph(&graph, &options).expect("analysis");
        let fresh = analyze(&net, &options).expect("analysis");

        assert_eq!(shared.layers, fresh.layers);
        assert_eq!(shared.feedback, fresh.feedback);
        assert_eq!(shared.indirect, fresh.indirect);
        assert_eq!(shared.displayed, fresh.displayed);
        assert_eq!(shared.unplaced, fresh.unplaced);
        assert_eq!(shared.fingerprint, fresh.fingerprint);
    }

    #[test]
    fn layer_of_and_placed_count() {
        let net = looped();
        let analysis = analyze(&net, &AnalysisOptions::default()).expect("analysis");
        // Once C → D is cut, D becomes a root; C waits for it.
        assert_eq!(analysis.layer_of("A"), Some(0));
        assert_eq!(analysis.layer_of("B"), Some(1));
        assert_eq!(analysis.layer_of("D"), Some(2));
        assert_eq!(analysis.layer_of("C"), Some(3));
        assert_eq!(analysis.layer_of("Z"), None);
        assert_eq!(analysis.placed_count(), 4);
        assert!(analysis.unplaced.is_empty());
    }

    #[test]
    fn malformed_network_is_rejected_everywhere() {
        let net = Network::new(
            "broken",
            vec![Event::new("A", BiologicalLevel::Molecular)],
            vec![Relationship::new("A", "missing")],
        );
        let expected = GraphError::Malformed(MalformedGraphError::UnknownEvent {
            relationship: "A>missing".to_string(),
            event_id: "missing".to_string(),
        });
        assert_eq!(find_feedback_relationships(&net).unwrap_err(), expected);
        assert_eq!(get_indirect_relationships(&net).unwrap_err(), expected);
        assert_eq!(get_layers(&net).unwrap_err(), expected);
        assert_eq!(
            analyze(&net, &AnalysisOptions::default()).unwrap_err(),
            expected
        );
    }

    #[test]
    fn analysis_serializes_ids_and_levels() {
        let net = looped();
        let analysis = analyze(&net, &AnalysisOptions::default()).expect("analysis");
        let json = serde_json::to_value(&analysis).expect("serialize");
        assert_eq!(json["strategy"], "path-local");
        assert_eq!(json["layers"][0]["level"], "molecular");
        assert_eq!(json["layers"][0]["events"][0]["id"], "A");
        assert_eq!(json["feedback"][0]["from"], "C");
        assert!(
            json["fingerprint"]
                .as_str()
                .is_some_and(|f| f.starts_with("blake3:"))
        );
    }
}
