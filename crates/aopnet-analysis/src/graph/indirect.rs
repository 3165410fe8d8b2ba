//! Indirect (transitively redundant) relationship detection.
//!
//! An edge `n → s` is indirect when `s` is also reachable from `n` through
//! some other successor of `n`, i.e. along a path of length two or more.
//! This is a display-oriented reduction: parallel edges between the same
//! pair stay direct, and self-loops are never successors.
//!
//! The walk runs on a feedback-free [`EdgeView`] and is seeded from that
//! view's roots. Reach sets are memoized per node in post-order, so each
//! node is expanded once per call.

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument, trace};

use super::view::EdgeView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

/// Find the indirect edges of `view`.
///
/// Returns a bitset over edge indices. A node still open on the walk (only
/// possible if the view is cyclic) contributes an empty reach set.
#[must_use]
#[instrument(skip(view))]
pub fn indirect_edges(view: &EdgeView<'_, '_>) -> FixedBitSet {
    let graph = view.graph();
    let mut indirect = graph.edge_set();
    let mut reach: Vec<FixedBitSet> = vec![FixedBitSet::new(); graph.node_count()];
    let mut state = vec![Visit::New; graph.node_count()];
    let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();

    for root in view.roots() {
        if state[root.index()] != Visit::New {
            continue;
        }
        state[root.index()] = Visit::Open;
        stack.push((root, view.successors(root), 0));

        while let Some((node, successors, cursor)) = stack.last_mut() {
            if let Some(&next) = successors.get(*cursor) {
                *cursor += 1;
                if state[next.index()] == Visit::New {
                    state[next.index()] = Visit::Open;
                    let next_successors = view.successors(next);
                    stack.push((next, next_successors, 0));
                }
                continue;
            }

            let node = *node;
            let successors = std::mem::take(successors);
            stack.pop();

            let mut deep = graph.node_set();
            for &s in &successors {
                deep.union_with(&reach[s.index()]);
            }
            for (edge, target) in view.outgoing(node) {
                if target != node && deep.contains(target.index()) {
                    trace!(edge = %graph.relationship(edge), "indirect edge");
                    indirect.insert(edge.index());
                }
            }
            for &s in &successors {
                deep.insert(s.index());
            }
            reach[node.index()] = deep;
            state[node.index()] = Visit::Done;
        }
    }

    debug!(indirect = indirect.count_ones(..), "indirect detection complete");
    indirect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::NetworkGraph;
    use aopnet_core::{BiologicalLevel, Event, Network, Relationship};

    fn network(ids: &[&str], edges: &[(&str, &str)]) -> Network {
        Network::new(
            "indirect",
            ids.iter()
                .map(|id| Event::new(*id, BiologicalLevel::Tissue))
                .collect(),
            edges
                .iter()
                .map(|(a, b)| Relationship::new(*a, *b))
                .collect(),
        )
    }

    fn names(net: &Network) -> Vec<String> {
        let graph = NetworkGraph::from_network(net).expect("graph");
        let view = EdgeView::full(&graph);
        let bits = indirect_edges(&view);
        graph
            .relationships_in(&bits)
            .into_iter()
            .map(|rel| rel.name().to_string())
            .collect()
    }

    #[test]
    fn diamond_shortcut_is_indirect() {
        let net = network(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("A", "D")],
        );
        assert_eq!(names(&net), vec!["A>D"]);
    }

    #[test]
    fn chain_has_no_indirect_edges() {
        let net = network(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(names(&net).is_empty());
    }

    #[test]
    fn long_shortcut_is_indirect() {
        let net = network(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("A", "E"), ("B", "E")],
        );
        assert_eq!(names(&net), vec!["A>E", "B>E"]);
    }

    #[test]
    fn shared_subtree_is_memoized_consistently() {
        // D is reached from both B and C; its reach must be the same either way.
        let net = network(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E"), ("C", "E")],
        );
        assert_eq!(names(&net), vec!["C>E"]);
    }

    #[test]
    fn parallel_edges_are_not_indirect() {
        let mut net = network(&["A", "B"], &[("A", "B")]);
        net.relationships
            .push(Relationship::new("A", "B").with_name("again"));
        assert!(names(&net).is_empty());
    }

    #[test]
    fn unreachable_component_is_skipped() {
        // The cycle has no root, so its shortcut is never examined.
        let net = network(
            &["X", "Y", "Z"],
            &[("X", "Y"), ("Y", "Z"), ("Z", "X"), ("X", "Z")],
        );
        assert!(names(&net).is_empty());
    }
}
