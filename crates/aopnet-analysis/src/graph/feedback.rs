//! Feedback (cycle-closing) relationship detection.
//!
//! # Strategies
//!
//! Both strategies start from the root events of the *full* network (events
//! no relationship targets) and only ever see the part of the network
//! reachable from them. A network without roots has no feedback edges.
//!
//! - [`FeedbackStrategy::PathLocal`] walks every path that starts with a
//!   root edge. Each branch tracks exactly the edges on its own path; when
//!   the walk is about to take an edge already on the path, that edge is
//!   reported and the branch stops. Worst case is exponential in the number
//!   of paths.
//! - [`FeedbackStrategy::EdgeColoring`] is a single white/gray/black DFS;
//!   an edge into a gray (on-stack) node is reported. Linear time.
//!
//! On `R → A → B → A` path-local reports `A → B` (the first edge of the
//! cycle to repeat) while edge coloring reports `B → A` (the back edge).
//! Either set breaks every root-reachable cycle.

use aopnet_core::FeedbackStrategy;
use fixedbitset::FixedBitSet;
use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, instrument, trace};

use super::build::NetworkGraph;
use super::view::EdgeView;

type Adjacency = Vec<Vec<(EdgeIndex, NodeIndex)>>;

/// Find the feedback edges of `graph` with `strategy`.
///
/// Returns a bitset over edge indices.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn feedback_edges(graph: &NetworkGraph<'_>, strategy: FeedbackStrategy) -> FixedBitSet {
    let view = EdgeView::full(graph);
    let roots = view.roots();
    let adjacency: Adjacency = graph
        .graph
        .node_indices()
        .map(|node| view.outgoing(node))
        .collect();

    let feedback = match strategy {
        FeedbackStrategy::PathLocal => path_local(graph, &roots, &adjacency),
        FeedbackStrategy::EdgeColoring => edge_coloring(graph, &roots, &adjacency),
    };

    debug!(
        roots = roots.len(),
        feedback = feedback.count_ones(..),
        strategy = strategy.as_str(),
        "feedback detection complete"
    );
    feedback
}

/// Enumerate every path from each root edge with a push/pop path set.
fn path_local(graph: &NetworkGraph<'_>, roots: &[NodeIndex], adjacency: &Adjacency) -> FixedBitSet {
    let mut feedback = graph.edge_set();
    let mut on_path = graph.edge_set();
    // Frame: (edge taken into this node, outgoing edges of its target, cursor).
    let mut stack: Vec<(EdgeIndex, &[(EdgeIndex, NodeIndex)], usize)> = Vec::new();

    for &root in roots {
        for &(first, target) in &adjacency[root.index()] {
            on_path.insert(first.index());
            stack.push((first, &adjacency[target.index()], 0));

            while let Some(frame) = stack.last_mut() {
                let (edge, children, cursor) = frame;
                if let Some(&(next, next_target)) = children.get(*cursor) {
                    *cursor += 1;
                    if on_path.contains(next.index()) {
                        trace!(edge = %graph.relationship(next), "edge repeats on path");
                        feedback.insert(next.index());
                    } else {
                        on_path.insert(next.index());
                        stack.push((next, &adjacency[next_target.index()], 0));
                    }
                } else {
                    on_path.set(edge.index(), false);
                    stack.pop();
                }
            }
        }
    }

    feedback
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Classic DFS back-edge detection from the roots.
fn edge_coloring(
    graph: &NetworkGraph<'_>,
    roots: &[NodeIndex],
    adjacency: &Adjacency,
) -> FixedBitSet {
    let mut feedback = graph.edge_set();
    let mut color = vec![Color::White; graph.node_count()];
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for &root in roots {
        if color[root.index()] != Color::White {
            continue;
        }
        color[root.index()] = Color::Gray;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = frame;
            let node = *node;
            if let Some(&(edge, target)) = adjacency[node.index()].get(*cursor) {
                *cursor += 1;
                match color[target.index()] {
                    Color::Gray => {
                        trace!(edge = %graph.relationship(edge), "back edge");
                        feedback.insert(edge.index());
                    }
                    Color::White => {
                        color[target.index()] = Color::Gray;
                        stack.push((target, 0));
                    }
                    Color::Black => {}
                }
            } else {
                color[node.index()] = Color::Black;
                stack.pop();
            }
        }
    }

    feedback
}
