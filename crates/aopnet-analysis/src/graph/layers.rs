//! Biological layering of a feedback-free view.
//!
//! # Rounds
//!
//! The first frontier is the set of roots of the view. Each round:
//!
//! 1. the frontier nodes at the lowest biological level present form the
//!    process set and become the next layer (the whole frontier when it has
//!    a single level),
//! 2. the rest of the frontier is postponed,
//! 3. successors of the process set whose every predecessor (other than
//!    themselves) has been placed join the next frontier, together with the
//!    postponed nodes.
//!
//! Rounds stop when the frontier is empty. Every round places at least one
//! node, so on a finite view the loop ends after at most `node_count`
//! rounds.
//!
//! # Unplaced Nodes
//!
//! A node is placed exactly when every one of its ancestors in the view is
//! reachable from a root. Reachability alone is not enough: a node fed by
//! both a root and a rootless cycle never has all of its predecessors
//! placed, so it stays unplaced together with the cycle and everything
//! downstream of it.

use aopnet_core::{GraphError, Layer};
use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument, trace, warn};

use super::view::EdgeView;

/// Layers and leftover nodes of one layering pass.
#[derive(Debug, Clone)]
pub struct Layering<'a> {
    pub layers: Vec<Layer<'a>>,
    /// Nodes that never entered a frontier, in network order.
    pub unplaced: Vec<NodeIndex>,
}

/// Assign the nodes of `view` to layers.
///
/// # Errors
///
/// Propagates [`GraphError`] from [`Layer::new`]; the process set of a
/// round always shares one level, so this does not happen for views built
/// by this crate.
#[instrument(skip(view))]
pub fn assign_layers<'a>(view: &EdgeView<'_, 'a>) -> Result<Layering<'a>, GraphError> {
    let graph = view.graph();
    let mut visited = graph.node_set();
    let mut layers: Vec<Layer<'a>> = Vec::new();
    let mut frontier = view.roots();

    if frontier.is_empty() && graph.node_count() > 0 {
        warn!(
            events = graph.node_count(),
            "network has no root events; no layers assigned"
        );
    }

    while !frontier.is_empty() {
        let Some(min_level) = frontier.iter().map(|&n| graph.event(n).level).min() else {
            break;
        };
        let (process, postponed): (Vec<NodeIndex>, Vec<NodeIndex>) = frontier
            .into_iter()
            .partition(|&n| graph.event(n).level == min_level);

        for &node in &process {
            visited.insert(node.index());
        }
        trace!(
            round = layers.len(),
            level = %min_level,
            placed = process.len(),
            postponed = postponed.len(),
            "layer round"
        );

        let next = next_frontier(view, &process, postponed, &visited);
        layers.push(Layer::new(
            process.iter().map(|&n| graph.event(n)).collect(),
        )?);
        frontier = next;
    }

    let unplaced: Vec<NodeIndex> = graph
        .graph
        .node_indices()
        .filter(|n| !visited.contains(n.index()))
        .collect();
    if let Some(&first) = unplaced.first() {
        warn!(
            unplaced = unplaced.len(),
            first = %graph.event(first).id,
            "events with an ancestor outside the rooted part were left out of the layers"
        );
    }
    debug!(layers = layers.len(), "layering complete");

    Ok(Layering { layers, unplaced })
}

/// Ready successors of `process` followed by `postponed`, without repeats.
fn next_frontier(
    view: &EdgeView<'_, '_>,
    process: &[NodeIndex],
    postponed: Vec<NodeIndex>,
    visited: &FixedBitSet,
) -> Vec<NodeIndex> {
    let mut queued = view.graph().node_set();
    let mut next: Vec<NodeIndex> = Vec::new();

    for &node in process {
        for candidate in view.successors(node) {
            if visited.contains(candidate.index()) || queued.contains(candidate.index()) {
                continue;
            }
            let ready = view
                .predecessors(candidate)
                .iter()
                .all(|p| visited.contains(p.index()));
            if ready {
                queued.insert(candidate.index());
                next.push(candidate);
            }
        }
    }
    for node in postponed {
        if !queued.put(node.index()) {
            next.push(node);
        }
    }
    next
}
