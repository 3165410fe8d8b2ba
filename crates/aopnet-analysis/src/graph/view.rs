//! Edge-filtered views over a [`NetworkGraph`].
//!
//! Every analysis after feedback detection works on "the network minus its
//! feedback edges". Rather than copying the graph, an [`EdgeView`] pairs the
//! graph with a bitset of excluded edge indices and answers adjacency
//! questions through it. There is exactly one view per analysis pass.

use fixedbitset::FixedBitSet;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::build::NetworkGraph;

/// A [`NetworkGraph`] with a set of edges hidden.
#[derive(Debug, Clone)]
pub struct EdgeView<'g, 'a> {
    graph: &'g NetworkGraph<'a>,
    excluded: FixedBitSet,
}

impl<'g, 'a> EdgeView<'g, 'a> {
    /// A view that hides nothing.
    #[must_use]
    pub fn full(graph: &'g NetworkGraph<'a>) -> Self {
        Self {
            excluded: graph.edge_set(),
            graph,
        }
    }

    /// A view hiding every edge whose index is set in `excluded`.
    #[must_use]
    pub fn without(graph: &'g NetworkGraph<'a>, mut excluded: FixedBitSet) -> Self {
        excluded.grow(graph.edge_count());
        Self { graph, excluded }
    }

    #[must_use]
    pub const fn graph(&self) -> &'g NetworkGraph<'a> {
        self.graph
    }

    #[must_use]
    pub fn is_visible(&self, edge: EdgeIndex) -> bool {
        !self.excluded.contains(edge.index())
    }

    /// Visible outgoing edges of `node` as `(edge, target)`, in insertion
    /// order.
    #[must_use]
    pub fn outgoing(&self, node: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        self.adjacent(node, Direction::Outgoing)
    }

    /// Visible incoming edges of `node` as `(edge, source)`, in insertion
    /// order.
    #[must_use]
    pub fn incoming(&self, node: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        self.adjacent(node, Direction::Incoming)
    }

    /// Distinct successors of `node` through visible edges, excluding
    /// `node` itself.
    #[must_use]
    pub fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        distinct_others(node, self.outgoing(node))
    }

    /// Distinct predecessors of `node` through visible edges, excluding
    /// `node` itself.
    #[must_use]
    pub fn predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        distinct_others(node, self.incoming(node))
    }

    /// A node is a root iff no visible edge targets it.
    #[must_use]
    pub fn is_root(&self, node: NodeIndex) -> bool {
        self.graph
            .graph
            .edges_directed(node, Direction::Incoming)
            .all(|edge| !self.is_visible(edge.id()))
    }

    /// Root nodes in network event order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph
            .graph
            .node_indices()
            .filter(|&node| self.is_root(node))
            .collect()
    }

    fn adjacent(&self, node: NodeIndex, dir: Direction) -> Vec<(EdgeIndex, NodeIndex)> {
        // petgraph yields adjacency most-recent first; sort back to insertion
        // order so traversals are reproducible against the input file.
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .graph
            .edges_directed(node, dir)
            .filter(|edge| self.is_visible(edge.id()))
            .map(|edge| {
                let other = match dir {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_unstable_by_key(|(edge, _)| edge.index());
        edges
    }
}

fn distinct_others(node: NodeIndex, edges: Vec<(EdgeIndex, NodeIndex)>) -> Vec<NodeIndex> {
    let mut seen: Vec<NodeIndex> = Vec::with_capacity(edges.len());
    for (_, other) in edges {
        if other != node && !seen.contains(&other) {
            seen.push(other);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use aopnet_core::{BiologicalLevel, Event, Network, Relationship};

    fn network(ids: &[&str], edges: &[(&str, &str)]) -> Network {
        Network::new(
            "view",
            ids.iter()
                .map(|id| Event::new(*id, BiologicalLevel::Tissue))
                .collect(),
            edges
                .iter()
                .map(|(a, b)| Relationship::new(*a, *b))
                .collect(),
        )
    }

    fn ids(graph: &NetworkGraph<'_>, nodes: &[NodeIndex]) -> Vec<String> {
        nodes.iter().map(|&n| graph.event(n).id.clone()).collect()
    }

    #[test]
    fn full_view_roots_follow_event_order() {
        let net = network(&["C", "A", "B"], &[("A", "B")]);
        let graph = NetworkGraph::from_network(&net).expect("graph");
        let view = EdgeView::full(&graph);
        assert_eq!(ids(&graph, &view.roots()), vec!["C", "A"]);
    }

    #[test]
    fn self_loop_is_not_a_successor_but_blocks_root() {
        let net = network(&["A", "B"], &[("A", "A"), ("A", "B")]);
        let graph = NetworkGraph::from_network(&net).expect("graph");
        let view = EdgeView::full(&graph);
        let a = graph.node_index("A").expect("A");
        assert_eq!(ids(&graph, &view.successors(a)), vec!["B"]);
        assert!(!view.is_root(a));
    }

    #[test]
    fn excluded_edges_disappear() {
        let net = network(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let graph = NetworkGraph::from_network(&net).expect("graph");
        assert!(EdgeView::full(&graph).roots().is_empty());

        let mut excluded = graph.edge_set();
        excluded.insert(2);
        let view = EdgeView::without(&graph, excluded);
        assert_eq!(ids(&graph, &view.roots()), vec!["A"]);
        let c = graph.node_index("C").expect("C");
        assert!(view.successors(c).is_empty());
        assert_eq!(ids(&graph, &view.predecessors(c)), vec!["B"]);
    }

    #[test]
    fn outgoing_is_in_insertion_order() {
        let net = network(&["A", "B", "C", "D"], &[("A", "D"), ("A", "B"), ("A", "C")]);
        let graph = NetworkGraph::from_network(&net).expect("graph");
        let view = EdgeView::full(&graph);
        let a = graph.node_index("A").expect("A");
        let targets: Vec<NodeIndex> = view.outgoing(a).into_iter().map(|(_, t)| t).collect();
        assert_eq!(ids(&graph, &targets), vec!["D", "B", "C"]);
    }

    #[test]
    fn parallel_edges_yield_one_successor() {
        let mut net = network(&["A", "B"], &[("A", "B")]);
        net.relationships
            .push(Relationship::new("A", "B").with_name("again"));
        let graph = NetworkGraph::from_network(&net).expect("graph");
        let view = EdgeView::full(&graph);
        let a = graph.node_index("A").expect("A");
        assert_eq!(view.outgoing(a).len(), 2);
        assert_eq!(view.successors(a).len(), 1);
    }
}
