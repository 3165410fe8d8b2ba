//! Graph index construction from a [`Network`].
//!
//! # Overview
//!
//! The analyses work on a [`petgraph`] directed graph whose node weights
//! borrow the network's events and whose edge weights borrow its
//! relationships. Building the index is also where the caller precondition
//! is checked: every relationship endpoint must name an event of the same
//! network, and event ids must be unique. Violations surface as
//! [`GraphError::Malformed`] before any algorithm runs.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A causally precedes B", exactly as the
//! relationship `from → to` states it.
//!
//! ## Duplicate Relationships
//!
//! Relationships that are equal in every field describe the same edge and
//! are indexed once. Distinct relationships between the same pair of events
//! (different names) stay parallel edges.
//!
//! ## Cache Invalidation
//!
//! [`NetworkGraph::content_hash`] is a BLAKE3 hash of the sorted event and
//! edge sets. It does not depend on input order, so callers can compare it
//! against a stored value to decide whether a cached layout is stale.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap, HashSet};

use aopnet_core::{Event, GraphError, MalformedGraphError, Network, Relationship};
use fixedbitset::FixedBitSet;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// NetworkGraph
// ---------------------------------------------------------------------------

/// A validated directed graph view of a [`Network`].
///
/// Node indices follow the order of `network.events`; edge indices follow
/// the order of `network.relationships` (minus exact duplicates).
#[derive(Debug)]
pub struct NetworkGraph<'a> {
    /// Directed graph: nodes = events, edges = relationships.
    pub graph: DiGraph<&'a Event, &'a Relationship>,
    /// Mapping from event id to petgraph `NodeIndex`.
    pub node_map: HashMap<&'a str, NodeIndex>,
    /// BLAKE3 content hash of the event and edge sets.
    pub content_hash: String,
}

impl<'a> NetworkGraph<'a> {
    /// Index `network`, validating that it is closed and self-consistent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Malformed`] with
    /// [`MalformedGraphError::DuplicateEvent`] when two events share an id,
    /// or [`MalformedGraphError::UnknownEvent`] when a relationship endpoint
    /// is not an event of `network`.
    #[instrument(skip_all, fields(events = network.events.len(), relationships = network.relationships.len()))]
    pub fn from_network(network: &'a Network) -> Result<Self, GraphError> {
        let mut graph =
            DiGraph::with_capacity(network.events.len(), network.relationships.len());
        let mut node_map: HashMap<&'a str, NodeIndex> =
            HashMap::with_capacity(network.events.len());

        for event in &network.events {
            if node_map.contains_key(event.id.as_str()) {
                return Err(MalformedGraphError::DuplicateEvent(event.id.clone()).into());
            }
            let idx = graph.add_node(event);
            node_map.insert(event.id.as_str(), idx);
        }

        let mut seen: HashSet<&'a Relationship> =
            HashSet::with_capacity(network.relationships.len());
        for relationship in &network.relationships {
            if !seen.insert(relationship) {
                continue;
            }
            let from = lookup(&node_map, relationship, &relationship.from)?;
            let to = lookup(&node_map, relationship, &relationship.to)?;
            graph.add_edge(from, to, relationship);
        }

        let content_hash = compute_content_hash(network);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "indexed network"
        );

        Ok(Self {
            graph,
            node_map,
            content_hash,
        })
    }

    /// Return the number of nodes (events) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct edges (relationships) in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for an event id.
    #[must_use]
    pub fn node_index(&self, event_id: &str) -> Option<NodeIndex> {
        self.node_map.get(event_id).copied()
    }

    /// The event stored at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` does not belong to this graph.
    #[must_use]
    pub fn event(&self, idx: NodeIndex) -> &'a Event {
        self.graph[idx]
    }

    /// The relationship stored at `edge`.
    ///
    /// # Panics
    ///
    /// Panics if `edge` does not belong to this graph.
    #[must_use]
    pub fn relationship(&self, edge: EdgeIndex) -> &'a Relationship {
        self.graph[edge]
    }

    /// An empty edge bitset sized for this graph.
    #[must_use]
    pub fn edge_set(&self) -> FixedBitSet {
        FixedBitSet::with_capacity(self.edge_count())
    }

    /// An empty node bitset sized for this graph.
    #[must_use]
    pub fn node_set(&self) -> FixedBitSet {
        FixedBitSet::with_capacity(self.node_count())
    }

    /// Resolve an edge bitset into the relationships it marks.
    #[must_use]
    pub fn relationships_in(&self, edges: &FixedBitSet) -> BTreeSet<&'a Relationship> {
        edges
            .ones()
            .map(|i| self.relationship(EdgeIndex::new(i)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn lookup(
    node_map: &HashMap<&str, NodeIndex>,
    relationship: &Relationship,
    event_id: &str,
) -> Result<NodeIndex, GraphError> {
    node_map.get(event_id).copied().ok_or_else(|| {
        MalformedGraphError::UnknownEvent {
            relationship: relationship.to_string(),
            event_id: event_id.to_string(),
        }
        .into()
    })
}

/// Compute an order-independent BLAKE3 hash of the events and edges.
fn compute_content_hash(network: &Network) -> String {
    let events: BTreeSet<(&str, &str)> = network
        .events
        .iter()
        .map(|event| (event.id.as_str(), event.level.as_str()))
        .collect();
    let edges: BTreeSet<&Relationship> = network.relationships.iter().collect();

    let mut hasher = blake3::Hasher::new();
    for (id, level) in events {
        hasher.update(id.as_bytes());
        hasher.update(b"\x00");
        hasher.update(level.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for rel in edges {
        hasher.update(rel.from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(rel.to.as_bytes());
        hasher.update(b"\x00");
        hasher.update(rel.name().as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use aopnet_core::BiologicalLevel;

    fn network(ids: &[&str], edges: &[(&str, &str)]) -> Network {
        Network::new(
            "test",
            ids.iter()
                .map(|id| Event::new(*id, BiologicalLevel::Cellular))
                .collect(),
            edges
                .iter()
                .map(|(a, b)| Relationship::new(*a, *b))
                .collect(),
        )
    }

    #[test]
    fn empty_network_produces_empty_graph() {
        let net = Network::default();
        let graph = NetworkGraph::from_network(&net).expect("build graph");
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn edge_direction_follows_relationship() {
        let net = network(&["A", "B"], &[("A", "B")]);
        let graph = NetworkGraph::from_network(&net).expect("build graph");

        let a = graph.node_index("A").expect("A node");
        let b = graph.node_index("B").expect("B node");
        assert!(graph.graph.contains_edge(a, b), "expected A → B");
        assert!(!graph.graph.contains_edge(b, a), "no reverse edge");
        assert_eq!(graph.event(a).id, "A");
    }

    #[test]
    fn unknown_endpoint_is_malformed() {
        let net = network(&["A"], &[("A", "B")]);
        let err = NetworkGraph::from_network(&net).unwrap_err();
        assert_eq!(
            err,
            GraphError::Malformed(MalformedGraphError::UnknownEvent {
                relationship: "A>B".to_string(),
                event_id: "B".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_event_is_malformed() {
        let net = network(&["A", "A"], &[]);
        let err = NetworkGraph::from_network(&net).unwrap_err();
        assert_eq!(
            err,
            GraphError::Malformed(MalformedGraphError::DuplicateEvent("A".to_string()))
        );
    }

    #[test]
    fn exact_duplicate_relationships_indexed_once() {
        let net = network(&["A", "B"], &[("A", "B"), ("A", "B")]);
        let graph = NetworkGraph::from_network(&net).expect("build graph");
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn explicit_default_name_is_a_duplicate() {
        let mut net = network(&["A", "B"], &[("A", "B")]);
        net.relationships
            .push(Relationship::new("A", "B").with_name("A>B"));
        let graph = NetworkGraph::from_network(&net).expect("build graph");
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn differently_named_relationships_stay_parallel() {
        let mut net = network(&["A", "B"], &[("A", "B")]);
        net.relationships
            .push(Relationship::new("A", "B").with_name("second"));
        let graph = NetworkGraph::from_network(&net).expect("build graph");
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn content_hash_ignores_input_order() {
        let one = network(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let two = network(&["C", "B", "A"], &[("B", "C"), ("A", "B")]);
        let h1 = NetworkGraph::from_network(&one).expect("one").content_hash;
        let h2 = NetworkGraph::from_network(&two).expect("two").content_hash;
        assert_eq!(h1, h2);
    }

    #[test]
    fn content_hash_changes_with_edges() {
        let without = network(&["A", "B"], &[]);
        let with = network(&["A", "B"], &[("A", "B")]);
        let h1 = NetworkGraph::from_network(&without).expect("without").content_hash;
        let h2 = NetworkGraph::from_network(&with).expect("with").content_hash;
        assert_ne!(h1, h2, "hash must change when edges are added");
    }

    #[test]
    fn relationships_in_resolves_bitset() {
        let net = network(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let graph = NetworkGraph::from_network(&net).expect("build graph");
        let mut edges = graph.edge_set();
        edges.insert(1);
        let rels = graph.relationships_in(&edges);
        assert_eq!(rels.len(), 1);
        assert!(rels.contains(&Relationship::new("B", "C")));
    }
}
