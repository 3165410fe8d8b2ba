//! Warning-level diagnostics over a network.
//!
//! None of these conditions make a network invalid; they flag shapes that
//! usually mean the input is incomplete:
//! - [`Finding::NoRootEvents`]: every event has an incoming relationship
//! - [`Finding::SelfLoop`]: a relationship from an event to itself
//! - [`Finding::UnplacedEvents`]: events missing from every layer
//! - [`Finding::IsolatedEvent`]: an event with no relationships at all
//! - [`Finding::UnknownLevel`]: an event whose level is unknown

use std::fmt;

use aopnet_core::{GraphError, Network};
use petgraph::Direction;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::analysis::{AnalysisOptions, analyze_graph};
use crate::graph::{EdgeView, NetworkGraph};

/// One diagnostic finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    NoRootEvents { event_count: usize },
    SelfLoop { relationship: String },
    UnplacedEvents { events: Vec<String> },
    IsolatedEvent { event_id: String },
    UnknownLevel { event_id: String },
}

impl Finding {
    /// Stable machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoRootEvents { .. } => "no_root_events",
            Self::SelfLoop { .. } => "self_loop",
            Self::UnplacedEvents { .. } => "unplaced_events",
            Self::IsolatedEvent { .. } => "isolated_event",
            Self::UnknownLevel { .. } => "unknown_level",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRootEvents { event_count } => write!(
                f,
                "none of the {event_count} events is a root; every event has an incoming relationship"
            ),
            Self::SelfLoop { relationship } => {
                write!(f, "relationship {relationship} points at its own source")
            }
            Self::UnplacedEvents { events } => {
                write!(f, "events not placed in any layer: {}", events.join(", "))
            }
            Self::IsolatedEvent { event_id } => {
                write!(f, "event '{event_id}' has no relationships")
            }
            Self::UnknownLevel { event_id } => {
                write!(f, "event '{event_id}' has an unknown biological level")
            }
        }
    }
}

/// Collect every finding for `network`, in a fixed order: root check, self
/// loops, unplaced events, then per-event findings in network order.
///
/// # Errors
///
/// Returns [`GraphError::Malformed`] for malformed networks.
#[instrument(skip(network, options))]
pub fn diagnose(network: &Network, options: &AnalysisOptions) -> Result<Vec<Finding>, GraphError> {
    let graph = NetworkGraph::from_network(network)?;
    let analysis = analyze_graph(&graph, options)?;
    let mut findings = Vec::new();

    if graph.node_count() > 0 && EdgeView::full(&graph).roots().is_empty() {
        findings.push(Finding::NoRootEvents {
            event_count: graph.node_count(),
        });
    }

    findings.extend(
        graph
            .graph
            .edge_indices()
            .map(|e| graph.relationship(e))
            .filter(|r| r.is_self_loop())
            .map(|r| Finding::SelfLoop {
                relationship: r.to_string(),
            }),
    );

    if !analysis.unplaced.is_empty() {
        findings.push(Finding::UnplacedEvents {
            events: analysis.unplaced.iter().map(|e| e.id.clone()).collect(),
        });
    }

    for node in graph.graph.node_indices() {
        let event = graph.event(node);
        let isolated = graph
            .graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .is_none()
            && graph
                .graph
                .edges_directed(node, Direction::Outgoing)
                .next()
                .is_none();
        if isolated {
            findings.push(Finding::IsolatedEvent {
                event_id: event.id.clone(),
            });
        }
        if !event.level.is_known() {
            findings.push(Finding::UnknownLevel {
                event_id: event.id.clone(),
            });
        }
    }

    debug!(findings = findings.len(), "diagnostics complete");
    Ok(findings)
}
