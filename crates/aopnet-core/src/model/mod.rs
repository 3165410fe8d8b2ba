//! Pathway network entities.
//!
//! - [`Event`]: a node, carrying its [`BiologicalLevel`].
//! - [`Relationship`]: a directed edge between two events, by id.
//! - [`Network`]: the aggregate that owns events and relationships.
//! - [`Layer`]: a derived tier of same-level events.

mod event;
mod layer;
mod level;
mod network;
mod relationship;

pub use event::Event;
pub use layer::Layer;
pub use level::{BiologicalLevel, InvalidLevel};
pub use network::Network;
pub use relationship::Relationship;
