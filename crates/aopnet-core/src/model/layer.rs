use serde::Serialize;
use std::fmt;

use super::{BiologicalLevel, Event};
use crate::error::GraphError;

/// One rendering tier: events of a single biological level that can be
/// placed side by side.
///
/// A layer borrows its events from the network it was computed from.
/// Events are kept sorted by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer<'a> {
    level: BiologicalLevel,
    events: Vec<&'a Event>,
}

impl<'a> Layer<'a> {
    /// Build a layer from a non-empty set of events sharing one level.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyLayer`] when `events` is empty and
    /// [`GraphError::MixedLayerLevels`] when the events do not all share the
    /// same level.
    pub fn new(mut events: Vec<&'a Event>) -> Result<Self, GraphError> {
        let Some(first) = events.first() else {
            return Err(GraphError::EmptyLayer);
        };
        let level = first.level;
        if let Some(other) = events.iter().find(|event| event.level != level) {
            return Err(GraphError::MixedLayerLevels {
                expected: level,
                found: other.level,
                event_id: other.id.clone(),
            });
        }
        events.sort_by(|a, b| a.id.cmp(&b.id));
        events.dedup_by(|a, b| a.id == b.id);
        Ok(Self { level, events })
    }

    /// The single biological level shared by every event in this layer.
    #[must_use]
    pub const fn level(&self) -> BiologicalLevel {
        self.level
    }

    #[must_use]
    pub fn events(&self) -> &[&'a Event] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn contains(&self, event_id: &str) -> bool {
        self.events.iter().any(|event| event.id == event_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().map(|event| event.id.as_str())
    }
}

impl fmt::Display for Layer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&event.id)?;
        }
        Ok(())
    }
}
