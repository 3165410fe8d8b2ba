use serde::{Deserialize, Serialize};

use super::{Event, Relationship};

/// An Adverse Outcome Pathway network: events plus the relationships
/// between them.
///
/// The network owns its events; relationships reference them by id. The
/// analysis never mutates a network, it only derives new collections that
/// borrow from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Network {
    pub fn new(
        name: impl Into<String>,
        events: Vec<Event>,
        relationships: Vec<Relationship>,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            description: None,
            events,
            relationships,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Look up an event by id.
    #[must_use]
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Title used by renderers: the name, else the id, else `None`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.id.as_deref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
