use serde::{Deserialize, Serialize};
use std::fmt;

use super::BiologicalLevel;

/// A key event: one node of a pathway network.
///
/// Identity is the `id`, which must be unique within a [`super::Network`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub level: BiologicalLevel,
}

impl Event {
    pub fn new(id: impl Into<String>, level: BiologicalLevel) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            level,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Display name, falling back to the id when no name is set.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
