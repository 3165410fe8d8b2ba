use serde::{Deserialize, Serialize};
use std::fmt;

/// A key event relationship: a directed edge `from -> to`.
///
/// Endpoints refer to events by id; the owning [`super::Network`] holds the
/// events themselves. The name is the relationship's identity together with
/// its endpoints and is always set: an unnamed relationship is called
/// `from>to`, so it equals the same edge explicitly named `from>to`.
/// Ordering is by `(from, to, name)` so that sets of relationships iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RelationshipRecord", into = "RelationshipRecord")]
pub struct Relationship {
    pub from: String,
    pub to: String,
    name: String,
}

/// On-disk shape: the name is optional and omitted when it is the default.
#[derive(Serialize, Deserialize)]
struct RelationshipRecord {
    from: String,
    to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl From<RelationshipRecord> for Relationship {
    fn from(record: RelationshipRecord) -> Self {
        let rel = Self::new(record.from, record.to);
        match record.name {
            Some(name) => rel.with_name(name),
            None => rel,
        }
    }
}

impl From<Relationship> for RelationshipRecord {
    fn from(rel: Relationship) -> Self {
        let name = (!rel.has_default_name()).then_some(rel.name);
        Self {
            from: rel.from,
            to: rel.to,
            name,
        }
    }
}

fn default_name(from: &str, to: &str) -> String {
    format!("{from}>{to}")
}

impl Relationship {
    /// Create a relationship named `from>to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        let name = default_name(&from, &to);
        Self { from, to, name }
    }

    /// Give the relationship an explicit name. An empty name keeps `from>to`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.name = name;
        }
        self
    }

    /// Relationship name, `from>to` unless an explicit name was given.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn has_default_name(&self) -> bool {
        self.name == default_name(&self.from, &self.to)
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_arrow_form() {
        let rel = Relationship::new("MIE1", "KE1");
        assert_eq!(rel.name(), "MIE1>KE1");
        assert_eq!(rel.to_string(), "MIE1>KE1");
    }

    #[test]
    fn explicit_name_wins() {
        let rel = Relationship::new("MIE1", "KE1").with_name("KER 17");
        assert_eq!(rel.name(), "KER 17");
        assert_eq!(rel.to_string(), "KER 17");
    }

    #[test]
    fn self_loop_detection() {
        assert!(Relationship::new("A", "A").is_self_loop());
        assert!(!Relationship::new("A", "B").is_self_loop());
    }

    #[test]
    fn ordering_is_by_endpoints() {
        let mut rels = vec![
            Relationship::new("B", "A"),
            Relationship::new("A", "C"),
            Relationship::new("A", "B"),
        ];
        rels.sort();
        let names: Vec<&str> = rels.iter().map(Relationship::name).collect();
        assert_eq!(names, vec!["A>B", "A>C", "B>A"]);
    }

    #[test]
    fn deserializes_without_name() {
        let rel: Relationship = serde_json::from_str(r#"{"from":"A","to":"B"}"#).expect("parse");
        assert_eq!(rel, Relationship::new("A", "B"));
    }

    #[test]
    fn explicit_default_name_is_same_edge() {
        let plain = Relationship::new("A", "B");
        let named = Relationship::new("A", "B").with_name("A>B");
        assert_eq!(plain, named);
        assert!(named.has_default_name());

        let mut set = std::collections::HashSet::new();
        set.insert(plain);
        assert!(!set.insert(named));
    }

    #[test]
    fn empty_name_keeps_default() {
        let rel = Relationship::new("A", "B").with_name("");
        assert_eq!(rel.name(), "A>B");
        assert_eq!(rel, Relationship::new("A", "B"));
    }

    #[test]
    fn explicit_default_name_deserializes_equal() {
        let rel: Relationship =
            serde_json::from_str(r#"{"from":"A","to":"B","name":"A>B"}"#).expect("parse");
        assert_eq!(rel, Relationship::new("A", "B"));
        let empty: Relationship =
            serde_json::from_str(r#"{"from":"A","to":"B","name":""}"#).expect("parse");
        assert_eq!(empty, Relationship::new("A", "B"));
    }

    #[test]
    fn default_name_is_not_serialized() {
        let json = serde_json::to_value(Relationship::new("A", "B")).expect("json");
        assert!(json.get("name").is_none());
        let json = serde_json::to_value(Relationship::new("A", "B").with_name("KER 1")).expect("json");
        assert_eq!(json["name"], "KER 1");
    }
}
