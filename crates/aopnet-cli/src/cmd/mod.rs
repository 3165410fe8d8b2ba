pub mod analyze;
pub mod check;
pub mod completions;
pub mod feedback;
pub mod indirect;
pub mod layers;
pub mod stats;

use std::io::{self, Write};
use std::path::Path;

use aopnet_core::{Network, Relationship};
use serde::Serialize;
use tracing::debug;

/// Read a network file; errors keep their [`aopnet_core::LoadError`] so the
/// renderer can attach an error code.
pub fn load(path: &Path) -> anyhow::Result<Network> {
    let network = aopnet_core::io::load_network(path)?;
    debug!(
        path = %path.display(),
        events = network.events.len(),
        relationships = network.relationships.len(),
        "network loaded"
    );
    Ok(network)
}

/// One relationship as printed by the commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipRow<'a> {
    pub name: String,
    pub from: &'a str,
    pub to: &'a str,
}

impl<'a> From<&'a Relationship> for RelationshipRow<'a> {
    fn from(rel: &'a Relationship) -> Self {
        Self {
            name: rel.name().to_string(),
            from: &rel.from,
            to: &rel.to,
        }
    }
}

pub fn rows<'a: 'b, 'b>(
    rels: impl IntoIterator<Item = &'b &'a Relationship>,
) -> Vec<RelationshipRow<'a>> {
    rels.into_iter().map(|rel| RelationshipRow::from(*rel)).collect()
}

/// `from -> to`, followed by the name when it differs from the default.
pub fn write_row(w: &mut dyn Write, indent: &str, row: &RelationshipRow<'_>) -> io::Result<()> {
    if row.name == format!("{}>{}", row.from, row.to) {
        writeln!(w, "{indent}{} -> {}", row.from, row.to)
    } else {
        writeln!(w, "{indent}{} -> {}  ({})", row.from, row.to, row.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_omits_default_name() {
        let rel = Relationship::new("A", "B");
        let mut buf = Vec::new();
        write_row(&mut buf, "", &RelationshipRow::from(&rel)).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "A -> B\n");
    }

    #[test]
    fn row_shows_custom_name() {
        let rel = Relationship::new("A", "B").with_name("KER 42");
        let mut buf = Vec::new();
        write_row(&mut buf, "  ", &RelationshipRow::from(&rel)).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "  A -> B  (KER 42)\n");
    }

    #[test]
    fn missing_file_keeps_load_error() {
        let err = load(Path::new("/nonexistent/net.json")).expect_err("missing");
        assert!(err.downcast_ref::<aopnet_core::LoadError>().is_some());
    }
}
