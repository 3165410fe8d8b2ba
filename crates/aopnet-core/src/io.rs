//! Reading network descriptions from disk.
//!
//! The loader only deserializes; it does not check that relationships refer
//! to existing events. That precondition is verified when the analysis
//! builds its graph index, so a malformed file surfaces as a
//! [`crate::GraphError::Malformed`] at analysis time.
//!
//! Supported formats, chosen by file extension:
//!
//! | extension        | format |
//! |------------------|--------|
//! | `.json`          | JSON   |
//! | `.yaml`, `.yml`  | YAML   |
//! | `.toml`          | TOML   |

use std::path::Path;

use tracing::{debug, instrument};

use crate::error::LoadError;
use crate::model::Network;

/// Serialization format of a network file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFormat {
    Json,
    Yaml,
    Toml,
}

impl NetworkFormat {
    /// Pick the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Parse a network from in-memory text.
///
/// # Errors
///
/// Returns the format's parse error wrapped in [`LoadError`].
pub fn parse_network(text: &str, format: NetworkFormat) -> Result<Network, LoadError> {
    let network = match format {
        NetworkFormat::Json => serde_json::from_str(text)?,
        NetworkFormat::Yaml => serde_yaml::from_str(text)?,
        NetworkFormat::Toml => toml::from_str(text)?,
    };
    Ok(network)
}

/// Read and parse the network file at `path`.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedFormat`] for unknown extensions,
/// [`LoadError::Io`] when the file cannot be read, and a parse error when
/// the contents do not describe a network.
#[instrument]
pub fn load_network(path: &Path) -> Result<Network, LoadError> {
    let format = NetworkFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let network = parse_network(&text, format)?;
    debug!(
        events = network.events.len(),
        relationships = network.relationships.len(),
        "loaded network"
    );
    Ok(network)
}
