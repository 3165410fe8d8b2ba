use std::fmt;
use std::path::PathBuf;

use crate::model::BiologicalLevel;

/// Machine-readable error codes for scripted consumers of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NetworkFileUnreadable,
    ConfigParseError,
    UnsupportedFormat,
    NetworkParseError,
    UnknownEvent,
    DuplicateEvent,
    MixedLayerLevels,
    EmptyLayer,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NetworkFileUnreadable => "E1001",
            Self::ConfigParseError => "E1002",
            Self::UnsupportedFormat => "E1003",
            Self::NetworkParseError => "E1004",
            Self::UnknownEvent => "E2001",
            Self::DuplicateEvent => "E2002",
            Self::MixedLayerLevels => "E3001",
            Self::EmptyLayer => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NetworkFileUnreadable => "Network file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::UnsupportedFormat => "Unsupported network file format",
            Self::NetworkParseError => "Network file parse error",
            Self::UnknownEvent => "Relationship references an unknown event",
            Self::DuplicateEvent => "Duplicate event id",
            Self::MixedLayerLevels => "Layer mixes biological levels",
            Self::EmptyLayer => "Layer has no events",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint surfaced next to the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NetworkFileUnreadable => Some("Check the path and read permissions."),
            Self::ConfigParseError => Some("Fix syntax in aopnet.toml and retry."),
            Self::UnsupportedFormat => Some("Use a .json, .yaml, .yml or .toml network file."),
            Self::NetworkParseError => {
                Some("Each event needs an `id`, each relationship `from` and `to`, levels must be known names.")
            }
            Self::UnknownEvent => {
                Some("Add the missing event to `events` or drop the relationship.")
            }
            Self::DuplicateEvent => Some("Give every event a unique `id`."),
            Self::MixedLayerLevels | Self::EmptyLayer => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A violated caller precondition on a network's structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedGraphError {
    /// A relationship endpoint is not an event of the same network.
    #[error("relationship {relationship} references unknown event '{event_id}'")]
    UnknownEvent {
        relationship: String,
        event_id: String,
    },

    /// Two events share an id.
    #[error("duplicate event id '{0}'")]
    DuplicateEvent(String),
}

/// Errors raised while indexing or layering a network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("malformed network: {0}")]
    Malformed(#[from] MalformedGraphError),

    #[error("layer mixes biological levels: expected {expected}, event '{event_id}' is {found}")]
    MixedLayerLevels {
        expected: BiologicalLevel,
        found: BiologicalLevel,
        event_id: String,
    },

    #[error("layer must contain at least one event")]
    EmptyLayer,
}

impl GraphError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Malformed(MalformedGraphError::UnknownEvent { .. }) => ErrorCode::UnknownEvent,
            Self::Malformed(MalformedGraphError::DuplicateEvent(_)) => ErrorCode::DuplicateEvent,
            Self::MixedLayerLevels { .. } => ErrorCode::MixedLayerLevels,
            Self::EmptyLayer => ErrorCode::EmptyLayer,
        }
    }
}

/// Errors raised while reading a network description.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read network file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON network: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML network: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML network: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported network format '{0}': expected .json, .yaml, .yml or .toml")]
    UnsupportedFormat(String),
}

impl LoadError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::NetworkFileUnreadable,
            Self::Json(_) | Self::Yaml(_) | Self::Toml(_) => ErrorCode::NetworkParseError,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
        }
    }
}
