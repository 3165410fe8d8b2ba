use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Biological level of organisation at which an event takes place.
///
/// The declaration order is the ordinal order: lower levels are further
/// upstream in biological scale and are placed first when layering.
/// `Unknown` sorts after every known level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BiologicalLevel {
    Molecular,
    Cellular,
    Tissue,
    Organelle,
    Individual,
    Population,
    #[default]
    Unknown,
}

impl BiologicalLevel {
    /// Every level in ordinal order.
    pub const ALL: [Self; 7] = [
        Self::Molecular,
        Self::Cellular,
        Self::Tissue,
        Self::Organelle,
        Self::Individual,
        Self::Population,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Molecular => "molecular",
            Self::Cellular => "cellular",
            Self::Tissue => "tissue",
            Self::Organelle => "organelle",
            Self::Individual => "individual",
            Self::Population => "population",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for every level except [`BiologicalLevel::Unknown`].
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for BiologicalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid biological level '{0}': expected one of molecular, cellular, tissue, organelle, individual, population, unknown")]
pub struct InvalidLevel(pub String);

impl FromStr for BiologicalLevel {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "molecular" => Ok(Self::Molecular),
            "cellular" => Ok(Self::Cellular),
            "tissue" => Ok(Self::Tissue),
            "organelle" => Ok(Self::Organelle),
            "individual" => Ok(Self::Individual),
            "population" => Ok(Self::Population),
            "unknown" => Ok(Self::Unknown),
            _ => Err(InvalidLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for BiologicalLevel {
    type Error = InvalidLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_order_matches_declaration() {
        let mut shuffled = vec![
            BiologicalLevel::Unknown,
            BiologicalLevel::Organelle,
            BiologicalLevel::Molecular,
            BiologicalLevel::Population,
            BiologicalLevel::Tissue,
            BiologicalLevel::Individual,
            BiologicalLevel::Cellular,
        ];
        shuffled.sort();
        assert_eq!(shuffled, BiologicalLevel::ALL.to_vec());
    }

    #[test]
    fn unknown_sorts_last() {
        for level in BiologicalLevel::ALL {
            assert!(level <= BiologicalLevel::Unknown);
        }
        assert!(!BiologicalLevel::Unknown.is_known());
        assert!(BiologicalLevel::Molecular.is_known());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            "Molecular".parse::<BiologicalLevel>(),
            Ok(BiologicalLevel::Molecular)
        );
        assert_eq!(
            " ORGANELLE ".parse::<BiologicalLevel>(),
            Ok(BiologicalLevel::Organelle)
        );
    }

    #[test]
    fn parse_rejects_unknown_words() {
        let err = "organ".parse::<BiologicalLevel>().unwrap_err();
        assert_eq!(err, InvalidLevel("organ".to_string()));
        assert!(err.to_string().contains("organ"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for level in BiologicalLevel::ALL {
            assert_eq!(level.to_string().parse::<BiologicalLevel>(), Ok(level));
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BiologicalLevel::Tissue).expect("serialize");
        assert_eq!(json, "\"tissue\"");
        let parsed: BiologicalLevel = serde_json::from_str("\"population\"").expect("parse");
        assert_eq!(parsed, BiologicalLevel::Population);
    }

    #[test]
    fn serde_accepts_capitalised_names() {
        let parsed: BiologicalLevel = serde_json::from_str("\"Molecular\"").expect("parse");
        assert_eq!(parsed, BiologicalLevel::Molecular);
        assert!(serde_json::from_str::<BiologicalLevel>("\"organ\"").is_err());
    }
}
