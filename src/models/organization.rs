//! Organization hierarchy types.
//!
//! Employees sit in a four-level organization tree. Reconciliation compares
//! paths in this tree up to a configured [`OrgLevel`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// The depth of the organization tree.
pub const ORG_DEPTH: u8 = 4;

/// A validated organization level between 1 and 4.
///
/// # Examples
///
/// ```
/// use allowance_engine::models::OrgLevel;
///
/// let level = OrgLevel::try_from(3).unwrap();
/// assert_eq!(level.get(), 3);
/// assert!(OrgLevel::try_from(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OrgLevel(u8);

impl OrgLevel {
    /// The top of the hierarchy.
    pub const TOP: OrgLevel = OrgLevel(1);

    /// Returns the level as a number between 1 and 4.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for OrgLevel {
    fn default() -> Self {
        Self::TOP
    }
}

impl TryFrom<u8> for OrgLevel {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=ORG_DEPTH).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::InvalidConfig {
                field: "org_level".to_string(),
                message: format!("must be between 1 and {}, got {}", ORG_DEPTH, value),
            })
        }
    }
}

impl From<OrgLevel> for u8 {
    fn from(level: OrgLevel) -> Self {
        level.0
    }
}

impl fmt::Display for OrgLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path from the top of the organization tree down to a department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgPath {
    /// Level 1 (top-level organization).
    #[serde(default)]
    pub level_1: String,
    /// Level 2, nested inside level 1.
    #[serde(default)]
    pub level_2: String,
    /// Level 3, nested inside level 2.
    #[serde(default)]
    pub level_3: String,
    /// Level 4 (department), nested inside level 3.
    #[serde(default)]
    pub level_4: String,
}

impl OrgPath {
    /// Creates a path from its four labels.
    pub fn new(
        level_1: impl Into<String>,
        level_2: impl Into<String>,
        level_3: impl Into<String>,
        level_4: impl Into<String>,
    ) -> Self {
        Self {
            level_1: level_1.into(),
            level_2: level_2.into(),
            level_3: level_3.into(),
            level_4: level_4.into(),
        }
    }

    /// Returns the labels ordered from level 1 to level 4.
    pub fn levels(&self) -> [&str; 4] {
        [&self.level_1, &self.level_2, &self.level_3, &self.level_4]
    }

    /// Returns true if both paths agree on every level from 1 up to `level`.
    pub fn matches_through(&self, other: &OrgPath, level: OrgLevel) -> bool {
        self.levels()
            .iter()
            .zip(other.levels().iter())
            .take(level.get() as usize)
            .all(|(a, b)| a == b)
    }
}

/// The cross-organization annotation attached to a reconciled period.
///
/// Reconciliation writes one of the well-known labels. Sheets prepared by
/// hand may carry any other note in the column, kept verbatim as [`Other`].
///
/// [`Other`]: TransferLabel::Other
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TransferLabel {
    /// No transfer was considered for this record.
    #[default]
    None,
    /// The latest transfer stayed inside the same level-1 organization.
    Level1Internal,
    /// The latest transfer stayed inside the same level-2 organization.
    Level2Internal,
    /// The latest transfer stayed inside the same level-3 organization.
    Level3Internal,
    /// The latest transfer stayed inside the same level-4 organization.
    Level4Internal,
    /// The latest transfer crossed the configured level; the record is split.
    CrossesConfiguredLevel,
    /// Free text found in an imported sheet.
    Other(String),
}

impl TransferLabel {
    /// Returns the "internal" label for the given level.
    pub fn internal_at(level: OrgLevel) -> Self {
        match level.get() {
            1 => Self::Level1Internal,
            2 => Self::Level2Internal,
            3 => Self::Level3Internal,
            _ => Self::Level4Internal,
        }
    }

    /// Returns true for any of the `level-N-internal` labels.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Level1Internal | Self::Level2Internal | Self::Level3Internal | Self::Level4Internal
        )
    }

    /// Returns the exported text of the label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "",
            Self::Level1Internal => "level-1-internal",
            Self::Level2Internal => "level-2-internal",
            Self::Level3Internal => "level-3-internal",
            Self::Level4Internal => "level-4-internal",
            Self::CrossesConfiguredLevel => "crosses-configured-level",
            Self::Other(text) => text,
        }
    }

    /// Parses an exported label. Blank cells map to `None`, unknown text to `Other`.
    ///
    /// Also accepts the labels of older Chinese-language exports
    /// (`一级组织内调转` .. `四级组织内调转`, `跨N组织调转`).
    pub fn from_export(value: &str) -> Self {
        let value = value.trim();
        match value {
            "" => Self::None,
            "level-1-internal" | "一级组织内调转" => Self::Level1Internal,
            "level-2-internal" | "二级组织内调转" => Self::Level2Internal,
            "level-3-internal" | "三级组织内调转" => Self::Level3Internal,
            "level-4-internal" | "四级组织内调转" => Self::Level4Internal,
            "crosses-configured-level" => Self::CrossesConfiguredLevel,
            _ if value.starts_with('跨') && value.ends_with("组织调转") => {
                Self::CrossesConfiguredLevel
            }
            _ => Self::Other(value.to_string()),
        }
    }
}

impl fmt::Display for TransferLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransferLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Accepts the same text as [`TransferLabel::from_export`]; `null` reads as `None`.
impl<'de> Deserialize<'de> for TransferLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(text.map_or(Self::None, |text| Self::from_export(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_level_bounds() {
        assert!(OrgLevel::try_from(0).is_err());
        for n in 1..=4 {
            assert_eq!(OrgLevel::try_from(n).unwrap().get(), n);
        }
        assert!(OrgLevel::try_from(5).is_err());
    }

    #[test]
    fn test_org_level_deserialize_validates() {
        let level: OrgLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level.get(), 2);
        assert!(serde_json::from_str::<OrgLevel>("9").is_err());
    }

    #[test]
    fn test_matches_through_stops_at_level() {
        let a = OrgPath::new("Group", "Retail", "North", "Sales");
        let b = OrgPath::new("Group", "Retail", "South", "Sales");

        assert!(a.matches_through(&b, OrgLevel::try_from(1).unwrap()));
        assert!(a.matches_through(&b, OrgLevel::try_from(2).unwrap()));
        assert!(!a.matches_through(&b, OrgLevel::try_from(3).unwrap()));
        assert!(!a.matches_through(&b, OrgLevel::try_from(4).unwrap()));
    }

    #[test]
    fn test_internal_label_per_level() {
        assert_eq!(
            TransferLabel::internal_at(OrgLevel::try_from(3).unwrap()),
            TransferLabel::Level3Internal
        );
        assert!(TransferLabel::Level3Internal.is_internal());
        assert!(!TransferLabel::CrossesConfiguredLevel.is_internal());
        assert!(!TransferLabel::None.is_internal());
    }

    #[test]
    fn test_from_export_accepts_legacy_labels() {
        assert_eq!(TransferLabel::from_export("二级组织内调转"), TransferLabel::Level2Internal);
        assert_eq!(TransferLabel::from_export("跨3组织调转"), TransferLabel::CrossesConfiguredLevel);
        assert_eq!(TransferLabel::from_export(" level-4-internal "), TransferLabel::Level4Internal);
        assert_eq!(TransferLabel::from_export("  "), TransferLabel::None);
    }

    #[test]
    fn test_free_text_is_kept_verbatim() {
        let label = TransferLabel::from_export(" moved twice - check ");
        assert_eq!(label, TransferLabel::Other("moved twice - check".to_string()));
        assert_eq!(label.as_str(), "moved twice - check");
        assert_eq!(label.to_string(), "moved twice - check");
        assert!(!label.is_internal());
    }

    #[test]
    fn test_label_deserializes_free_text_legacy_and_null() {
        let label: TransferLabel = serde_json::from_str("\"moved twice, check\"").unwrap();
        assert_eq!(label, TransferLabel::Other("moved twice, check".to_string()));
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"moved twice, check\"");

        let legacy: TransferLabel = serde_json::from_str("\"跨3组织调转\"").unwrap();
        assert_eq!(legacy, TransferLabel::CrossesConfiguredLevel);

        let null: TransferLabel = serde_json::from_str("null").unwrap();
        assert_eq!(null, TransferLabel::None);
    }

    #[test]
    fn test_label_serialization_matches_export_text() {
        for label in [
            TransferLabel::None,
            TransferLabel::Level1Internal,
            TransferLabel::Level4Internal,
            TransferLabel::CrossesConfiguredLevel,
        ] {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            assert_eq!(TransferLabel::from_export(label.as_str()), label);
            assert_eq!(serde_json::from_str::<TransferLabel>(&json).unwrap(), label);
        }
    }
}
