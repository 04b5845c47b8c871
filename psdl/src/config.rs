//! Save options (TOML-loadable)

use serde::{Deserialize, Serialize};

use crate::types::BoundsMode;

/// Knobs for [`PsdlFile::save_with`](crate::PsdlFile::save_with)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Vertices that feed the recomputed bounds
    #[serde(default)]
    pub bounds: BoundsMode,
    /// When false, the bounds already on the scene are written unchanged
    #[serde(default = "default_true")]
    pub recalculate_bounds: bool,
    /// Byte written before the room flags table
    #[serde(default)]
    pub flags_padding: u8,
    /// Byte written before the prop rule table
    #[serde(default = "default_prop_rule_padding")]
    pub prop_rule_padding: u8,
    /// Drop AI road rooms that fail `verify_for_population` and rebuild
    /// crossroads. When false, AI roads are written exactly as stored.
    #[serde(default = "default_true")]
    pub filter_ai_roads: bool,
}

fn default_true() -> bool {
    true
}

fn default_prop_rule_padding() -> u8 {
    0xCD
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            bounds: BoundsMode::default(),
            recalculate_bounds: true,
            flags_padding: 0,
            prop_rule_padding: default_prop_rule_padding(),
            filter_ai_roads: true,
        }
    }
}

impl SaveOptions {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_options_default() {
        let options = SaveOptions::default();
        assert_eq!(options.bounds, BoundsMode::AllVertices);
        assert!(options.recalculate_bounds);
        assert_eq!(options.flags_padding, 0);
        assert_eq!(options.prop_rule_padding, 0xCD);
        assert!(options.filter_ai_roads);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(SaveOptions::from_toml_str("").unwrap(), SaveOptions::default());
    }

    #[test]
    fn test_partial_toml() {
        let options = SaveOptions::from_toml_str(
            r#"
            bounds = "perimeter_only"
            prop_rule_padding = 0
            "#,
        )
        .unwrap();
        assert_eq!(options.bounds, BoundsMode::PerimeterOnly);
        assert_eq!(options.prop_rule_padding, 0);
        assert!(options.recalculate_bounds);
    }

    #[test]
    fn test_toml_roundtrip() {
        let options = SaveOptions {
            filter_ai_roads: false,
            ..Default::default()
        };
        let text = options.to_toml_string().unwrap();
        assert_eq!(SaveOptions::from_toml_str(&text).unwrap(), options);
    }

    #[test]
    fn test_bad_toml() {
        assert!(SaveOptions::from_toml_str("bounds = \"everything\"").is_err());
    }
}
