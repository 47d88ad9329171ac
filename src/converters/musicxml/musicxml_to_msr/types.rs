//! Public API types for MusicXML to MSR translation
//!
//! - `TranslationSettings`: the configuration object the translator reads
//! - `TranslationResult`: the populated score plus collected diagnostics

use crate::converters::musicxml::musicxml_to_msr::errors::SettingsError;
use crate::diagnostics::Diagnostics;
use crate::msr::Score;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// ============================================================================
// SETTINGS
// ============================================================================

/// Configuration options for translation
///
/// Trace and debug flags only change what gets logged, never the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Name used in diagnostics, usually the input file name
    pub input_source_name: String,

    /// Log structural events (parts, groups, repeats, chords, tuplets)
    pub trace: bool,

    /// Log every element enter/exit
    pub debug: bool,

    /// Part id → display name
    pub parts_renaming: BTreeMap<String, String>,

    /// Measures whose elements are logged as if `debug` were on
    pub debug_measures: BTreeSet<String>,

    /// Keep dynamics/wedges found before a rest pending for the next note
    /// instead of attaching them to the rest
    pub delay_rests_dynamics: bool,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            input_source_name: "-".to_string(),
            trace: false,
            debug: false,
            parts_renaming: BTreeMap::new(),
            debug_measures: BTreeSet::new(),
            delay_rests_dynamics: false,
        }
    }
}

impl TranslationSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a `.json` file, or YAML for any other extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// Display name for a part id, if renamed
    pub fn renamed_part(&self, part_id: &str) -> Option<&str> {
        self.parts_renaming.get(part_id).map(String::as_str)
    }

    pub fn debugs_measure(&self, measure_number: &str) -> bool {
        self.debug_measures.contains(measure_number)
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Result of MusicXML to MSR translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub score: Score,

    /// Warnings and recoverable errors, in input order
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TranslationSettings::default();
        assert_eq!(settings.input_source_name, "-");
        assert!(!settings.delay_rests_dynamics);
        assert!(settings.parts_renaming.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "\
input_source_name: quartet.xml
parts_renaming:
  P1: Violin
debug_measures: ['3', '12']
";
        let settings = TranslationSettings::from_yaml_str(yaml).unwrap();

        assert_eq!(settings.input_source_name, "quartet.xml");
        assert_eq!(settings.renamed_part("P1"), Some("Violin"));
        assert_eq!(settings.renamed_part("P2"), None);
        assert!(settings.debugs_measure("12"));
        assert!(!settings.trace);
    }

    #[test]
    fn test_json_settings() {
        let settings =
            TranslationSettings::from_json_str(r#"{"delay_rests_dynamics": true}"#).unwrap();
        assert!(settings.delay_rests_dynamics);
    }

    #[test]
    fn test_bad_yaml_is_reported() {
        let err = TranslationSettings::from_yaml_str("trace: [not a bool").unwrap_err();
        assert!(matches!(err, SettingsError::Yaml(_)));
    }
}
