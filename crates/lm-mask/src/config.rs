//! Masking configuration document.
//!
//! A [`MaskingConfig`] is the on-disk form of a rule set: the enabled flag,
//! the ignore-symbol mode, and the list of field rule specs. Host adapters
//! load one per configuration reload and turn it into a [`MaskingEngine`].

use crate::{FieldRuleSpec, IgnoreMode, MaskError, MaskingEngine, Result, RuleSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for the configuration file.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Masking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Whether masking is applied at all. Off unless the document turns it
    /// on explicitly.
    #[serde(default, alias = "enable")]
    pub enabled: bool,

    /// How ignore symbols interact with literal content characters.
    #[serde(default)]
    pub ignore_mode: IgnoreMode,

    /// Field rules. An entry named `__default__` overrides the built-in
    /// defaults.
    #[serde(default)]
    pub fields: Vec<FieldRuleSpec>,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

impl MaskingConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse config from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: MaskingConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the parts of the document that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != CONFIG_SCHEMA_VERSION {
            return Err(MaskError::Config(format!(
                "unsupported schema version {} (expected {})",
                self.schema_version, CONFIG_SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    /// Append a field rule.
    pub fn add_field(&mut self, spec: FieldRuleSpec) {
        self.fields.push(spec);
    }

    /// Resolve the field rules into a [`RuleSet`].
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::builder()
            .rules(self.fields.iter().cloned())
            .ignore_mode(self.ignore_mode)
            .build()
    }

    /// Build an engine carrying this config's enabled flag.
    pub fn engine(&self) -> MaskingEngine {
        MaskingEngine::new(self.rule_set()).with_enabled(self.enabled)
    }
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            enabled: false,
            ignore_mode: IgnoreMode::Independent,
            fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MaskingConfig::default();
        assert_eq!(config.schema_version, CONFIG_SCHEMA_VERSION);
        assert!(!config.enabled);
        assert_eq!(config.ignore_mode, IgnoreMode::Independent);
        assert!(config.fields.is_empty());
        assert!(config.rule_set().is_empty());
    }

    #[test]
    fn test_parse_minimal_document() {
        let config = MaskingConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MaskingConfig::default());
    }

    #[test]
    fn test_parse_full_document() {
        let json = r##"{
            "schema_version": "1.0.0",
            "enabled": true,
            "ignore_mode": "literal_gated",
            "fields": [
                {"name": "__default__", "replacement_char": "#"},
                {"name": "phone", "content": "num", "skip_head": 3, "skip_tail": 4, "max_missed": 1}
            ]
        }"##;
        let config = MaskingConfig::from_json_str(json).unwrap();
        assert_eq!(config.ignore_mode, IgnoreMode::LiteralGated);
        assert_eq!(config.fields.len(), 2);

        let engine = config.engine();
        assert_eq!(engine.format("phone=123412341234"), "phone=123#####1234");
    }

    #[test]
    fn test_enable_alias_and_disabled_engine() {
        let config =
            MaskingConfig::from_json_str(r#"{"enable": false, "fields": [{"name": "phone"}]}"#)
                .unwrap();
        assert!(!config.enabled);
        assert_eq!(config.engine().format("phone=123"), "phone=123");
    }

    #[test]
    fn test_missing_enabled_flag_leaves_lines_untouched() {
        let config = MaskingConfig::from_json_str(
            r#"{"fields": [{"name": "phone", "content": "num", "max_missed": 1}]}"#,
        )
        .unwrap();
        assert!(!config.enabled);
        assert!(!config.engine().is_enabled());
        assert_eq!(config.engine().format("phone=123"), "phone=123");

        let config = MaskingConfig::from_json_str(
            r#"{"enabled": true, "fields": [{"name": "phone", "content": "num", "max_missed": 1}]}"#,
        )
        .unwrap();
        assert_eq!(config.engine().format("phone=123"), "phone=***");
    }

    #[test]
    fn test_ignore_mode_names() {
        let config = MaskingConfig::from_json_str(r#"{"ignore_mode": "independent"}"#).unwrap();
        assert_eq!(config.ignore_mode, IgnoreMode::Independent);
        let config = MaskingConfig::from_json_str(r#"{"ignore_mode": "literal_gated"}"#).unwrap();
        assert_eq!(config.ignore_mode, IgnoreMode::LiteralGated);
        assert_eq!(IgnoreMode::LiteralGated.to_string(), "literal_gated");
    }

    #[test]
    fn test_rejects_unknown_schema_version() {
        let err = MaskingConfig::from_json_str(r#"{"schema_version": "9.9.9"}"#).unwrap_err();
        assert!(matches!(err, MaskError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_attributes() {
        let err = MaskingConfig::from_json_str(
            r#"{"fields": [{"name": "phone", "replacement_char": "ab"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MaskError::Json(_)));

        let err = MaskingConfig::from_json_str(r#"{"ignore_mode": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, MaskError::Json(_)));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = MaskingConfig::new();
        config.add_field(FieldRuleSpec::new("phone").content("num").skip_tail(4));
        let json = serde_json::to_string_pretty(&config).unwrap();

        let parsed = MaskingConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert!(!json.contains("skip_head"));
    }
}
