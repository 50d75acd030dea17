//! Configuration types for the key-case converter.

use crate::matcher::MatcherError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the converter.
///
/// Both exclusion lists are optional; an absent list means every key in that
/// direction is converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Configuration version
    pub version: String,
    /// Keys left untouched when converting outgoing params and bodies
    #[serde(alias = "request_convert_exclude", alias = "request_exclude_keys")]
    pub request_exclude: Vec<ExcludeConfig>,
    /// Keys left untouched when converting incoming response bodies
    #[serde(alias = "response_convert_exclude", alias = "response_exclude_keys")]
    pub response_exclude: Vec<ExcludeConfig>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            request_exclude: vec![],
            response_exclude: vec![],
        }
    }
}

impl ConverterConfig {
    /// Parse a YAML configuration string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file. `.yaml` and `.yml` files are read as YAML,
    /// anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }
}

/// A single exclusion entry.
///
/// A bare string is an exact key; the table form picks the match type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExcludeConfig {
    /// Exact key shorthand
    Key(String),
    /// Pattern with explicit match type
    Pattern {
        /// The pattern to match
        pattern: String,
        /// Match type: exact or regex
        #[serde(default, rename = "type")]
        pattern_type: PatternType,
    },
}

impl ExcludeConfig {
    /// Build an exact-key exclusion.
    pub fn exact(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Build a regex exclusion.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            pattern_type: PatternType::Regex,
        }
    }
}

/// Pattern matching type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Exact string match
    Exact,
    /// Regular expression
    #[default]
    Regex,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid exclusion: {0}")]
    Matcher(#[from] MatcherError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.version, "1");
        assert!(config.request_exclude.is_empty());
        assert!(config.response_exclude.is_empty());
    }

    #[test]
    fn test_config_parsing() {
        let yaml = r#"
version: "1"
request_exclude:
  - snakeCaseExclude
  - pattern: "^x-"
    type: regex
response_exclude:
  - pattern: "exclude$"
"#;
        let config = ConverterConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.request_exclude,
            vec![
                ExcludeConfig::exact("snakeCaseExclude"),
                ExcludeConfig::regex("^x-"),
            ]
        );
        // type defaults to regex
        assert_eq!(config.response_exclude, vec![ExcludeConfig::regex("exclude$")]);
    }

    #[test]
    fn test_exact_pattern_type() {
        let json = r#"{"request_exclude": [{"pattern": "a.b", "type": "exact"}]}"#;
        let config = ConverterConfig::from_json(json).unwrap();
        assert_eq!(
            config.request_exclude[0],
            ExcludeConfig::Pattern {
                pattern: "a.b".to_string(),
                pattern_type: PatternType::Exact,
            }
        );
    }

    #[test]
    fn test_legacy_field_names() {
        let yaml = r#"
request_convert_exclude: [fooBar]
response_exclude_keys: [foo_bar]
"#;
        let config = ConverterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.request_exclude, vec![ExcludeConfig::exact("fooBar")]);
        assert_eq!(config.response_exclude, vec![ExcludeConfig::exact("foo_bar")]);
    }

    #[test]
    fn test_unknown_pattern_type_is_rejected() {
        let yaml = r#"
request_exclude:
  - pattern: "*.id"
    type: glob
"#;
        assert!(matches!(
            ConverterConfig::from_yaml(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ConverterConfig::from_file("/nonexistent/keycase.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/keycase.yaml"));
    }
}
