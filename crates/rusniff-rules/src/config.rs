//! Ruleset configuration
//!
//! A `SniffConfig` selects which sniffs run and carries their options. It can
//! be built in code or deserialized from a YAML ruleset file:
//!
//! ```yaml
//! sniffs: [array_declaration, operator_spacing]
//! array:
//!   indent: 2
//!   element_indent_level: 2
//! trailing_comment:
//!   min_lines_required: 4
//! blank_lines:
//!   max_consecutive: 2
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors loading a ruleset file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read ruleset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse ruleset file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration passed to sniffs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SniffConfig {
    /// Sniff names to run; all built-ins when absent.
    pub sniffs: Option<Vec<String>>,
    pub array: ArrayOptions,
    pub trailing_comment: TrailingCommentOptions,
    pub blank_lines: BlankLineOptions,
}

impl SniffConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// The enabled sniff set, defaulting to every registered name.
    pub fn enabled_sniffs(&self, all_names: &[&'static str]) -> HashSet<String> {
        match &self.sniffs {
            Some(names) => names.iter().cloned().collect(),
            None => all_names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Options for the array-declaration sniff
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayOptions {
    /// The number of spaces code is indented by.
    pub indent: u32,
    /// The number of indents array elements have.
    pub element_indent_level: u32,
    /// Advisory warning for single-line arrays holding multiple values.
    pub flag_single_line_multi_value: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            element_indent_level: 2,
            flag_single_line_multi_value: false,
        }
    }
}

impl ArrayOptions {
    /// Column offset of array elements from the declaration's indentation.
    pub fn indent_spaces(&self) -> u32 {
        self.indent * self.element_indent_level
    }
}

/// Options for the trailing-comment sniff
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailingCommentOptions {
    /// Scope body line count at which a trailing comment becomes mandatory
    /// for control structures.
    pub min_lines_required: u32,
}

impl Default for TrailingCommentOptions {
    fn default() -> Self {
        Self {
            min_lines_required: 4,
        }
    }
}

/// Options for the blank-lines sniff
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlankLineOptions {
    /// Maximum number of consecutive blank lines.
    pub max_consecutive: u32,
}

impl Default for BlankLineOptions {
    fn default() -> Self {
        Self { max_consecutive: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SniffConfig::default();
        assert_eq!(config.array.indent, 2);
        assert_eq!(config.array.indent_spaces(), 4);
        assert_eq!(config.trailing_comment.min_lines_required, 4);
        assert_eq!(config.blank_lines.max_consecutive, 2);
        assert!(config.sniffs.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let config = SniffConfig::from_yaml_str(
            "sniffs: [array_declaration]\narray:\n  indent: 4\n  element_indent_level: 1\n",
        )
        .unwrap();
        assert_eq!(config.sniffs.as_deref(), Some(&["array_declaration".to_string()][..]));
        assert_eq!(config.array.indent_spaces(), 4);
        // untouched sections keep their defaults
        assert_eq!(config.blank_lines.max_consecutive, 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SniffConfig::from_yaml_str("arrays:\n  indent: 4\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "blank_lines:\n  max_consecutive: 1").unwrap();

        let config = SniffConfig::from_file(file.path()).unwrap();
        assert_eq!(config.blank_lines.max_consecutive, 1);
    }

    #[test]
    fn test_enabled_sniffs_defaults_to_all() {
        let config = SniffConfig::default();
        let enabled = config.enabled_sniffs(&["a", "b"]);
        assert!(enabled.contains("a") && enabled.contains("b"));
    }
}
