//! Builder configuration.

use crate::condition::ValueMode;
use serde::Deserialize;

/// Configuration shared by every builder created from it.
///
/// Defaults match what most callers want: blank strings are written as `NULL`
/// and every comparison value is bound as a parameter.
///
/// The struct deserializes from any serde format, with missing keys falling
/// back to the defaults:
///
/// ```ignore
/// let config: BuilderConfig = serde_json::from_str(r#"{"inline_clause_values": true}"#)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Write INSERT/UPDATE text values that trim to `""` as `NULL`.
    pub blank_as_null: bool,
    /// Render JOIN ... ON and HAVING comparison values as SQL literals
    /// instead of binding them.
    pub inline_clause_values: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            blank_as_null: true,
            inline_clause_values: false,
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable blank-to-NULL normalization.
    pub fn blank_as_null(mut self, enabled: bool) -> Self {
        self.blank_as_null = enabled;
        self
    }

    /// Enable or disable inline JOIN/HAVING values.
    pub fn inline_clause_values(mut self, enabled: bool) -> Self {
        self.inline_clause_values = enabled;
        self
    }

    /// Value mode used by JOIN ... ON and HAVING conditions.
    pub(crate) fn clause_value_mode(&self) -> ValueMode {
        if self.inline_clause_values {
            ValueMode::Inline
        } else {
            ValueMode::Bind
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BuilderConfig::default();
        assert!(config.blank_as_null);
        assert!(!config.inline_clause_values);
        assert_eq!(config.clause_value_mode(), ValueMode::Bind);
    }

    #[test]
    fn deserializes_with_missing_keys() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{"inline_clause_values": true}"#).unwrap();
        assert!(config.blank_as_null);
        assert_eq!(config.clause_value_mode(), ValueMode::Inline);
    }
}
