//! Rollup configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Rollup report configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RollupConfig {
    /// Display indent per hierarchy level
    #[serde(default = "default_indent_unit")]
    pub indent_unit: u32,
}

impl RollupConfig {
    /// Validate rollup configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.indent_unit == 0 {
            return Err(ValidationError::InvalidIndentUnit);
        }
        Ok(())
    }
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            indent_unit: default_indent_unit(),
        }
    }
}

fn default_indent_unit() -> u32 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollup_defaults() {
        assert_eq!(RollupConfig::default().indent_unit, 24);
    }

    #[test]
    fn test_zero_indent_fails_validation() {
        assert!(RollupConfig { indent_unit: 0 }.validate().is_err());
    }
}
