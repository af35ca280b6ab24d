use crate::naming::{NamePattern, PatternError, DEFAULT_PATTERN};
use thiserror::Error;

/// Environment variable overriding the default directory marker
pub const DIRNAME_ENV: &str = "PRE_COMMIT_MIGRATION_NUMBERING_DEFAULT_DIRNAME";

/// Environment variable overriding the default filename pattern
pub const REGEX_ENV: &str = "PRE_COMMIT_MIGRATION_NUMBERING_DEFAULT_REGEX";

/// Directory name that marks a migration directory
pub const DEFAULT_DIRNAME: &str = "migrations";

/// Default filename pattern
pub const DEFAULT_REGEX: &str = DEFAULT_PATTERN;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Directory name must not be empty")]
    EmptyDirname,

    #[error("Directory name must be a single path segment: {0}")]
    DirnameHasSeparator(String),

    #[error("Pattern error: {0}")]
    PatternError(#[from] PatternError),
}

/// Numbering configuration
#[derive(Debug, Clone)]
pub struct NumberingConfig {
    /// Path segment identifying migration directories
    pub dirname: String,
    /// Filename pattern with a number group and a suffix group
    pub pattern: NamePattern,
}

impl NumberingConfig {
    /// Build a validated configuration from raw values
    pub fn new(dirname: &str, regex: &str) -> Result<Self, ConfigError> {
        if dirname.is_empty() {
            return Err(ConfigError::EmptyDirname);
        }
        if dirname.contains(['/', '\\']) {
            return Err(ConfigError::DirnameHasSeparator(dirname.to_string()));
        }

        Ok(Self {
            dirname: dirname.to_string(),
            pattern: NamePattern::new(regex)?,
        })
    }
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            dirname: DEFAULT_DIRNAME.to_string(),
            pattern: NamePattern::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NumberingConfig::default();
        assert_eq!(config.dirname, "migrations");
        assert_eq!(config.pattern.as_str(), r"^(\d+)(_.*)$");
    }

    #[test]
    fn test_new_config_valid() {
        let config = NumberingConfig::new("schema", r"^(\d+)(-.*)$").unwrap();
        assert_eq!(config.dirname, "schema");
        assert!(config.pattern.matches("3-add-column.sql"));
    }

    #[test]
    fn test_new_config_rejects_empty_dirname() {
        assert!(matches!(
            NumberingConfig::new("", DEFAULT_REGEX),
            Err(ConfigError::EmptyDirname)
        ));
    }

    #[test]
    fn test_new_config_rejects_nested_dirname() {
        assert!(matches!(
            NumberingConfig::new("db/migrations", DEFAULT_REGEX),
            Err(ConfigError::DirnameHasSeparator(_))
        ));
    }

    #[test]
    fn test_new_config_rejects_bad_regex() {
        assert!(matches!(
            NumberingConfig::new("migrations", r"^\d+_.*$"),
            Err(ConfigError::PatternError(PatternError::WrongGroupCount(0)))
        ));
    }
}
