//! Filename parsing for numbered migrations.
//!
//! A migration filename is a leading integer followed by a descriptive
//! suffix, e.g. `12_create_users_table.sql`. The exact shape is configured
//! with a regular expression holding exactly two capture groups: the digits
//! and the remainder.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Pattern used when nothing else is configured.
pub const DEFAULT_PATTERN: &str = r"^(\d+)(_.*)$";

static DEFAULT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PATTERN).expect("DEFAULT_PATTERN should be a valid regex"));

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Pattern must contain exactly two capture groups, found {0}")]
    WrongGroupCount(usize),
}

/// The numeric prefix and suffix extracted from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub number: u64,
    pub suffix: String,
}

/// A compiled "leading integer + suffix" filename pattern.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    /// Compile a pattern, checking that it has exactly two capture groups.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern)?;
        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 2 {
            return Err(PatternError::WrongGroupCount(groups));
        }
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Parse a filename into its number and suffix.
    ///
    /// Returns `None` when the name does not match, or when the first group
    /// is not a non-negative integer that fits in a `u64`. The two groups
    /// must together span the whole name, number first, so that the name can
    /// be rebuilt from them without losing any text.
    pub fn parse(&self, filename: &str) -> Option<ParsedName> {
        let caps = self.regex.captures(filename)?;
        let digits = caps.get(1)?;
        let suffix = caps.get(2)?;
        if digits.start() != 0 || suffix.start() != digits.end() || suffix.end() != filename.len()
        {
            return None;
        }

        let number = digits.as_str().parse::<u64>().ok()?;
        Some(ParsedName {
            number,
            suffix: suffix.as_str().to_string(),
        })
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.parse(filename).is_some()
    }
}

impl Default for NamePattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

/// Build a filename from a number and a preserved suffix.
pub fn format_name(number: u64, suffix: &str) -> String {
    format!("{number}{suffix}")
}
