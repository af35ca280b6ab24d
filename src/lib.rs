pub mod config;
pub mod history;
pub mod naming;
pub mod renumber;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigError, NumberingConfig, DEFAULT_DIRNAME, DEFAULT_REGEX};
pub use history::{GitHistory, HistoryLookup, HistoryTimestamp, NoHistory};
pub use naming::{format_name, NamePattern, ParsedName, PatternError};
pub use renumber::{
    renumber_migrations, Assignment, MigrationFile, RenameRecord, RenumberError, RenumberOutcome,
};
