//! Types for the renumbering run.

use crate::history::HistoryTimestamp;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for renumbering operations.
#[derive(Error, Debug)]
pub enum RenumberError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to list {0}: {1}")]
    ListError(PathBuf, walkdir::Error),

    #[error("Refusing to overwrite {0}: it is not part of the renumbered set")]
    TargetOccupied(PathBuf),
}

/// A migration file known to one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Absolute path, the identity of the file.
    pub path: PathBuf,
    /// Number parsed from the filename prefix.
    pub number: u64,
    /// Remainder of the filename after the number, reused verbatim on rename.
    pub suffix: String,
    /// Earliest recorded change, filled in only when needed for a tie-break.
    pub history: Option<HistoryTimestamp>,
}

impl MigrationFile {
    pub fn new(path: PathBuf, number: u64, suffix: String) -> Self {
        Self {
            path,
            number,
            suffix,
            history: None,
        }
    }

    pub fn file_name(&self) -> &str {
        crate::utils::file_name_str(&self.path).unwrap_or_default()
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Migration files of one directory, split by whether the caller changed them.
#[derive(Debug, Clone, Default)]
pub struct DirectoryPartition {
    pub directory: PathBuf,
    /// Files passed in by the caller, in input order.
    pub changed: Vec<MigrationFile>,
    /// Matching files already in the directory that were not passed in.
    pub existing: Vec<MigrationFile>,
}

/// Output of validating the existing files of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSequence {
    /// Highest number kept as is, `None` when no prefix starting at 0 is valid.
    pub max_valid: Option<u64>,
    /// Existing files from the first anomaly onward, in sorted order.
    pub to_renumber: Vec<MigrationFile>,
}

impl ValidatedSequence {
    /// First number available to renumbered files.
    pub fn next_number(&self) -> u64 {
        self.max_valid.map_or(0, |n| n + 1)
    }
}

/// A planned new number for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub file: MigrationFile,
    pub new_number: u64,
}

impl Assignment {
    pub fn new_name(&self) -> String {
        crate::naming::format_name(self.new_number, &self.file.suffix)
    }

    pub fn target_path(&self) -> PathBuf {
        self.file.directory().join(self.new_name())
    }

    /// Whether applying this assignment leaves the filename untouched.
    pub fn is_noop(&self) -> bool {
        self.new_name() == self.file.file_name()
    }
}

/// A rename that was performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRecord {
    pub directory: PathBuf,
    pub from: String,
    pub to: String,
}

/// Result of a renumbering run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenumberOutcome {
    /// Directories that were examined.
    pub directories: Vec<PathBuf>,
    /// Renames performed, in application order.
    pub renames: Vec<RenameRecord>,
}

impl RenumberOutcome {
    pub fn files_changed(&self) -> bool {
        !self.renames.is_empty()
    }

    /// 0 when nothing was renamed, 1 when the tree changed.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.files_changed())
    }
}
