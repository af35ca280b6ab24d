#![allow(dead_code)]

use async_trait::async_trait;
use chrono::DateTime;
use migration_numbering::{HistoryLookup, HistoryTimestamp};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create `<root>/<relative>` holding the given migration files.
///
/// The returned path is canonical so it compares equal to listed entries.
pub fn create_migrations_dir(root: &Path, relative: &str, files: &[&str]) -> PathBuf {
    let dir = fs::canonicalize(root)
        .expect("Temp dir should canonicalize")
        .join(relative);
    fs::create_dir_all(&dir).expect("Should create migrations dir");
    for name in files {
        fs::write(dir.join(name), format!("-- {name}\n")).expect("Should write migration");
    }
    dir
}

/// Sorted filenames in a directory
pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Should read dir")
        .map(|e| e.expect("Should read entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// History lookup with fixed timestamps per filename
#[derive(Default)]
pub struct FakeHistory {
    stamps: HashMap<String, HistoryTimestamp>,
}

impl FakeHistory {
    pub fn new(stamps: &[(&str, &str)]) -> Self {
        Self {
            stamps: stamps
                .iter()
                .map(|(name, ts)| {
                    (
                        name.to_string(),
                        DateTime::parse_from_rfc3339(ts).expect("Valid RFC3339 timestamp"),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl HistoryLookup for FakeHistory {
    async fn earliest_change(&self, _directory: &Path, filename: &str) -> Option<HistoryTimestamp> {
        self.stamps.get(filename).copied()
    }
}
