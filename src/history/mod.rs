//! History lookups used to break numbering ties.
//!
//! When two migrations claim the same number, the one whose earliest recorded
//! change is older keeps the lower slot. The lookup is a capability injected
//! into the renumbering run so the ordering logic can be exercised without a
//! real repository.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Timestamp of the earliest recorded change to a file.
pub type HistoryTimestamp = DateTime<FixedOffset>;

/// Source of per-file history timestamps.
#[async_trait]
pub trait HistoryLookup: Send + Sync {
    /// Earliest known change to `filename` inside `directory`.
    ///
    /// `None` means no history is known; such files sort after every file
    /// with a timestamp. Implementations absorb their own failures.
    async fn earliest_change(&self, directory: &Path, filename: &str) -> Option<HistoryTimestamp>;
}

/// Reads history from git with `git log --follow`.
#[derive(Debug, Clone, Default)]
pub struct GitHistory;

impl GitHistory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HistoryLookup for GitHistory {
    async fn earliest_change(&self, directory: &Path, filename: &str) -> Option<HistoryTimestamp> {
        let output = match Command::new("git")
            .args(["log", "--follow", "--format=%aI", "--", filename])
            .current_dir(directory)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!(file = %filename, error = %e, "Failed to run git log");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                file = %filename,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git log failed"
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let timestamp = parse_earliest(&stdout);
        debug!(file = %filename, timestamp = ?timestamp, "Looked up history");
        timestamp
    }
}

/// Never knows any history; every file sorts as newest.
#[derive(Debug, Clone, Default)]
pub struct NoHistory;

#[async_trait]
impl HistoryLookup for NoHistory {
    async fn earliest_change(&self, _directory: &Path, _filename: &str) -> Option<HistoryTimestamp> {
        None
    }
}

/// Pick the earliest timestamp from `git log` output.
///
/// git lists newest first, but the minimum is taken so author dates that
/// were rewritten out of order still resolve to the oldest one. Lines that
/// do not parse are ignored.
fn parse_earliest(log_output: &str) -> Option<HistoryTimestamp> {
    log_output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| DateTime::parse_from_rfc3339(line).ok())
        .min()
}
