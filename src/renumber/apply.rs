//! Application of planned renames to the filesystem.

use super::types::{Assignment, RenameRecord, RenumberError};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Suffix of the temporary name used to park a file whose target is taken.
const PARK_SUFFIX: &str = ".renumbering";

/// Rename files according to their assignments.
///
/// Assignments are applied in the order given. No-op assignments are
/// skipped, as are sources that vanished before their turn. When a target
/// name is still held by another file of the same batch, the source is
/// parked under a temporary name and moved into place once the rest of the
/// batch has run. A target held by anything else is never overwritten.
///
/// Returns the renames actually performed.
pub async fn apply_renames(assignments: &[Assignment]) -> Result<Vec<RenameRecord>, RenumberError> {
    let mut pending: HashSet<PathBuf> = assignments
        .iter()
        .filter(|a| !a.is_noop())
        .map(|a| a.file.path.clone())
        .collect();

    let mut records = Vec::new();
    let mut parked: Vec<(PathBuf, &Assignment)> = Vec::new();

    for assignment in assignments {
        let source = &assignment.file.path;
        if assignment.is_noop() {
            debug!(file = %assignment.file.file_name(), "Name unchanged, skipping");
            continue;
        }
        pending.remove(source);

        let target = assignment.target_path();
        if fs::try_exists(&target).await? {
            if !pending.contains(&target) {
                return Err(RenumberError::TargetOccupied(target));
            }

            let park_path = park_path(source);
            if fs::try_exists(&park_path).await? {
                return Err(RenumberError::TargetOccupied(park_path));
            }
            if rename_if_present(source, &park_path).await? {
                debug!(
                    file = %assignment.file.file_name(),
                    target = %assignment.new_name(),
                    "Target still in use, parking file"
                );
                parked.push((park_path, assignment));
            }
            continue;
        }

        if rename_if_present(source, &target).await? {
            records.push(record(assignment));
        }
    }

    for (park_path, assignment) in parked {
        let target = assignment.target_path();
        if fs::try_exists(&target).await? {
            return Err(RenumberError::TargetOccupied(target));
        }
        if rename_if_present(&park_path, &target).await? {
            records.push(record(assignment));
        }
    }

    Ok(records)
}

/// Rename `from` to `to`, returning `false` if `from` does not exist.
async fn rename_if_present(from: &Path, to: &Path) -> Result<bool, RenumberError> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %from.display(), "Source vanished before rename, skipping");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn park_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!(".{name}{PARK_SUFFIX}"))
}

fn record(assignment: &Assignment) -> RenameRecord {
    let record = RenameRecord {
        directory: assignment.file.directory().to_path_buf(),
        from: assignment.file.file_name().to_string(),
        to: assignment.new_name(),
    };
    info!(
        directory = %record.directory.display(),
        from = %record.from,
        to = %record.to,
        "Renamed migration"
    );
    record
}
