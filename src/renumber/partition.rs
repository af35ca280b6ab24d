//! Grouping of candidate paths into migration directories.

use super::types::{DirectoryPartition, MigrationFile, RenumberError};
use crate::config::NumberingConfig;
use crate::utils::{file_name_str, has_segment};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Split candidate paths into per-directory changed and existing sets.
///
/// A candidate takes part when a segment of its path equals the configured
/// directory name, its filename matches the pattern and it still exists on
/// disk. Paths are expected to be absolute already; duplicates are ignored.
/// Directories are returned in path order.
pub async fn partition(
    paths: &[PathBuf],
    config: &NumberingConfig,
) -> Result<Vec<DirectoryPartition>, RenumberError> {
    let mut changed_by_dir: BTreeMap<PathBuf, Vec<MigrationFile>> = BTreeMap::new();
    let mut changed_paths: HashSet<PathBuf> = HashSet::new();

    for path in paths {
        let Some(file) = changed_candidate(path, config).await? else {
            continue;
        };
        if !changed_paths.insert(file.path.clone()) {
            debug!(path = %path.display(), "Skipping duplicate input path");
            continue;
        }

        changed_by_dir
            .entry(file.directory().to_path_buf())
            .or_default()
            .push(file);
    }

    let mut partitions = Vec::with_capacity(changed_by_dir.len());
    for (directory, changed) in changed_by_dir {
        let existing = list_existing(&directory, &changed_paths, config)?;
        debug!(
            directory = %directory.display(),
            changed = changed.len(),
            existing = existing.len(),
            "Partitioned migration directory"
        );
        partitions.push(DirectoryPartition {
            directory,
            changed,
            existing,
        });
    }

    Ok(partitions)
}

/// Build a changed file from an input path, or `None` if it does not qualify.
async fn changed_candidate(
    path: &Path,
    config: &NumberingConfig,
) -> Result<Option<MigrationFile>, RenumberError> {
    if !has_segment(path, &config.dirname) {
        debug!(path = %path.display(), "Not inside a migration directory");
        return Ok(None);
    }

    let Some(parsed) = file_name_str(path).and_then(|name| config.pattern.parse(name)) else {
        debug!(path = %path.display(), "Filename does not match pattern");
        return Ok(None);
    };

    if !fs::try_exists(path).await? {
        debug!(path = %path.display(), "File no longer exists, skipping");
        return Ok(None);
    }

    Ok(Some(MigrationFile::new(
        path.to_path_buf(),
        parsed.number,
        parsed.suffix,
    )))
}

/// List matching entries of `directory` that are not in the changed set.
fn list_existing(
    directory: &Path,
    changed_paths: &HashSet<PathBuf>,
    config: &NumberingConfig,
) -> Result<Vec<MigrationFile>, RenumberError> {
    let mut existing = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| RenumberError::ListError(directory.to_path_buf(), e))?;
        let path = entry.path();

        if changed_paths.contains(path) {
            continue;
        }

        let Some(parsed) = file_name_str(path).and_then(|name| config.pattern.parse(name)) else {
            continue;
        };

        existing.push(MigrationFile::new(
            path.to_path_buf(),
            parsed.number,
            parsed.suffix,
        ));
    }

    Ok(existing)
}
