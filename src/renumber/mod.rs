//! Renumbering of migration directories.
//!
//! This module keeps the numeric prefixes of migration files contiguous and
//! free of duplicates after concurrent branches each add their own files.
//!
//! # Overview
//!
//! - `partition` groups the changed paths by migration directory and lists
//!   the files already there
//! - `validate_existing` keeps the longest valid run of existing files
//!   starting at 0 and hands back the rest
//! - `plan_renumbering` orders the changed files together with that rest and
//!   assigns consecutive numbers, using history to settle collisions
//! - `apply_renames` performs the renames without clobbering anything
//!
//! # Usage
//!
//! ```ignore
//! let config = NumberingConfig::default();
//! let outcome = renumber_migrations(&paths, &config, &GitHistory::new()).await?;
//! std::process::exit(outcome.exit_code().into());
//! ```

mod apply;
mod partition;
mod plan;
mod types;
mod validate;

pub use apply::apply_renames;
pub use partition::partition;
pub use plan::plan_renumbering;
pub use types::{
    Assignment, DirectoryPartition, MigrationFile, RenameRecord, RenumberError, RenumberOutcome,
    ValidatedSequence,
};
pub use validate::validate_existing;

use crate::config::NumberingConfig;
use crate::history::HistoryLookup;
use std::path::PathBuf;
use tracing::{debug, info};

/// Renumber every migration directory touched by `paths`.
///
/// Paths must already be absolute. Directories are processed one after the
/// other; a fatal I/O error stops the run and leaves earlier directories as
/// they were renamed.
pub async fn renumber_migrations(
    paths: &[PathBuf],
    config: &NumberingConfig,
    history: &dyn HistoryLookup,
) -> Result<RenumberOutcome, RenumberError> {
    let partitions = partition(paths, config).await?;
    let mut outcome = RenumberOutcome::default();

    for part in partitions {
        let validated = validate_existing(part.existing);
        debug!(
            directory = %part.directory.display(),
            max_valid = ?validated.max_valid,
            to_renumber = validated.to_renumber.len(),
            "Validated existing sequence"
        );

        let assignments = plan_renumbering(part.changed, validated, history).await;
        let renames = apply_renames(&assignments).await?;

        if !renames.is_empty() {
            info!(
                directory = %part.directory.display(),
                count = renames.len(),
                "Renumbered migrations"
            );
        }

        outcome.directories.push(part.directory);
        outcome.renames.extend(renames);
    }

    Ok(outcome)
}
