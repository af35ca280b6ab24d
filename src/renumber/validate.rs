//! Detection of the valid numbered prefix among existing files.

use super::types::{MigrationFile, ValidatedSequence};
use tracing::debug;

/// Find the longest gap-free, duplicate-free run of existing files from 0.
///
/// Files are sorted by number (then filename, for a stable order among
/// duplicates) and walked in order. The first file whose number is not
/// exactly one past the previous one starts the anomalous tail: it and
/// every file after it are handed back for renumbering, whatever their own
/// numbers are. When the break is a duplicate, the file already kept with
/// that number joins the tail too, so history decides which of them keeps
/// the slot.
pub fn validate_existing(mut existing: Vec<MigrationFile>) -> ValidatedSequence {
    existing.sort_by(|a, b| {
        a.number
            .cmp(&b.number)
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut max_valid: Option<u64> = None;
    let mut kept = 0;

    for file in &existing {
        let expected = max_valid.map_or(0, |n| n + 1);
        if file.number == expected {
            max_valid = Some(file.number);
            kept += 1;
            continue;
        }

        debug!(
            file = %file.file_name(),
            number = file.number,
            expected,
            "Existing sequence broken, renumbering from here"
        );
        if max_valid == Some(file.number) {
            // Duplicate of the last kept file
            kept -= 1;
            max_valid = file.number.checked_sub(1);
        }
        break;
    }

    let to_renumber = existing.split_off(kept);
    ValidatedSequence {
        max_valid,
        to_renumber,
    }
}
