//! Assignment of new numbers to contending files.

use super::types::{Assignment, MigrationFile, ValidatedSequence};
use crate::history::{HistoryLookup, HistoryTimestamp};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Order the contending files and give each the next free number.
///
/// Contenders are the changed files plus the anomalous tail of the existing
/// files. They are ordered by their original number, then by earliest
/// history (unknown last), then by filename. Numbers are handed out from
/// just past the valid existing prefix, one per file, so the result is a
/// contiguous range with no repeats.
///
/// History is only looked up for files whose original number is shared
/// with another contender; for the rest it cannot affect the order.
pub async fn plan_renumbering(
    changed: Vec<MigrationFile>,
    validated: ValidatedSequence,
    history: &dyn HistoryLookup,
) -> Vec<Assignment> {
    let first_number = validated.next_number();

    let mut contenders = changed;
    contenders.extend(validated.to_renumber);

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for file in &contenders {
        *counts.entry(file.number).or_default() += 1;
    }

    for file in contenders.iter_mut() {
        if counts.get(&file.number).copied().unwrap_or_default() > 1 {
            let found = history
                .earliest_change(file.directory(), file.file_name())
                .await;
            file.history = found;
            debug!(
                file = %file.file_name(),
                number = file.number,
                history = ?file.history,
                "Number collision, using history to order"
            );
        }
    }

    contenders.sort_by(compare_contenders);

    contenders
        .into_iter()
        .zip(first_number..)
        .map(|(file, new_number)| {
            debug!(
                file = %file.file_name(),
                from = file.number,
                to = new_number,
                "Assigned number"
            );
            Assignment { file, new_number }
        })
        .collect()
}

fn compare_contenders(a: &MigrationFile, b: &MigrationFile) -> Ordering {
    a.number
        .cmp(&b.number)
        .then_with(|| compare_history(a.history.as_ref(), b.history.as_ref()))
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Known timestamps ascending, unknown after all of them.
fn compare_history(a: Option<&HistoryTimestamp>, b: Option<&HistoryTimestamp>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Fixed timestamps per filename, recording every lookup.
    struct FakeHistory {
        stamps: HashMap<String, HistoryTimestamp>,
        lookups: Mutex<Vec<String>>,
    }

    impl FakeHistory {
        fn new(stamps: &[(&str, &str)]) -> Self {
            Self {
                stamps: stamps
                    .iter()
                    .map(|(name, ts)| {
                        (name.to_string(), DateTime::parse_from_rfc3339(ts).unwrap())
                    })
                    .collect(),
                lookups: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HistoryLookup for FakeHistory {
        async fn earliest_change(
            &self,
            _directory: &Path,
            filename: &str,
        ) -> Option<HistoryTimestamp> {
            self.lookups.lock().unwrap().push(filename.to_string());
            self.stamps.get(filename).copied()
        }
    }

    fn file(name: &str) -> MigrationFile {
        let (number, suffix) = name.split_once('_').unwrap();
        MigrationFile::new(
            PathBuf::from("/repo/migrations").join(name),
            number.parse().unwrap(),
            format!("_{suffix}"),
        )
    }

    fn valid_up_to(max_valid: Option<u64>) -> ValidatedSequence {
        ValidatedSequence {
            max_valid,
            to_renumber: Vec::new(),
        }
    }

    fn new_names(assignments: &[Assignment]) -> Vec<String> {
        assignments.iter().map(Assignment::new_name).collect()
    }

    #[tokio::test]
    async fn test_collision_resolved_by_history() {
        let history = FakeHistory::new(&[
            ("1_b.sql", "2024-01-01T00:00:00Z"),
            ("1_c.sql", "2024-02-01T00:00:00Z"),
        ]);

        let assignments = plan_renumbering(
            vec![file("1_c.sql"), file("1_b.sql")],
            valid_up_to(Some(0)),
            &history,
        )
        .await;

        assert_eq!(new_names(&assignments), vec!["1_b.sql", "2_c.sql"]);
        assert!(assignments[0].is_noop());
        assert!(!assignments[1].is_noop());
    }

    #[tokio::test]
    async fn test_unknown_history_sorts_last() {
        let history = FakeHistory::new(&[("3_late.sql", "2030-01-01T00:00:00Z")]);

        let assignments = plan_renumbering(
            vec![file("3_new.sql"), file("3_late.sql")],
            valid_up_to(Some(2)),
            &history,
        )
        .await;

        assert_eq!(new_names(&assignments), vec!["3_late.sql", "4_new.sql"]);
    }

    #[tokio::test]
    async fn test_number_outranks_history() {
        let history = FakeHistory::new(&[
            ("2_old.sql", "2020-01-01T00:00:00Z"),
            ("2_mid.sql", "2021-01-01T00:00:00Z"),
            ("1_young.sql", "2025-01-01T00:00:00Z"),
        ]);

        let assignments = plan_renumbering(
            vec![file("2_mid.sql"), file("1_young.sql"), file("2_old.sql")],
            valid_up_to(None),
            &history,
        )
        .await;

        assert_eq!(
            new_names(&assignments),
            vec!["0_young.sql", "1_old.sql", "2_mid.sql"]
        );
    }

    #[tokio::test]
    async fn test_history_only_consulted_for_collisions() {
        let history = FakeHistory::new(&[]);

        let validated = ValidatedSequence {
            max_valid: Some(0),
            to_renumber: vec![file("4_x.sql")],
        };
        plan_renumbering(
            vec![file("2_a.sql"), file("2_b.sql"), file("3_c.sql")],
            validated,
            &history,
        )
        .await;

        let mut lookups = history.lookups.lock().unwrap().clone();
        lookups.sort();
        assert_eq!(lookups, vec!["2_a.sql", "2_b.sql"]);
    }

    #[tokio::test]
    async fn test_assignments_are_contiguous() {
        let history = FakeHistory::new(&[]);
        let validated = ValidatedSequence {
            max_valid: Some(1),
            to_renumber: vec![file("5_e.sql"), file("9_f.sql")],
        };

        let assignments =
            plan_renumbering(vec![file("2_c.sql"), file("2_d.sql")], validated, &history).await;

        let numbers: Vec<u64> = assignments.iter().map(|a| a.new_number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5]);
        assert_eq!(
            new_names(&assignments),
            vec!["2_c.sql", "3_d.sql", "4_e.sql", "5_f.sql"]
        );
    }
}
