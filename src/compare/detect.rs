//! Per-column change detection over paired rows.

use tracing::warn;

use super::align::Paired;
use crate::snapshot::{Key, KeyColumns, Snapshot};

/// One non-key column whose normalized value differs between paired rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedValue {
    pub key: Key,
    pub column: String,
    pub old_value: String,
    pub new_value: String,
}

/// Detection output plus skip diagnostics.
#[derive(Debug, Default)]
pub struct Detection {
    /// Change records in report order: columns in old-snapshot column order,
    /// rows in join order within each column.
    pub changes: Vec<ChangedValue>,
    /// Columns present on only one side, old-snapshot ones first. Not an
    /// error, but exposed so callers can see what was never compared.
    pub skipped_columns: Vec<String>,
}

/// Compare every non-key column common to both snapshots across all paired
/// rows. Values are normalized before comparison, so absent vs. empty and
/// whitespace padding never count as a change. Columns present on only one
/// side are skipped and reported in [`Detection::skipped_columns`].
pub fn detect_changes(
    old: &Snapshot,
    new: &Snapshot,
    keys: &KeyColumns,
    paired: &[Paired<'_>],
) -> Detection {
    let mut detection = Detection::default();

    for (column, old_idx) in old.columns_with_index() {
        if keys.contains(column) {
            continue;
        }
        let Some(new_idx) = new.column_index(column) else {
            detection.skipped_columns.push(column.to_owned());
            continue;
        };

        for pair in paired {
            let old_value = pair.old[old_idx].normalized();
            let new_value = pair.new[new_idx].normalized();
            if old_value != new_value {
                detection.changes.push(ChangedValue {
                    key: pair.key.clone(),
                    column: column.to_owned(),
                    old_value,
                    new_value,
                });
            }
        }
    }

    for column in new.columns() {
        if !keys.contains(column) && old.column_index(column).is_none() {
            detection.skipped_columns.push(column.to_owned());
        }
    }

    if !detection.skipped_columns.is_empty() {
        warn!(
            columns = ?detection.skipped_columns,
            "columns present on only one side were excluded from change detection"
        );
    }

    detection
}
