//! Report synthesis from alignment and detection output.

use serde::Serialize;

use super::align::NewRow;
use super::detect::ChangedValue;
use crate::snapshot::{Key, KeyColumns, Snapshot};

/// Report entry classification, rendered into the output's `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    NewItem,
    ChangedValue,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NewItem => "New Item",
            Self::ChangedValue => "Changed Value",
        }
    }
}

/// One line of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub kind: EntryKind,
    pub key: Key,
    pub details: String,
}

/// Assemble the ordered report: all new items (in new-row encounter order)
/// followed by all changed values (in detection order).
///
/// New-item details list every non-key column of the new snapshot, in that
/// snapshot's column order. When the snapshots share no non-key columns the
/// details degrade to an empty string, which is not an error.
pub fn build_report(
    new_snapshot: &Snapshot,
    keys: &KeyColumns,
    new_rows: &[NewRow<'_>],
    changes: &[ChangedValue],
) -> Vec<ReportEntry> {
    let mut entries = Vec::with_capacity(new_rows.len() + changes.len());

    let detail_columns: Vec<(usize, &str)> = new_snapshot
        .columns_with_index()
        .filter(|&(name, _)| !keys.contains(name))
        .map(|(name, idx)| (idx, name))
        .collect();

    for item in new_rows {
        let details = detail_columns
            .iter()
            .map(|(idx, name)| format!("{name}: {}", item.row[*idx].normalized()))
            .collect::<Vec<_>>()
            .join(" | ");
        entries.push(ReportEntry {
            kind: EntryKind::NewItem,
            key: item.key.clone(),
            details,
        });
    }

    for change in changes {
        entries.push(ReportEntry {
            kind: EntryKind::ChangedValue,
            key: change.key.clone(),
            details: format!(
                "{} changed from '{}' to '{}'",
                change.column, change.old_value, change.new_value
            ),
        });
    }

    entries
}
