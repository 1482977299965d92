//! Snapshot comparison pipeline.
//!
//! Three stages run strictly in sequence over fully materialized snapshots:
//! alignment partitions the new snapshot's rows by key and inner-joins the
//! common keys, change detection compares paired rows per column with value
//! normalization, and report synthesis serializes both groups into one
//! ordered report. The whole pipeline is synchronous and holds everything in
//! memory (O(total rows * average row width)); there is no streaming mode.
//!
//! Removals are asymmetric by design: a key present only in the old snapshot
//! produces no report entry of any kind.

pub mod align;
pub mod detect;
pub mod report;

use tracing::info;

pub use align::{Alignment, NewRow, Paired};
pub use detect::{ChangedValue, Detection};
pub use report::{EntryKind, ReportEntry};

use crate::error::Result;
use crate::snapshot::{KeyColumns, Snapshot};

/// The completed comparison of one snapshot pair.
#[derive(Debug)]
pub struct Comparison {
    /// Ordered report entries: new items first, changed values after.
    pub entries: Vec<ReportEntry>,
    pub new_item_count: usize,
    pub changed_value_count: usize,
    /// Columns present on only one side, which could not be compared.
    pub skipped_columns: Vec<String>,
}

impl Comparison {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run the full pipeline over one snapshot pair.
///
/// # Errors
///
/// Fails only on structural problems: a key column missing from either
/// snapshot. Value-level anomalies never abort the comparison.
pub fn compare(old: &Snapshot, new: &Snapshot, keys: &KeyColumns) -> Result<Comparison> {
    let alignment = align::align(old, new, keys)?;
    let detection = detect::detect_changes(old, new, keys, &alignment.paired);
    let entries = report::build_report(new, keys, &alignment.new_rows, &detection.changes);

    let comparison = Comparison {
        new_item_count: alignment.new_rows.len(),
        changed_value_count: detection.changes.len(),
        skipped_columns: detection.skipped_columns,
        entries,
    };

    info!(
        new_items = comparison.new_item_count,
        changed_values = comparison.changed_value_count,
        skipped_columns = comparison.skipped_columns.len(),
        "comparison finished"
    );

    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Value;

    fn snapshot(source: &str, rows: &[(&str, &str, &str)]) -> Snapshot {
        let mut snap = Snapshot::new(
            source,
            vec!["ID".to_owned(), "PlatformName".to_owned(), "status".to_owned()],
        );
        for (id, platform, status) in rows {
            snap.push_row(vec![
                Value::Text((*id).to_owned()),
                Value::Text((*platform).to_owned()),
                Value::Text((*status).to_owned()),
            ]);
        }
        snap
    }

    #[test]
    fn test_self_comparison_is_empty() {
        let snap = snapshot("old", &[("1", "A", "active"), ("2", "B", "idle")]);
        let comparison = compare(&snap, &snap, &KeyColumns::default()).unwrap();
        assert!(comparison.is_empty());
        assert_eq!(comparison.new_item_count, 0);
        assert_eq!(comparison.changed_value_count, 0);
    }

    #[test]
    fn test_new_items_and_changes_combined() {
        let old = snapshot("old", &[("1", "A", "active")]);
        let new = snapshot("new", &[("1", "A", "inactive"), ("2", "B", "active")]);

        let comparison = compare(&old, &new, &KeyColumns::default()).unwrap();
        assert_eq!(comparison.new_item_count, 1);
        assert_eq!(comparison.changed_value_count, 1);
        assert_eq!(comparison.entries.len(), 2);
        assert_eq!(comparison.entries[0].kind, EntryKind::NewItem);
        assert_eq!(comparison.entries[1].kind, EntryKind::ChangedValue);
    }

    #[test]
    fn test_removed_key_never_appears() {
        let old = snapshot("old", &[("9", "Z", "active"), ("1", "A", "active")]);
        let new = snapshot("new", &[("1", "A", "active")]);

        let comparison = compare(&old, &new, &KeyColumns::default()).unwrap();
        // Removals are not reported: nothing may reference (9, Z).
        assert!(comparison.is_empty());
        assert!(
            comparison
                .entries
                .iter()
                .all(|e| e.key != ("9".to_owned(), "Z".to_owned()))
        );
    }
}
