//! Key-based row alignment between two snapshots.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::snapshot::{Key, KeyColumns, Row, Snapshot};

/// A row present only in the new snapshot.
#[derive(Debug)]
pub struct NewRow<'a> {
    pub key: Key,
    pub row: &'a Row,
}

/// An old/new row pair sharing a key.
#[derive(Debug)]
pub struct Paired<'a> {
    pub key: Key,
    pub old: &'a Row,
    pub new: &'a Row,
}

/// Output of the alignment stage: the sole input to change detection.
#[derive(Debug)]
pub struct Alignment<'a> {
    /// New-snapshot rows whose key is absent from the old snapshot, in
    /// encounter order.
    pub new_rows: Vec<NewRow<'a>>,
    /// Inner join on key. Old-only keys contribute nothing here; removals
    /// are deliberately not surfaced.
    pub paired: Vec<Paired<'a>>,
}

/// Partition the new snapshot into new and common rows and inner-join the
/// common keys.
///
/// Keys are assumed unique per snapshot but not enforced: a key appearing
/// k times in old and m times in new yields k*m pairs, the same behavior
/// as an unguarded equality join. Callers treating pairs as 1:1 must ensure
/// key uniqueness upstream.
///
/// Pair order is old-row-major: old rows in encounter order, matching new
/// rows in their encounter order within each key.
///
/// # Errors
///
/// Fails fast with `MissingKeyColumn` if either snapshot lacks a key column.
pub fn align<'a>(
    old: &'a Snapshot,
    new: &'a Snapshot,
    keys: &KeyColumns,
) -> Result<Alignment<'a>> {
    let old_indices = keys.resolve(old)?;
    let new_indices = keys.resolve(new)?;

    let old_keys: HashSet<Key> = old.rows().iter().map(|r| old_indices.key_of(r)).collect();

    let mut new_by_key: HashMap<Key, Vec<&Row>> = HashMap::new();
    let mut new_rows = Vec::new();
    for row in new.rows() {
        let key = new_indices.key_of(row);
        if old_keys.contains(&key) {
            new_by_key.entry(key).or_default().push(row);
        } else {
            new_rows.push(NewRow { key, row });
        }
    }

    let mut paired = Vec::new();
    for old_row in old.rows() {
        let key = old_indices.key_of(old_row);
        if let Some(matches) = new_by_key.get(&key) {
            for &new_row in matches {
                paired.push(Paired {
                    key: key.clone(),
                    old: old_row,
                    new: new_row,
                });
            }
        }
    }

    Ok(Alignment { new_rows, paired })
}
