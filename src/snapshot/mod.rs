//! In-memory model for one side of a comparison.
//!
//! A [`Snapshot`] is an ordered sequence of rows sharing one ordered column
//! set. Cell values are a tagged union ([`Value`]) so "absent" (a recognised
//! null token in the source file) stays distinct from "present but empty"
//! until normalization folds both to the empty string.
//!
//! Column order is load-bearing: the report's within-group ordering follows
//! the old snapshot's column order, so columns live in an insertion-ordered
//! map rather than a hash map.

pub mod reader;

use indexmap::IndexMap;

use crate::error::{PlatdiffError, Result};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null/NaN in the source (empty field or a configured null token).
    Absent,
    /// A present scalar, kept verbatim including surrounding whitespace.
    Text(String),
}

impl Value {
    /// Canonical form used for change detection: absent values become the
    /// empty string, present values are trimmed. Nothing else is altered, so
    /// delimiters and quotes survive for the output serializer to escape.
    pub fn normalized(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Text(s) => s.trim().to_owned(),
        }
    }

    /// Key tuple member for this value. Key columns are compared verbatim
    /// (no trimming), except that an absent key cell degrades to the empty
    /// string instead of failing the row.
    pub fn key_part(&self) -> &str {
        match self {
            Self::Absent => "",
            Self::Text(s) => s,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// One row of a snapshot, positionally aligned with the snapshot's columns.
pub type Row = Vec<Value>;

/// Composite key identifying one logical entity across snapshots.
pub type Key = (String, String);

/// The two column names that form the composite key.
#[derive(Debug, Clone)]
pub struct KeyColumns {
    pub first: String,
    pub second: String,
}

impl Default for KeyColumns {
    fn default() -> Self {
        Self {
            first: "ID".to_owned(),
            second: "PlatformName".to_owned(),
        }
    }
}

impl KeyColumns {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Resolve both key columns to positions within `snapshot`, failing fast
    /// with `MissingKeyColumn` if either is absent.
    pub fn resolve(&self, snapshot: &Snapshot) -> Result<KeyIndices> {
        let lookup = |column: &str| {
            snapshot
                .column_index(column)
                .ok_or_else(|| PlatdiffError::MissingKeyColumn {
                    source: snapshot.source().to_owned(),
                    column: column.to_owned(),
                })
        };
        Ok(KeyIndices {
            first: lookup(&self.first)?,
            second: lookup(&self.second)?,
        })
    }

    /// True if `column` is one of the two key columns.
    pub fn contains(&self, column: &str) -> bool {
        column == self.first || column == self.second
    }
}

/// Resolved positions of the key columns within one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct KeyIndices {
    pub first: usize,
    pub second: usize,
}

impl KeyIndices {
    /// Extract the composite key from a row.
    pub fn key_of(&self, row: &Row) -> Key {
        let part = |idx: usize| {
            row.get(idx)
                .map(|v| v.key_part().to_owned())
                .unwrap_or_default()
        };
        (part(self.first), part(self.second))
    }
}

/// One fully materialized side (old or new) of a comparison.
#[derive(Debug, Clone)]
pub struct Snapshot {
    source: String,
    columns: IndexMap<String, usize>,
    rows: Vec<Row>,
}

impl Snapshot {
    /// Create an empty snapshot with the given column set, in order.
    pub fn new(source: impl Into<String>, columns: Vec<String>) -> Self {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name, idx))
            .collect();
        Self {
            source: source.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Identifier for error messages, usually the source file path.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column names in their original order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Column names paired with their stored row positions, in column
    /// order. Callers indexing rows must use these positions rather than
    /// re-enumerating, so name lookup and row access cannot diverge.
    pub fn columns_with_index(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, &idx)| (name.as_str(), idx))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Append a row. The row must be positionally aligned with the column
    /// set; the ingestion layer guarantees this by skipping ragged records.
    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
