//! CSV ingestion for snapshots.
//!
//! The reader owns everything the diff core should not care about: character
//! encodings, delimiter detection, malformed rows and null tokens. Encodings
//! are tried in a fixed order (UTF-8 first, with BOM tolerance, then EUC-KR
//! which covers the cp949 superset) and the first one that decodes cleanly
//! and yields a header row wins. Records whose field count disagrees with
//! the header are skipped, not fatal.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use encoding_rs::{EUC_KR, UTF_8};
use tracing::{debug, warn};

use super::{Snapshot, Value};
use crate::error::{PlatdiffError, Result};

/// Field contents treated as absent/null, matched exactly against the raw
/// (untrimmed) field. Mirrors the conventional token set of the upstream
/// data feeds.
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", "NA", "NULL", "null", "None", "none"];

/// Delimiters considered during sniffing, in priority order.
const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Ingestion configuration.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Raw field values mapped to [`Value::Absent`].
    pub null_tokens: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Read one snapshot from a CSV file.
///
/// # Errors
///
/// Returns [`PlatdiffError::InputUnreadable`] when no supported encoding
/// yields a table with a header row, and I/O errors for unreadable paths.
pub fn read_snapshot(path: &Path, options: &ReadOptions) -> Result<Snapshot> {
    let bytes = fs::read(path)?;

    let mut last_detail = "file is empty".to_owned();
    for encoding in [UTF_8, EUC_KR] {
        // decode() sniffs and strips a BOM, so utf-8-sig files land here too.
        let (text, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            last_detail = format!("not valid {}", encoding.name());
            continue;
        }

        match parse_table(path, &text, options) {
            Ok(snapshot) => {
                debug!(
                    path = %path.display(),
                    encoding = encoding.name(),
                    rows = snapshot.row_count(),
                    columns = snapshot.column_count(),
                    "snapshot loaded"
                );
                return Ok(snapshot);
            }
            Err(detail) => last_detail = detail,
        }
    }

    Err(PlatdiffError::InputUnreadable {
        path: path.to_owned(),
        detail: last_detail,
    })
}

/// Parse decoded text into a snapshot. Returns a plain string detail on
/// failure so the caller can fold it into `InputUnreadable`.
fn parse_table(path: &Path, text: &str, options: &ReadOptions) -> std::result::Result<Snapshot, String> {
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("header parse failed: {e}"))?
        .iter()
        .map(str::to_owned)
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err("no header row".to_owned());
    }
    let headers = dedup_headers(headers);

    let mut snapshot = Snapshot::new(path.display().to_string(), headers.clone());
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.len() != headers.len() {
            skipped += 1;
            continue;
        }
        let row = record
            .iter()
            .map(|field| {
                if options.null_tokens.iter().any(|t| t == field) {
                    Value::Absent
                } else {
                    Value::Text(field.to_owned())
                }
            })
            .collect();
        snapshot.push_row(row);
    }

    if skipped > 0 {
        warn!(
            path = %path.display(),
            skipped,
            "skipped malformed rows during ingestion"
        );
    }

    Ok(snapshot)
}

/// Disambiguate repeated header names the way pandas does: the second
/// `status` becomes `status.1`, the third `status.2`, and so on. Repeated
/// names would otherwise collapse in the snapshot's column map and misalign
/// every column after the duplicate.
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let unique = match seen.get(&name).copied() {
            None => name.clone(),
            Some(n) => {
                let mut k = n + 1;
                let mut candidate = format!("{name}.{k}");
                while seen.contains_key(&candidate) {
                    k += 1;
                    candidate = format!("{name}.{k}");
                }
                seen.insert(name, k);
                candidate
            }
        };
        seen.entry(unique.clone()).or_insert(0);
        out.push(unique);
    }
    out
}

/// Pick the delimiter with the most occurrences in the header line,
/// ignoring bytes inside quoted fields. Ties and absence fall back to
/// the comma.
fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or("");

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for b in header_line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(pos) = CANDIDATE_DELIMITERS.iter().position(|d| *d == b) {
                counts[pos] += 1;
            }
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (pos, &count) in counts.iter().enumerate() {
        // Strict comparison keeps the earlier candidate on ties.
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((pos, count));
        }
    }
    best.map_or(b',', |(pos, _)| CANDIDATE_DELIMITERS[pos])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn read(bytes: &[u8]) -> Result<Snapshot> {
        let file = write_temp(bytes);
        read_snapshot(file.path(), &ReadOptions::default())
    }

    #[test]
    fn test_read_plain_utf8() {
        let snap = read(b"ID,PlatformName,status\n1,Windows,active\n2,Linux,inactive\n").unwrap();
        assert_eq!(snap.row_count(), 2);
        let cols: Vec<&str> = snap.columns().collect();
        assert_eq!(cols, vec!["ID", "PlatformName", "status"]);
    }

    #[test]
    fn test_read_utf8_with_bom() {
        let snap = read("\u{feff}ID,PlatformName\n1,Windows\n".as_bytes()).unwrap();
        // The BOM must not leak into the first column name.
        assert_eq!(snap.column_index("ID"), Some(0));
    }

    #[test]
    fn test_read_euc_kr_fallback() {
        let (encoded, _, _) = EUC_KR.encode("ID,PlatformName\n1,윈도우\n");
        let snap = read(&encoded).unwrap();
        assert_eq!(snap.rows()[0][1], Value::Text("윈도우".to_owned()));
    }

    #[test]
    fn test_null_tokens_become_absent() {
        let snap = read(b"ID,PlatformName,status\n1,Windows,NA\n2,Linux,\n3,Mac,none\n").unwrap();
        assert!(snap.rows()[0][2].is_absent());
        assert!(snap.rows()[1][2].is_absent());
        assert!(snap.rows()[2][2].is_absent());
    }

    #[test]
    fn test_ragged_rows_are_skipped() {
        let snap = read(b"ID,PlatformName,status\n1,Windows,active\n2,Linux\n3,Mac,ok,extra\n").unwrap();
        assert_eq!(snap.row_count(), 1);
    }

    #[test]
    fn test_semicolon_delimiter_sniffed() {
        let snap = read(b"ID;PlatformName;status\n1;Windows;active\n").unwrap();
        assert_eq!(snap.column_count(), 3);
        assert_eq!(snap.rows()[0][1], Value::Text("Windows".to_owned()));
    }

    #[test]
    fn test_duplicate_header_names_are_disambiguated() {
        let snap = read(b"ID,PlatformName,status,status,notes\n1,Windows,active,legacy,ok\n").unwrap();
        let cols: Vec<&str> = snap.columns().collect();
        assert_eq!(cols, vec!["ID", "PlatformName", "status", "status.1", "notes"]);
        assert_eq!(snap.row_count(), 1);
        // Columns after the duplicate must stay aligned with their values.
        let notes_idx = snap.column_index("notes").unwrap();
        assert_eq!(snap.rows()[0][notes_idx], Value::Text("ok".to_owned()));
        let second_status = snap.column_index("status.1").unwrap();
        assert_eq!(snap.rows()[0][second_status], Value::Text("legacy".to_owned()));
    }

    #[test]
    fn test_triplicate_header_names() {
        let snap = read(b"ID,PlatformName,x,x,x\n1,A,a,b,c\n").unwrap();
        let cols: Vec<&str> = snap.columns().collect();
        assert_eq!(cols, vec!["ID", "PlatformName", "x", "x.1", "x.2"]);
    }

    #[test]
    fn test_quoted_header_does_not_skew_sniffing() {
        // The commas inside the quoted field must not outvote the real
        // semicolon delimiter.
        let snap = read(b"\"a,b,c\";PlatformName;ID\n1;Windows;2\n").unwrap();
        assert_eq!(snap.column_count(), 3);
        assert_eq!(snap.column_index("a,b,c"), Some(0));
        assert_eq!(snap.rows()[0][1], Value::Text("Windows".to_owned()));
    }

    #[test]
    fn test_quoted_fields_keep_delimiters() {
        let snap = read(b"ID,PlatformName,notes\n1,Windows,\"a, b\"\n").unwrap();
        assert_eq!(snap.rows()[0][2], Value::Text("a, b".to_owned()));
    }

    #[test]
    fn test_empty_file_is_unreadable() {
        let err = read(b"").unwrap_err();
        assert!(matches!(err, PlatdiffError::InputUnreadable { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_snapshot(Path::new("/nonexistent/snapshot.csv"), &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlatdiffError::Io(_)));
    }

    #[test]
    fn test_custom_null_tokens() {
        let file = write_temp(b"ID,PlatformName,status\n1,Windows,missing\n");
        let options = ReadOptions {
            null_tokens: vec!["missing".to_owned()],
        };
        let snap = read_snapshot(file.path(), &options).unwrap();
        assert!(snap.rows()[0][2].is_absent());
    }
}
