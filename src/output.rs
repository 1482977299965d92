//! Report persistence.
//!
//! The report is written as a CSV with the fixed layout
//! `Type, ID, PlatformName, Details`, one row per entry. Every field is
//! quoted unconditionally and the file starts with a UTF-8 BOM so
//! spreadsheet tools pick the right encoding; values themselves were kept
//! verbatim by the comparator, escaping happens only here.

use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use csv::QuoteStyle;
use tracing::info;

use crate::compare::ReportEntry;
use crate::error::{Result, ResultExt as _};

/// Column headers of the report artifact.
const REPORT_HEADERS: [&str; 4] = ["Type", "ID", "PlatformName", "Details"];

/// Write the full report to `path`. The report is always written in full;
/// nothing downstream (notification included) can invalidate it.
pub fn write_report(path: &Path, entries: &[ReportEntry]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    // utf-8-sig, for consumers that sniff the BOM.
    file.write_all("\u{feff}".as_bytes())?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(file);

    writer.write_record(REPORT_HEADERS)?;
    for entry in entries {
        writer.write_record([
            entry.kind.label(),
            entry.key.0.as_str(),
            entry.key.1.as_str(),
            entry.details.as_str(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), entries = entries.len(), "report written");
    Ok(())
}

/// Write the empty-object JSON sidecar next to the report and return its
/// path (`report.csv` -> `report.json`). The payload is intentionally an
/// empty object regardless of the comparison outcome; the sidecar is what
/// gets posted to the notification endpoint afterwards.
pub fn write_sidecar(report_path: &Path) -> Result<PathBuf> {
    let sidecar = report_path.with_extension("json");
    std::fs::write(&sidecar, "{}")
        .with_context(|| format!("Failed to write sidecar {}", sidecar.display()))?;
    Ok(sidecar)
}
