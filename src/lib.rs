//! # platdiff - Snapshot Comparison Library
//!
//! platdiff compares two tabular snapshots of the same dataset, keyed by a
//! composite identifier, and produces a human-readable delta report: rows
//! present only in the new snapshot and rows whose non-key fields changed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use platdiff::compare::compare;
//! use platdiff::snapshot::KeyColumns;
//! use platdiff::snapshot::reader::{ReadOptions, read_snapshot};
//! use std::path::Path;
//!
//! # fn example() -> platdiff::error::Result<()> {
//! let options = ReadOptions::default();
//! let old = read_snapshot(Path::new("5.0.47.csv"), &options)?;
//! let new = read_snapshot(Path::new("5.0.65.csv"), &options)?;
//!
//! let comparison = compare(&old, &new, &KeyColumns::default())?;
//! println!("{} new, {} changed", comparison.new_item_count, comparison.changed_value_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`snapshot`]: in-memory snapshot model and CSV ingestion
//! - [`compare`]: alignment, change detection and report synthesis
//! - [`output`]: report persistence (CSV artifact plus JSON sidecar)
//! - [`notify`]: best-effort post-run status notification
//! - [`error`]: error types and handling utilities
//!
//! ## Scaling note
//!
//! Both snapshots and the join results are held in memory for the duration
//! of a run. Comparison runs over different snapshot pairs share no state
//! and may be executed in parallel by the caller.

#![warn(clippy::all, rust_2018_idioms)]

pub mod compare;
pub mod error;
pub mod logging;
pub mod notify;
pub mod output;
pub mod snapshot;
