//! Row-by-row issue creation
//!
//! For each row in the configured window: extract the mapped cells, build
//! the create-issue body, call the tracker, and link the returned key into
//! the row's id cell. The workbook is saved once after the loop, whether the
//! loop finished or stopped on an error.

mod request;
mod row;
mod runner;

pub use row::RowRecord;
pub use runner::{Pipeline, RunOptions, RunReport};

use thiserror::Error;

use crate::jira::TrackerError;

/// Why a single row could not be turned into an issue
#[derive(Debug, Error)]
pub enum RowError {
    #[error("empty cell for '{field}' (column {column}) is not allowed")]
    MissingCell { field: &'static str, column: u16 },

    #[error("no column mapped for '{field}'")]
    UnmappedField { field: &'static str },

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// A row error together with the row it happened on
#[derive(Debug, Error)]
#[error("row {row} (Excel row {}): {source}", .row + 1)]
pub struct RowFailure {
    /// Zero-based row index
    pub row: u32,
    #[source]
    pub source: RowError,
}
