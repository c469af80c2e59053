//! In-memory workbook that is read once, annotated, and written back
//!
//! Reading goes through calamine, writing through rust_xlsxwriter. Cell
//! values of every sheet survive the round trip; styling does not, apart
//! from the hyperlinks this tool adds.

mod document;
mod reader;
mod writer;

pub use document::{CellValue, Sheet, Spreadsheet};

use thiserror::Error;

/// Opening or reading the workbook failed
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("Failed to open Excel file: {path}")]
    Open {
        path: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Failed to read sheet: {sheet}")]
    ReadSheet {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Excel file has no sheets")]
    NoSheets,
}

/// Writing the workbook back to disk failed
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write Excel file: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
