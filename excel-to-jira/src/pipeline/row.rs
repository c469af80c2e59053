//! Extract one row's issue fields from the sheet

use crate::config::{FieldMapping, fields};
use crate::excel::Sheet;

use super::RowError;

/// Text values of one spreadsheet row, ready to become an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub summary: String,
    pub description: String,
    /// Raw comma-delimited labels cell
    pub labels: String,
    pub issue_type: String,
    pub project: String,
    pub priority: String,
    pub assignee: String,
    /// Column that receives the created key
    pub id_column: u16,
}

impl RowRecord {
    /// Read every required field of `row`, failing on the first missing one
    pub fn extract(sheet: &Sheet, mapping: &FieldMapping, row: u32) -> Result<Self, RowError> {
        let cell = |field: &'static str| field_text(sheet, mapping, row, field);

        let record = Self {
            summary: cell(fields::SUMMARY)?,
            description: cell(fields::DESCRIPTION)?,
            labels: cell(fields::LABELS)?,
            issue_type: cell(fields::ISSUE_TYPE)?,
            project: cell(fields::PROJECT)?,
            priority: cell(fields::PRIORITY)?,
            assignee: cell(fields::ASSIGNEE)?,
            // The id cell is written, not read, but must be known before any
            // issue gets created for this row
            id_column: column(mapping, fields::ID)?,
        };

        Ok(record)
    }
}

fn column(mapping: &FieldMapping, field: &'static str) -> Result<u16, RowError> {
    mapping
        .column(field)
        .ok_or(RowError::UnmappedField { field })
}

fn field_text(
    sheet: &Sheet,
    mapping: &FieldMapping,
    row: u32,
    field: &'static str,
) -> Result<String, RowError> {
    let col = column(mapping, field)?;
    sheet.cell_text(row, col).ok_or_else(|| {
        log::debug!(
            "Invalid cell, empty cells are not allowed [row: {}, field: {}, column: {}]",
            row,
            field,
            col
        );
        RowError::MissingCell { field, column: col }
    })
}
