use std::collections::BTreeMap;
use std::ops::Range;

use super::SpreadsheetError;

/// A single non-empty cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Excel serial date, written back with a date format
    DateTime(f64),
    Bool(bool),
    /// Displayed text with a hyperlink behind it
    Link { text: String, url: String },
}

/// Cells of one worksheet, keyed by absolute (row, column)
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn set(&mut self, row: u32, col: u16, value: CellValue) {
        self.cells.insert((row, col), value);
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.cells.iter().map(|(&(row, col), value)| (row, col, value))
    }

    /// Text of a cell, or `None` when it is absent or blank
    ///
    /// Numbers are rendered without a trailing `.0` when integral, so an ID
    /// typed as `42` reads back as "42" rather than "42.0".
    pub fn cell_text(&self, row: u32, col: u16) -> Option<String> {
        match self.get(row, col)? {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            CellValue::Text(_) => None,
            CellValue::Number(f) | CellValue::DateTime(f) => Some(format_number(*f)),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Link { text, .. } if !text.trim().is_empty() => Some(text.clone()),
            CellValue::Link { .. } => None,
        }
    }

    /// Replace a cell with a hyperlink showing `text`
    pub fn set_link(&mut self, row: u32, col: u16, text: &str, url: &str) {
        self.set(
            row,
            col,
            CellValue::Link {
                text: text.to_string(),
                url: url.to_string(),
            },
        );
    }

    /// Turn plain text cells of `col` within `rows` back into links
    ///
    /// Cells outside `rows` are left alone. Returns the number of cells
    /// relinked.
    pub fn relink_column(
        &mut self,
        col: u16,
        rows: Range<u32>,
        url_for: impl Fn(&str) -> String,
    ) -> usize {
        let mut count = 0;
        for (&(row, c), value) in self.cells.iter_mut() {
            if c != col || !rows.contains(&row) {
                continue;
            }
            if let CellValue::Text(text) = value {
                let key = text.trim();
                if key.is_empty() {
                    continue;
                }
                let link = CellValue::Link {
                    url: url_for(key),
                    text: key.to_string(),
                };
                *value = link;
                count += 1;
            }
        }
        count
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Every sheet of a workbook; the first one is the one being processed
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    sheets: Vec<Sheet>,
}

impl Spreadsheet {
    pub fn new(sheets: Vec<Sheet>) -> Result<Self, SpreadsheetError> {
        if sheets.is_empty() {
            return Err(SpreadsheetError::NoSheets);
        }
        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn first_sheet(&self) -> &Sheet {
        &self.sheets[0]
    }

    pub fn first_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[0]
    }
}
