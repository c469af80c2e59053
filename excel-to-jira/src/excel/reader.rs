//! Load every sheet of an .xlsx file into memory

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use std::path::Path;

use super::{CellValue, Sheet, Spreadsheet, SpreadsheetError};

impl Spreadsheet {
    /// Open a workbook and copy all cell values out of it
    ///
    /// The file handle is released before returning, so the same path can be
    /// overwritten by [`Spreadsheet::save`].
    pub fn open(path: &Path) -> Result<Self, SpreadsheetError> {
        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|source| SpreadsheetError::Open {
                path: path.display().to_string(),
                source,
            })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|source| SpreadsheetError::ReadSheet {
                    sheet: name.clone(),
                    source,
                })?;
            log::debug!("Read sheet '{}' ({} used cells)", name, range.used_cells().count());
            sheets.push(sheet_from_range(name, &range));
        }

        Spreadsheet::new(sheets)
    }
}

fn sheet_from_range(name: String, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    // Range positions are relative to its first used cell
    let Some((start_row, start_col)) = range.start() else {
        return sheet;
    };

    for (row, col, data) in range.used_cells() {
        if let Some(value) = cell_value(data) {
            sheet.set(start_row + row as u32, (start_col as usize + col) as u16, value);
        }
    }

    sheet
}

fn cell_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::DateTime(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        // Formula errors such as #REF! carry no value worth keeping
        Data::Error(_) => None,
    }
}
