//! Write the in-memory workbook back to disk

use rust_xlsxwriter::{Color, Format, FormatUnderline, Url, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

use super::{CellValue, PersistenceError, Spreadsheet};

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

impl Spreadsheet {
    /// Overwrite `path` with the current contents
    ///
    /// The workbook is first written next to the target and then renamed over
    /// it, so a failed write leaves the original file untouched.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let mut workbook = self.build_workbook()?;

        let tmp = temp_path(path);
        if let Err(e) = workbook.save(&tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        if let Err(source) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(PersistenceError::Io {
                path: path.display().to_string(),
                source,
            });
        }

        Ok(())
    }

    fn build_workbook(&self) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let link_format = link_format();
        let date_format = Format::new().set_num_format(DATE_FORMAT);

        for sheet in self.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name())?;

            for (row, col, value) in sheet.cells() {
                write_cell(worksheet, row, col, value, &link_format, &date_format)?;
            }
        }

        Ok(workbook)
    }
}

/// Created issues stand out from unprocessed rows
fn link_format() -> Format {
    Format::new()
        .set_font_color(Color::Red)
        .set_underline(FormatUnderline::Single)
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    link_format: &Format,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Text(s) => { ws.write_string(row, col, s)?; }
        CellValue::Number(n) => { ws.write_number(row, col, *n)?; }
        CellValue::DateTime(n) => { ws.write_number_with_format(row, col, *n, date_format)?; }
        CellValue::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        CellValue::Link { text, url } => {
            let link = Url::new(url.as_str()).set_text(text.as_str());
            // A rejected URL must not cost the rest of the workbook
            if let Err(e) = ws.write_url_with_format(row, col, link, link_format) {
                log::warn!(
                    "Writing cell [row: {}, column: {}] as plain text: {}",
                    row,
                    col,
                    e
                );
                ws.write_string(row, col, text)?;
            }
        }
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook.xlsx".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
