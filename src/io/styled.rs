//! Formatting-aware access to `.xlsx` workbooks, backed by umya-spreadsheet.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::debug;
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet};

use crate::columns::{self, FileRole, LogicalColumn};
use crate::cutoff::{self, from_excel_serial, parse_datetime_text};
use crate::error::{Result, ToolError};
use crate::filter::TimedRow;
use crate::io::excel_read::HEADER_SCAN_ROWS;

/// Where the header and the time column sit on the source sheet (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    pub row: u32,
    pub time_column: u32,
}

/// Reads every sheet of an `.xlsx` workbook including styles.
pub fn open(path: &Path) -> Result<Spreadsheet> {
    if !path.exists() {
        return Err(ToolError::load(path, "file not found"));
    }
    umya_spreadsheet::reader::xlsx::read(path).map_err(|err| ToolError::load(path, err))
}

pub fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    umya_spreadsheet::writer::xlsx::write(book, path).map_err(|err| ToolError::write(path, err))
}

/// Finds the first row within the scan window containing a cell that names
/// the time column of `role`.
pub fn locate_header(sheet: &Worksheet, role: FileRole, path: &Path) -> Result<HeaderLocation> {
    let last_row = sheet.get_highest_row().min(HEADER_SCAN_ROWS);
    let last_col = sheet.get_highest_column();

    for row in 1..=last_row {
        for col in 1..=last_col {
            let Some(cell) = sheet.get_cell((col, row)) else {
                continue;
            };
            if columns::matches(role, LogicalColumn::Time, &cell.get_value()) {
                debug!(row, col, "located header row");
                return Ok(HeaderLocation {
                    row,
                    time_column: col,
                });
            }
        }
    }

    Err(ToolError::MissingColumn {
        path: path.to_path_buf(),
        column: columns::display_name(role, LogicalColumn::Time).to_string(),
    })
}

/// Data rows below the header that hold any content, with their parsed time.
pub fn data_rows(sheet: &Worksheet, header: HeaderLocation) -> Vec<TimedRow> {
    let last_col = sheet.get_highest_column();
    (header.row + 1..=sheet.get_highest_row())
        .filter(|row| (1..=last_col).any(|col| has_content(sheet.get_cell((col, *row)))))
        .map(|row| TimedRow {
            row,
            time: sheet
                .get_cell((header.time_column, row))
                .and_then(cell_datetime),
        })
        .collect()
}

/// Interprets a cell as a date-time: text in an accepted layout, or a number
/// whose format renders a date.
pub fn cell_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    let value = cell.get_value();
    if let Some(parsed) = parse_datetime_text(&value) {
        return Some(parsed);
    }
    let serial = value.trim().parse::<f64>().ok()?;
    let is_date = cell
        .get_style()
        .get_number_format()
        .map(|format| cutoff::is_date_format(format.get_format_code()))
        .unwrap_or(false);
    if is_date { from_excel_serial(serial) } else { None }
}

fn has_content(cell: Option<&Cell>) -> bool {
    cell.map(|cell| !cell.get_value().trim().is_empty())
        .unwrap_or(false)
}
