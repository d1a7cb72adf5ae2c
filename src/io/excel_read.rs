use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use tracing::debug;

use crate::columns::{self, FileRole, LogicalColumn};
use crate::error::{Result, ToolError};
use crate::model::{CellValue, Record, RecordSet, TableShape};

/// Number of leading sheet rows searched for the header.
pub const HEADER_SCAN_ROWS: u32 = 5;

/// Loads the first worksheet of an `.xlsx`/`.xls` workbook as records. The
/// header is the first row within [`HEADER_SCAN_ROWS`] that names the time
/// column of `role`.
pub fn load_record_set(path: &Path, role: FileRole) -> Result<RecordSet> {
    let range = read_first_sheet(path)?;
    let start_row = range.start().map(|(row, _)| row).unwrap_or(0);

    let time_label = columns::display_name(role, LogicalColumn::Time);
    let (offset, headers, time_column) = locate_header(&range, start_row, role).ok_or_else(|| {
        ToolError::MissingColumn {
            path: path.to_path_buf(),
            column: time_label.to_string(),
        }
    })?;

    let id_column = columns::find(role, LogicalColumn::Id, headers.iter().map(String::as_str));
    if columns::requires_id(role) && id_column.is_none() {
        return Err(ToolError::MissingColumn {
            path: path.to_path_buf(),
            column: columns::display_name(role, LogicalColumn::Id).to_string(),
        });
    }

    let records: Vec<Record> = range
        .rows()
        .skip(offset + 1)
        .filter_map(|row| convert_row(row, headers.len()))
        .map(|cells| Record::new(cells, time_column))
        .collect();

    let header_row = start_row + offset as u32 + 1;
    debug!(
        path = %path.display(),
        %role,
        header_row,
        time_column = %headers[time_column],
        rows = records.len(),
        "loaded record set"
    );

    Ok(RecordSet {
        source: path.to_path_buf(),
        columns: headers,
        time_column,
        id_column,
        records,
    })
}

/// Reads the header labels found on sheet row `header_row` (1-based) and
/// counts the non-blank rows below it.
pub fn read_shape(path: &Path, header_row: u32) -> Result<TableShape> {
    let range = read_first_sheet(path)?;
    let start_row = range.start().map(|(row, _)| row).unwrap_or(0);

    let Some(offset) = (header_row.saturating_sub(1)).checked_sub(start_row) else {
        return Ok(TableShape {
            columns: Vec::new(),
            rows: 0,
        });
    };

    let columns = range
        .rows()
        .nth(offset as usize)
        .map(header_labels)
        .unwrap_or_default();
    let rows = range
        .rows()
        .skip(offset as usize + 1)
        .filter(|row| !is_blank_row(row))
        .count();

    Ok(TableShape { columns, rows })
}

fn read_first_sheet(path: &Path) -> Result<Range<DataType>> {
    if !path.exists() {
        return Err(ToolError::load(path, "file not found"));
    }
    let mut workbook = open_workbook_auto(path).map_err(|err| ToolError::load(path, err))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolError::load(path, "workbook contains no worksheets"))?
        .map_err(|err| ToolError::load(path, err))
}

fn locate_header(
    range: &Range<DataType>,
    start_row: u32,
    role: FileRole,
) -> Option<(usize, Vec<String>, usize)> {
    let window = HEADER_SCAN_ROWS.saturating_sub(start_row) as usize;
    range
        .rows()
        .take(window)
        .enumerate()
        .find_map(|(offset, row)| {
            let headers = header_labels(row);
            columns::find(role, LogicalColumn::Time, headers.iter().map(String::as_str))
                .map(|time_column| (offset, headers, time_column))
        })
}

fn header_labels(row: &[DataType]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(index, cell)| {
            let label = cell_to_string(cell);
            let label = label.trim();
            if label.is_empty() {
                format!("Unnamed: {index}")
            } else {
                label.to_string()
            }
        })
        .collect()
}

/// Converts a data row, dropping rows without any content.
fn convert_row(row: &[DataType], width: usize) -> Option<Vec<CellValue>> {
    if is_blank_row(row) {
        return None;
    }
    let mut cells: Vec<CellValue> = row.iter().take(width).map(convert_cell).collect();
    cells.resize(width, CellValue::Empty);
    Some(cells)
}

fn is_blank_row(row: &[DataType]) -> bool {
    row.iter().map(convert_cell).all(|cell| cell.is_empty())
}

pub(crate) fn convert_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(value) => CellValue::String(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Int(*value),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(serial) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(*serial)),
        DataType::Error(err) => CellValue::Error(err.to_string()),
        other => CellValue::String(other.to_string()),
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
