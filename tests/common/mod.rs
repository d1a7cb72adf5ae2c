#![allow(dead_code)]

use std::path::Path;

use calamine::{DataType, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format, Table, TableColumn, Workbook};

/// One data row of the trim fixture: id, machine, end time text.
pub struct ShiftRow<'a> {
    pub id: f64,
    pub machine: &'a str,
    pub end_time: &'a str,
}

pub const SHIFT_HEADERS: [&str; 3] = ["ID", "Machine", "End Time"];

/// Writes a report-style sheet: a merged title on row 1, the header on row 2,
/// data from row 3. Column B has an explicit width, ids use a `0.00` format.
pub fn write_shift_report(path: &Path, rows: &[ShiftRow<'_>], with_table: bool) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    let id_format = Format::new().set_num_format("0.00");

    worksheet
        .merge_range(0, 0, 0, 2, "Shift report", &bold)
        .expect("title merged");
    worksheet.set_column_width(1, 25).expect("column width set");

    for (col, header) in SHIFT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(1, col as u16, *header, &bold)
            .expect("header written");
    }

    for (index, row) in rows.iter().enumerate() {
        let sheet_row = index as u32 + 2;
        worksheet
            .write_number_with_format(sheet_row, 0, row.id, &id_format)
            .expect("id written");
        worksheet
            .write_string(sheet_row, 1, row.machine)
            .expect("machine written");
        worksheet
            .write_string(sheet_row, 2, row.end_time)
            .expect("end time written");
    }

    if with_table {
        let columns: Vec<TableColumn> = SHIFT_HEADERS
            .iter()
            .map(|header| TableColumn::new().set_header(*header))
            .collect();
        let mut table = Table::new();
        table.set_columns(&columns);
        worksheet
            .add_table(1, 0, rows.len() as u32 + 1, 2, &table)
            .expect("table added");
    }

    workbook.save(path).expect("fixture saved");
}

/// Writes a plain sheet with `headers` on row 1 and string cells below.
pub fn write_plain(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, *value)
                .expect("cell written");
        }
    }

    workbook.save(path).expect("fixture saved");
}

/// Writes a merge input whose ids are numbers and whose times are text.
pub fn write_timeline(path: &Path, headers: [&str; 3], rows: &[(f64, &str, &str)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    for (index, (id, name, time)) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_number(row, 0, *id).expect("id written");
        worksheet.write_string(row, 1, *name).expect("name written");
        worksheet.write_string(row, 2, *time).expect("time written");
    }

    workbook.save(path).expect("fixture saved");
}

/// All rows of the first sheet rendered as strings, starting at the first
/// used row.
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).expect("workbook opened");
    let range = workbook
        .worksheet_range_at(0)
        .expect("sheet present")
        .expect("sheet read");
    range
        .rows()
        .map(|row| row.iter().map(render).collect())
        .collect()
}

fn render(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        other => other.to_string(),
    }
}

/// Values of one column (0-based) below the header row at `header_index`.
pub fn column_below(rows: &[Vec<String>], header_index: usize, column: usize) -> Vec<String> {
    rows.iter()
        .skip(header_index + 1)
        .map(|row| row.get(column).cloned().unwrap_or_default())
        .collect()
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("directory listed")
        .map(|entry| {
            entry
                .expect("entry read")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
