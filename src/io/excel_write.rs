use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::error::Result;
use crate::model::{CellValue, RecordSet};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the records as a plain value table: one header row followed by the
/// data rows. No formatting from the source workbooks is carried over.
pub fn write_record_set(path: &Path, records: &RecordSet) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for (col_idx, header) in records.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    for (row_idx, record) in records.records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col_idx, cell) in record.cells.iter().enumerate() {
            let col = col_idx as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::String(value) | CellValue::Error(value) => {
                    worksheet.write_string(row, col, value)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row, col, *value)?;
                }
                CellValue::Int(value) => {
                    worksheet.write_number(row, col, *value as f64)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row, col, *value)?;
                }
                CellValue::DateTime(value) => {
                    let datetime = excel_datetime(value)?;
                    worksheet.write_datetime_with_format(row, col, &datetime, &datetime_format)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn excel_datetime(value: &NaiveDateTime) -> Result<ExcelDateTime> {
    let date = ExcelDateTime::from_ymd(value.year() as u16, value.month() as u8, value.day() as u8)?;
    let datetime = date.and_hms(value.hour() as u16, value.minute() as u8, value.second())?;
    Ok(datetime)
}
