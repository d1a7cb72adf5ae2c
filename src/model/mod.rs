use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::columns::{CANONICAL_ID, CANONICAL_TIME};
use crate::cutoff::{self, CUTOFF_FORMAT};
use crate::error::{Result, ToolError};

/// A single cell value as read from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Interprets the cell as a point in time. Only real date-time cells and
    /// text in one of the accepted layouts qualify; bare numbers do not.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(value) => Some(*value),
            CellValue::String(value) => cutoff::parse_datetime_text(value),
            _ => None,
        }
    }

    /// Comparison key used to match identifiers across files. Whole numbers
    /// compare equal whether they were stored as text, integer or float.
    pub fn key(&self) -> Option<String> {
        let key = match self {
            CellValue::Empty | CellValue::Error(_) => return None,
            CellValue::String(value) => {
                let trimmed = value.trim();
                match trimmed.parse::<f64>() {
                    Ok(number) if is_whole(number) => format!("{}", number as i64),
                    _ => trimmed.to_string(),
                }
            }
            CellValue::Number(value) if is_whole(*value) => format!("{}", *value as i64),
            CellValue::Number(value) => value.to_string(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::DateTime(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        if key.is_empty() { None } else { Some(key) }
    }
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(value) | CellValue::Error(value) => f.write_str(value),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::DateTime(value) => write!(f, "{}", value.format(CUTOFF_FORMAT)),
        }
    }
}

/// One data row. Cells are positional and line up with
/// [`RecordSet::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<CellValue>,
    /// Parsed value of the time column, `None` when the cell is unreadable.
    pub time: Option<NaiveDateTime>,
}

impl Record {
    pub fn new(cells: Vec<CellValue>, time_column: usize) -> Self {
        let time = cells.get(time_column).and_then(CellValue::as_datetime);
        Self { cells, time }
    }

    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Empty)
    }
}

/// Ordered rows loaded from one workbook plus the resolved positions of the
/// columns the engine cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    /// Workbook the rows came from; used for messages only.
    pub source: PathBuf,
    /// Header labels exactly as they appear in the workbook.
    pub columns: Vec<String>,
    pub time_column: usize,
    pub id_column: Option<usize>,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn time_label(&self) -> &str {
        self.columns
            .get(self.time_column)
            .map(String::as_str)
            .unwrap_or(CANONICAL_TIME)
    }

    /// Column keys with the time and id columns replaced by their canonical
    /// names, so two files with different header spellings line up.
    pub fn canonical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, label)| {
                if index == self.time_column {
                    CANONICAL_TIME.to_string()
                } else if Some(index) == self.id_column {
                    CANONICAL_ID.to_string()
                } else {
                    label.trim().to_string()
                }
            })
            .collect()
    }

    pub fn id_key(&self, record: &Record) -> Option<String> {
        self.id_column.and_then(|column| record.cell(column).key())
    }

    /// Fails when the set has data rows but none of them carries a readable
    /// time value. Individual unreadable rows are fine.
    pub fn ensure_times_readable(&self) -> Result<()> {
        if self.records.is_empty() || self.records.iter().any(|record| record.time.is_some()) {
            return Ok(());
        }
        Err(ToolError::AmbiguousTime {
            path: self.source.clone(),
            column: self.time_label().to_string(),
        })
    }
}

/// Row count and header labels of a written sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableShape {
    pub columns: Vec<String>,
    pub rows: usize,
}
