//! Header names recognised for each logical column, per file role.

use std::fmt;

/// Canonical name the time column is normalised to before comparison.
pub const CANONICAL_TIME: &str = "datetime";
/// Canonical name of the row identifier column.
pub const CANONICAL_ID: &str = "id";

/// Which input a workbook plays in the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// The only input of a single-file trim.
    Trim,
    /// "File 1", the workbook whose rows are filtered or replaced.
    File1,
    /// "File 2", the workbook rows are taken from.
    File2,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Trim => write!(f, "input"),
            FileRole::File1 => write!(f, "File 1"),
            FileRole::File2 => write!(f, "File 2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalColumn {
    Id,
    Time,
}

impl LogicalColumn {
    pub fn canonical_name(self) -> &'static str {
        match self {
            LogicalColumn::Id => CANONICAL_ID,
            LogicalColumn::Time => CANONICAL_TIME,
        }
    }
}

const TRIM_TIME: &[&str] = &["end time"];
const MERGE_TIME: &[&str] = &["datetime", "end date", "enddate", "endezeit", "end time"];
const ID: &[&str] = &["id"];

/// Lower-case synonyms accepted for `column` in a workbook playing `role`.
/// An empty slice means the role does not use that column.
pub fn synonyms(role: FileRole, column: LogicalColumn) -> &'static [&'static str] {
    match (role, column) {
        (FileRole::Trim, LogicalColumn::Time) => TRIM_TIME,
        (FileRole::Trim, LogicalColumn::Id) => &[],
        (FileRole::File1 | FileRole::File2, LogicalColumn::Time) => MERGE_TIME,
        (FileRole::File1 | FileRole::File2, LogicalColumn::Id) => ID,
    }
}

/// Whether the role needs an `id` column to be present.
pub fn requires_id(role: FileRole) -> bool {
    !synonyms(role, LogicalColumn::Id).is_empty()
}

/// Case-insensitive, whitespace-trimmed header match.
pub fn matches(role: FileRole, column: LogicalColumn, header: &str) -> bool {
    let header = header.trim().to_lowercase();
    !header.is_empty() && synonyms(role, column).contains(&header.as_str())
}

/// Position of the first header in `headers` that matches `column`.
pub fn find<'a, I>(role: FileRole, column: LogicalColumn, headers: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .position(|header| matches(role, column, header))
}

/// Display label used in error messages: the first synonym of the role.
pub fn display_name(role: FileRole, column: LogicalColumn) -> &'static str {
    match (role, column) {
        (FileRole::Trim, LogicalColumn::Time) => "End Time",
        _ => synonyms(role, column)
            .first()
            .copied()
            .unwrap_or(column.canonical_name()),
    }
}
