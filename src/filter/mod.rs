//! Row selection around a cutoff: single-file trimming and two-file merging.
//!
//! Trimming keeps rows strictly after the cutoff while merging keeps rows at
//! or after it. Keep the two comparisons distinct.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::MergeSwitches;
use crate::cutoff::Cutoff;
use crate::error::{Result, ToolError};
use crate::model::{CellValue, Record, RecordSet};

/// A sheet row number paired with its parsed time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedRow {
    pub row: u32,
    pub time: Option<NaiveDateTime>,
}

/// Sheet rows whose time is strictly after the cutoff, in source order.
/// Rows with an unreadable time are dropped.
pub fn select_after_cutoff(rows: &[TimedRow], cutoff: &Cutoff) -> Vec<u32> {
    rows.iter()
        .filter(|row| row.time.is_some_and(|time| cutoff.is_exceeded_by(time)))
        .map(|row| row.row)
        .collect()
}

/// Fails when there are data rows and none has a readable time.
pub fn ensure_any_readable(rows: &[TimedRow], path: &Path, column: &str) -> Result<()> {
    if rows.is_empty() || rows.iter().any(|row| row.time.is_some()) {
        return Ok(());
    }
    Err(ToolError::AmbiguousTime {
        path: path.to_path_buf(),
        column: column.to_string(),
    })
}

/// Record-table variant of [`select_after_cutoff`].
pub fn trim_records(mut set: RecordSet, cutoff: &Cutoff) -> Result<RecordSet> {
    set.ensure_times_readable()?;
    let before = set.len();
    set.records
        .retain(|record| record.time.is_some_and(|time| cutoff.is_exceeded_by(time)));
    info!(
        %cutoff,
        kept = set.len(),
        dropped = before - set.len(),
        "trimmed records"
    );
    Ok(set)
}

/// Combines File 1 (`primary`) and File 2 (`secondary`) around the cutoff.
///
/// With `remove_before_cutoff` File 1 keeps only rows at or after the cutoff.
/// With `append_replace` File 2 rows at or after the cutoff are appended and
/// any File 1 row sharing an `id` with one of them is dropped first. The
/// result is stably sorted by time; rows without a readable time go last.
pub fn merge(
    primary: RecordSet,
    secondary: RecordSet,
    cutoff: &Cutoff,
    switches: MergeSwitches,
) -> Result<RecordSet> {
    switches.ensure_selected()?;
    primary.ensure_times_readable()?;
    if switches.append_replace {
        secondary.ensure_times_readable()?;
    }

    let (columns, primary_map, secondary_map) = align_columns(&primary, &secondary);
    let time_column = primary.time_column;
    let id_column = primary.id_column;

    let mut rows: Vec<Record> = primary
        .records
        .iter()
        .map(|record| project(record, &primary_map, columns.len()))
        .collect();

    if switches.remove_before_cutoff {
        let before = rows.len();
        rows.retain(|record| record.time.is_some_and(|time| cutoff.is_reached_by(time)));
        debug!(removed = before - rows.len(), "removed File 1 rows before cutoff");
    }

    if switches.append_replace {
        let selected: Vec<&Record> = secondary
            .records
            .iter()
            .filter(|record| record.time.is_some_and(|time| cutoff.is_reached_by(time)))
            .collect();
        let replaced: HashSet<String> = selected
            .iter()
            .filter_map(|record| secondary.id_key(record))
            .collect();

        let before = rows.len();
        rows.retain(|record| {
            id_column
                .and_then(|column| record.cell(column).key())
                .is_none_or(|key| !replaced.contains(&key))
        });
        debug!(
            replaced = before - rows.len(),
            appended = selected.len(),
            "applied File 2 rows"
        );
        rows.extend(
            selected
                .into_iter()
                .map(|record| project(record, &secondary_map, columns.len())),
        );
    }

    rows.sort_by(|lhs, rhs| compare_times(lhs.time, rhs.time));
    info!(rows = rows.len(), "merged record sets");

    Ok(RecordSet {
        source: primary.source,
        columns,
        time_column,
        id_column,
        records: rows,
    })
}

fn compare_times(lhs: Option<NaiveDateTime>, rhs: Option<NaiveDateTime>) -> Ordering {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds the output header (File 1 columns, then File 2 columns File 1 does
/// not have) and, for each input, the output position of every source column.
fn align_columns(
    primary: &RecordSet,
    secondary: &RecordSet,
) -> (Vec<String>, Vec<usize>, Vec<usize>) {
    let primary_keys = primary.canonical_columns();
    let mut keys = primary_keys.clone();
    let mut labels = primary.columns.clone();

    let secondary_map = secondary
        .canonical_columns()
        .into_iter()
        .zip(&secondary.columns)
        .map(|(key, label)| match keys.iter().position(|existing| *existing == key) {
            Some(position) => position,
            None => {
                keys.push(key);
                labels.push(label.clone());
                keys.len() - 1
            }
        })
        .collect();

    let primary_map = (0..primary_keys.len()).collect();
    (labels, primary_map, secondary_map)
}

/// Re-lays a record onto the output columns. `mapping[i]` is the output
/// position of source column `i`. The time column always maps onto File 1's
/// time column, so the parsed time carries over unchanged.
fn project(record: &Record, mapping: &[usize], width: usize) -> Record {
    let mut cells = vec![CellValue::Empty; width];
    for (source, target) in mapping.iter().enumerate() {
        cells[*target] = record.cell(source).clone();
    }
    Record {
        cells,
        time: record.time,
    }
}
