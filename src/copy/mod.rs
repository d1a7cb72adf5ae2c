//! Re-emits selected rows of a sheet into a fresh sheet, carrying values,
//! cell formatting, column widths, merged ranges and tables along.
//!
//! Each formatting attribute is copied on its own. A problem with one of them
//! is recorded in the cell's [`CellCopyReport`] and the copy carries on with
//! the remaining attributes and the value.

pub mod report;

use std::collections::HashMap;

use tracing::{debug, warn};
use umya_spreadsheet::{Cell, Comment, Style, Worksheet};

pub use report::{AttributeOutcome, CellCopyReport, CopyReport, StyleAttribute};

/// Copies `rows` (1-based source row numbers, in output order) from `source`
/// into `target`, starting at row 1. Column positions are preserved.
///
/// Merged ranges and tables are copied by their original address. They are
/// not moved to follow the removed rows.
pub fn copy_rows(source: &Worksheet, target: &mut Worksheet, rows: &[u32]) -> CopyReport {
    let mut report = CopyReport::default();
    target.set_name(source.get_name().to_string());

    let comments: HashMap<(u32, u32), &Comment> = source
        .get_comments()
        .iter()
        .map(|comment| {
            let coordinate = comment.get_coordinate();
            ((*coordinate.get_col_num(), *coordinate.get_row_num()), comment)
        })
        .collect();

    let last_col = source.get_highest_column();
    for (index, source_row) in rows.iter().enumerate() {
        let target_row = index as u32 + 1;
        for col in 1..=last_col {
            let Some(cell) = source.get_cell((col, *source_row)) else {
                continue;
            };
            let mut cell_report = copy_cell(cell, target.get_cell_mut((col, target_row)));

            if let Some(comment) = comments.get(&(col, *source_row)) {
                let mut comment = (*comment).clone();
                comment.get_coordinate_mut().set_row_num(target_row);
                target.add_comments(comment);
                cell_report.set(StyleAttribute::Comment, AttributeOutcome::Copied);
            }

            for (attribute, reason) in cell_report.skipped() {
                warn!(cell = %cell_report.coordinate, %attribute, reason, "style attribute not copied");
            }
            report.record(cell_report);
        }
    }

    for column in source.get_column_dimensions() {
        let col = *column.get_col_num();
        target
            .get_column_dimension_by_number_mut(&col)
            .set_width(*column.get_width());
        report.column_widths += 1;
    }

    for range in source.get_merge_cells() {
        target.add_merge_cells(range.get_range());
        report.merged_ranges += 1;
    }

    for table in source.get_tables() {
        target.add_table(table.clone());
        report.tables += 1;
    }

    debug!(summary = %report.format("copied sheet"));
    report
}

/// Copies the value, formatting and hyperlink of one cell. The comment
/// outcome is left as [`AttributeOutcome::Absent`]; comments live on the
/// sheet and are handled by [`copy_rows`].
pub fn copy_cell(source: &Cell, target: &mut Cell) -> CellCopyReport {
    let mut report = CellCopyReport::new(source.get_coordinate().get_coordinate());
    *target.get_cell_value_mut() = source.get_cell_value().clone();

    let from = source.get_style();
    let mut style = Style::default();

    report.set(
        StyleAttribute::Font,
        transfer(from.get_font(), |font| {
            style.set_font(font.clone());
            Ok(())
        }),
    );
    report.set(
        StyleAttribute::Fill,
        transfer(from.get_fill(), |fill| {
            style.set_fill(fill.clone());
            Ok(())
        }),
    );
    report.set(
        StyleAttribute::Border,
        transfer(from.get_borders(), |borders| {
            style.set_borders(borders.clone());
            Ok(())
        }),
    );
    report.set(
        StyleAttribute::Alignment,
        transfer(from.get_alignment(), |alignment| {
            style.set_alignment(alignment.clone());
            Ok(())
        }),
    );
    report.set(
        StyleAttribute::NumberFormat,
        transfer(from.get_number_format(), |format| {
            if format.get_format_code().trim().is_empty() {
                return Err("empty format code".to_string());
            }
            style.set_number_format(format.clone());
            Ok(())
        }),
    );
    report.set(
        StyleAttribute::Protection,
        transfer(from.get_protection(), |protection| {
            style.set_protection(protection.clone());
            Ok(())
        }),
    );
    target.set_style(style);

    report.set(
        StyleAttribute::Hyperlink,
        transfer(source.get_hyperlink(), |hyperlink| {
            if hyperlink.get_url().trim().is_empty() {
                return Err("hyperlink has no target".to_string());
            }
            target.set_hyperlink(hyperlink.clone());
            Ok(())
        }),
    );

    report
}

fn transfer<T>(
    value: Option<&T>,
    apply: impl FnOnce(&T) -> Result<(), String>,
) -> AttributeOutcome {
    match value {
        None => AttributeOutcome::Absent,
        Some(value) => match apply(value) {
            Ok(()) => AttributeOutcome::Copied,
            Err(reason) => AttributeOutcome::Skipped(reason),
        },
    }
}
