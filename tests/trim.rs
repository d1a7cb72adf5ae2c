mod common;

use common::{ShiftRow, column_below, file_names, read_rows, write_plain, write_shift_report};
use rust_xlsxwriter::{Format, Workbook};
use sheet_cutoff::copy::StyleAttribute;
use sheet_cutoff::{ErrorKind, RunConfig, run};
use tempfile::tempdir;

fn three_shifts() -> Vec<ShiftRow<'static>> {
    vec![
        ShiftRow {
            id: 1.0,
            machine: "Press",
            end_time: "2025-01-01 09:00",
        },
        ShiftRow {
            id: 2.0,
            machine: "Lathe",
            end_time: "2025-01-01 11:00",
        },
        ShiftRow {
            id: 3.0,
            machine: "Mill",
            end_time: "2025-01-01 13:00",
        },
    ]
}

#[test]
fn trim_keeps_rows_after_cutoff_in_source_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    let output = temp_dir.path().join("trimmed.xlsx");
    write_shift_report(&input, &three_shifts(), false);

    let config = RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output);
    let summary = run(&config).expect("trim succeeds");

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.columns, vec!["ID", "Machine", "End Time"]);
    assert_eq!(summary.output.as_deref(), Some(output.as_path()));

    let rows = read_rows(&output);
    assert_eq!(rows[0][0], "Shift report");
    assert_eq!(rows[1], vec!["ID", "Machine", "End Time"]);
    assert_eq!(
        column_below(&rows, 1, 2),
        vec!["2025-01-01 11:00", "2025-01-01 13:00"]
    );
    assert_eq!(column_below(&rows, 1, 1), vec!["Lathe", "Mill"]);
}

#[test]
fn trim_excludes_rows_equal_to_cutoff_and_unreadable_times() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    let output = temp_dir.path().join("trimmed.xlsx");
    let rows = vec![
        ShiftRow {
            id: 1.0,
            machine: "Press",
            end_time: "2025-01-01 10:00",
        },
        ShiftRow {
            id: 2.0,
            machine: "Lathe",
            end_time: "pending",
        },
        ShiftRow {
            id: 3.0,
            machine: "Mill",
            end_time: "2025-01-01 10:01",
        },
    ];
    write_shift_report(&input, &rows, false);

    let config = RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output);
    let summary = run(&config).expect("trim succeeds");

    assert_eq!(summary.rows, 1);
    let written = read_rows(&output);
    assert_eq!(column_below(&written, 1, 1), vec!["Mill"]);
}

#[test]
fn trim_preserves_formatting_widths_and_merges() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    let output = temp_dir.path().join("trimmed.xlsx");
    write_shift_report(&input, &three_shifts(), false);

    let config = RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output);
    let summary = run(&config).expect("trim succeeds");

    let report = summary.style.expect("style report present");
    assert!(report.copied_count(StyleAttribute::Font) > 0);
    assert!(report.copied_count(StyleAttribute::NumberFormat) >= 2);
    assert_eq!(report.merged_ranges, 1);
    assert!(report.column_widths >= 1);
    assert!(report.partial_cells.is_empty());

    let mut source = umya_spreadsheet::reader::xlsx::read(&input).expect("source read");
    let mut result = umya_spreadsheet::reader::xlsx::read(&output).expect("result read");

    let source_width = *source
        .get_active_sheet_mut()
        .get_column_dimension_by_number_mut(&2)
        .get_width();
    let result_width = *result
        .get_active_sheet_mut()
        .get_column_dimension_by_number_mut(&2)
        .get_width();
    assert_eq!(source_width, result_width);

    let sheet = result.get_active_sheet();
    let merges: Vec<String> = sheet
        .get_merge_cells()
        .iter()
        .map(|range| range.get_range())
        .collect();
    assert_eq!(merges, vec!["A1:C1".to_string()]);

    let id_format = sheet
        .get_cell((1u32, 3u32))
        .and_then(|cell| cell.get_style().get_number_format())
        .map(|format| format.get_format_code().to_string());
    assert_eq!(id_format.as_deref(), Some("0.00"));
}

#[test]
fn trim_copies_tables_verbatim() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    let output = temp_dir.path().join("trimmed.xlsx");
    write_shift_report(&input, &three_shifts(), true);

    let config = RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output);
    let summary = run(&config).expect("trim succeeds");

    let report = summary.style.expect("style report present");
    assert_eq!(report.tables, 1);
    assert_eq!(summary.rows, 2);
}

#[test]
fn trim_reads_date_formatted_numbers() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("serial.xlsx");
    let output = temp_dir.path().join("trimmed.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    worksheet.write_string(0, 0, "Job").expect("header");
    worksheet.write_string(0, 1, "end time").expect("header");
    // 2025-01-01 09:00 and 2025-01-01 11:00
    for (row, (job, serial)) in [("early", 45658.375), ("late", 45658.458333333336)]
        .iter()
        .enumerate()
    {
        let row = row as u32 + 1;
        worksheet.write_string(row, 0, *job).expect("job");
        worksheet
            .write_number_with_format(row, 1, *serial, &date_format)
            .expect("time");
    }
    workbook.save(&input).expect("fixture saved");

    let config = RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output);
    let summary = run(&config).expect("trim succeeds");

    assert_eq!(summary.rows, 1);
    assert_eq!(column_below(&read_rows(&output), 0, 0), vec!["late"]);
}

#[test]
fn trim_without_output_is_a_preview() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    write_shift_report(&input, &three_shifts(), false);

    let summary = run(&RunConfig::trim(&input, "2025-01-01 12:00")).expect("preview succeeds");

    assert_eq!(summary.rows, 1);
    assert!(summary.output.is_none());
    assert_eq!(file_names(temp_dir.path()), vec!["shifts.xlsx"]);
}

#[test]
fn trim_leaves_no_staged_files_behind() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    write_shift_report(&input, &three_shifts(), false);

    let config =
        RunConfig::trim(&input, "2025-01-01 10:00").with_output(temp_dir.path().join("result"));
    let summary = run(&config).expect("trim succeeds");

    assert_eq!(
        summary.output.as_deref(),
        Some(temp_dir.path().join("result.xlsx").as_path())
    );
    assert_eq!(
        file_names(temp_dir.path()),
        vec!["result.xlsx", "shifts.xlsx"]
    );
}

#[test]
fn trim_requires_end_time_within_first_five_rows() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("late_header.xlsx");
    let output = temp_dir.path().join("out.xlsx");
    let padding: Vec<Vec<&str>> = (0..5).map(|_| vec!["note"]).collect();
    let mut rows = padding;
    rows.push(vec!["End Time"]);
    rows.push(vec!["2025-01-01 11:00"]);
    write_plain(&input, &["Report"], &rows);

    let error = run(&RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output))
        .expect_err("header is out of reach");

    assert_eq!(error.kind(), ErrorKind::MissingColumnError);
    assert!(!output.exists());
}

#[test]
fn trim_fails_when_no_time_can_be_read() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("unreadable.xlsx");
    write_plain(
        &input,
        &["Job", "End Time"],
        &[vec!["a", "soon"], vec!["b", "later"]],
    );

    let error = run(&RunConfig::trim(&input, "2025-01-01 10:00")).expect_err("no readable time");

    assert_eq!(error.kind(), ErrorKind::AmbiguousTimeParseError);
}

#[test]
fn invalid_cutoff_is_rejected_before_any_file_is_touched() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing_input = temp_dir.path().join("does_not_exist.xlsx");
    let output = temp_dir.path().join("out.xlsx");

    let error = run(&RunConfig::trim(&missing_input, "July 1").with_output(&output))
        .expect_err("cutoff is invalid");

    assert_eq!(error.kind(), ErrorKind::InvalidCutoffFormatError);
    assert!(!output.exists());
    assert!(file_names(temp_dir.path()).is_empty());
}

#[test]
fn unreadable_input_is_a_load_error() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("broken.xlsx");
    std::fs::write(&input, b"not a workbook").expect("junk written");

    let error = run(&RunConfig::trim(&input, "2025-01-01 10:00")).expect_err("junk input");

    assert_eq!(error.kind(), ErrorKind::LoadError);
    assert!(error.to_string().contains("broken.xlsx"));
}

#[test]
fn failed_save_is_a_write_error_and_leaves_nothing_behind() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    let output = temp_dir.path().join("missing").join("trimmed.xlsx");
    write_shift_report(&input, &three_shifts(), false);

    let error = run(&RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output))
        .expect_err("target directory does not exist");

    assert_eq!(error.kind(), ErrorKind::WriteError);
    assert!(error.to_string().contains("trimmed.xlsx"));
    assert!(!output.exists());
    assert_eq!(file_names(temp_dir.path()), vec!["shifts.xlsx"]);
}

#[test]
fn trim_moves_hyperlinks_and_comments_with_their_row() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("shifts.xlsx");
    let output = temp_dir.path().join("trimmed.xlsx");
    write_shift_report(&input, &three_shifts(), false);

    // Row 4 holds the Lathe shift, the first one after the cutoff.
    let mut book = umya_spreadsheet::reader::xlsx::read(&input).expect("fixture read");
    let sheet = book.get_active_sheet_mut();
    let mut hyperlink = umya_spreadsheet::Hyperlink::default();
    hyperlink.set_url("https://example.com/lathe");
    sheet.get_cell_mut((1u32, 4u32)).set_hyperlink(hyperlink);
    let mut comment = umya_spreadsheet::Comment::default();
    comment.new_comment("A4");
    comment.set_text_string("checked by night shift");
    sheet.add_comments(comment);
    umya_spreadsheet::writer::xlsx::write(&book, &input).expect("fixture written");

    let config = RunConfig::trim(&input, "2025-01-01 10:00").with_output(&output);
    let summary = run(&config).expect("trim succeeds");

    let report = summary.style.expect("style report present");
    assert_eq!(report.copied_count(StyleAttribute::Hyperlink), 1);
    assert_eq!(report.copied_count(StyleAttribute::Comment), 1);

    let result = umya_spreadsheet::reader::xlsx::read(&output).expect("result read");
    let sheet = result.get_active_sheet();
    let url = sheet
        .get_cell((1u32, 3u32))
        .and_then(|cell| cell.get_hyperlink())
        .map(|hyperlink| hyperlink.get_url().to_string());
    assert_eq!(url.as_deref(), Some("https://example.com/lathe"));

    let comment_cells: Vec<(u32, u32)> = sheet
        .get_comments()
        .iter()
        .map(|comment| {
            let coordinate = comment.get_coordinate();
            (*coordinate.get_col_num(), *coordinate.get_row_num())
        })
        .collect();
    assert_eq!(comment_cells, vec![(1, 3)]);
}
