use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::columns::{self, FileRole, LogicalColumn};
use crate::config::{MergeSwitches, Mode, RunConfig};
use crate::copy::{self, CopyReport};
use crate::cutoff::Cutoff;
use crate::error::Result;
use crate::filter;
use crate::io::{StagedFile, excel_read, excel_write, styled};
use crate::model::RecordSet;

/// Outcome of one run, handed back to the front end.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: &'static str,
    /// Data rows in the result, excluding header rows.
    pub rows: usize,
    pub columns: Vec<String>,
    /// Where the result was saved; `None` for a preview.
    pub output: Option<PathBuf>,
    /// Formatting carried over by a style-preserving trim.
    pub style: Option<CopyReport>,
}

/// Validates the configuration, then runs the selected mode. The cutoff and
/// switches are checked before any file is opened.
#[instrument(
    level = "info",
    skip_all,
    fields(mode = config.mode.name(), cutoff = %config.cutoff)
)]
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let cutoff = config.validate()?;
    let output = config.resolved_output();

    match &config.mode {
        Mode::Trim { input } => trim_file(input, &cutoff, output.as_deref()),
        Mode::Merge {
            file1,
            file2,
            switches,
        } => merge_files(file1, file2, &cutoff, *switches, output.as_deref()),
    }
}

/// Keeps the header block of `input` plus every data row whose End Time is
/// strictly after the cutoff, preserving formatting. The result is always
/// materialised and reloaded to build the summary; it is only kept when an
/// output path is given.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn trim_file(input: &Path, cutoff: &Cutoff, output: Option<&Path>) -> Result<RunSummary> {
    if is_legacy_xls(input) {
        return trim_plain(input, cutoff, output);
    }

    let book = styled::open(input)?;
    let sheet = book.get_active_sheet();
    let header = styled::locate_header(sheet, FileRole::Trim, input)?;
    let data = styled::data_rows(sheet, header);
    filter::ensure_any_readable(
        &data,
        input,
        columns::display_name(FileRole::Trim, LogicalColumn::Time),
    )?;

    let kept = filter::select_after_cutoff(&data, cutoff);
    info!(
        %cutoff,
        header_row = header.row,
        kept = kept.len(),
        dropped = data.len() - kept.len(),
        "selected rows after cutoff"
    );

    let mut rows: Vec<u32> = (1..=header.row).collect();
    rows.extend(kept);

    let mut result = umya_spreadsheet::new_file();
    let report = copy::copy_rows(sheet, result.get_active_sheet_mut(), &rows);

    let staged = StagedFile::new(output)?;
    styled::save(&result, staged.path())?;
    let shape = excel_read::read_shape(staged.path(), header.row)?;
    debug!(rows = shape.rows, columns = shape.columns.len(), "reloaded trimmed workbook");

    let output = output.map(|target| staged.commit(target)).transpose()?;
    Ok(RunSummary {
        mode: "trim",
        rows: shape.rows,
        columns: shape.columns,
        output,
        style: Some(report),
    })
}

/// Merges File 1 and File 2 around the cutoff and writes a plain table.
#[instrument(
    level = "info",
    skip_all,
    fields(file1 = %file1.display(), file2 = %file2.display(), ?switches)
)]
pub fn merge_files(
    file1: &Path,
    file2: &Path,
    cutoff: &Cutoff,
    switches: MergeSwitches,
    output: Option<&Path>,
) -> Result<RunSummary> {
    switches.ensure_selected()?;
    let primary = excel_read::load_record_set(file1, FileRole::File1)?;
    let secondary = excel_read::load_record_set(file2, FileRole::File2)?;
    info!(
        file1_rows = primary.len(),
        file2_rows = secondary.len(),
        "loaded record sets"
    );

    let merged = filter::merge(primary, secondary, cutoff, switches)?;
    plain_summary("merge", merged, output)
}

/// Style readers only handle `.xlsx`; legacy workbooks are trimmed as a
/// plain record table instead.
fn trim_plain(input: &Path, cutoff: &Cutoff, output: Option<&Path>) -> Result<RunSummary> {
    info!("legacy workbook, formatting is not preserved");
    let records = excel_read::load_record_set(input, FileRole::Trim)?;
    let trimmed = filter::trim_records(records, cutoff)?;
    plain_summary("trim", trimmed, output)
}

fn plain_summary(
    mode: &'static str,
    records: RecordSet,
    output: Option<&Path>,
) -> Result<RunSummary> {
    let output = match output {
        Some(target) => {
            let staged = StagedFile::new(Some(target))?;
            excel_write::write_record_set(staged.path(), &records)?;
            Some(staged.commit(target)?)
        }
        None => None,
    };

    Ok(RunSummary {
        mode,
        rows: records.len(),
        columns: records.columns,
        output,
        style: None,
    })
}

fn is_legacy_xls(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("xls"))
}
