pub mod excel_read;
pub mod excel_write;
pub mod styled;

use std::path::{Path, PathBuf};

use tempfile::{Builder, TempPath};
use tracing::debug;

use crate::error::{Result, ToolError};

/// A uniquely named, already closed temporary workbook. The file is removed
/// when the value is dropped unless it was committed to a target first.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    /// Stages next to `target` so the final commit is a same-directory
    /// rename; without a target the system temp directory is used.
    pub fn new(target: Option<&Path>) -> Result<Self> {
        let dir = match target {
            Some(target) => staging_dir(target),
            None => std::env::temp_dir(),
        };
        let file = Builder::new()
            .prefix(".sheet-cutoff-")
            .suffix(".xlsx")
            .tempfile_in(&dir)
            .map_err(|err| ToolError::write(target.unwrap_or(dir.as_path()), err))?;
        let path = file.into_temp_path();
        debug!(staged = %path.display(), "staged output file");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves the staged workbook onto `target`, replacing any existing file.
    pub fn commit(self, target: &Path) -> Result<PathBuf> {
        self.path
            .persist(target)
            .map_err(|err| ToolError::write(target, err.error))?;
        Ok(target.to_path_buf())
    }
}

fn staging_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
