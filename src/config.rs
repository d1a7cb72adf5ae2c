//! Run configuration handed from a front end to [`crate::sync::run`].

use std::path::{Path, PathBuf};

use crate::cutoff::Cutoff;
use crate::error::{Result, ToolError};

/// Extension appended to output paths that carry none.
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// The two independent operations of a two-file merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSwitches {
    /// Keep only File 1 rows at or after the cutoff.
    pub remove_before_cutoff: bool,
    /// Append File 2 rows at or after the cutoff, replacing File 1 rows that
    /// share their `id`.
    pub append_replace: bool,
}

impl MergeSwitches {
    pub fn ensure_selected(&self) -> Result<()> {
        if self.remove_before_cutoff || self.append_replace {
            Ok(())
        } else {
            Err(ToolError::NoOperationSelected)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Keep the rows of one workbook whose End Time is after the cutoff,
    /// preserving formatting.
    Trim { input: PathBuf },
    /// Combine File 1 and File 2 around the cutoff, de-duplicated by `id`.
    Merge {
        file1: PathBuf,
        file2: PathBuf,
        switches: MergeSwitches,
    },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Trim { .. } => "trim",
            Mode::Merge { .. } => "merge",
        }
    }

    fn inputs(&self) -> Vec<&Path> {
        match self {
            Mode::Trim { input } => vec![input.as_path()],
            Mode::Merge { file1, file2, .. } => vec![file1.as_path(), file2.as_path()],
        }
    }
}

/// Everything one invocation needs. Nothing else is read by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    /// Cutoff as typed by the user, `YYYY-MM-DD HH:MM`.
    pub cutoff: String,
    /// Destination workbook. `None` runs a preview and writes nothing.
    pub output: Option<PathBuf>,
}

impl RunConfig {
    pub fn trim(input: impl Into<PathBuf>, cutoff: impl Into<String>) -> Self {
        Self {
            mode: Mode::Trim {
                input: input.into(),
            },
            cutoff: cutoff.into(),
            output: None,
        }
    }

    pub fn merge(
        file1: impl Into<PathBuf>,
        file2: impl Into<PathBuf>,
        cutoff: impl Into<String>,
        switches: MergeSwitches,
    ) -> Self {
        Self {
            mode: Mode::Merge {
                file1: file1.into(),
                file2: file2.into(),
                switches,
            },
            cutoff: cutoff.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Checks everything that can be checked without touching the file
    /// system and returns the parsed cutoff.
    pub fn validate(&self) -> Result<Cutoff> {
        for input in self.mode.inputs() {
            if input.as_os_str().is_empty() {
                return Err(ToolError::load(input, "no file selected"));
            }
        }
        if self.cutoff.trim().is_empty() {
            return Err(ToolError::InvalidCutoff {
                input: self.cutoff.clone(),
            });
        }
        let cutoff = Cutoff::parse(&self.cutoff)?;
        if let Mode::Merge { switches, .. } = &self.mode {
            switches.ensure_selected()?;
        }
        Ok(cutoff)
    }

    /// Output path with the default extension applied.
    pub fn resolved_output(&self) -> Option<PathBuf> {
        self.output.as_deref().map(with_default_extension)
    }
}

pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}
