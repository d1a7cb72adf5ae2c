//! Core library for the sheet-cutoff command line application.
//!
//! A run loads one or two spreadsheets, selects rows around a date-time
//! cutoff and writes the result to a new workbook. Loading and saving live
//! under [`io`], row selection in [`filter`], the formatting-preserving copy
//! in [`copy`], and [`sync::run`] ties them together for a [`RunConfig`].

pub mod columns;
pub mod config;
pub mod copy;
pub mod cutoff;
pub mod error;
pub mod filter;
pub mod io;
pub mod model;
pub mod sync;

pub use config::{MergeSwitches, Mode, RunConfig};
pub use error::{ErrorKind, Result, ToolError};
pub use sync::{RunSummary, run};
