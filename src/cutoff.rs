//! Cutoff parsing and the date-time readers shared by both workbook backends.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{Result, ToolError};

/// The only accepted layout for a user supplied cutoff.
pub const CUTOFF_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Layouts accepted for textual time cells, tried in order.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Largest serial Excel can display (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Date-time threshold used to select or exclude rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(NaiveDateTime);

impl Cutoff {
    /// Parses `YYYY-MM-DD HH:MM`. Surrounding whitespace is ignored, nothing
    /// else is.
    pub fn parse(input: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(input.trim(), CUTOFF_FORMAT)
            .map(Cutoff)
            .map_err(|_| ToolError::InvalidCutoff {
                input: input.to_string(),
            })
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Strict comparison used by single-file trimming.
    pub fn is_exceeded_by(&self, time: NaiveDateTime) -> bool {
        time > self.0
    }

    /// Inclusive comparison used by two-file merging.
    pub fn is_reached_by(&self, time: NaiveDateTime) -> bool {
        time >= self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CUTOFF_FORMAT))
    }
}

/// Reads free text as a date-time. Date-only values resolve to midnight.
pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for layout in DATETIME_LAYOUTS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(value);
        }
    }

    DATE_LAYOUTS.iter().find_map(|layout| {
        NaiveDate::parse_from_str(text, layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Converts an Excel serial day number (1900 date system) into a date-time,
/// rounded to the nearest second. Styled sheets hand date cells over as bare
/// numbers, so their readers go through this.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let seconds = (serial * 86_400.0).round() as i64;
    excel_epoch().checked_add_signed(Duration::seconds(seconds))
}

/// Heuristic used for numeric cells: a number format only renders a date when
/// it carries a day, year or hour token outside quoted literals.
pub fn is_date_format(code: &str) -> bool {
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;

    for ch in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            'd' | 'D' | 'y' | 'Y' | 'h' | 'H' if !in_quotes && !in_brackets => return true,
            _ => {}
        }
    }
    false
}

fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
