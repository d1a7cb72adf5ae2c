//! Per-cell and per-sheet outcomes of a style-preserving copy.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// One independently copied part of a cell's formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleAttribute {
    Font,
    Fill,
    Border,
    Alignment,
    NumberFormat,
    Protection,
    Hyperlink,
    Comment,
}

impl StyleAttribute {
    pub const ALL: [StyleAttribute; 8] = [
        StyleAttribute::Font,
        StyleAttribute::Fill,
        StyleAttribute::Border,
        StyleAttribute::Alignment,
        StyleAttribute::NumberFormat,
        StyleAttribute::Protection,
        StyleAttribute::Hyperlink,
        StyleAttribute::Comment,
    ];
}

impl fmt::Display for StyleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleAttribute::Font => "font",
            StyleAttribute::Fill => "fill",
            StyleAttribute::Border => "border",
            StyleAttribute::Alignment => "alignment",
            StyleAttribute::NumberFormat => "number_format",
            StyleAttribute::Protection => "protection",
            StyleAttribute::Hyperlink => "hyperlink",
            StyleAttribute::Comment => "comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOutcome {
    Copied,
    /// The source cell does not carry the attribute.
    Absent,
    /// The attribute was present but could not be carried over.
    Skipped(String),
}

/// What happened to each attribute of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellCopyReport {
    /// Source coordinate, e.g. `B7`.
    pub coordinate: String,
    pub outcomes: BTreeMap<StyleAttribute, AttributeOutcome>,
}

impl CellCopyReport {
    pub fn new(coordinate: impl Into<String>) -> Self {
        let outcomes = StyleAttribute::ALL
            .iter()
            .map(|attribute| (*attribute, AttributeOutcome::Absent))
            .collect();
        Self {
            coordinate: coordinate.into(),
            outcomes,
        }
    }

    pub fn set(&mut self, attribute: StyleAttribute, outcome: AttributeOutcome) {
        self.outcomes.insert(attribute, outcome);
    }

    pub fn outcome(&self, attribute: StyleAttribute) -> &AttributeOutcome {
        self.outcomes
            .get(&attribute)
            .unwrap_or(&AttributeOutcome::Absent)
    }

    pub fn skipped(&self) -> impl Iterator<Item = (StyleAttribute, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(attribute, outcome)| match outcome {
                AttributeOutcome::Skipped(reason) => Some((*attribute, reason.as_str())),
                _ => None,
            })
    }

    pub fn is_partial(&self) -> bool {
        self.skipped().next().is_some()
    }
}

/// Aggregate counters for one copied sheet.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CopyReport {
    /// Cells whose value was written to the new sheet.
    pub cells: u64,
    pub copied: BTreeMap<StyleAttribute, u64>,
    pub skipped: BTreeMap<StyleAttribute, u64>,
    pub column_widths: u64,
    pub merged_ranges: u64,
    pub tables: u64,
    /// Cells with at least one skipped attribute.
    #[serde(skip)]
    pub partial_cells: Vec<CellCopyReport>,
}

impl CopyReport {
    pub fn record(&mut self, cell: CellCopyReport) {
        self.cells += 1;
        for (attribute, outcome) in &cell.outcomes {
            match outcome {
                AttributeOutcome::Copied => *self.copied.entry(*attribute).or_default() += 1,
                AttributeOutcome::Skipped(_) => *self.skipped.entry(*attribute).or_default() += 1,
                AttributeOutcome::Absent => {}
            }
        }
        if cell.is_partial() {
            self.partial_cells.push(cell);
        }
    }

    pub fn copied_count(&self, attribute: StyleAttribute) -> u64 {
        self.copied.get(&attribute).copied().unwrap_or(0)
    }

    pub fn skipped_count(&self, attribute: StyleAttribute) -> u64 {
        self.skipped.get(&attribute).copied().unwrap_or(0)
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let skipped: u64 = self.skipped.values().sum();
        format!(
            "{prefix} cells={} skipped_attributes={} column_widths={} merged_ranges={} tables={}",
            self.cells, skipped, self.column_widths, self.merged_ranges, self.tables
        )
    }
}
