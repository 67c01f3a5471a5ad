//! Wide and long output tables plus their delimited-text form.

mod csv_io;
mod long;
mod wide;

use std::fmt;

pub use long::{LongRow, LongTable};
pub use wide::WideTable;

/// One non-missing table cell.
///
/// Drawn series only produce numbers; text shows up when a wide table is
/// read back from a file that carries label or constant columns.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Parses a raw delimited-text cell. Empty and `NaN` cells are missing.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<f64>() {
            Ok(number) if number.is_nan() => None,
            Ok(number) => Some(Self::Number(number)),
            Err(_) => Some(Self::Text(raw.to_owned())),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

pub(crate) fn render_cell(cell: Option<&CellValue>) -> String {
    cell.map(ToString::to_string).unwrap_or_default()
}
