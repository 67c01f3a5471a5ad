use std::fmt;

use crate::render::SeriesColor;

/// Post-hoc check of a finished series against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesValidation {
    pub expected_points: usize,
    pub actual_points: usize,
    /// Points whose timestamp is not a grid member; they cannot occupy a row.
    pub off_grid_points: usize,
    /// Distinct values recorded for a timestamp that already had one.
    pub conflicting_points: usize,
}

impl SeriesValidation {
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.expected_points == self.actual_points && self.off_grid_points == 0
    }
}

impl fmt::Display for SeriesValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "{} points on grid", self.actual_points);
        }
        write!(
            f,
            "{} of {} points recorded, {} off grid",
            self.actual_points, self.expected_points, self.off_grid_points
        )?;
        if self.conflicting_points > 0 {
            write!(f, ", {} conflicting", self.conflicting_points)?;
        }
        Ok(())
    }
}

/// Outcome of committing one series to the wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    pub name: String,
    pub color: SeriesColor,
    /// Points accumulated before normalization, interpolated fills included.
    pub recorded_points: usize,
    pub validation: SeriesValidation,
}

/// Legend row for a committed or in-progress series.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: SeriesColor,
}
