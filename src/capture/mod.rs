//! Point capture: turns raw clicks into grid-aligned, gap-filled series.
//!
//! A `SeriesCapture` is one drawing session. Series are drawn one at a time:
//! `begin_series` opens a series, each click goes through `add_point`, and
//! `finish_series` normalizes, validates and commits it as a wide-table column.
//!
//! Clicks arrive in native coordinates: x is unix seconds, y is the value.

mod report;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use tracing::{debug, trace, warn};

use crate::config::SessionConfig;
use crate::core::{
    GridPoint, TimeGrid, Timestamp, ValueRange, delta_minutes, unix_seconds_to_timestamp,
};
use crate::error::{SketchError, SketchResult};
use crate::render::{SeriesColor, series_color};
use crate::table::{CellValue, WideTable};

pub use report::{LegendEntry, SeriesReport, SeriesValidation};

#[derive(Debug, Clone, PartialEq)]
struct ActiveSeries {
    name: String,
    color: SeriesColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesCapture {
    grid: TimeGrid,
    value_range: ValueRange,
    current_x: Option<Timestamp>,
    active: Option<ActiveSeries>,
    points: Vec<GridPoint>,
    table: WideTable,
}

impl SeriesCapture {
    #[must_use]
    pub fn new(grid: TimeGrid, time_col: impl Into<String>, value_range: ValueRange) -> Self {
        let table = WideTable::new(time_col, grid.timestamps().to_vec());
        Self {
            grid,
            value_range,
            current_x: None,
            active: None,
            points: Vec::new(),
            table,
        }
    }

    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.grid.clone(), config.time_col.clone(), config.value_range)
    }

    #[must_use]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    #[must_use]
    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Latest grid timestamp of the open series; future clicks must land after it.
    #[must_use]
    pub fn current_x(&self) -> Option<Timestamp> {
        self.current_x
    }

    /// Points recorded so far for the open series, interpolated fills included.
    #[must_use]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    #[must_use]
    pub fn active_series(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }

    #[must_use]
    pub fn active_color(&self) -> Option<SeriesColor> {
        self.active.as_ref().map(|active| active.color)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.table.column_count()
    }

    #[must_use]
    pub fn table(&self) -> &WideTable {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> WideTable {
        self.table
    }

    /// Committed series followed by the open one, each with its palette color.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        let committed = self
            .table
            .column_names()
            .enumerate()
            .map(|(ordinal, name)| LegendEntry {
                name: name.to_owned(),
                color: series_color(ordinal),
            });
        let open = self.active.iter().map(|active| LegendEntry {
            name: active.name.clone(),
            color: active.color,
        });
        committed.chain(open).collect()
    }

    /// Changes the advisory display range. Only allowed between series.
    pub fn set_value_range(&mut self, min: f64, max: f64) -> SketchResult<()> {
        if let Some(active) = &self.active {
            return Err(SketchError::SeriesAlreadyOpen(active.name.clone()));
        }
        self.value_range = ValueRange::new(min, max)?;
        debug!(y_min = min, y_max = max, "changed value range");
        Ok(())
    }

    /// Opens a new, empty series and returns its palette color.
    pub fn begin_series(&mut self, name: &str) -> SketchResult<SeriesColor> {
        if let Some(active) = &self.active {
            return Err(SketchError::SeriesAlreadyOpen(active.name.clone()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SketchError::InvalidData(
                "series name must not be empty".to_owned(),
            ));
        }
        if self.table.is_name_taken(name) {
            return Err(SketchError::DuplicateSeries(name.to_owned()));
        }

        let color = series_color(self.table.column_count());
        self.points.clear();
        self.current_x = None;
        self.active = Some(ActiveSeries {
            name: name.to_owned(),
            color,
        });
        debug!(series = name, color = color.name, "begin series");
        Ok(color)
    }

    /// Snaps a raw x coordinate (unix seconds) to the grid.
    ///
    /// The first point of a series always lands on the first grid timestamp.
    /// Later points land on the nearest grid timestamp strictly after
    /// `current_x`. `None` means the series cannot accept more input.
    #[must_use]
    pub fn snap(&self, raw_x: f64) -> Option<Timestamp> {
        let Some(current) = self.current_x else {
            return Some(self.grid.first());
        };
        let target = unix_seconds_to_timestamp(raw_x, self.grid.offset())?;
        self.grid.nearest_after(current, target)
    }

    /// Handles one click. Returns whether the series still accepts input.
    pub fn add_point(&mut self, raw_x: f64, raw_y: f64) -> SketchResult<bool> {
        if self.active.is_none() {
            return Err(SketchError::NoActiveSeries);
        }
        if !raw_y.is_finite() {
            return Err(SketchError::InvalidData(
                "click value must be finite".to_owned(),
            ));
        }

        let Some(target) = self.snap(raw_x) else {
            debug!(raw_x, "no eligible grid point left");
            return Ok(false);
        };
        self.record_selection(target, raw_y)?;
        Ok(target != self.grid.last())
    }

    /// Records a selection at `target`, filling skipped grid points linearly.
    ///
    /// When `target` is more than one period past `current_x`, every grid
    /// timestamp strictly between them gets a value on the straight line from
    /// the previous point to (`target`, `y`). Slopes are per fractional minute.
    ///
    /// This does not re-check snapping; `add_point` is the guarded entry.
    /// Off-grid or repeated targets are tolerated here and surface in the
    /// `finish_series` validation.
    pub fn record_selection(&mut self, target: Timestamp, y: f64) -> SketchResult<()> {
        let Some(active) = &self.active else {
            return Err(SketchError::NoActiveSeries);
        };
        if !y.is_finite() {
            return Err(SketchError::InvalidData(
                "selection value must be finite".to_owned(),
            ));
        }

        if let (Some(prev), Some(current)) = (self.points.last().copied(), self.current_x) {
            if target > current + self.grid.period() {
                let slope = (y - prev.value) / delta_minutes(target - prev.time);
                let fills: Vec<GridPoint> = self
                    .grid
                    .between(current, target)
                    .iter()
                    .map(|&time| {
                        GridPoint::new(time, prev.value - slope * delta_minutes(prev.time - time))
                    })
                    .collect();
                debug!(
                    series = %active.name,
                    filled = fills.len(),
                    slope,
                    "interpolated skipped grid points"
                );
                self.points.extend(fills);
            }
        }

        self.points.push(GridPoint::new(target, y));
        self.current_x = Some(target);
        trace!(
            series = %active.name,
            time = %target,
            value = y,
            count = self.points.len(),
            "recorded selection"
        );
        Ok(())
    }

    /// Normalizes, validates and commits the open series as a table column.
    ///
    /// Identical (timestamp, value) pairs collapse and points are sorted by
    /// time. A failed validation is logged and reported but the series is still
    /// committed: rows without a point stay empty, off-grid points are dropped,
    /// and the first value wins when a timestamp carries several.
    pub fn finish_series(&mut self) -> SketchResult<SeriesReport> {
        let active = self.active.take().ok_or(SketchError::NoActiveSeries)?;
        let recorded_points = self.points.len();
        let points = normalize_points(std::mem::take(&mut self.points));
        self.current_x = None;

        let mut values: Vec<Option<CellValue>> = vec![None; self.grid.len()];
        let mut off_grid_points = 0;
        let mut conflicting_points = 0;
        for point in &points {
            match self.grid.index_of(point.time) {
                Some(row) if values[row].is_none() => {
                    values[row] = Some(CellValue::Number(point.value));
                }
                Some(_) => conflicting_points += 1,
                None => off_grid_points += 1,
            }
        }

        let validation = SeriesValidation {
            expected_points: self.grid.len(),
            actual_points: points.len(),
            off_grid_points,
            conflicting_points,
        };
        if validation.is_valid() {
            debug!(series = %active.name, %validation, "finished series");
        } else {
            warn!(series = %active.name, %validation, "received invalid points; committing anyway");
        }

        self.table.insert_column(active.name.clone(), values)?;
        Ok(SeriesReport {
            name: active.name,
            color: active.color,
            recorded_points,
            validation,
        })
    }

    /// Appends constant columns, broadcasting each scalar to every row.
    /// Only allowed between series.
    pub fn export_constants(&mut self, constants: &IndexMap<String, String>) -> SketchResult<()> {
        if let Some(active) = &self.active {
            return Err(SketchError::SeriesAlreadyOpen(active.name.clone()));
        }
        for (name, value) in constants {
            self.table.set_constant(name.clone(), value.clone())?;
        }
        debug!(count = constants.len(), "exported constants");
        Ok(())
    }
}

fn normalize_points(points: Vec<GridPoint>) -> Vec<GridPoint> {
    let unique: IndexSet<(Timestamp, OrderedFloat<f64>)> = points
        .into_iter()
        .map(|point| (point.time, OrderedFloat(point.value)))
        .collect();
    let mut points: Vec<GridPoint> = unique
        .into_iter()
        .map(|(time, value)| GridPoint::new(time, value.into_inner()))
        .collect();
    points.sort_by_key(|point| point.time);
    points
}

#[cfg(test)]
mod tests {
    use super::normalize_points;
    use crate::core::{GridPoint, parse_timestamp};
    use chrono::FixedOffset;

    #[test]
    fn normalization_collapses_identical_pairs_and_sorts() {
        let utc = FixedOffset::east_opt(0).expect("utc");
        let t0 = parse_timestamp("2023-01-01 00:00", utc).expect("t0");
        let t1 = parse_timestamp("2023-01-01 00:05", utc).expect("t1");
        let points = vec![
            GridPoint::new(t1, 2.0),
            GridPoint::new(t0, 1.0),
            GridPoint::new(t1, 2.0),
            GridPoint::new(t1, 3.0),
        ];

        let normalized = normalize_points(points);
        assert_eq!(
            normalized,
            vec![
                GridPoint::new(t0, 1.0),
                GridPoint::new(t1, 2.0),
                GridPoint::new(t1, 3.0),
            ]
        );
    }
}
