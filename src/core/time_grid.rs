use chrono::{Datelike, FixedOffset, TimeDelta};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::primitives::delta_minutes;
use crate::core::types::Timestamp;
use crate::error::{SketchError, SketchResult};

/// Upper bound on grid cardinality.
pub const MAX_GRID_POINTS: i64 = 1_000_000;

/// Fixed set of timestamps a capture session may place points on.
///
/// The grid covers `[start, end)` in steps of `period`, so it always holds
/// `ceil((end - start) / period)` strictly increasing timestamps. It is never
/// empty and never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    start: Timestamp,
    end: Timestamp,
    period: TimeDelta,
    stamps: Vec<Timestamp>,
}

impl TimeGrid {
    pub fn new(start: Timestamp, end: Timestamp, period: TimeDelta) -> SketchResult<Self> {
        if start >= end {
            return Err(SketchError::InvalidConfig(
                "start time must be before the end time".to_owned(),
            ));
        }
        if period <= TimeDelta::zero() {
            return Err(SketchError::InvalidConfig(
                "period must be positive".to_owned(),
            ));
        }
        let span = end - start;
        if period >= span {
            return Err(SketchError::InvalidConfig(
                "period must be less than the time range".to_owned(),
            ));
        }

        let period_us = period
            .num_microseconds()
            .filter(|micros| *micros > 0)
            .ok_or_else(|| {
                SketchError::InvalidConfig("period must be at least one microsecond".to_owned())
            })?;
        let span_us = span.num_microseconds().ok_or_else(|| {
            SketchError::InvalidConfig("time range is too large for the grid".to_owned())
        })?;
        let count = span_us / period_us + i64::from(span_us % period_us != 0);
        if count > MAX_GRID_POINTS {
            return Err(SketchError::InvalidConfig(format!(
                "period is too small for the time range ({count} grid points, at most {MAX_GRID_POINTS})"
            )));
        }

        let step = TimeDelta::microseconds(period_us);
        let stamps: Vec<Timestamp> = std::iter::successors(Some(start), |time| Some(*time + step))
            .take(count as usize)
            .collect();

        debug!(
            cardinality = stamps.len(),
            period_minutes = delta_minutes(step),
            "built time grid"
        );

        Ok(Self {
            start,
            end,
            period: step,
            stamps,
        })
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    #[must_use]
    pub fn period(&self) -> TimeDelta {
        self.period
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        *self.start.offset()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.stamps
    }

    #[must_use]
    pub fn first(&self) -> Timestamp {
        self.stamps[0]
    }

    #[must_use]
    pub fn last(&self) -> Timestamp {
        self.stamps[self.stamps.len() - 1]
    }

    #[must_use]
    pub fn index_of(&self, time: Timestamp) -> Option<usize> {
        self.stamps.binary_search(&time).ok()
    }

    #[must_use]
    pub fn contains(&self, time: Timestamp) -> bool {
        self.index_of(time).is_some()
    }

    /// Grid timestamps strictly between `after` and `before`.
    #[must_use]
    pub fn between(&self, after: Timestamp, before: Timestamp) -> &[Timestamp] {
        let lo = self.stamps.partition_point(|time| *time <= after);
        let hi = self.stamps.partition_point(|time| *time < before);
        if lo >= hi { &[] } else { &self.stamps[lo..hi] }
    }

    /// Nearest grid timestamp to `target` among those strictly after `current`.
    ///
    /// Ties resolve to the earlier timestamp. Returns `None` when `current`
    /// is already at or past the last grid timestamp.
    #[must_use]
    pub fn nearest_after(&self, current: Timestamp, target: Timestamp) -> Option<Timestamp> {
        let first_future = self.stamps.partition_point(|time| *time <= current);
        let future = &self.stamps[first_future..];
        let split = future.partition_point(|time| *time < target);

        let mut candidates: SmallVec<[(TimeDelta, Timestamp); 2]> = SmallVec::new();
        if split > 0 {
            let below = future[split - 1];
            candidates.push(((target - below).abs(), below));
        }
        if let Some(&above) = future.get(split) {
            candidates.push(((above - target).abs(), above));
        }

        candidates
            .into_iter()
            .min_by_key(|item| item.0)
            .map(|(_, time)| time)
    }

    /// Chrono format string for time-axis labels on a canvas showing this grid.
    ///
    /// Adds a month-day part for ranges over a month, a day part for ranges
    /// over a day, and picks clock precision from the period.
    #[must_use]
    pub fn axis_label_format(&self) -> String {
        let month_range = (self.end.year() - self.start.year()) * 12
            + self.end.month() as i32
            - self.start.month() as i32;
        let day_range = (self.end - self.start).num_days();

        let date_component = if month_range > 1 {
            "%m-%d "
        } else if day_range > 1 {
            "%d "
        } else {
            ""
        };
        let time_component = if self.period < TimeDelta::minutes(1) {
            "%H:%M:%S"
        } else if self.period < TimeDelta::hours(1) {
            "%H:%M"
        } else {
            "%H"
        };
        format!("{date_component}{time_component}")
    }
}
