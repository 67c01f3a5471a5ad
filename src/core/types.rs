use chrono::{DateTime, FixedOffset};

use crate::error::{SketchError, SketchResult};

/// Timestamps carry the session's fixed offset so exports keep local wall time.
pub type Timestamp = DateTime<FixedOffset>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One recorded selection: a grid timestamp and the value drawn there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub time: Timestamp,
    pub value: f64,
}

impl GridPoint {
    #[must_use]
    pub fn new(time: Timestamp, value: f64) -> Self {
        Self { time, value }
    }
}

/// Advisory display range for drawn values.
///
/// Stored values are never clamped to it; it only drives the canvas layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> SketchResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SketchError::InvalidConfig(
                "y range bounds must be finite".to_owned(),
            ));
        }
        if min >= max {
            return Err(SketchError::InvalidConfig(format!(
                "y_min must be less than y_max (got {min} >= {max})"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
