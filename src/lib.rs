//! series-sketch: hand-drawn, grid-aligned mock time-series.
//!
//! A capture session snaps clicks onto a fixed time grid, fills skipped grid
//! points by linear interpolation and commits each finished series as a
//! column of a wide table. Wide tables can then be reshaped into long format
//! by grouping like columns under a shared measurement name.

pub mod canvas;
pub mod capture;
pub mod config;
pub mod core;
pub mod error;
pub mod interaction;
pub mod prompt;
pub mod render;
pub mod reshape;
pub mod table;
pub mod telemetry;

pub use capture::{SeriesCapture, SeriesReport};
pub use config::{SessionConfig, SessionSettings};
pub use error::{SketchError, SketchResult};
pub use reshape::{GroupingSpec, MeasurementGroup, reshape};
pub use table::{LongTable, WideTable};
