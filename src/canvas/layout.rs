use crate::core::{
    LinearScale, ScaleAxis, TimeGrid, Timestamp, ValueRange, Viewport, delta_minutes,
    timestamp_to_unix_seconds,
};
use crate::error::{SketchError, SketchResult};

/// Pixel <-> native coordinate mapping for one canvas.
///
/// The time axis spans the grid range widened by a third of a period on both
/// sides so the first and last grid lines are clickable. The value axis spans
/// the advisory value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    viewport: Viewport,
    time_scale: LinearScale,
    value_scale: LinearScale,
}

impl CanvasLayout {
    pub fn new(viewport: Viewport, grid: &TimeGrid, range: ValueRange) -> SketchResult<Self> {
        if !viewport.is_valid() {
            return Err(SketchError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let buffer_seconds = delta_minutes(grid.period()) * 60.0 / 3.0;
        let time_scale = LinearScale::new(
            timestamp_to_unix_seconds(grid.start()) - buffer_seconds,
            timestamp_to_unix_seconds(grid.end()) + buffer_seconds,
            ScaleAxis::Horizontal,
        )?;
        let value_scale = LinearScale::new(range.min(), range.max(), ScaleAxis::Vertical)?;

        Ok(Self {
            viewport,
            time_scale,
            value_scale,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Visible time domain in unix seconds.
    #[must_use]
    pub fn time_domain(&self) -> (f64, f64) {
        self.time_scale.domain()
    }

    /// Maps a pixel position to (unix seconds, value).
    pub fn pixel_to_native(&self, x: f64, y: f64) -> SketchResult<(f64, f64)> {
        Ok((
            self.time_scale.pixel_to_domain(x, self.viewport)?,
            self.value_scale.pixel_to_domain(y, self.viewport)?,
        ))
    }

    pub fn time_to_pixel(&self, time: Timestamp) -> SketchResult<f64> {
        self.time_scale
            .domain_to_pixel(timestamp_to_unix_seconds(time), self.viewport)
    }

    pub fn value_to_pixel(&self, value: f64) -> SketchResult<f64> {
        self.value_scale.domain_to_pixel(value, self.viewport)
    }
}
