//! Drawing canvas: pixel mapping, capture driving and frame building.

mod layout;

use tracing::{trace, warn};

use crate::capture::{SeriesCapture, SeriesReport};
use crate::core::{GridPoint, Viewport};
use crate::error::{SketchError, SketchResult};
use crate::interaction::{ClickSource, PointerEvent};
use crate::render::{
    Color, GRID_LINE_COLOR, LABEL_COLOR, RenderFrame, Renderer, SeriesColor, SeriesStroke,
    TextHAlign, TextPrimitive, series_color,
};
use crate::table::CellValue;

pub use layout::CanvasLayout;

const GRID_LINE_WIDTH: f64 = 1.0;
const SERIES_LINE_WIDTH: f64 = 2.0;
const MARKER_RADIUS: f64 = 3.0;
const LEGEND_FONT_PX: f64 = 12.0;
const LEGEND_MARGIN_PX: f64 = 8.0;
const AXIS_FONT_PX: f64 = 10.0;
const MAX_AXIS_LABELS: usize = 10;

pub struct DrawingCanvas<R: Renderer> {
    renderer: R,
    layout: CanvasLayout,
    capture: SeriesCapture,
    axis_label_format: String,
}

impl<R: Renderer> DrawingCanvas<R> {
    pub fn new(renderer: R, viewport: Viewport, capture: SeriesCapture) -> SketchResult<Self> {
        let layout = CanvasLayout::new(viewport, capture.grid(), capture.value_range())?;
        let axis_label_format = capture.grid().axis_label_format();
        let mut canvas = Self {
            renderer,
            layout,
            capture,
            axis_label_format,
        };
        canvas.redraw()?;
        Ok(canvas)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    #[must_use]
    pub fn capture(&self) -> &SeriesCapture {
        &self.capture
    }

    #[must_use]
    pub fn into_capture(self) -> SeriesCapture {
        self.capture
    }

    pub fn begin_series(&mut self, name: &str) -> SketchResult<SeriesColor> {
        let color = self.capture.begin_series(name)?;
        self.redraw()?;
        Ok(color)
    }

    /// Click in canvas pixels. Returns whether the series still accepts input.
    pub fn pointer_click(&mut self, x: f64, y: f64) -> SketchResult<bool> {
        let (native_x, native_y) = self.layout.pixel_to_native(x, y)?;
        trace!(x, y, native_x, native_y, "pointer click");
        self.click_native(native_x, native_y)
    }

    /// Click in native coordinates (unix seconds, value).
    pub fn click_native(&mut self, x: f64, y: f64) -> SketchResult<bool> {
        let accepts_more = self.capture.add_point(x, y)?;
        self.redraw()?;
        Ok(accepts_more)
    }

    pub fn finish_series(&mut self) -> SketchResult<SeriesReport> {
        let report = self.capture.finish_series()?;
        self.redraw()?;
        Ok(report)
    }

    /// Opens `name`, feeds events from `source` until the series completes or
    /// input ends, then commits it.
    ///
    /// Clicks rejected as invalid data are skipped. If `source` itself fails,
    /// the points drawn so far are still committed before the error is
    /// returned, so the session never stays half-open.
    pub fn draw_series<S: ClickSource>(
        &mut self,
        name: &str,
        source: &mut S,
    ) -> SketchResult<SeriesReport> {
        self.begin_series(name)?;
        let fed = self.feed_clicks(name, source);
        let report = self.finish_series()?;
        fed.map(|()| report)
    }

    fn feed_clicks<S: ClickSource>(&mut self, name: &str, source: &mut S) -> SketchResult<()> {
        loop {
            let clicked = match source.next_event()? {
                PointerEvent::Native { x, y } => self.click_native(x, y),
                PointerEvent::Pixel { x, y } => self.pointer_click(x, y),
                PointerEvent::EndOfInput => return Ok(()),
            };
            match clicked {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(SketchError::InvalidData(reason)) => {
                    warn!(series = name, %reason, "skipped click");
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn set_value_range(&mut self, min: f64, max: f64) -> SketchResult<()> {
        self.capture.set_value_range(min, max)?;
        self.layout = CanvasLayout::new(
            self.layout.viewport(),
            self.capture.grid(),
            self.capture.value_range(),
        )?;
        self.redraw()
    }

    pub fn redraw(&mut self) -> SketchResult<()> {
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    /// Grid lines, axis labels, committed series, the open series and the legend.
    pub fn build_frame(&self) -> SketchResult<RenderFrame> {
        let viewport = self.layout.viewport();
        let label_y = f64::from(viewport.height) - 2.0;
        let mut frame = RenderFrame::new(viewport);

        let grid = self.capture.grid().timestamps();
        let label_step = grid.len().div_ceil(MAX_AXIS_LABELS).max(1);
        for (idx, time) in grid.iter().enumerate() {
            let x = self.layout.time_to_pixel(*time)?;
            frame = frame.with_vertical_rule(x, GRID_LINE_WIDTH, GRID_LINE_COLOR);
            if idx % label_step == 0 {
                frame = frame.with_text(TextPrimitive::new(
                    time.format(&self.axis_label_format).to_string(),
                    x,
                    label_y,
                    AXIS_FONT_PX,
                    LABEL_COLOR,
                    TextHAlign::Center,
                ));
            }
        }

        let table = self.capture.table();
        for (ordinal, name) in table.column_names().enumerate() {
            let Some(values) = table.column(name) else {
                continue;
            };
            let points = table
                .index()
                .iter()
                .zip(values)
                .map(|(time, cell)| {
                    cell.as_ref()
                        .and_then(CellValue::as_number)
                        .map(|value| GridPoint::new(*time, value))
                });
            frame = frame.with_polyline(
                &self.project(points)?,
                series_stroke(series_color(ordinal).color),
            );
        }

        if let Some(active) = self.capture.active_color() {
            let points = self.capture.points().iter().copied().map(Some);
            frame = frame.with_polyline(&self.project(points)?, series_stroke(active.color));
        }

        let legend = self
            .capture
            .legend()
            .into_iter()
            .map(|entry| (entry.name, entry.color.color));
        Ok(frame.with_legend(legend, LEGEND_FONT_PX, LEGEND_MARGIN_PX))
    }

    /// Maps grid points to pixels, keeping gaps.
    fn project(
        &self,
        points: impl Iterator<Item = Option<GridPoint>>,
    ) -> SketchResult<Vec<Option<(f64, f64)>>> {
        points
            .map(|point| {
                point
                    .map(|point| -> SketchResult<(f64, f64)> {
                        Ok((
                            self.layout.time_to_pixel(point.time)?,
                            self.layout.value_to_pixel(point.value)?,
                        ))
                    })
                    .transpose()
            })
            .collect()
    }
}

fn series_stroke(color: Color) -> SeriesStroke {
    SeriesStroke {
        line_width: SERIES_LINE_WIDTH,
        marker_radius: MARKER_RADIUS,
        color,
    }
}
