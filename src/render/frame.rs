use crate::core::Viewport;
use crate::error::{SketchError, SketchResult};
use crate::render::{Color, LinePrimitive, MarkerPrimitive, TextHAlign, TextPrimitive};

/// Stroke and marker style for one drawn series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStroke {
    pub line_width: f64,
    pub marker_radius: f64,
    pub color: Color,
}

/// Backend-agnostic scene for one canvas draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub markers: Vec<MarkerPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            markers: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: MarkerPrimitive) -> Self {
        self.markers.push(marker);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    /// Full-height vertical line at pixel column `x`, as drawn for grid timestamps.
    #[must_use]
    pub fn with_vertical_rule(self, x: f64, stroke_width: f64, color: Color) -> Self {
        let height = f64::from(self.viewport.height);
        self.with_line(LinePrimitive::new(x, 0.0, x, height, stroke_width, color))
    }

    /// A marker per present point and a segment between each pair of
    /// consecutive present points. `None` leaves a gap.
    #[must_use]
    pub fn with_polyline(mut self, points: &[Option<(f64, f64)>], stroke: SeriesStroke) -> Self {
        let mut previous: Option<(f64, f64)> = None;
        for point in points {
            let Some((x, y)) = *point else {
                previous = None;
                continue;
            };
            if let Some((prev_x, prev_y)) = previous {
                self.lines.push(LinePrimitive::new(
                    prev_x,
                    prev_y,
                    x,
                    y,
                    stroke.line_width,
                    stroke.color,
                ));
            }
            self.markers
                .push(MarkerPrimitive::new(x, y, stroke.marker_radius, stroke.color));
            previous = Some((x, y));
        }
        self
    }

    /// Right-aligned legend rows stacked from the top-right corner.
    #[must_use]
    pub fn with_legend<I, S>(mut self, entries: I, font_size_px: f64, margin_px: f64) -> Self
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<String>,
    {
        let right = f64::from(self.viewport.width) - margin_px;
        for (row, (name, color)) in entries.into_iter().enumerate() {
            self.texts.push(TextPrimitive::new(
                name,
                right,
                margin_px + font_size_px * (row as f64 + 1.0),
                font_size_px,
                color,
                TextHAlign::Right,
            ));
        }
        self
    }

    pub fn validate(&self) -> SketchResult<()> {
        if !self.viewport.is_valid() {
            return Err(SketchError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.markers.iter().try_for_each(|marker| marker.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.markers.len() + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
