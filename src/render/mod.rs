mod frame;
mod null_renderer;
mod palette;
mod primitives;

pub use frame::{RenderFrame, SeriesStroke};
pub use null_renderer::NullRenderer;
pub use palette::{GRID_LINE_COLOR, LABEL_COLOR, SERIES_PALETTE, SeriesColor, series_color};
pub use primitives::{Color, LinePrimitive, MarkerPrimitive, TextHAlign, TextPrimitive};

use crate::error::SketchResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from capture state and snapping logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> SketchResult<()>;
}
