use crate::core::types::Viewport;
use crate::error::{SketchError, SketchResult};

/// Which viewport dimension a scale projects onto.
///
/// Vertical scales grow upward in domain space while pixel rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAxis {
    Horizontal,
    Vertical,
}

impl ScaleAxis {
    fn extent(self, viewport: Viewport) -> f64 {
        match self {
            Self::Horizontal => f64::from(viewport.width),
            Self::Vertical => f64::from(viewport.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    axis: ScaleAxis,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64, axis: ScaleAxis) -> SketchResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(SketchError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            axis,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn axis(self) -> ScaleAxis {
        self.axis
    }

    pub fn domain_to_pixel(self, value: f64, viewport: Viewport) -> SketchResult<f64> {
        ensure_viewport(viewport)?;
        if !value.is_finite() {
            return Err(SketchError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        let extent = self.axis.extent(viewport);
        Ok(match self.axis {
            ScaleAxis::Horizontal => normalized * extent,
            ScaleAxis::Vertical => (1.0 - normalized) * extent,
        })
    }

    pub fn pixel_to_domain(self, pixel: f64, viewport: Viewport) -> SketchResult<f64> {
        ensure_viewport(viewport)?;
        if !pixel.is_finite() {
            return Err(SketchError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let extent = self.axis.extent(viewport);
        let normalized = match self.axis {
            ScaleAxis::Horizontal => pixel / extent,
            ScaleAxis::Vertical => 1.0 - pixel / extent,
        };
        Ok(self.domain_start + normalized * span)
    }
}

fn ensure_viewport(viewport: Viewport) -> SketchResult<()> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(SketchError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })
    }
}
